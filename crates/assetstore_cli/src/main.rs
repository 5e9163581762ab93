//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `assetstore_core` linkage.
//! - Report record counts for an existing database file, if one is given.
//!
//! Usage: `assetstore_cli [db_path]`. Without a path an empty in-memory
//! store is probed.

use assetstore_core::db::{open_db, open_db_in_memory};
use assetstore_core::{AssetService, SqliteAssetRepository};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("assetstore_core ping={}", assetstore_core::ping());
    println!("assetstore_core version={}", assetstore_core::core_version());

    match probe_store(std::env::args().nth(1)) {
        Ok((active, total)) => {
            println!("assetstore_core active_assets={active} total_assets={total}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("assetstore_core probe failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn probe_store(db_path: Option<String>) -> Result<(usize, usize), Box<dyn Error>> {
    let conn = match db_path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let service = AssetService::new(SqliteAssetRepository::try_new(&conn)?);
    let active = service.list_active()?.len();
    let total = service.list_all()?.len();
    Ok((active, total))
}
