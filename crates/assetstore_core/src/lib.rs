//! Core domain logic for the asset store.
//! This crate is the single source of truth for asset lifecycle and
//! duplicate-detection invariants.

pub mod db;
pub mod dedup;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use dedup::detector::{
    matching_fields, DuplicateReport, DuplicateStrategy, EmptyFieldPolicy, IndexedLookup,
    LinearScan,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::asset::{
    Asset, AssetData, AssetId, AssetIdentity, IdentityField, STATUS_LOG_CREATED,
    STATUS_LOG_DELETED, STATUS_LOG_UPDATED,
};
pub use repo::asset_repo::{AssetRepository, RepoError, RepoResult, SqliteAssetRepository};
pub use service::asset_service::{AssetService, GuardedInsert};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
