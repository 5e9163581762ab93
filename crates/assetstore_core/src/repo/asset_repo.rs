//! Asset repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the record-store operations over canonical `assets` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Missing ids are reported as `None`/`false`, never as errors.
//! - Every mutation overwrites `status_log` and moves `updated_at` strictly
//!   forward.
//! - Scans return rows in insertion order (`rowid ASC`).
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::asset::{
    now_epoch_ms, Asset, AssetData, AssetId, AssetIdentity, IdentityField, STATUS_LOG_DELETED,
    STATUS_LOG_UPDATED,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ASSET_COLUMNS: [&str; 19] = [
    "uuid",
    "serial_number",
    "mac_address",
    "pc_name",
    "employee_number",
    "username",
    "asset_tag",
    "asset_type",
    "brand",
    "model",
    "employee_name",
    "department",
    "location",
    "remarks",
    "buyback_status",
    "is_deleted",
    "status_log",
    "created_at",
    "updated_at",
];

const ASSET_SELECT_SQL: &str = "SELECT
    uuid,
    serial_number,
    mac_address,
    pc_name,
    employee_number,
    username,
    asset_tag,
    asset_type,
    brand,
    model,
    employee_name,
    department,
    location,
    remarks,
    buyback_status,
    is_deleted,
    status_log,
    created_at,
    updated_at
FROM assets";

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage failure surfaced by record-store operations.
///
/// Absence of a record is not an error and never appears here.
#[derive(Debug)]
pub enum RepoError {
    /// Any SQLite failure: connectivity, constraint violation, locking.
    Db(DbError),
    /// Persisted row cannot be converted to a valid `Asset`.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted asset data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "asset repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "asset repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "asset repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Record-store interface for asset persistence.
///
/// Implementations know nothing about duplicate semantics; they only offer
/// equality-filtered reads that a detector can build on.
pub trait AssetRepository {
    /// Lists records with `is_deleted = false`, insertion order.
    fn list_active(&self) -> RepoResult<Vec<Asset>>;
    /// Lists every record regardless of the deletion flag, insertion order.
    fn list_all(&self) -> RepoResult<Vec<Asset>>;
    /// Point lookup by id. Soft-deleted records are returned too.
    fn get(&self, id: AssetId) -> RepoResult<Option<Asset>>;
    /// Persists a new record with a generated id and fresh timestamps.
    fn insert(&self, data: &AssetData) -> RepoResult<Asset>;
    /// Overwrites every mutable field. `None` when `id` does not exist.
    fn update(&self, id: AssetId, data: &AssetData) -> RepoResult<Option<Asset>>;
    /// Overwrites only `buyback_status`. `None` when `id` does not exist.
    fn update_status(&self, id: AssetId, status: &str) -> RepoResult<Option<Asset>>;
    /// Tombstones an active record. Returns whether a row changed.
    fn soft_delete(&self, id: AssetId) -> RepoResult<bool>;
    /// Returns records equal to any `(field, value)` criterion, deleted rows
    /// included, insertion order.
    ///
    /// A `None` value matches rows where the column is NULL.
    fn find_by_any_identity(
        &self,
        criteria: &[(IdentityField, Option<&str>)],
    ) -> RepoResult<Vec<Asset>>;
    /// Runs `op` against this repository inside one write transaction.
    ///
    /// Commits when `op` returns `Ok`, rolls back otherwise.
    fn atomically<T, F>(&self, op: F) -> RepoResult<T>
    where
        Self: Sized,
        F: FnOnce(&Self) -> RepoResult<T>;
}

/// SQLite-backed asset repository.
///
/// Borrows a caller-owned connection; construct one per unit of work.
pub struct SqliteAssetRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAssetRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_asset_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn list_where(&self, include_deleted: bool) -> RepoResult<Vec<Asset>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ASSET_SELECT_SQL}
             WHERE (?1 = 1 OR is_deleted = 0)
             ORDER BY rowid ASC;"
        ))?;
        let mut rows = stmt.query([bool_to_int(include_deleted)])?;
        let mut assets = Vec::new();
        while let Some(row) = rows.next()? {
            assets.push(parse_asset_row(row)?);
        }
        Ok(assets)
    }
}

impl AssetRepository for SqliteAssetRepository<'_> {
    fn list_active(&self) -> RepoResult<Vec<Asset>> {
        self.list_where(false)
    }

    fn list_all(&self) -> RepoResult<Vec<Asset>> {
        self.list_where(true)
    }

    fn get(&self, id: AssetId) -> RepoResult<Option<Asset>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ASSET_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_asset_row(row)?)),
            None => Ok(None),
        }
    }

    fn insert(&self, data: &AssetData) -> RepoResult<Asset> {
        let asset = Asset::new(data.clone(), now_epoch_ms());
        let identity = &asset.data.identity;

        self.conn.execute(
            "INSERT INTO assets (
                uuid,
                serial_number,
                mac_address,
                pc_name,
                employee_number,
                username,
                asset_tag,
                asset_type,
                brand,
                model,
                employee_name,
                department,
                location,
                remarks,
                buyback_status,
                is_deleted,
                status_log,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19);",
            params![
                asset.id.to_string(),
                identity.serial_number.as_deref(),
                identity.mac_address.as_deref(),
                identity.pc_name.as_deref(),
                identity.employee_number.as_deref(),
                identity.username.as_deref(),
                asset.data.asset_tag.as_deref(),
                asset.data.asset_type.as_deref(),
                asset.data.brand.as_deref(),
                asset.data.model.as_deref(),
                asset.data.employee_name.as_deref(),
                asset.data.department.as_deref(),
                asset.data.location.as_deref(),
                asset.data.remarks.as_deref(),
                asset.data.buyback_status.as_deref(),
                bool_to_int(asset.is_deleted),
                asset.status_log.as_str(),
                asset.created_at,
                asset.updated_at,
            ],
        )?;

        Ok(asset)
    }

    fn update(&self, id: AssetId, data: &AssetData) -> RepoResult<Option<Asset>> {
        let identity = &data.identity;
        let changed = self.conn.execute(
            "UPDATE assets
             SET
                serial_number = ?2,
                mac_address = ?3,
                pc_name = ?4,
                employee_number = ?5,
                username = ?6,
                asset_tag = ?7,
                asset_type = ?8,
                brand = ?9,
                model = ?10,
                employee_name = ?11,
                department = ?12,
                location = ?13,
                remarks = ?14,
                buyback_status = ?15,
                status_log = ?16,
                updated_at = MAX(?17, updated_at + 1)
             WHERE uuid = ?1;",
            params![
                id.to_string(),
                identity.serial_number.as_deref(),
                identity.mac_address.as_deref(),
                identity.pc_name.as_deref(),
                identity.employee_number.as_deref(),
                identity.username.as_deref(),
                data.asset_tag.as_deref(),
                data.asset_type.as_deref(),
                data.brand.as_deref(),
                data.model.as_deref(),
                data.employee_name.as_deref(),
                data.department.as_deref(),
                data.location.as_deref(),
                data.remarks.as_deref(),
                data.buyback_status.as_deref(),
                STATUS_LOG_UPDATED,
                now_epoch_ms(),
            ],
        )?;

        if changed == 0 {
            return Ok(None);
        }
        self.get(id)
    }

    fn update_status(&self, id: AssetId, status: &str) -> RepoResult<Option<Asset>> {
        let changed = self.conn.execute(
            "UPDATE assets
             SET
                buyback_status = ?2,
                status_log = ?3,
                updated_at = MAX(?4, updated_at + 1)
             WHERE uuid = ?1;",
            params![id.to_string(), status, STATUS_LOG_UPDATED, now_epoch_ms()],
        )?;

        if changed == 0 {
            return Ok(None);
        }
        self.get(id)
    }

    fn soft_delete(&self, id: AssetId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE assets
             SET
                is_deleted = 1,
                status_log = ?2,
                updated_at = MAX(?3, updated_at + 1)
             WHERE uuid = ?1
               AND is_deleted = 0;",
            params![id.to_string(), STATUS_LOG_DELETED, now_epoch_ms()],
        )?;

        Ok(changed > 0)
    }

    fn find_by_any_identity(
        &self,
        criteria: &[(IdentityField, Option<&str>)],
    ) -> RepoResult<Vec<Asset>> {
        if criteria.is_empty() {
            return Ok(Vec::new());
        }

        let mut clauses = Vec::with_capacity(criteria.len());
        let mut bind_values: Vec<Value> = Vec::with_capacity(criteria.len());
        for (field, value) in criteria {
            // `IS` keeps NULL = NULL semantics aligned with `Option` equality.
            clauses.push(format!("{} IS ?", field.column()));
            bind_values.push(match value {
                Some(text) => Value::Text((*text).to_string()),
                None => Value::Null,
            });
        }

        let sql = format!(
            "{ASSET_SELECT_SQL} WHERE {} ORDER BY rowid ASC;",
            clauses.join(" OR ")
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut assets = Vec::new();
        while let Some(row) = rows.next()? {
            assets.push(parse_asset_row(row)?);
        }
        Ok(assets)
    }

    fn atomically<T, F>(&self, op: F) -> RepoResult<T>
    where
        Self: Sized,
        F: FnOnce(&Self) -> RepoResult<T>,
    {
        // IMMEDIATE: the write lock is held from before `op` reads until commit.
        // Dropping `tx` on the error path rolls back.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let value = op(self)?;
        tx.commit()?;
        Ok(value)
    }
}

fn parse_asset_row(row: &Row<'_>) -> RepoResult<Asset> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in assets.uuid"))
    })?;

    let is_deleted = match row.get::<_, i64>("is_deleted")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_deleted value `{other}` in assets.is_deleted"
            )));
        }
    };

    Ok(Asset {
        id,
        data: AssetData {
            identity: AssetIdentity {
                serial_number: row.get("serial_number")?,
                mac_address: row.get("mac_address")?,
                pc_name: row.get("pc_name")?,
                employee_number: row.get("employee_number")?,
                username: row.get("username")?,
            },
            asset_tag: row.get("asset_tag")?,
            asset_type: row.get("asset_type")?,
            brand: row.get("brand")?,
            model: row.get("model")?,
            employee_name: row.get("employee_name")?,
            department: row.get("department")?,
            location: row.get("location")?,
            remarks: row.get("remarks")?,
            buyback_status: row.get("buyback_status")?,
        },
        is_deleted,
        status_log: row.get("status_log")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn ensure_asset_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "assets")? {
        return Err(RepoError::MissingRequiredTable("assets"));
    }

    for column in ASSET_COLUMNS {
        if !table_has_column(conn, "assets", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "assets",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}
