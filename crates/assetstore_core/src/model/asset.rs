//! Asset domain model.
//!
//! # Responsibility
//! - Define the canonical asset record and its caller-supplied payload.
//! - Name the identity-bearing fields used for duplicate matching.
//!
//! # Invariants
//! - `id` is stable and never reused for another asset.
//! - `is_deleted` is the source of truth for tombstone state.
//! - `status_log` always carries the label of the last lifecycle action.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for every asset record.
pub type AssetId = Uuid;

/// Status-log label written on insert.
pub const STATUS_LOG_CREATED: &str = "Created";
/// Status-log label written on full update and status update.
pub const STATUS_LOG_UPDATED: &str = "Updated";
/// Status-log label written on soft delete.
pub const STATUS_LOG_DELETED: &str = "Deleted";

/// Identity-bearing attributes used to detect the same real-world asset.
///
/// Equality is exact: case-sensitive, no trimming, no MAC normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetIdentity {
    pub serial_number: Option<String>,
    pub mac_address: Option<String>,
    pub pc_name: Option<String>,
    pub employee_number: Option<String>,
    pub username: Option<String>,
}

impl AssetIdentity {
    /// Returns the value stored for one identity field.
    pub fn value(&self, field: IdentityField) -> Option<&str> {
        match field {
            IdentityField::SerialNumber => self.serial_number.as_deref(),
            IdentityField::MacAddress => self.mac_address.as_deref(),
            IdentityField::PcName => self.pc_name.as_deref(),
            IdentityField::EmployeeNumber => self.employee_number.as_deref(),
            IdentityField::Username => self.username.as_deref(),
        }
    }
}

/// Caller-supplied asset payload used for insert and full update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetData {
    #[serde(flatten)]
    pub identity: AssetIdentity,
    pub asset_tag: Option<String>,
    pub asset_type: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub employee_name: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub remarks: Option<String>,
    /// Free-form buyback state, replaced by status updates.
    pub buyback_status: Option<String>,
}

/// Persisted asset record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: AssetId,
    #[serde(flatten)]
    pub data: AssetData,
    /// Soft delete tombstone. Deleted rows are kept forever.
    pub is_deleted: bool,
    /// Label of the last lifecycle action (`Created|Updated|Deleted`).
    pub status_log: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Strictly increases on every mutation.
    pub updated_at: i64,
}

impl Asset {
    /// Builds a fresh record for insertion with a generated stable ID.
    ///
    /// # Invariants
    /// - `is_deleted` starts as `false`.
    /// - `created_at == updated_at == now_ms`.
    pub fn new(data: AssetData, now_ms: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            data,
            is_deleted: false,
            status_log: STATUS_LOG_CREATED.to_string(),
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Identity-bearing fields of this record.
    pub fn identity(&self) -> &AssetIdentity {
        &self.data.identity
    }

    /// Returns whether this asset is visible in default listings.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

/// One of the five identity-bearing attributes.
///
/// Serialized by label because downstream consumers match on the literal
/// names (`"Serial Number"`, `"MAC Address"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IdentityField {
    #[serde(rename = "Serial Number")]
    SerialNumber,
    #[serde(rename = "MAC Address")]
    MacAddress,
    #[serde(rename = "PC Name")]
    PcName,
    #[serde(rename = "Employee Number")]
    EmployeeNumber,
    #[serde(rename = "Username")]
    Username,
}

impl IdentityField {
    /// All identity fields in comparison order.
    pub const ALL: [IdentityField; 5] = [
        IdentityField::SerialNumber,
        IdentityField::MacAddress,
        IdentityField::PcName,
        IdentityField::EmployeeNumber,
        IdentityField::Username,
    ];

    /// Human-readable field name reported in duplicate results.
    pub fn label(self) -> &'static str {
        match self {
            Self::SerialNumber => "Serial Number",
            Self::MacAddress => "MAC Address",
            Self::PcName => "PC Name",
            Self::EmployeeNumber => "Employee Number",
            Self::Username => "Username",
        }
    }

    /// Backing column in the `assets` table.
    pub fn column(self) -> &'static str {
        match self {
            Self::SerialNumber => "serial_number",
            Self::MacAddress => "mac_address",
            Self::PcName => "pc_name",
            Self::EmployeeNumber => "employee_number",
            Self::Username => "username",
        }
    }
}

impl Display for IdentityField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Clamps to `0` if the clock reads before the epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
