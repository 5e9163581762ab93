//! Cross-field duplicate detection over the record store.
//!
//! # Responsibility
//! - Compare a candidate's identity fields against stored assets.
//! - Aggregate matches into a stable, order-preserving report.
//!
//! # Invariants
//! - Soft-deleted assets participate in matching.
//! - `existing_assets` keeps scan order and holds each asset once.
//! - `duplicate_fields` keeps first-discovery order and holds each field once.
//! - Detection never fails except by propagating a storage read error.

use crate::model::asset::{Asset, AssetIdentity, IdentityField};
use crate::repo::asset_repo::{AssetRepository, RepoResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How absent or empty candidate fields take part in matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyFieldPolicy {
    /// Plain equality: absent == absent and `""` == `""` count as matches.
    ///
    /// Two records that both leave a field blank are reported as sharing
    /// it. This is the stored behavior and stays the default.
    #[default]
    Match,
    /// Candidate fields that are absent or empty never match.
    Ignore,
}

impl EmptyFieldPolicy {
    fn considers(self, candidate_value: Option<&str>) -> bool {
        match self {
            Self::Match => true,
            Self::Ignore => candidate_value.is_some_and(|value| !value.is_empty()),
        }
    }
}

/// Outcome of a duplicate check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateReport {
    /// `true` iff `duplicate_fields` is non-empty.
    pub is_duplicate: bool,
    /// Matched field names, first-discovery order, no repeats.
    pub duplicate_fields: Vec<IdentityField>,
    /// Assets sharing at least one field, scan order, no repeats.
    pub existing_assets: Vec<Asset>,
}

impl DuplicateReport {
    /// Builds a report from records in scan order.
    pub fn from_scan<I>(candidate: &AssetIdentity, policy: EmptyFieldPolicy, records: I) -> Self
    where
        I: IntoIterator<Item = Asset>,
    {
        let mut duplicate_fields: Vec<IdentityField> = Vec::new();
        let mut existing_assets = Vec::new();
        let mut seen_ids = HashSet::new();

        for asset in records {
            let matched = matching_fields(candidate, asset.identity(), policy);
            if matched.is_empty() {
                continue;
            }
            for field in matched {
                if !duplicate_fields.contains(&field) {
                    duplicate_fields.push(field);
                }
            }
            if seen_ids.insert(asset.id) {
                existing_assets.push(asset);
            }
        }

        Self {
            is_duplicate: !duplicate_fields.is_empty(),
            duplicate_fields,
            existing_assets,
        }
    }

    /// Matched field names as display labels (`"Serial Number"`, ...).
    pub fn field_labels(&self) -> Vec<&'static str> {
        self.duplicate_fields
            .iter()
            .map(|field| field.label())
            .collect()
    }
}

/// Returns the identity fields on which `existing` equals `candidate`.
///
/// Fields are returned in `IdentityField::ALL` order.
pub fn matching_fields(
    candidate: &AssetIdentity,
    existing: &AssetIdentity,
    policy: EmptyFieldPolicy,
) -> Vec<IdentityField> {
    IdentityField::ALL
        .into_iter()
        .filter(|field| {
            let value = candidate.value(*field);
            policy.considers(value) && value == existing.value(*field)
        })
        .collect()
}

/// Strategy used by the lifecycle service to find duplicate assets.
///
/// Every implementation must yield the same report `LinearScan` would for
/// the same store state; strategies differ only in how they read.
pub trait DuplicateStrategy {
    fn check<R: AssetRepository>(
        &self,
        repo: &R,
        candidate: &AssetIdentity,
    ) -> RepoResult<DuplicateReport>;
}

/// Default strategy: reads the whole table and compares every record.
///
/// O(n) per check with five comparisons per record and no index use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinearScan {
    pub policy: EmptyFieldPolicy,
}

impl LinearScan {
    pub fn new(policy: EmptyFieldPolicy) -> Self {
        Self { policy }
    }
}

impl DuplicateStrategy for LinearScan {
    fn check<R: AssetRepository>(
        &self,
        repo: &R,
        candidate: &AssetIdentity,
    ) -> RepoResult<DuplicateReport> {
        let records = repo.list_all()?;
        Ok(DuplicateReport::from_scan(candidate, self.policy, records))
    }
}

/// Narrows the scan with indexed equality reads before comparing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexedLookup {
    pub policy: EmptyFieldPolicy,
}

impl IndexedLookup {
    pub fn new(policy: EmptyFieldPolicy) -> Self {
        Self { policy }
    }
}

impl DuplicateStrategy for IndexedLookup {
    fn check<R: AssetRepository>(
        &self,
        repo: &R,
        candidate: &AssetIdentity,
    ) -> RepoResult<DuplicateReport> {
        let criteria: Vec<(IdentityField, Option<&str>)> = IdentityField::ALL
            .into_iter()
            .map(|field| (field, candidate.value(field)))
            .filter(|(_, value)| self.policy.considers(*value))
            .collect();
        let records = repo.find_by_any_identity(&criteria)?;
        Ok(DuplicateReport::from_scan(candidate, self.policy, records))
    }
}

#[cfg(test)]
mod tests {
    use super::{matching_fields, DuplicateReport, EmptyFieldPolicy};
    use crate::model::asset::{Asset, AssetData, AssetIdentity, IdentityField};

    fn identity(serial: &str, mac: &str) -> AssetIdentity {
        AssetIdentity {
            serial_number: Some(serial.to_string()),
            mac_address: Some(mac.to_string()),
            pc_name: Some(format!("pc-{serial}")),
            employee_number: Some(format!("emp-{serial}")),
            username: Some(format!("user-{serial}")),
        }
    }

    fn asset(identity: AssetIdentity) -> Asset {
        Asset::new(
            AssetData {
                identity,
                ..AssetData::default()
            },
            1_000,
        )
    }

    #[test]
    fn matching_is_case_sensitive_and_exact() {
        let stored = identity("SN1", "AA:BB");
        let candidate = AssetIdentity {
            serial_number: Some("sn1".to_string()),
            mac_address: Some("AA:BB ".to_string()),
            ..AssetIdentity::default()
        };

        let matched = matching_fields(&candidate, &stored, EmptyFieldPolicy::Ignore);
        assert!(matched.is_empty());
    }

    #[test]
    fn absent_fields_match_under_default_policy_only() {
        let stored = AssetIdentity {
            serial_number: Some("SN1".to_string()),
            ..AssetIdentity::default()
        };
        let candidate = AssetIdentity {
            serial_number: Some("SN2".to_string()),
            ..AssetIdentity::default()
        };

        let literal = matching_fields(&candidate, &stored, EmptyFieldPolicy::Match);
        assert_eq!(
            literal,
            vec![
                IdentityField::MacAddress,
                IdentityField::PcName,
                IdentityField::EmployeeNumber,
                IdentityField::Username,
            ]
        );

        let ignoring = matching_fields(&candidate, &stored, EmptyFieldPolicy::Ignore);
        assert!(ignoring.is_empty());
    }

    #[test]
    fn empty_strings_are_skipped_by_ignore_policy() {
        let mut stored = identity("SN1", "AA:BB");
        stored.username = Some(String::new());
        let mut candidate = identity("SN2", "CC:DD");
        candidate.username = Some(String::new());

        assert_eq!(
            matching_fields(&candidate, &stored, EmptyFieldPolicy::Match),
            vec![IdentityField::Username]
        );
        assert!(matching_fields(&candidate, &stored, EmptyFieldPolicy::Ignore).is_empty());
    }

    #[test]
    fn report_keeps_first_discovery_order_and_dedups() {
        let first = asset(identity("SN1", "AA:BB"));
        let mut second_identity = identity("SN2", "CC:DD");
        second_identity.username = Some("shared".to_string());
        let second = asset(second_identity);

        let mut candidate = identity("SN9", "CC:DD");
        candidate.serial_number = Some("SN1".to_string());
        candidate.username = Some("shared".to_string());

        let report = DuplicateReport::from_scan(
            &candidate,
            EmptyFieldPolicy::Match,
            vec![second.clone(), first.clone(), second.clone()],
        );

        assert!(report.is_duplicate);
        assert_eq!(
            report.duplicate_fields,
            vec![
                IdentityField::MacAddress,
                IdentityField::Username,
                IdentityField::SerialNumber,
            ]
        );
        assert_eq!(report.existing_assets, vec![second, first]);
        assert_eq!(
            report.field_labels(),
            vec!["MAC Address", "Username", "Serial Number"]
        );
    }

    #[test]
    fn report_without_matches_is_empty() {
        let report = DuplicateReport::from_scan(
            &identity("SN2", "CC:DD"),
            EmptyFieldPolicy::Match,
            vec![asset(identity("SN1", "AA:BB"))],
        );

        assert_eq!(report, DuplicateReport::default());
    }
}
