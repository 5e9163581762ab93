//! Asset lifecycle use-case service.
//!
//! # Responsibility
//! - Provide the stable service contract for asset callers.
//! - Apply visibility, soft-delete and status bookkeeping through the
//!   record store.
//! - Run advisory duplicate checks with a pluggable strategy.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Service layer remains storage-agnostic.
//! - `insert` performs no duplicate check; `check_duplicates` followed by
//!   `insert` is not atomic. Use `insert_if_unique` to close that window.

use crate::dedup::detector::{DuplicateReport, DuplicateStrategy, LinearScan};
use crate::model::asset::{Asset, AssetData, AssetId, AssetIdentity};
use crate::repo::asset_repo::{AssetRepository, RepoResult};
use log::{debug, info, warn};

/// Result of a guarded insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardedInsert {
    /// No identity field collided; the asset was persisted.
    Inserted(Asset),
    /// At least one identity field collided; nothing was written.
    Rejected(DuplicateReport),
}

/// Use-case service for asset records.
pub struct AssetService<R: AssetRepository, S: DuplicateStrategy = LinearScan> {
    repo: R,
    strategy: S,
}

impl<R: AssetRepository> AssetService<R> {
    /// Creates a service that detects duplicates by full-table scan.
    pub fn new(repo: R) -> Self {
        Self::with_strategy(repo, LinearScan::default())
    }
}

impl<R: AssetRepository, S: DuplicateStrategy> AssetService<R, S> {
    /// Creates a service with an explicit duplicate-detection strategy.
    pub fn with_strategy(repo: R, strategy: S) -> Self {
        Self { repo, strategy }
    }

    /// Lists assets that are not soft-deleted.
    pub fn list_active(&self) -> RepoResult<Vec<Asset>> {
        self.repo.list_active()
    }

    /// Lists every asset, soft-deleted ones included.
    pub fn list_all(&self) -> RepoResult<Vec<Asset>> {
        self.repo.list_all()
    }

    /// Gets one asset by id. `None` is normal control flow.
    pub fn get(&self, id: AssetId) -> RepoResult<Option<Asset>> {
        self.repo.get(id)
    }

    /// Persists a new asset without consulting the detector.
    ///
    /// # Contract
    /// - Two callers that each ran `check_duplicates` first can both
    ///   succeed here with the same identity values.
    pub fn insert(&self, data: &AssetData) -> RepoResult<Asset> {
        let asset = self.repo.insert(data)?;
        info!(
            "event=asset_insert module=service status=ok asset_id={}",
            asset.id
        );
        Ok(asset)
    }

    /// Replaces every mutable field of an existing asset.
    pub fn update(&self, id: AssetId, data: &AssetData) -> RepoResult<Option<Asset>> {
        let updated = self.repo.update(id, data)?;
        log_mutation("asset_update", id, updated.is_some());
        Ok(updated)
    }

    /// Replaces only the buyback status of an existing asset.
    pub fn update_status(&self, id: AssetId, status: &str) -> RepoResult<Option<Asset>> {
        let updated = self.repo.update_status(id, status)?;
        log_mutation("asset_update_status", id, updated.is_some());
        Ok(updated)
    }

    /// Soft-deletes an asset. There is no undelete.
    ///
    /// Returns `false` when the id is unknown or already deleted.
    pub fn soft_delete(&self, id: AssetId) -> RepoResult<bool> {
        let changed = self.repo.soft_delete(id)?;
        log_mutation("asset_soft_delete", id, changed);
        Ok(changed)
    }

    /// Reports stored assets that share identity fields with `candidate`.
    ///
    /// Advisory only: nothing is blocked or written.
    pub fn check_duplicates(&self, candidate: &AssetIdentity) -> RepoResult<DuplicateReport> {
        let report = self.strategy.check(&self.repo, candidate)?;
        debug!(
            "event=asset_duplicate_check module=service status=ok is_duplicate={} field_count={} match_count={}",
            report.is_duplicate,
            report.duplicate_fields.len(),
            report.existing_assets.len()
        );
        Ok(report)
    }

    /// Checks for duplicates and inserts in one write transaction.
    ///
    /// Concurrent guarded inserts with colliding identity values are
    /// serialized by the store; at most one of them is `Inserted`.
    pub fn insert_if_unique(&self, data: &AssetData) -> RepoResult<GuardedInsert> {
        let strategy = &self.strategy;
        let outcome = self.repo.atomically(|repo| {
            let report = strategy.check(repo, &data.identity)?;
            if report.is_duplicate {
                return Ok(GuardedInsert::Rejected(report));
            }
            repo.insert(data).map(GuardedInsert::Inserted)
        })?;

        match &outcome {
            GuardedInsert::Inserted(asset) => info!(
                "event=asset_insert_guarded module=service status=ok asset_id={}",
                asset.id
            ),
            GuardedInsert::Rejected(report) => warn!(
                "event=asset_insert_guarded module=service status=rejected fields={}",
                report.field_labels().join("|")
            ),
        }
        Ok(outcome)
    }
}

fn log_mutation(event: &str, id: AssetId, changed: bool) {
    if changed {
        info!("event={event} module=service status=ok asset_id={id}");
    } else {
        debug!("event={event} module=service status=noop asset_id={id}");
    }
}
