//! Asset domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every asset is identified by a stable `AssetId`.
//! - Deletion is represented by soft-delete tombstones, not hard delete.

pub mod asset;
