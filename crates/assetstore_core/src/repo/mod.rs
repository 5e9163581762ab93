//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record-store contract consumed by the lifecycle service.
//! - Isolate SQLite query details from duplicate/lifecycle orchestration.
//!
//! # Invariants
//! - Repository APIs report absence as `None`/`false`; only storage
//!   failures surface as `RepoError`.

pub mod asset_repo;
