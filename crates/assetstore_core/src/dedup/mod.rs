//! Duplicate-record detection.
//!
//! # Responsibility
//! - Decide which stored assets share identity-bearing fields with a
//!   candidate.
//! - Keep the read strategy pluggable so an indexed lookup can replace the
//!   full-table scan without changing results.
//!
//! # Invariants
//! - Detection is advisory: it never blocks or performs writes.

pub mod detector;
