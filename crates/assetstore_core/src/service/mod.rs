//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and duplicate detection into use-case
//!   level APIs.
//! - Keep caller layers decoupled from storage details.

pub mod asset_service;
