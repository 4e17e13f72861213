//! # AgencyDesk Domain
//!
//! Business domain types and models for AgencyDesk.
//!
//! This crate contains:
//! - Entities (users, clients, tasks) and their draft/input shapes
//! - Audit trail records (activity, error and change logs)
//! - Authentication state and outcomes
//! - Domain error types and Result definitions
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other AgencyDesk crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
