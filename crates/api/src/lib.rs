//! # AgencyDesk App
//!
//! Composition root of the workspace.
//!
//! This crate contains:
//! - The application context (dependency injection)
//! - Health reporting
//! - A headless entry point
//!
//! ## Architecture
//! - Depends on `domain`, `core` and `infra`
//! - Chooses the adapters behind every port of the data store

pub mod context;
pub mod utils;

pub use context::{AppContext, Backend};
