//! Specimen Common Library
//!
//! Shared types, error handling and logging for the specimen pipeline
//! workspace.
//!
//! # Overview
//!
//! This crate provides the functionality used across all workspace members:
//!
//! - **Error Handling**: the [`SpecimenError`] type and [`Result`] alias
//! - **Logging**: [`logging::LogConfig`] and [`logging::init_logging`]
//! - **Types**: the domain row types ([`types::QueryRow`],
//!   [`types::OfflineRecord`], [`types::WebExtract`],
//!   [`types::FinalRecord`]) and the fixed table-shape constants

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SpecimenError};
