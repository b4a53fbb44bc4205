//! CLI command implementations

pub mod cache;
pub mod run;
pub mod validate;
