//! Configuration model for branch-ops.
//!
//! This module defines the Config struct that represents `.branch-ops.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for every field, and validation of config values.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;
pub use operations::render_date_tag;
pub use types::CONFIG_FILE_NAME;
