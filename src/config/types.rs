//! Configuration constants and defaults for branch-ops.

/// File name looked up at the repository root when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = ".branch-ops.yaml";

// Default value functions for serde
pub(crate) fn default_trunk() -> String {
    "master".to_string()
}
pub(crate) fn default_remote() -> String {
    "origin".to_string()
}
pub(crate) fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}
pub(crate) fn default_release_prefix() -> String {
    "release".to_string()
}
pub(crate) fn default_temp_prefix() -> String {
    "temp".to_string()
}
