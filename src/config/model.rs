//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Configuration for branch-ops.
///
/// This struct represents the contents of `.branch-ops.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Trunk branch every operation syncs with and returns to (default: "master").
    #[serde(default = "default_trunk")]
    pub trunk: String,

    /// Remote that branches are pulled from and pushed to (default: "origin").
    #[serde(default = "default_remote")]
    pub remote: String,

    /// strftime pattern for the date tag naming aggregate branches.
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Prefix of the aggregate release branch: `<release_prefix>/<date>`.
    #[serde(default = "default_release_prefix")]
    pub release_prefix: String,

    /// Prefix of the per-branch scratch branch: `<temp_prefix>/<date>`.
    #[serde(default = "default_temp_prefix")]
    pub temp_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trunk: default_trunk(),
            remote: default_remote(),
            date_format: default_date_format(),
            release_prefix: default_release_prefix(),
            temp_prefix: default_temp_prefix(),
        }
    }
}
