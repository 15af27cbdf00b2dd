//! Config loading, validation, and override operations.

use super::model::Config;
use super::types::CONFIG_FILE_NAME;
use crate::error::{BranchOpsError, Result};
use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use std::fmt::Write as _;
use std::path::Path;

/// Characters git refuses in a ref name component.
const FORBIDDEN_REF_CHARS: &[char] = &['~', '^', ':', '?', '*', '[', '\\'];

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(BranchOpsError::UserError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            BranchOpsError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Resolve the config for a run.
    ///
    /// An explicit path must exist. Otherwise `<repo_root>/.branch-ops.yaml` is
    /// used when present, and defaults apply when it is not.
    pub fn resolve(explicit: Option<&Path>, repo_root: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = repo_root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml).map_err(|e| {
            BranchOpsError::UserError(format!("failed to parse config YAML: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            BranchOpsError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Apply command-line overrides, then re-validate.
    pub fn with_overrides(mut self, trunk: Option<&str>, remote: Option<&str>) -> Result<Self> {
        if let Some(trunk) = trunk {
            self.trunk = trunk.to_string();
        }
        if let Some(remote) = remote {
            self.remote = remote.to_string();
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `trunk`, `remote` and both prefixes are non-empty ref-safe names
    /// - prefixes carry no leading or trailing `/`
    /// - `date_format` is a valid strftime pattern producing a ref-safe tag
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("trunk", &self.trunk),
            ("remote", &self.remote),
            ("release_prefix", &self.release_prefix),
            ("temp_prefix", &self.temp_prefix),
        ] {
            if !is_ref_safe(value) {
                return Err(BranchOpsError::UserError(format!(
                    "config validation failed: {} must be a non-empty name without whitespace or any of ~^:?*[\\ (found '{}')",
                    field, value
                )));
            }
        }

        for (field, value) in [
            ("release_prefix", &self.release_prefix),
            ("temp_prefix", &self.temp_prefix),
        ] {
            if value.starts_with('/') || value.ends_with('/') {
                return Err(BranchOpsError::UserError(format!(
                    "config validation failed: {} must not start or end with '/'. Use '{}' instead.",
                    field,
                    value.trim_matches('/')
                )));
            }
        }

        if self.release_prefix == self.temp_prefix {
            return Err(BranchOpsError::UserError(
                "config validation failed: release_prefix and temp_prefix must differ".to_string(),
            ));
        }

        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(BranchOpsError::UserError(format!(
                "config validation failed: date_format '{}' is not a valid strftime pattern",
                self.date_format
            )));
        }

        let sample = NaiveDate::from_ymd_opt(2024, 1, 1)
            .map(|date| render_date_tag(&self.date_format, date))
            .transpose()?
            .unwrap_or_default();
        if !is_ref_safe(&sample) {
            return Err(BranchOpsError::UserError(format!(
                "config validation failed: date_format '{}' produces '{}', which is not usable in a branch name",
                self.date_format, sample
            )));
        }

        Ok(())
    }
}

/// Render `date` with `pattern`.
///
/// Fails with `BranchOpsError::UserError` when the pattern asks for fields a
/// calendar date does not carry (hours, minutes, time zones).
pub fn render_date_tag(pattern: &str, date: NaiveDate) -> Result<String> {
    let mut tag = String::new();
    write!(tag, "{}", date.format(pattern)).map_err(|_| {
        BranchOpsError::UserError(format!(
            "date_format '{}' is not a valid date pattern (time fields are not available)",
            pattern
        ))
    })?;
    Ok(tag)
}

fn is_ref_safe(value: &str) -> bool {
    !value.is_empty()
        && !value.chars().any(|c| c.is_whitespace() || c.is_control())
        && !value.contains(FORBIDDEN_REF_CHARS)
}
