//! API path overrides and cloud exclusions
//!
//! Both tables are loaded once from JSON files holding a flat array of
//! records, and are read-only for the rest of the run. Lookups compare
//! strings case-insensitively.

use crate::{Cloud, CloudSupportError, Method, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Substitutes a documented path that is known not to match the OpenAPI
/// description verbatim
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOverride {
    /// Documented API path to override
    #[serde(default)]
    pub api_path: Option<String>,
    /// Path to use instead
    #[serde(default)]
    pub override_path: Option<String>,
    /// Restricts the override to a single HTTP method
    #[serde(default)]
    pub operation: Option<String>,
}

/// Marks a cloud as non-functional for a path and method even though
/// the OpenAPI description for that cloud lists it
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudExclusion {
    #[serde(default)]
    pub api_path: Option<String>,
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    pub cloud: Option<String>,
}

/// Immutable override and exclusion tables for one run
#[derive(Debug, Clone, Default)]
pub struct ApiOverrides {
    overrides: Vec<ApiOverride>,
    exclusions: Vec<CloudExclusion>,
}

impl ApiOverrides {
    /// Build from in-memory tables
    pub fn new(overrides: Vec<ApiOverride>, exclusions: Vec<CloudExclusion>) -> Self {
        Self {
            overrides,
            exclusions,
        }
    }

    /// Load tables from optional JSON files
    ///
    /// A `None` path leaves the corresponding table empty.
    pub fn load(overrides_file: Option<&Path>, excludes_file: Option<&Path>) -> Result<Self> {
        let overrides = match overrides_file {
            Some(path) => load_json_table(path)?,
            None => Vec::new(),
        };
        let exclusions = match excludes_file {
            Some(path) => load_json_table(path)?,
            None => Vec::new(),
        };

        Ok(Self::new(overrides, exclusions))
    }

    pub fn overrides(&self) -> &[ApiOverride] {
        &self.overrides
    }

    pub fn exclusions(&self) -> &[CloudExclusion] {
        &self.exclusions
    }

    /// Return the override path for `path`, or `path` itself when no
    /// override applies
    ///
    /// When the table holds several entries for the same path, the first
    /// one in table order is used.
    pub fn resolve_override<'a>(&'a self, path: &'a str, method: &Method) -> &'a str {
        let Some(entry) = self
            .overrides
            .iter()
            .find(|o| o.api_path.as_deref().is_some_and(|p| eq_ignore_case(p, path)))
        else {
            return path;
        };

        if let Some(op) = entry.operation.as_deref().filter(|op| !op.is_empty()) {
            if !eq_ignore_case(op, method.as_str()) {
                return path;
            }
        }

        entry.override_path.as_deref().unwrap_or(path)
    }

    /// Whether `cloud` is excluded for the given path and method
    pub fn is_excluded(&self, path: &str, method: &Method, cloud: Cloud) -> bool {
        self.exclusions.iter().any(|e| {
            e.api_path.as_deref().is_some_and(|p| eq_ignore_case(p, path))
                && e
                    .operation
                    .as_deref()
                    .is_some_and(|op| eq_ignore_case(op, method.as_str()))
                && e
                    .cloud
                    .as_deref()
                    .is_some_and(|c| eq_ignore_case(c, cloud.label()))
        })
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn load_json_table<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let content = fs::read_to_string(path).map_err(|e| {
        CloudSupportError::Parse(format!("Failed to read {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        CloudSupportError::Parse(format!("Failed to parse JSON from {}: {}", path.display(), e))
    })
}
