//! Common types and utilities for Check Cloud Support
//!
//! This crate contains shared data structures, error types, and the
//! override/exclusion tables used across the parser, analyzer, annotator,
//! and CLI components.

mod overrides;
mod status;

pub use overrides::{ApiOverride, ApiOverrides, CloudExclusion};
pub use status::AvailabilityStatus;

pub use http::Method;

use std::fmt;
use thiserror::Error;

/// Errors that can occur while reconciling docs against OpenAPI descriptions
#[derive(Error, Debug)]
pub enum CloudSupportError {
    #[error("Malformed operation line '{line}': {reason}")]
    MalformedOperationLine { line: String, reason: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Spec load error: {0}")]
    SpecLoad(String),

    #[error("Annotation error: {0}")]
    Annotation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for cloud support operations
pub type Result<T> = std::result::Result<T, CloudSupportError>;

/// Deployment environment an API may be available in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cloud {
    /// Global public cloud (authoritative)
    Global,
    /// US Government cloud
    UsGov,
    /// China cloud operated by 21Vianet
    China,
}

impl Cloud {
    /// All clouds, primary first
    pub const ALL: [Cloud; 3] = [Cloud::Global, Cloud::UsGov, Cloud::China];

    /// Label used in URL trees and exclusion tables
    pub fn label(&self) -> &'static str {
        match self {
            Cloud::Global => "Global",
            Cloud::UsGov => "UsGov",
            Cloud::China => "China",
        }
    }

    /// Name of the OpenAPI description file published for this cloud
    pub fn spec_file_name(&self) -> &'static str {
        match self {
            Cloud::Global => "Prod.yml",
            Cloud::UsGov => "Fairfax.yml",
            Cloud::China => "Mooncake.yml",
        }
    }

    /// Whether this is the primary cloud
    pub fn is_primary(&self) -> bool {
        matches!(self, Cloud::Global)
    }
}

impl fmt::Display for Cloud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// API edition (version segment) an operation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Edition {
    #[default]
    Unknown,
    /// v1.0
    Primary,
    /// beta
    Preview,
}

impl Edition {
    /// URL segment for the edition, if known
    pub fn segment(&self) -> Option<&'static str> {
        match self {
            Edition::Unknown => None,
            Edition::Primary => Some("v1.0"),
            Edition::Preview => Some("beta"),
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edition::Unknown => write!(f, "unknown"),
            Edition::Primary => write!(f, "v1"),
            Edition::Preview => write!(f, "beta"),
        }
    }
}

/// A single documented API operation
///
/// `path` is always in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub method: Method,
    pub path: String,
    pub edition: Edition,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloud_labels() {
        let labels: Vec<_> = Cloud::ALL.iter().map(Cloud::label).collect();
        assert_eq!(labels, vec!["Global", "UsGov", "China"]);
        assert!(Cloud::Global.is_primary());
        assert!(!Cloud::China.is_primary());
    }

    #[test]
    fn test_edition_segment() {
        assert_eq!(Edition::Primary.segment(), Some("v1.0"));
        assert_eq!(Edition::Preview.segment(), Some("beta"));
        assert_eq!(Edition::Unknown.segment(), None);
        assert_eq!(Edition::default(), Edition::Unknown);
    }

    #[test]
    fn test_operation_display() {
        let op = Operation {
            method: Method::GET,
            path: "/me/messages/{id}".to_string(),
            edition: Edition::Primary,
        };
        assert_eq!(op.to_string(), "GET /me/messages/{id}");
    }
}
