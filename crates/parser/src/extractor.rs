//! Operation extraction from documented HTTP request lines

use crate::{EditionClassifier, PathNormalizer};
use cloud_support_common::{CloudSupportError, Method, Operation, Result};

/// Parses `METHOD path` lines from HTTP request examples
pub struct OperationExtractor;

impl OperationExtractor {
    /// Extract an operation from one line
    ///
    /// Blank lines yield `Ok(None)`. Lines that do not split into a valid
    /// method token and a path fail with
    /// [`CloudSupportError::MalformedOperationLine`].
    ///
    /// # Examples
    /// ```
    /// use cloud_support_parser::OperationExtractor;
    /// use cloud_support_common::{Edition, Method};
    ///
    /// let op = OperationExtractor::extract("GET /v1.0/users/{user-id}")
    ///     .unwrap()
    ///     .unwrap();
    /// assert_eq!(op.method, Method::GET);
    /// assert_eq!(op.path, "/users/{id}");
    /// assert_eq!(op.edition, Edition::Primary);
    /// ```
    pub fn extract(line: &str) -> Result<Option<Operation>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let Some((method, raw_path)) = line.split_once(char::is_whitespace) else {
            return Err(malformed(line, "expected an HTTP method followed by a path"));
        };

        let raw_path = raw_path.trim();
        if raw_path.is_empty() {
            return Err(malformed(line, "missing path"));
        }

        let method = Method::from_bytes(method.as_bytes())
            .map_err(|_| malformed(line, &format!("invalid HTTP method '{}'", method)))?;

        Ok(Some(Operation {
            method,
            path: PathNormalizer::normalize(raw_path),
            edition: EditionClassifier::classify(raw_path),
        }))
    }
}

fn malformed(line: &str, reason: &str) -> CloudSupportError {
    CloudSupportError::MalformedOperationLine {
        line: line.to_string(),
        reason: reason.to_string(),
    }
}
