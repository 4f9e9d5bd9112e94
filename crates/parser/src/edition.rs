//! API edition detection
//!
//! Documented paths may carry the service host and an edition segment
//! (`https://graph.microsoft.com/v1.0/...` or `/beta/...`).

use cloud_support_common::Edition;
use regex::Regex;
use std::sync::LazyLock;

/// Optional absolute host followed by the edition segment
pub(crate) static EDITION_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:https?://[^/]+)?/(v1\.0|beta)/").unwrap());

/// Determines which edition a raw documented path targets
pub struct EditionClassifier;

impl EditionClassifier {
    /// Classify a raw (not yet normalized) path
    ///
    /// # Examples
    /// ```
    /// use cloud_support_parser::EditionClassifier;
    /// use cloud_support_common::Edition;
    ///
    /// assert_eq!(
    ///     EditionClassifier::classify("https://graph.microsoft.com/beta/me"),
    ///     Edition::Preview
    /// );
    /// assert_eq!(EditionClassifier::classify("/me"), Edition::Unknown);
    /// ```
    pub fn classify(raw_path: &str) -> Edition {
        let Some(captures) = EDITION_PREFIX.captures(raw_path.trim()) else {
            return Edition::Unknown;
        };

        match captures[1].to_ascii_lowercase().as_str() {
            "v1.0" => Edition::Primary,
            "beta" => Edition::Preview,
            _ => Edition::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_with_host() {
        assert_eq!(
            EditionClassifier::classify("https://graph.microsoft.com/v1.0/users/{id}"),
            Edition::Primary
        );
        assert_eq!(
            EditionClassifier::classify("https://graph.microsoft.com/beta/users/{id}"),
            Edition::Preview
        );
    }

    #[test]
    fn test_classify_root_relative() {
        assert_eq!(EditionClassifier::classify("/v1.0/me"), Edition::Primary);
        assert_eq!(EditionClassifier::classify("/BETA/me"), Edition::Preview);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(EditionClassifier::classify("/users/{id}"), Edition::Unknown);
        assert_eq!(EditionClassifier::classify("/users/v1.0/x"), Edition::Unknown);
        assert_eq!(EditionClassifier::classify("/v2.0/me"), Edition::Unknown);
        assert_eq!(EditionClassifier::classify(""), Edition::Unknown);
    }
}
