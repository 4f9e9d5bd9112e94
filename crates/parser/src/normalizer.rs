//! Path normalization
//!
//! Rewrites a documented API path into canonical form so it can be compared
//! structurally against OpenAPI path segments. The stages run in a fixed
//! order; the shape fixes at the end assume identifiers are already
//! collapsed to `{id}`.

use crate::edition::EDITION_PREFIX;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Canonical identifier placeholder
pub const ID_PLACEHOLDER: &str = "{id}";

static HOST_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://[^/]+").unwrap());
static ID_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\{[^{}]*id[^{}]*\}").unwrap());
static KEY_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\('?([^'(),=/]+)'?\)").unwrap());
static PARAMETER_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(((?:\w*='?@?\{?[\w-]*\}?'?,?)+)\)").unwrap()
});
static PARAMETER_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<param>\w*)='?(?P<value>@?\{?[\w-]*\}?)'?").unwrap()
});
static USERS_DRIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/users/\{id\}/drive/").unwrap());
static ME_DRIVE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^/me/drive/").unwrap());
static DRIVE_SHORTCUT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^/drive/").unwrap());
static WELL_KNOWN_MAIL_FOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/mail[Ff]olders/\w+/").unwrap());

/// Converts raw documented paths into canonical form
pub struct PathNormalizer;

impl PathNormalizer {
    /// Run the full normalization pipeline
    ///
    /// Never fails; unrecognized constructs are passed through unchanged.
    ///
    /// # Examples
    /// ```
    /// use cloud_support_parser::PathNormalizer;
    ///
    /// assert_eq!(
    ///     PathNormalizer::normalize("https://graph.microsoft.com/v1.0/users/{user-id}/messages/{message-id}"),
    ///     "/users/{id}/messages/{id}"
    /// );
    /// ```
    pub fn normalize(raw_path: &str) -> String {
        let path = Self::make_relative_to_edition(raw_path.trim());
        let path = Self::normalize_id_segments(&path);
        let path = Self::normalize_parameters(&path);
        let path = Self::fix_user_drive_path(&path);
        let path = Self::fix_drive_shortcut(&path);
        let path = Self::fix_drive_share_id(&path);
        Self::fix_well_known_mail_folders(&path)
    }

    /// Strip the service host and edition segment
    pub fn make_relative_to_edition(path: &str) -> String {
        if EDITION_PREFIX.is_match(path) {
            return EDITION_PREFIX.replace(path, "/").into_owned();
        }

        HOST_PREFIX.replace(path, "").into_owned()
    }

    /// Collapse identifier placeholders into `{id}`
    pub fn normalize_id_segments(path: &str) -> String {
        // OneDrive addresses items relative to the root by path
        let path = path.replace("/root:/{item-path}:", "/items/{id}");

        // Workbook chart APIs use '{name}' where '{id}' is meant
        let path = path.replace("/{name}", "/{id}");

        ID_SEGMENT.replace_all(&path, ID_PLACEHOLDER).into_owned()
    }

    /// Normalize key segments and function parameter lists
    ///
    /// `users('{id}')` becomes `users/{id}`, and every `name=value` pair in a
    /// function call becomes `name='{name}'`, or `name='@name'` when the
    /// value references a query parameter alias.
    ///
    /// # Examples
    /// ```
    /// use cloud_support_parser::PathNormalizer;
    ///
    /// assert_eq!(
    ///     PathNormalizer::normalize_parameters("/reports/getEmailActivityCounts(period='D7')"),
    ///     "/reports/getEmailActivityCounts(period='{period}')"
    /// );
    /// ```
    pub fn normalize_parameters(path: &str) -> String {
        let path = KEY_SEGMENT.replace_all(path, |_: &Captures| format!("/{}", ID_PLACEHOLDER));

        PARAMETER_LIST
            .replace_all(&path, |caps: &Captures| {
                let parameters: Vec<String> = PARAMETER_PAIR
                    .captures_iter(&caps[1])
                    .map(|pair| {
                        let name = &pair["param"];
                        if pair["value"].starts_with('@') {
                            format!("{name}='@{name}'")
                        } else {
                            format!("{name}='{{{name}}}'")
                        }
                    })
                    .collect();

                format!("({})", parameters.join(","))
            })
            .into_owned()
    }

    /// Rewrite `/users/{id}/drive/` and `/me/drive/` to the drive-by-id form
    pub fn fix_user_drive_path(path: &str) -> String {
        let path = USERS_DRIVE.replace(path, "/drives/{id}/");
        ME_DRIVE.replace(&path, "/drives/{id}/").into_owned()
    }

    /// Rewrite the root `/drive/` shortcut to the drive-by-id form
    pub fn fix_drive_shortcut(path: &str) -> String {
        DRIVE_SHORTCUT.replace(path, "/drives/{id}/").into_owned()
    }

    pub fn fix_drive_share_id(path: &str) -> String {
        path.replace("/shares/{encoded-sharing-url}", "/shares/{id}")
    }

    /// Collapse well-known mail folder names (`inbox`, `sentitems`, ...) into `{id}`
    pub fn fix_well_known_mail_folders(path: &str) -> String {
        WELL_KNOWN_MAIL_FOLDER
            .replace_all(path, "/mailFolders/{id}/")
            .into_owned()
    }
}
