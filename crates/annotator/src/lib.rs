//! INCLUDE line annotation for Markdown API documents
//!
//! Each annotated document gets a single
//! `[!INCLUDE [national-cloud-support](<dir>/<file>.md)]` line naming the
//! clouds that support it. An existing line is rewritten where it stands;
//! otherwise the line goes right before the first heading after the H1.

mod templates;

use cloud_support_analyzer::AnnotationSink;
use cloud_support_common::{AvailabilityStatus, CloudSupportError, Result};
use cloud_support_parser::{headings, ApiDocument};
use std::fs;
use std::path::Path;
use tera::Tera;

/// Marker identifying an existing INCLUDE line
pub const INCLUDE_MARKER: &str = "[!INCLUDE [national-cloud-support]";

/// Include directory relative to the API reference documents
pub const DEFAULT_INCLUDE_DIRECTORY: &str = "../../includes";

/// Writes the INCLUDE line for a document's availability status
pub struct IncludeAnnotator {
    tera: Tera,
    include_directory: String,
    remove_old_includes: bool,
    annotated: usize,
}

impl IncludeAnnotator {
    /// Create an annotator that links to `include_directory`
    pub fn new(include_directory: &str, remove_old_includes: bool) -> Result<Self> {
        let tera = templates::load_templates()?;
        Ok(Self {
            tera,
            include_directory: include_directory.trim_end_matches('/').to_string(),
            remove_old_includes,
            annotated: 0,
        })
    }

    /// Number of documents written so far
    pub fn annotated(&self) -> usize {
        self.annotated
    }

    /// Render the INCLUDE line for `status`
    pub fn include_line(&self, status: AvailabilityStatus) -> Result<String> {
        if !status.is_known() {
            return Err(CloudSupportError::Annotation(format!(
                "Invalid cloud support status: {}",
                status
            )));
        }

        let mut context = tera::Context::new();
        context.insert("include_directory", &self.include_directory);
        context.insert("status", &status);

        let rendered = self
            .tera
            .render(templates::INCLUDE_TEMPLATE, &context)
            .map_err(|e| CloudSupportError::Annotation(format!("Template error: {}", e)))?;

        Ok(rendered.trim_end().to_string())
    }

    /// Add or update the INCLUDE line in Markdown content
    pub fn apply(&self, markdown: &str, status: AvailabilityStatus) -> Result<String> {
        let include_line = self.include_line(status)?;
        let mut lines: Vec<String> = markdown.lines().map(str::to_string).collect();
        let existing = lines.iter().position(|line| line.contains(INCLUDE_MARKER));

        match existing {
            Some(index) if !self.remove_old_includes => lines[index] = include_line,
            existing => {
                if let Some(index) = existing {
                    lines.remove(index);
                    if lines.get(index).is_some_and(|line| line.trim().is_empty()) {
                        lines.remove(index);
                    }
                }

                let index = insert_index(&lines.join("\n"))?.ok_or_else(|| {
                    CloudSupportError::Annotation("malformed, cannot find insert point".to_string())
                })?;

                lines.insert(index, String::new());
                lines.insert(index, include_line);
                if !lines[index - 1].trim().is_empty() {
                    lines.insert(index, String::new());
                }
            }
        }

        let mut output = lines.join("\n");
        output.push('\n');
        Ok(output)
    }

    /// Rewrite a Markdown file in place
    pub fn annotate_file(&mut self, path: &Path, status: AvailabilityStatus) -> Result<()> {
        let markdown = fs::read_to_string(path)?;
        let updated = self
            .apply(&markdown, status)
            .map_err(|e| match e {
                CloudSupportError::Annotation(reason) => {
                    CloudSupportError::Annotation(format!("{} {}", path.display(), reason))
                }
                other => other,
            })?;

        fs::write(path, updated)?;
        self.annotated += 1;
        tracing::debug!("Wrote {} INCLUDE to {}", status, path.display());

        Ok(())
    }
}

impl AnnotationSink for IncludeAnnotator {
    fn annotate(&mut self, document: &ApiDocument, status: AvailabilityStatus) -> Result<()> {
        self.annotate_file(&document.file_path, status)
    }
}

/// Line index of the first heading after the H1 title
///
/// Always greater than zero when present.
fn insert_index(markdown: &str) -> Result<Option<usize>> {
    let index = headings(markdown)?
        .into_iter()
        .skip_while(|(_, level)| *level != 1)
        .nth(1)
        .map(|(index, _)| index);

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# Get user\n\nNamespace: microsoft.graph\n\nIntro text.\n## Permissions\n\nUser.Read\n";

    #[test]
    fn test_include_line() {
        let annotator = IncludeAnnotator::new(DEFAULT_INCLUDE_DIRECTORY, false).unwrap();
        assert_eq!(
            annotator.include_line(AvailabilityStatus::AllClouds).unwrap(),
            "[!INCLUDE [national-cloud-support](../../includes/all-clouds.md)]"
        );
        assert_eq!(
            annotator.include_line(AvailabilityStatus::GlobalOnly).unwrap(),
            "[!INCLUDE [national-cloud-support](../../includes/global-only.md)]"
        );
    }

    #[test]
    fn test_include_line_uses_directory() {
        let annotator = IncludeAnnotator::new("../includes/", false).unwrap();
        assert_eq!(
            annotator.include_line(AvailabilityStatus::GlobalAndUSGov).unwrap(),
            "[!INCLUDE [national-cloud-support](../includes/global-us.md)]"
        );
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let annotator = IncludeAnnotator::new(DEFAULT_INCLUDE_DIRECTORY, false).unwrap();
        assert!(matches!(
            annotator.apply(DOC, AvailabilityStatus::Unknown),
            Err(CloudSupportError::Annotation(_))
        ));
    }

    #[test]
    fn test_insert_before_first_heading_after_title() {
        let annotator = IncludeAnnotator::new(DEFAULT_INCLUDE_DIRECTORY, false).unwrap();
        let output = annotator.apply(DOC, AvailabilityStatus::GlobalAndChina).unwrap();

        assert_eq!(
            output,
            "# Get user\n\nNamespace: microsoft.graph\n\nIntro text.\n\n\
             [!INCLUDE [national-cloud-support](../../includes/global-china.md)]\n\n\
             ## Permissions\n\nUser.Read\n"
        );
    }

    #[test]
    fn test_existing_line_is_replaced_in_place() {
        let annotator = IncludeAnnotator::new(DEFAULT_INCLUDE_DIRECTORY, false).unwrap();
        let doc = "# Title\n\nIntro.\n\n## Permissions\n\n[!INCLUDE [national-cloud-support](../../includes/global-only.md)]\n";

        let output = annotator.apply(doc, AvailabilityStatus::AllClouds).unwrap();
        assert_eq!(
            output,
            "# Title\n\nIntro.\n\n## Permissions\n\n[!INCLUDE [national-cloud-support](../../includes/all-clouds.md)]\n"
        );
    }

    #[test]
    fn test_remove_old_include_moves_line() {
        let annotator = IncludeAnnotator::new(DEFAULT_INCLUDE_DIRECTORY, true).unwrap();
        let doc = "# Title\n\nIntro.\n\n## Permissions\n\n[!INCLUDE [national-cloud-support](../../includes/global-only.md)]\n\nUser.Read\n";

        let output = annotator.apply(doc, AvailabilityStatus::AllClouds).unwrap();
        assert_eq!(
            output,
            "# Title\n\nIntro.\n\n[!INCLUDE [national-cloud-support](../../includes/all-clouds.md)]\n\n## Permissions\n\nUser.Read\n"
        );
        assert_eq!(output.matches(INCLUDE_MARKER).count(), 1);
    }

    #[test]
    fn test_headings_in_code_blocks_are_skipped() {
        let annotator = IncludeAnnotator::new(DEFAULT_INCLUDE_DIRECTORY, false).unwrap();
        let doc = "# Title\n\n```\n# not a heading\n```\n## Next\n";

        let output = annotator.apply(doc, AvailabilityStatus::GlobalOnly).unwrap();
        assert!(output.contains("```\n\n[!INCLUDE [national-cloud-support](../../includes/global-only.md)]\n\n## Next"));
    }

    #[test]
    fn test_insert_before_setext_heading() {
        let annotator = IncludeAnnotator::new(DEFAULT_INCLUDE_DIRECTORY, false).unwrap();
        let doc = "Get user\n========\n\nIntro.\n\nPermissions\n-----------\n\nUser.Read\n";

        let output = annotator.apply(doc, AvailabilityStatus::AllClouds).unwrap();
        assert_eq!(
            output,
            "Get user\n========\n\nIntro.\n\n\
             [!INCLUDE [national-cloud-support](../../includes/all-clouds.md)]\n\n\
             Permissions\n-----------\n\nUser.Read\n"
        );
    }

    #[test]
    fn test_missing_insert_point_is_malformed() {
        let annotator = IncludeAnnotator::new(DEFAULT_INCLUDE_DIRECTORY, false).unwrap();

        let no_title = "## Permissions\n\nUser.Read\n";
        assert!(annotator.apply(no_title, AvailabilityStatus::AllClouds).is_err());

        let only_title = "# Title\n\nIntro.\n";
        let err = annotator
            .apply(only_title, AvailabilityStatus::AllClouds)
            .unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }
}
