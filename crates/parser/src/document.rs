//! Markdown API reference documents
//!
//! Only the parts needed for reconciliation are read: the `Namespace:` line
//! and the request lines inside fenced code blocks under the
//! "HTTP request" heading.

use crate::markdown::{Block, MarkdownParser};
use crate::OperationExtractor;
use cloud_support_common::{CloudSupportError, Operation, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

static NAMESPACE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*namespace:\s*(?P<namespace>[\w.]*)\s*$").unwrap()
});

const REQUEST_HEADING: &str = "HTTP request";

/// A Markdown file documenting one API
#[derive(Debug, Clone)]
pub struct ApiDocument {
    pub file_path: PathBuf,
    /// Namespace declared in the document, if any
    pub namespace: Option<String>,
    /// Operations in documentation order
    pub operations: Vec<Operation>,
}

impl ApiDocument {
    /// Load a document from a Markdown file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CloudSupportError::Parse(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_markdown(path, &content)
    }

    /// Build a document from Markdown content
    ///
    /// Unparseable request lines are logged and skipped.
    pub fn from_markdown<P: AsRef<Path>>(path: P, markdown: &str) -> Result<Self> {
        let path = path.as_ref();
        let mut operations = Vec::new();

        for line in request_lines(markdown)? {
            match OperationExtractor::extract(&line) {
                Ok(Some(operation)) => operations.push(operation),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Error parsing API line in {}: {}", path.display(), e);
                }
            }
        }

        Ok(Self {
            file_path: path.to_path_buf(),
            namespace: extract_namespace(markdown),
            operations,
        })
    }

    /// File name for reporting
    pub fn file_name(&self) -> String {
        self.file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_path.display().to_string())
    }
}

/// Extract the namespace declared by a `Namespace: x.y` line
///
/// # Examples
/// ```
/// use cloud_support_parser::extract_namespace;
///
/// let markdown = "# callRecord: getPstnCalls\n\nNamespace: microsoft.graph.callRecords\n";
/// assert_eq!(
///     extract_namespace(markdown),
///     Some("microsoft.graph.callRecords".to_string())
/// );
/// ```
pub fn extract_namespace(markdown: &str) -> Option<String> {
    NAMESPACE_LINE
        .captures(markdown)
        .map(|caps| caps["namespace"].to_string())
        .filter(|ns| !ns.is_empty())
}

/// Raw lines of every fenced code block in the "HTTP request" section
///
/// The section ends at the next heading of the same or a higher level.
/// Fenced blocks nested in lists or blockquotes are included.
pub fn request_lines(markdown: &str) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut section_level: Option<usize> = None;

    for block in MarkdownParser::new()?.blocks(markdown)? {
        match (block, section_level) {
            (Block::CodeBlock { lines: content }, Some(_)) => lines.extend(content),
            (Block::Heading { level, text, .. }, None) if text.eq_ignore_ascii_case(REQUEST_HEADING) => {
                section_level = Some(level)
            }
            (Block::Heading { level, .. }, Some(current)) if level <= current => break,
            _ => {}
        }
    }

    Ok(lines)
}

/// Line index and level of every top-level ATX or setext heading
pub fn headings(markdown: &str) -> Result<Vec<(usize, usize)>> {
    let headings = MarkdownParser::new()?
        .blocks(markdown)?
        .into_iter()
        .filter_map(|block| match block {
            Block::Heading { line, level, .. } => Some((line, level)),
            Block::CodeBlock { .. } => None,
        })
        .collect();

    Ok(headings)
}

/// The Markdown documents in one directory
#[derive(Debug, Clone, Default)]
pub struct DocSet {
    pub root_directory: PathBuf,
    pub documents: Vec<ApiDocument>,
}

impl DocSet {
    /// Load every `*.md` file directly inside `docs_root`, in file name order
    pub fn from_directory<P: AsRef<Path>>(docs_root: P) -> Result<Self> {
        let docs_root = docs_root.as_ref();
        if !docs_root.is_dir() {
            return Err(CloudSupportError::Parse(format!(
                "Not a directory: {}",
                docs_root.display()
            )));
        }

        let mut documents = Vec::new();
        for entry in WalkDir::new(docs_root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| CloudSupportError::Parse(e.to_string()))?;
            let path = entry.path();

            if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("md")
            {
                continue;
            }

            documents.push(ApiDocument::from_file(path)?);
        }

        Ok(Self {
            root_directory: docs_root.to_path_buf(),
            documents,
        })
    }
}
