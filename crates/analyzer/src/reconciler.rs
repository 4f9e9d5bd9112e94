//! Per-document reconciliation of documented operations against URL trees

use crate::classifier::AvailabilityClassifier;
use crate::matcher::SpecTreeMatcher;
use crate::spec_tree::SpecTree;
use cloud_support_common::{
    ApiOverrides, AvailabilityStatus, CloudSupportError, Edition, Operation, Result,
};
use cloud_support_parser::ApiDocument;
use std::cell::Cell;
use std::path::Path;

/// Receives the final status for a document
///
/// Implementations write the status back into the document.
#[cfg_attr(test, mockall::automock)]
pub trait AnnotationSink {
    fn annotate(&mut self, document: &ApiDocument, status: AvailabilityStatus) -> Result<()>;
}

/// Running status over the operations of one document
///
/// Statuses are joined with [`AvailabilityStatus::combine`]; a concrete
/// status that differs from the running one is logged as a mismatch.
#[derive(Debug, Clone, Default)]
pub struct StatusAccumulator {
    status: AvailabilityStatus,
    mismatches: usize,
}

impl StatusAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in the status of the next operation
    pub fn observe(&mut self, status: AvailabilityStatus, context: &str) {
        if status.is_known() && self.status.is_known() && status != self.status {
            tracing::warn!(
                "Mismatched support status in API doc {}: {}, {}",
                context,
                status,
                self.status
            );
            self.mismatches += 1;
        }

        self.status = self.status.combine(status);
    }

    pub fn status(&self) -> AvailabilityStatus {
        self.status
    }

    /// Number of mismatches observed so far
    pub fn mismatches(&self) -> usize {
        self.mismatches
    }
}

/// Statuses of a document split by edition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditionStatuses {
    pub primary: AvailabilityStatus,
    pub primary_operations: usize,
    pub preview: AvailabilityStatus,
}

impl EditionStatuses {
    /// The single status to annotate, if the editions agree
    ///
    /// An undetermined primary status defers to the preview status.
    pub fn resolve(&self) -> Option<AvailabilityStatus> {
        if self.primary == self.preview || !self.primary.is_known() {
            Some(self.preview)
        } else {
            None
        }
    }
}

/// URL trees for the primary and preview editions
#[derive(Debug, Clone, Default)]
pub struct EditionTrees {
    pub primary: SpecTree,
    pub preview: SpecTree,
}

impl EditionTrees {
    /// Load each edition from its `v1.0` or `beta` subdirectory of `dir`
    pub fn from_directory<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let load = |edition: Edition| match edition.segment() {
            Some(segment) => SpecTree::from_directory(dir.join(segment)),
            None => Err(CloudSupportError::SpecLoad(format!(
                "No OpenAPI directory for edition {}",
                edition
            ))),
        };

        Ok(Self {
            primary: load(Edition::Primary)?,
            preview: load(Edition::Preview)?,
        })
    }
}

/// Matches, classifies, and combines the operations of API documents
pub struct Reconciler<'a> {
    matcher: SpecTreeMatcher<'a>,
    classifier: AvailabilityClassifier<'a>,
    mismatches: Cell<usize>,
}

impl<'a> Reconciler<'a> {
    pub fn new(overrides: &'a ApiOverrides) -> Self {
        Self {
            matcher: SpecTreeMatcher::new(overrides),
            classifier: AvailabilityClassifier::new(overrides),
            mismatches: Cell::new(0),
        }
    }

    /// Mismatched operation statuses seen across every document so far
    pub fn mismatches(&self) -> usize {
        self.mismatches.get()
    }

    /// Status of one operation, or `None` when its path has no tree node
    pub fn operation_status(
        &self,
        tree: &SpecTree,
        operation: &Operation,
        namespace: Option<&str>,
    ) -> Option<AvailabilityStatus> {
        let Some(node) = self.matcher.find_node(tree, operation, namespace) else {
            tracing::warn!("Could not find API node for {}", operation.path);
            return None;
        };

        let status = self.classifier.classify(node, Some(&operation.method));
        tracing::info!("{} support status: {}", operation.path, status);
        Some(status)
    }

    /// Combined status of `operations`, in documentation order
    pub fn combined_status<'o>(
        &self,
        tree: &SpecTree,
        operations: impl IntoIterator<Item = &'o Operation>,
        namespace: Option<&str>,
        context: &str,
    ) -> AvailabilityStatus {
        let mut accumulator = StatusAccumulator::new();

        for operation in operations {
            if operation.path.is_empty() {
                tracing::warn!("Empty path in operation in {}", context);
                continue;
            }

            if let Some(status) = self.operation_status(tree, operation, namespace) {
                accumulator.observe(status, context);
            }
        }

        self.mismatches
            .set(self.mismatches.get() + accumulator.mismatches());
        accumulator.status()
    }

    /// Status of a whole document against a single tree
    pub fn document_status(&self, tree: &SpecTree, document: &ApiDocument) -> AvailabilityStatus {
        let context = document.file_path.display().to_string();
        self.combined_status(
            tree,
            &document.operations,
            document.namespace.as_deref(),
            &context,
        )
    }

    /// Statuses of a document with operations partitioned by edition
    ///
    /// Operations without a recognizable edition are ignored.
    pub fn edition_statuses(&self, trees: &EditionTrees, document: &ApiDocument) -> EditionStatuses {
        let namespace = document.namespace.as_deref();
        let by_edition = |edition: Edition| {
            document
                .operations
                .iter()
                .filter(move |op| op.edition == edition)
        };

        let primary_context = format!("{} ({})", document.file_path.display(), Edition::Primary);
        let preview_context = format!("{} ({})", document.file_path.display(), Edition::Preview);

        EditionStatuses {
            primary: self.combined_status(
                &trees.primary,
                by_edition(Edition::Primary),
                namespace,
                &primary_context,
            ),
            primary_operations: by_edition(Edition::Primary).count(),
            preview: self.combined_status(
                &trees.preview,
                by_edition(Edition::Preview),
                namespace,
                &preview_context,
            ),
        }
    }

    /// Classify a document and hand the status to `sink`
    pub fn annotate_document(
        &self,
        tree: &SpecTree,
        document: &ApiDocument,
        sink: &mut dyn AnnotationSink,
    ) -> Result<AvailabilityStatus> {
        let status = self.document_status(tree, document);
        sink.annotate(document, status)?;
        Ok(status)
    }

    /// Classify a document per edition and hand the agreed status to `sink`
    ///
    /// Fails without annotating when the editions disagree.
    pub fn annotate_document_by_edition(
        &self,
        trees: &EditionTrees,
        document: &ApiDocument,
        sink: &mut dyn AnnotationSink,
    ) -> Result<AvailabilityStatus> {
        let statuses = self.edition_statuses(trees, document);

        if statuses.primary_operations > 0 && !statuses.primary.is_known() {
            tracing::warn!(
                "Could not determine v1 support status for {} - assuming beta status",
                document.file_path.display()
            );
        }

        let status = statuses.resolve().ok_or_else(|| {
            CloudSupportError::Annotation(format!(
                "v1 and beta support status differ: {}, {}",
                statuses.primary, statuses.preview
            ))
        })?;

        sink.annotate(document, status)?;
        Ok(status)
    }
}
