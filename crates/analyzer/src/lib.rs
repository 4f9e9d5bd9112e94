//! OpenAPI analysis for Check Cloud Support
//!
//! Builds one URL tree per edition from the global, US Government, and
//! China OpenAPI descriptions, finds the tree node for each documented
//! operation, and classifies where the operation is available.
//!
//! # Examples
//!
//! ```no_run
//! use cloud_support_analyzer::{Reconciler, SpecTree};
//! use cloud_support_common::ApiOverrides;
//! use cloud_support_parser::ApiDocument;
//!
//! let tree = SpecTree::from_directory("./openapi/v1.0").expect("Load failed");
//! let overrides = ApiOverrides::default();
//! let reconciler = Reconciler::new(&overrides);
//!
//! let doc = ApiDocument::from_file("./api-reference/user-get.md").expect("Read failed");
//! println!("{}", reconciler.document_status(&tree, &doc));
//! ```

mod classifier;
mod matcher;
mod reconciler;
mod spec_tree;

pub use classifier::AvailabilityClassifier;
pub use matcher::{
    is_bundle_item_node, labels_match, match_segment, LabelCandidate, SpecTreeMatcher,
    DEFAULT_NAMESPACE,
};
pub use reconciler::{
    AnnotationSink, EditionStatuses, EditionTrees, Reconciler, StatusAccumulator,
};
pub use spec_tree::{OpenApiDocument, PathItem, SpecNode, SpecTree};
