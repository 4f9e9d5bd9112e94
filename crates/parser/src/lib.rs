//! Documentation parsing for cloud support reconciliation
//!
//! This crate turns Markdown API reference pages into structured
//! operations whose paths are comparable to OpenAPI path segments.
//!
//! ## Normalization Strategy
//!
//! Documented paths are rewritten in a fixed order:
//! - host and edition prefix (`https://graph.microsoft.com/v1.0/`) → `/`
//! - identifier placeholders (`{user-id}`, `{id | userPrincipalName}`) → `{id}`
//! - key segments (`users('{id}')`) → `users/{id}`
//! - function parameters (`f(a={a})`) → `f(a='{a}')`
//! - drive, share, and mail folder shortcuts → their canonical forms

mod document;
mod edition;
mod extractor;
mod markdown;
mod normalizer;

pub use document::{extract_namespace, headings, request_lines, ApiDocument, DocSet};
pub use edition::EditionClassifier;
pub use extractor::OperationExtractor;
pub use normalizer::{PathNormalizer, ID_PLACEHOLDER};
