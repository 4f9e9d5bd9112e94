//! Tolerant matching of canonical documentation paths against the URL tree

use crate::spec_tree::{SpecNode, SpecTree};
use cloud_support_common::{ApiOverrides, Operation};
use cloud_support_parser::ID_PLACEHOLDER;

/// Namespace assumed when a document does not declare one
pub const DEFAULT_NAMESPACE: &str = "microsoft.graph";

const GRAPH_PREFIX: &str = "microsoft.graph";
const MICROSOFT_PREFIX: &str = "microsoft.";

/// Ways of turning a documented segment into a label to look for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelCandidate {
    /// `segment`
    Literal,
    /// `namespace.segment`
    Qualified,
    /// `segment()`
    FunctionCall,
    /// `namespace.segment()`
    QualifiedFunctionCall,
}

impl LabelCandidate {
    /// Tried in this order for every non-identifier segment
    pub const ORDER: [LabelCandidate; 4] = [
        LabelCandidate::Literal,
        LabelCandidate::Qualified,
        LabelCandidate::FunctionCall,
        LabelCandidate::QualifiedFunctionCall,
    ];

    /// Tried after dropping a leading `microsoft.` from the segment
    pub const UNPREFIXED_ORDER: [LabelCandidate; 2] =
        [LabelCandidate::Literal, LabelCandidate::FunctionCall];

    pub fn render(&self, segment: &str, namespace: &str) -> String {
        match self {
            LabelCandidate::Literal => segment.to_string(),
            LabelCandidate::Qualified => format!("{}.{}", namespace, segment),
            LabelCandidate::FunctionCall => format!("{}()", segment),
            LabelCandidate::QualifiedFunctionCall => format!("{}.{}()", namespace, segment),
        }
    }
}

/// The bundle item node is missing its operations in the OpenAPI
/// descriptions, so matching stops there and classification assumes GET.
pub fn is_bundle_item_node(node: &SpecNode) -> bool {
    node.path().ends_with("/bundles/{driveItem-id}")
}

/// Finds the URL tree node for a documented operation
pub struct SpecTreeMatcher<'a> {
    overrides: &'a ApiOverrides,
}

impl<'a> SpecTreeMatcher<'a> {
    pub fn new(overrides: &'a ApiOverrides) -> Self {
        Self { overrides }
    }

    /// Walk the tree one segment at a time
    ///
    /// Returns `None` as soon as a segment has no matching child.
    pub fn find_node<'t>(
        &self,
        tree: &'t SpecTree,
        operation: &Operation,
        namespace: Option<&str>,
    ) -> Option<&'t SpecNode> {
        let namespace = namespace.unwrap_or(DEFAULT_NAMESPACE);

        let path = operation.path.split('?').next().unwrap_or_default();
        let path = self.overrides.resolve_override(path, &operation.method);

        let mut node = tree.root();
        for segment in path.split('/').map(str::trim).filter(|s| !s.is_empty()) {
            node = match_segment(node, segment, namespace)?;

            if is_bundle_item_node(node) {
                return Some(node);
            }
        }

        Some(node)
    }
}

/// Find the child of `node` matching one documented segment
pub fn match_segment<'t>(node: &'t SpecNode, segment: &str, namespace: &str) -> Option<&'t SpecNode> {
    if segment == ID_PLACEHOLDER {
        return node.children().find(|child| is_id_label(child.segment()));
    }

    if let Some(child) = first_candidate_match(node, segment, namespace, &LabelCandidate::ORDER) {
        return Some(child);
    }

    // OpenAPI descriptions sometimes leave off the "microsoft." prefix
    if starts_with_ignore_case(segment, GRAPH_PREFIX) {
        let trimmed = &segment[MICROSOFT_PREFIX.len()..];
        return first_candidate_match(node, trimmed, namespace, &LabelCandidate::UNPREFIXED_ORDER);
    }

    None
}

fn first_candidate_match<'t>(
    node: &'t SpecNode,
    segment: &str,
    namespace: &str,
    candidates: &[LabelCandidate],
) -> Option<&'t SpecNode> {
    candidates.iter().find_map(|candidate| {
        let label = candidate.render(segment, namespace);
        node.children()
            .find(|child| labels_match(child.segment(), &label))
    })
}

fn is_id_label(label: &str) -> bool {
    label.starts_with('{') && label.ends_with('}') && label.to_lowercase().contains("id")
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Case-insensitive label comparison
///
/// Function parameter placeholders are written both as `'{value}'` and
/// `{value}` in OpenAPI descriptions, so when both sides look like a
/// function call with placeholders, quotes in `candidate` are optional.
pub fn labels_match(label: &str, candidate: &str) -> bool {
    if label.to_lowercase() == candidate.to_lowercase() {
        return true;
    }

    let looks_like_call = |s: &str| s.contains('(') && s.contains('{');
    if !(looks_like_call(label) && looks_like_call(candidate)) {
        return false;
    }

    let mut label_chars = label.chars().flat_map(char::to_lowercase).peekable();
    for c in candidate.chars().flat_map(char::to_lowercase) {
        if c == '\'' {
            label_chars.next_if_eq(&'\'');
            continue;
        }
        if label_chars.next() != Some(c) {
            return false;
        }
    }

    label_chars.next().is_none()
}
