//! Cloud availability classification for a matched URL tree node

use crate::matcher::is_bundle_item_node;
use crate::spec_tree::SpecNode;
use cloud_support_common::{ApiOverrides, AvailabilityStatus, Cloud, Method};

/// Derives an [`AvailabilityStatus`] from the clouds that define a method
pub struct AvailabilityClassifier<'a> {
    overrides: &'a ApiOverrides,
}

impl<'a> AvailabilityClassifier<'a> {
    pub fn new(overrides: &'a ApiOverrides) -> Self {
        Self { overrides }
    }

    /// Classify one node and method
    ///
    /// Only operations present in the global cloud are considered; anything
    /// else is `Unknown`.
    pub fn classify(&self, node: &SpecNode, method: Option<&Method>) -> AvailabilityStatus {
        let Some(method) = method else {
            return AvailabilityStatus::Unknown;
        };

        let method = if is_bundle_item_node(node) {
            &Method::GET
        } else {
            method
        };

        if !self.is_supported(node, method, Cloud::Global) {
            return AvailabilityStatus::Unknown;
        }

        match (
            self.is_supported(node, method, Cloud::UsGov),
            self.is_supported(node, method, Cloud::China),
        ) {
            (true, true) => AvailabilityStatus::AllClouds,
            (true, false) => AvailabilityStatus::GlobalAndUSGov,
            (false, true) => AvailabilityStatus::GlobalAndChina,
            (false, false) => AvailabilityStatus::GlobalOnly,
        }
    }

    /// Whether `cloud` defines `method` at the node and is not excluded
    pub fn is_supported(&self, node: &SpecNode, method: &Method, cloud: Cloud) -> bool {
        node.supports(cloud, method)
            && (cloud.is_primary() || !self.overrides.is_excluded(node.path(), method, cloud))
    }
}
