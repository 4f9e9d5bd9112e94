//! Multi-cloud OpenAPI URL tree
//!
//! Each edition gets one tree. Every node is a path segment and records,
//! per cloud, which HTTP methods that cloud's OpenAPI description defines
//! at the node.

use cloud_support_common::{Cloud, CloudSupportError, Method, Result};
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

/// OpenAPI document root, reduced to what tree construction needs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenApiDocument {
    /// OpenAPI version (e.g., "3.0.4")
    #[serde(default)]
    pub openapi: Option<String>,

    /// API paths (endpoints)
    #[serde(default)]
    pub paths: BTreeMap<String, PathItem>,
}

/// Operations defined for a path
///
/// Operation bodies are skipped; only their presence matters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub get: Option<IgnoredAny>,
    #[serde(default)]
    pub put: Option<IgnoredAny>,
    #[serde(default)]
    pub post: Option<IgnoredAny>,
    #[serde(default)]
    pub delete: Option<IgnoredAny>,
    #[serde(default)]
    pub options: Option<IgnoredAny>,
    #[serde(default)]
    pub head: Option<IgnoredAny>,
    #[serde(default)]
    pub patch: Option<IgnoredAny>,
    #[serde(default)]
    pub trace: Option<IgnoredAny>,
}

impl PathItem {
    /// HTTP methods with an operation defined
    pub fn methods(&self) -> HashSet<Method> {
        [
            (&self.get, Method::GET),
            (&self.put, Method::PUT),
            (&self.post, Method::POST),
            (&self.delete, Method::DELETE),
            (&self.options, Method::OPTIONS),
            (&self.head, Method::HEAD),
            (&self.patch, Method::PATCH),
            (&self.trace, Method::TRACE),
        ]
        .into_iter()
        .filter(|(op, _)| op.is_some())
        .map(|(_, method)| method)
        .collect()
    }
}

impl OpenApiDocument {
    /// Load an OpenAPI description from a YAML or JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CloudSupportError::SpecLoad(format!(
                "Failed to read OpenAPI file {}: {}",
                path.display(),
                e
            ))
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yml") | Some("yaml")
        );

        if is_yaml {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    /// Parse an OpenAPI description from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            CloudSupportError::SpecLoad(format!("Failed to parse OpenAPI YAML: {}", e))
        })
    }

    /// Parse an OpenAPI description from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            CloudSupportError::SpecLoad(format!("Failed to parse OpenAPI JSON: {}", e))
        })
    }
}

/// One path segment in the tree
#[derive(Debug, Clone, Default)]
pub struct SpecNode {
    segment: String,
    path: String,
    children: BTreeMap<String, SpecNode>,
    methods: HashMap<Cloud, HashSet<Method>>,
}

impl SpecNode {
    fn child(parent_path: &str, segment: &str) -> Self {
        Self {
            segment: segment.to_string(),
            path: format!("{}/{}", parent_path, segment),
            ..Self::default()
        }
    }

    /// Segment label as written in the OpenAPI description
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// Accumulated path from the root, e.g. `/users/{user-id}`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Child nodes in label order
    pub fn children(&self) -> impl Iterator<Item = &SpecNode> {
        self.children.values()
    }

    /// Methods a cloud defines at this node, if the cloud defines the path
    pub fn methods(&self, cloud: Cloud) -> Option<&HashSet<Method>> {
        self.methods.get(&cloud)
    }

    /// Whether `cloud` defines `method` at this node
    pub fn supports(&self, cloud: Cloud, method: &Method) -> bool {
        self.methods
            .get(&cloud)
            .is_some_and(|methods| methods.contains(method))
    }
}

/// Read-only URL tree for one edition, built from every cloud's description
#[derive(Debug, Clone, Default)]
pub struct SpecTree {
    root: SpecNode,
}

impl SpecTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `Prod.yml`, `Fairfax.yml`, and `Mooncake.yml` from a directory
    pub fn from_directory<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut tree = Self::new();

        for cloud in Cloud::ALL {
            let file = dir.join(cloud.spec_file_name());
            tracing::info!("Loading {} OpenAPI description from {}", cloud, file.display());
            let document = OpenApiDocument::from_file(&file)?;
            tree.attach(&document, cloud);
        }

        Ok(tree)
    }

    /// Merge a cloud's OpenAPI description into the tree
    pub fn attach(&mut self, document: &OpenApiDocument, cloud: Cloud) {
        for (path, item) in &document.paths {
            let mut node = &mut self.root;
            for segment in path.split('/').filter(|s| !s.is_empty()) {
                let parent_path = node.path.clone();
                node = node
                    .children
                    .entry(segment.to_string())
                    .or_insert_with(|| SpecNode::child(&parent_path, segment));
            }

            node.methods.entry(cloud).or_default().extend(item.methods());
        }
    }

    pub fn root(&self) -> &SpecNode {
        &self.root
    }
}
