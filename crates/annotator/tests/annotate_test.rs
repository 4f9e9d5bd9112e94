//! End-to-end annotation of Markdown documents on disk

use cloud_support_analyzer::{EditionTrees, OpenApiDocument, Reconciler, SpecTree};
use cloud_support_annotator::{IncludeAnnotator, DEFAULT_INCLUDE_DIRECTORY};
use cloud_support_common::{ApiOverrides, AvailabilityStatus, Cloud};
use cloud_support_parser::{ApiDocument, DocSet};
use std::fs;

const GLOBAL: &str = r#"
paths:
  '/users/{user-id}/messages/{message-id}':
    get: {}
  '/users/{user-id}/mailFolders/{mailFolder-id}/messages/{message-id}':
    get: {}
  '/copilot/users/{user-id}/onlineMeetings/{onlineMeeting-id}/aiInsights/{callAiInsight-id}':
    get: {}
"#;

const USGOV: &str = r#"
paths:
  '/users/{user-id}/messages/{message-id}':
    get: {}
  '/users/{user-id}/mailFolders/{mailFolder-id}/messages/{message-id}':
    get: {}
"#;

const CHINA: &str = "paths: {}\n";

const MESSAGE_GET: &str = r#"# Get message

Namespace: microsoft.graph

Retrieve a message.

## Permissions

Mail.Read

## HTTP request

```http
GET /users/{id | userPrincipalName}/messages/{id}
GET /users/{id | userPrincipalName}/mailFolders/{id}/messages/{id}
```
"#;

const AI_INSIGHT_GET: &str = r#"# Get aiInsight

Read an insight.

## HTTP request

```http
GET https://graph.microsoft.com/beta/copilot/users/{userId}/onlineMeetings/{onlineMeetingId}/aiInsights/{aiInsightId}
```
"#;

fn tree() -> SpecTree {
    let mut tree = SpecTree::new();
    for (cloud, yaml) in [(Cloud::Global, GLOBAL), (Cloud::UsGov, USGOV), (Cloud::China, CHINA)] {
        tree.attach(&OpenApiDocument::from_yaml(yaml).unwrap(), cloud);
    }
    tree
}

#[test]
fn test_annotate_docset() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("message-get.md"), MESSAGE_GET).unwrap();

    let docs = DocSet::from_directory(dir.path()).unwrap();
    let tree = tree();
    let overrides = ApiOverrides::default();
    let reconciler = Reconciler::new(&overrides);
    let mut annotator = IncludeAnnotator::new(DEFAULT_INCLUDE_DIRECTORY, false).unwrap();

    for doc in &docs.documents {
        let status = reconciler
            .annotate_document(&tree, doc, &mut annotator)
            .unwrap();
        assert_eq!(status, AvailabilityStatus::GlobalAndUSGov);
    }
    assert_eq!(annotator.annotated(), 1);

    let written = fs::read_to_string(dir.path().join("message-get.md")).unwrap();
    assert!(written.contains(
        "Retrieve a message.\n\n[!INCLUDE [national-cloud-support](../../includes/global-us.md)]\n\n## Permissions"
    ));

    // A second run updates in place rather than adding another line
    let doc = ApiDocument::from_file(dir.path().join("message-get.md")).unwrap();
    reconciler
        .annotate_document(&tree, &doc, &mut annotator)
        .unwrap();
    let rewritten = fs::read_to_string(dir.path().join("message-get.md")).unwrap();
    assert_eq!(rewritten, written);
}

#[test]
fn test_unknown_document_is_not_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("message-get.md");
    fs::write(&path, MESSAGE_GET).unwrap();

    let empty = SpecTree::new();
    let overrides = ApiOverrides::default();
    let reconciler = Reconciler::new(&overrides);
    let mut annotator = IncludeAnnotator::new(DEFAULT_INCLUDE_DIRECTORY, false).unwrap();

    let doc = ApiDocument::from_file(&path).unwrap();
    let err = reconciler
        .annotate_document(&empty, &doc, &mut annotator)
        .unwrap_err();

    assert!(err.to_string().contains("Invalid cloud support status"));
    assert_eq!(fs::read_to_string(&path).unwrap(), MESSAGE_GET);
    assert_eq!(annotator.annotated(), 0);
}

#[test]
fn test_annotate_by_edition_uses_preview_status() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("aiinsight-get.md");
    fs::write(&path, AI_INSIGHT_GET).unwrap();

    let trees = EditionTrees {
        primary: SpecTree::new(),
        preview: tree(),
    };
    let overrides = ApiOverrides::default();
    let reconciler = Reconciler::new(&overrides);
    let mut annotator = IncludeAnnotator::new("../includes", true).unwrap();

    let doc = ApiDocument::from_file(&path).unwrap();
    let status = reconciler
        .annotate_document_by_edition(&trees, &doc, &mut annotator)
        .unwrap();
    assert_eq!(status, AvailabilityStatus::GlobalOnly);

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("[!INCLUDE [national-cloud-support](../includes/global-only.md)]\n\n## HTTP request"));
}
