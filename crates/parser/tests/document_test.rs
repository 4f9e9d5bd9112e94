//! Integration tests for loading Markdown API documents

use cloud_support_common::{Edition, Method};
use cloud_support_parser::{ApiDocument, DocSet};
use std::fs;

const GRAPH_API: &str = r#"---
title: "Get message"
doc_type: apiPageType
---

# Get message

Namespace: microsoft.graph

Retrieve the properties and relationships of a message object.

## Permissions

Mail.ReadBasic, Mail.Read

## HTTP request

To get the specified message:
<!-- { "blockType": "ignored" } -->
```http
GET /me/messages/{id}
GET /users/{id | userPrincipalName}/messages/{id}
GET /me/mailFolders/{id}/messages/{id}
GET /users/{id | userPrincipalName}/mailFolders/{id}/messages/{id}
```

To get the MIME content of the specified message:
<!-- { "blockType": "ignored" } -->
```http
GET /me/messages/{id}/$value
GET /users/{id | userPrincipalName}/messages/{id}/$value
GET /me/mailFolders/{id}/messages/{id}/$value
GET /users/{id | userPrincipalName}/mailFolders/{id}/messages/{id}/$value
```

## Optional query parameters

```http
GET /me/messages/{id}?$select=subject
```
"#;

const COPILOT_API: &str = r#"# Get aiInsight

## HTTP request

```http
GET https://graph.microsoft.com/beta/copilot/users/{userId}/onlineMeetings/{onlineMeetingId}/aiInsights/{aiInsightId}
```

## Request headers
"#;

#[test]
fn test_load_graph_api_document() {
    let doc = ApiDocument::from_markdown("graph-api.md", GRAPH_API).unwrap();

    assert_eq!(doc.namespace.as_deref(), Some("microsoft.graph"));

    let paths: Vec<_> = doc.operations.iter().map(|o| o.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "/me/messages/{id}",
            "/users/{id}/messages/{id}",
            "/me/mailFolders/{id}/messages/{id}",
            "/users/{id}/mailFolders/{id}/messages/{id}",
            "/me/messages/{id}/$value",
            "/users/{id}/messages/{id}/$value",
            "/me/mailFolders/{id}/messages/{id}/$value",
            "/users/{id}/mailFolders/{id}/messages/{id}/$value",
        ]
    );
    assert!(doc.operations.iter().all(|o| o.method == Method::GET));
}

#[test]
fn test_load_copilot_api_document() {
    let doc = ApiDocument::from_markdown("copilot-api.md", COPILOT_API).unwrap();

    assert_eq!(doc.namespace, None);
    assert_eq!(doc.operations.len(), 1);
    assert_eq!(
        doc.operations[0].path.to_lowercase(),
        "/copilot/users/{id}/onlinemeetings/{id}/aiinsights/{id}"
    );
    assert_eq!(doc.operations[0].edition, Edition::Preview);
}

#[test]
fn test_docset_loads_markdown_files_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b-message-get.md"), GRAPH_API).unwrap();
    fs::write(dir.path().join("a-aiinsight-get.md"), COPILOT_API).unwrap();
    fs::write(dir.path().join("notes.txt"), "GET /ignored").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested").join("c.md"), GRAPH_API).unwrap();

    let docset = DocSet::from_directory(dir.path()).unwrap();

    let names: Vec<_> = docset.documents.iter().map(|d| d.file_name()).collect();
    assert_eq!(names, vec!["a-aiinsight-get.md", "b-message-get.md"]);
    assert_eq!(docset.root_directory, dir.path());
}

#[test]
fn test_docset_rejects_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    assert!(DocSet::from_directory(dir.path().join("missing")).is_err());
}

const SETEXT_API: &str = r#"List events
===========

Namespace: microsoft.graph

HTTP request
------------

1. For the signed-in user:

   > ```http
   > GET /me/events
   > ```

2. For another user:

   ```http
   GET /users/{id | userPrincipalName}/events
   ```

Request headers
---------------

```http
GET /not/a/request
```
"#;

#[test]
fn test_load_setext_document_with_quoted_fences() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("user-list-events.md");
    fs::write(&path, SETEXT_API).unwrap();

    let doc = ApiDocument::from_file(&path).unwrap();

    assert_eq!(doc.namespace.as_deref(), Some("microsoft.graph"));
    let paths: Vec<_> = doc.operations.iter().map(|o| o.path.as_str()).collect();
    assert_eq!(paths, vec!["/me/events", "/users/{id}/events"]);
}
