//! Behavior tests for the folder mirror client against a mock hosting API.

use secrecy::SecretString;
use serde_json::json;
use services::services::mirror::{FolderMirrorClient, MirrorError};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path, query_param},
};

fn client_for(server: &MockServer) -> FolderMirrorClient {
    FolderMirrorClient::new("acme".to_string(), SecretString::from("test-token".to_string()))
        .with_api_base(server.uri())
}

fn commit_json(message: &str, author: &str, committer: &str) -> serde_json::Value {
    json!({
        "sha": "d6cd1e2bd19e03a81132a23b2025920577f84e37",
        "commit": {
            "message": message,
            "author": {"name": author, "date": "2025-03-01T12:00:00Z"},
            "committer": {"name": committer, "date": "2025-03-01T12:00:00Z"}
        }
    })
}

#[tokio::test]
async fn test_create_folder_puts_marker_when_absent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/acme-repo/contents/blog/.gitkeep"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/repos/acme/acme-repo/contents/blog/.gitkeep"))
        .and(body_partial_json(json!({"message": "Create site folder"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"content": {}})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .create_folder("acme-repo", "blog")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_folder_sends_sha_when_marker_exists() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/acme-repo/contents/blog/.gitkeep"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"sha": "abc123", "path": "blog/.gitkeep"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    // The retried create must carry the existing revision hash so the write
    // updates instead of conflicting.
    Mock::given(method("PUT"))
        .and(path("/repos/acme/acme-repo/contents/blog/.gitkeep"))
        .and(body_partial_json(json!({"sha": "abc123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": {}})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .create_folder("acme-repo", "blog")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_folder_is_idempotent_when_marker_missing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/acme-repo/contents/blog/.gitkeep"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/repos/acme/acme-repo/contents/blog/.gitkeep"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.delete_folder("acme-repo", "blog").await.unwrap();
    client.delete_folder("acme-repo", "blog").await.unwrap();
}

#[tokio::test]
async fn test_delete_folder_sends_current_sha() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/acme-repo/contents/blog/.gitkeep"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sha": "abc123"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/repos/acme/acme-repo/contents/blog/.gitkeep"))
        .and(body_partial_json(json!({"sha": "abc123", "message": "Delete site folder"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": null})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .delete_folder("acme-repo", "blog")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_rename_creates_new_marker_then_deletes_old() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/acme-repo/contents/journal/.gitkeep"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/repos/acme/acme-repo/contents/journal/.gitkeep"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"content": {}})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/acme-repo/contents/blog/.gitkeep"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sha": "old-sha"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/repos/acme/acme-repo/contents/blog/.gitkeep"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": null})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .rename_folder("acme-repo", "blog", "journal")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_rename_partial_failure_leaves_both_markers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/acme-repo/contents/journal/.gitkeep"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    // New marker lands...
    Mock::given(method("PUT"))
        .and(path("/repos/acme/acme-repo/contents/journal/.gitkeep"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"content": {}})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/acme-repo/contents/blog/.gitkeep"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sha": "old-sha"})))
        .mount(&server)
        .await;

    // ...but deleting the old one fails, so the rename as a whole errors and
    // both paths keep a marker.
    Mock::given(method("DELETE"))
        .and(path("/repos/acme/acme-repo/contents/blog/.gitkeep"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .rename_folder("acme-repo", "blog", "journal")
        .await;

    assert!(matches!(result, Err(MirrorError::Api { status: 500, .. })));
}

#[tokio::test]
async fn test_latest_commit_builds_snapshot_from_first_entry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/acme-repo/commits"))
        .and(query_param("path", "blog"))
        .and(query_param("per_page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            commit_json("Create site folder", "Ada Lovelace", "Release Bot"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = client_for(&server)
        .latest_commit("acme-repo", "blog", Some("blog"))
        .await
        .unwrap();

    assert_eq!(snapshot.site_name, "blog");
    assert_eq!(snapshot.commit_message, "Create site folder");
    assert_eq!(snapshot.author_name, "Ada Lovelace");
    assert_eq!(snapshot.recent_committer_name, "Release Bot");
    assert_eq!(snapshot.commit_time.to_rfc3339(), "2025-03-01T12:00:00+00:00");
}

#[tokio::test]
async fn test_latest_commit_without_path_filter_omits_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/acme-repo/commits"))
        .and(query_param("per_page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            commit_json("Initial commit", "Ada Lovelace", "Ada Lovelace"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = client_for(&server)
        .latest_commit("acme-repo", "blog", None)
        .await
        .unwrap();

    assert_eq!(snapshot.commit_message, "Initial commit");
}

#[tokio::test]
async fn test_latest_commit_empty_list_is_no_commits_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/acme-repo/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .latest_commit("acme-repo", "blog", Some("blog"))
        .await;

    assert!(matches!(result, Err(MirrorError::NoCommitsFound)));
}
