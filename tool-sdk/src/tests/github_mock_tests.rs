//! Mock tests for the GitHub client

use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::error::ServiceError;
use crate::services::github::{CreatePullRequest, GitHubClient};

fn create_test_client(mock_server: &MockServer) -> GitHubClient {
    GitHubClient::builder()
        .token("ghp_test")
        .base_url(mock_server.uri())
        .build()
        .expect("Failed to build GitHub client")
}

#[tokio::test]
async fn test_branch_file_and_pull_request_flow() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/demo/git/ref/heads/master"))
        .and(header("Authorization", "Bearer ghp_test"))
        .and(header("Accept", "application/vnd.github+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ref": "refs/heads/master",
            "object": {"sha": "base-sha", "type": "commit"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/repos/octo/demo/git/refs"))
        .and(body_json(json!({"ref": "refs/heads/auto-ops/incident-1234abcd", "sha": "base-sha"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ref": "refs/heads/auto-ops/incident-1234abcd",
            "object": {"sha": "base-sha"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/repos/octo/demo/contents/auto-ops/incident-1.patch"))
        .and(body_partial_json(json!({
            "branch": "auto-ops/incident-1234abcd",
            "content": "aGVsbG8="
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "content": {"path": "auto-ops/incident-1.patch", "sha": "blob-sha"},
            "commit": {"sha": "commit-sha"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/repos/octo/demo/pulls"))
        .and(body_partial_json(json!({
            "head": "auto-ops/incident-1234abcd",
            "base": "master"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "number": 7,
            "html_url": "https://github.com/octo/demo/pull/7",
            "state": "open"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let head = client.get_branch_ref("octo", "demo", "master").await.unwrap();
    client
        .create_branch("octo", "demo", "auto-ops/incident-1234abcd", &head.object.sha)
        .await
        .unwrap();
    let put = client
        .put_file(
            "octo",
            "demo",
            "auto-ops/incident-1.patch",
            "auto-ops/incident-1234abcd",
            "add patch",
            b"hello",
        )
        .await
        .unwrap();
    let pr = client
        .create_pull_request(
            "octo",
            "demo",
            &CreatePullRequest {
                title: "AUTO-OPS: fix KeyError in a.py".to_string(),
                head: "auto-ops/incident-1234abcd".to_string(),
                base: "master".to_string(),
                body: "plan".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(put.commit.sha, "commit-sha");
    assert_eq!(pr.number, 7);
    assert_eq!(pr.html_url, "https://github.com/octo/demo/pull/7");
}

#[tokio::test]
async fn test_bad_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/demo/git/ref/heads/master"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Bad credentials",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let err = create_test_client(&mock_server)
        .get_branch_ref("octo", "demo", "master")
        .await
        .unwrap_err();
    assert!(matches!(err.root(), ServiceError::Authentication(m) if m == "Bad credentials"));
    assert_eq!(err.service_name(), Some("github"));
}
