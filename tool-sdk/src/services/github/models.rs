//! GitHub REST API data models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitObject {
    pub sha: String,

    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Response of `GET /repos/{owner}/{repo}/git/ref/{ref}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub name: String,

    pub object: GitObject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRefRequest {
    /// Fully qualified, e.g. `refs/heads/feature`
    #[serde(rename = "ref")]
    pub name: String,

    pub sha: String,
}

/// Request body for `PUT /repos/{owner}/{repo}/contents/{path}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PutContentsRequest {
    pub message: String,

    /// Base64 encoded file body
    pub content: String,

    pub branch: String,

    /// Blob sha of the file being replaced, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentInfo {
    pub path: String,
    pub sha: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub sha: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PutContentsResponse {
    pub content: ContentInfo,
    pub commit: CommitInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePullRequest {
    pub title: String,

    /// Branch holding the change
    pub head: String,

    /// Branch the change is proposed against
    pub base: String,

    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,

    pub html_url: String,

    #[serde(default)]
    pub state: Option<String>,
}
