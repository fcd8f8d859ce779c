//! Daytona sandbox API data models

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Request body for `POST /sandbox`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSandboxRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Runtime language of the code toolbox
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,

    /// Minutes of inactivity before the sandbox is stopped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_stop_interval: Option<u32>,

    /// Minutes a stopped sandbox is kept before deletion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_delete_interval: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sandbox {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub labels: HashMap<String, String>,
}

/// Request body for the toolbox git clone endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitCloneRequest {
    pub url: String,

    /// Destination directory inside the sandbox
    pub path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

/// Request body for the toolbox process execute endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub command: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,

    /// Seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResponse {
    pub exit_code: i32,

    /// Combined stdout/stderr
    #[serde(default)]
    pub result: String,
}
