#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const TEST_KEY: &str = include_str!("../fixtures/test_rsa_key.pem");
pub const PROJECT_ID: &str = "demo-project";

/// Writes a service account key file into `dir` and returns its path.
pub fn write_service_account(dir: &Path, token_uri: &str) -> PathBuf {
    let json = serde_json::json!({
        "type": "service_account",
        "project_id": PROJECT_ID,
        "private_key_id": "test-key-id",
        "private_key": TEST_KEY,
        "client_email": format!("checker@{}.iam.gserviceaccount.com", PROJECT_ID),
        "client_id": "1234567890",
        "token_uri": token_uri,
    });
    let path = dir.join("service-account.json");
    std::fs::write(&path, serde_json::to_vec_pretty(&json).unwrap()).unwrap();
    path
}

pub fn run_query_path() -> String {
    format!(
        "/v1/projects/{}/databases/(default)/documents:runQuery",
        PROJECT_ID
    )
}
