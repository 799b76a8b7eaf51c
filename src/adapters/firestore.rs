//! Document-database client for the Firestore REST API.
//!
//! Every query first exchanges a signed service-account assertion for an
//! OAuth access token, then runs a structured query against the default
//! database of the app's project. Against the local emulator the exchange is
//! skipped and the emulator's fixed `owner` token is sent instead.

use crate::adapters::api_error_message;
use crate::adapters::credentials::ServiceAccountCredentials;
use crate::core::registry::FirebaseApp;
use crate::domain::model::Record;
use crate::domain::ports::DocumentStore;
use crate::utils::error::{BootError, Result};
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

const SERVICE: &str = "Firestore";
const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const EMULATOR_TOKEN: &str = "owner";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Clone)]
pub struct FirestoreClient {
    app: Arc<FirebaseApp>,
    client: Client,
    api_base: String,
    emulator: bool,
}

impl FirestoreClient {
    pub fn new(app: Arc<FirebaseApp>, api_base: &str, emulator: bool) -> Self {
        Self {
            app,
            client: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            emulator,
        }
    }

    pub fn app(&self) -> &Arc<FirebaseApp> {
        &self.app
    }

    pub fn project_id(&self) -> &str {
        &self.app.credentials().project_id
    }

    fn documents_path(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            self.api_base,
            self.project_id()
        )
    }

    async fn access_token(&self) -> Result<String> {
        if self.emulator {
            return Ok(EMULATOR_TOKEN.to_string());
        }

        let credentials = self.app.credentials();
        let assertion = sign_assertion(credentials)?;

        tracing::debug!(token_uri = %credentials.token_uri, "Exchanging service account assertion");

        let response = self
            .client
            .post(&credentials.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| BootError::service(SERVICE, format!("token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BootError::service(
                SERVICE,
                format!("token endpoint returned {}: {}", status, api_error_message(&body)),
            ));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| BootError::service(SERVICE, format!("invalid token response: {}", e)))?;

        Ok(token.access_token)
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn query(&self, collection: &str, limit: usize) -> Result<Vec<Record>> {
        let limit = i32::try_from(limit)
            .map_err(|_| BootError::config(format!("query limit {} is out of range", limit)))?;
        let token = self.access_token().await?;
        let url = format!("{}:runQuery", self.documents_path());

        let request = RunQueryRequest {
            structured_query: StructuredQuery {
                from: vec![CollectionSelector {
                    collection_id: collection.to_string(),
                }],
                limit,
            },
        };

        tracing::debug!(collection = %collection, limit, "Running Firestore query");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|e| BootError::service(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BootError::service(
                SERVICE,
                format!("runQuery returned {}: {}", status, api_error_message(&body)),
            ));
        }

        let items: Vec<RunQueryResponseItem> = response
            .json()
            .await
            .map_err(|e| BootError::service(SERVICE, format!("failed to parse response: {}", e)))?;

        let records: Vec<Record> = items
            .into_iter()
            .filter_map(|item| item.document)
            .map(Document::into_record)
            .collect();

        tracing::debug!(count = records.len(), "Firestore query returned");
        Ok(records)
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

fn sign_assertion(credentials: &ServiceAccountCredentials) -> Result<String> {
    let now = Utc::now().timestamp();
    let claims = AssertionClaims {
        iss: &credentials.client_email,
        scope: DATASTORE_SCOPE,
        aud: &credentials.token_uri,
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = credentials.private_key_id.clone();

    encode(&header, &claims, &credentials.signing_key)
        .map_err(|e| BootError::service(SERVICE, format!("failed to sign assertion: {}", e)))
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunQueryRequest {
    structured_query: StructuredQuery,
}

#[derive(Debug, Serialize)]
struct StructuredQuery {
    from: Vec<CollectionSelector>,
    limit: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectionSelector {
    collection_id: String,
}

#[derive(Debug, Deserialize)]
struct RunQueryResponseItem {
    document: Option<Document>,
}

#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: HashMap<String, serde_json::Value>,
}

impl Document {
    fn into_record(self) -> Record {
        let id = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        let data = self
            .fields
            .into_iter()
            .map(|(k, v)| (k, decode_value(v)))
            .collect();
        Record { id, data }
    }
}

/// Converts a typed Firestore value (`{"stringValue": "x"}`) into plain JSON.
fn decode_value(value: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    let mut typed = match value {
        Value::Object(typed) => typed,
        other => return other,
    };

    if let Some(v) = typed.remove("integerValue") {
        let parsed = v.as_str().and_then(|s| s.parse::<i64>().ok());
        return parsed.map(Value::from).unwrap_or(v);
    }
    if typed.contains_key("nullValue") {
        return Value::Null;
    }
    if let Some(Value::Object(mut map)) = typed.remove("mapValue") {
        let fields = match map.remove("fields") {
            Some(Value::Object(fields)) => fields,
            _ => Default::default(),
        };
        return Value::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k, decode_value(v)))
                .collect(),
        );
    }
    if let Some(Value::Object(mut array)) = typed.remove("arrayValue") {
        let values = match array.remove("values") {
            Some(Value::Array(values)) => values,
            _ => Vec::new(),
        };
        return Value::Array(values.into_iter().map(decode_value).collect());
    }

    for key in [
        "stringValue",
        "booleanValue",
        "doubleValue",
        "timestampValue",
        "referenceValue",
        "bytesValue",
        "geoPointValue",
    ] {
        if let Some(v) = typed.remove(key) {
            return v;
        }
    }

    Value::Object(typed)
}
