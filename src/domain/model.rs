use std::collections::HashMap;
use std::path::PathBuf;

use crate::domain::ports::{DocumentStore, TextGenerator};

/// The two values bootstrap needs. Read once per run, never stored.
#[derive(Clone, PartialEq)]
pub struct ConfigPair {
    pub ai_api_key: String,
    pub database_credential_path: PathBuf,
}

impl std::fmt::Debug for ConfigPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigPair")
            .field("ai_api_key", &"<redacted>")
            .field("database_credential_path", &self.database_credential_path)
            .finish()
    }
}

/// A document read back from the database. Read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub id: String,
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    /// String form of a field; non-string scalars are rendered as JSON.
    pub fn field_str(&self, name: &str) -> Option<String> {
        match self.data.get(name)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Handles produced by bootstrap, owned by the caller for the rest of the process.
pub struct ServiceHandles<A: TextGenerator, D: DocumentStore> {
    pub ai: A,
    pub db: D,
}
