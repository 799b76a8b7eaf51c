#[cfg(feature = "cli")]
pub mod cli;

use crate::domain::model::ConfigPair;
use crate::utils::error::{BootError, Result};
use crate::utils::validation::{self, Validate};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Once;

pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const FIREBASE_SERVICE_ACCOUNT: &str = "FIREBASE_SERVICE_ACCOUNT";
pub const GEMINI_API_BASE_URL: &str = "GEMINI_API_BASE_URL";
pub const GEMINI_MODEL: &str = "GEMINI_MODEL";
pub const GEMINI_FALLBACK_MODEL: &str = "GEMINI_FALLBACK_MODEL";
pub const HEALTHCHECK_COLLECTION: &str = "HEALTHCHECK_COLLECTION";
pub const FIRESTORE_EMULATOR_HOST: &str = "FIRESTORE_EMULATOR_HOST";

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_FIRESTORE_API_BASE: &str = "https://firestore.googleapis.com/v1";
pub const DEFAULT_PRIMARY_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_FALLBACK_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_COLLECTION: &str = "cars";

/// Named lookups against some key/value configuration store.
pub trait ConfigSource: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
}

static DOTENV: Once = Once::new();

/// Reads from the process environment. The first `EnvConfig` created in a
/// process loads `.env` (or the given file) into the environment; later ones
/// see whatever is already there.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig;

impl EnvConfig {
    pub fn load_from(env_file: Option<&Path>) -> Self {
        DOTENV.call_once(|| {
            let outcome = match env_file {
                Some(path) => dotenvy::from_path(path).map(|_| path.to_path_buf()),
                None => dotenvy::dotenv(),
            };
            match outcome {
                Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
                Err(e) => match missing_env_file_level(env_file.is_some(), &e) {
                    Some(level) if level == tracing::Level::WARN => tracing::warn!(
                        "Env file {} not found, using process environment",
                        env_file.map(|p| p.display().to_string()).unwrap_or_default()
                    ),
                    Some(_) => tracing::debug!("No .env file found, using process environment"),
                    None => tracing::warn!("Ignoring unreadable env file: {}", e),
                },
            }
        });
        Self
    }
}

/// Level for a missing env file: a file named on the command line is worth a
/// warning, the implicit `.env` is not. `None` when the file exists but failed to load.
fn missing_env_file_level(explicit: bool, err: &dotenvy::Error) -> Option<tracing::Level> {
    match (err.not_found(), explicit) {
        (false, _) => None,
        (true, true) => Some(tracing::Level::WARN),
        (true, false) => Some(tracing::Level::DEBUG),
    }
}

impl ConfigSource for EnvConfig {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// In-memory source, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MapConfig {
    values: HashMap<String, String>,
}

impl MapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }
}

impl ConfigSource for MapConfig {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

/// Resolves the two required values. Nothing beyond presence is checked here.
pub fn resolve_pair(source: &dyn ConfigSource) -> Result<ConfigPair> {
    let ai_api_key = validation::require_non_empty(GEMINI_API_KEY, source.get(GEMINI_API_KEY));
    let credential_path =
        validation::require_non_empty(FIREBASE_SERVICE_ACCOUNT, source.get(FIREBASE_SERVICE_ACCOUNT));

    match (ai_api_key, credential_path) {
        (Ok(ai_api_key), Ok(path)) => Ok(ConfigPair {
            ai_api_key,
            database_credential_path: PathBuf::from(path),
        }),
        (Err(_), Err(_)) => Err(BootError::config(format!(
            "{} and {} are both missing",
            GEMINI_API_KEY, FIREBASE_SERVICE_ACCOUNT
        ))),
        (Err(e), _) | (_, Err(e)) => Err(e),
    }
}

/// Optional knobs with defaults; none of them is required to run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub gemini_api_base: String,
    pub primary_model: String,
    pub fallback_model: String,
    pub collection: String,
    pub firestore_emulator_host: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gemini_api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            primary_model: DEFAULT_PRIMARY_MODEL.to_string(),
            fallback_model: DEFAULT_FALLBACK_MODEL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            firestore_emulator_host: None,
        }
    }
}

impl Settings {
    pub fn from_source(source: &dyn ConfigSource) -> Self {
        let defaults = Self::default();
        let pick = |name: &str, default: String| {
            source
                .get(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };

        Self {
            gemini_api_base: pick(GEMINI_API_BASE_URL, defaults.gemini_api_base)
                .trim_end_matches('/')
                .to_string(),
            primary_model: pick(GEMINI_MODEL, defaults.primary_model),
            fallback_model: pick(GEMINI_FALLBACK_MODEL, defaults.fallback_model),
            collection: pick(HEALTHCHECK_COLLECTION, defaults.collection),
            firestore_emulator_host: source
                .get(FIRESTORE_EMULATOR_HOST)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        }
    }

    pub fn firestore_api_base(&self) -> String {
        match &self.firestore_emulator_host {
            Some(host) => format!("http://{}/v1", host),
            None => DEFAULT_FIRESTORE_API_BASE.to_string(),
        }
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url(GEMINI_API_BASE_URL, &self.gemini_api_base)?;
        validation::validate_non_empty_string(GEMINI_MODEL, &self.primary_model)?;
        validation::validate_non_empty_string(GEMINI_FALLBACK_MODEL, &self.fallback_model)?;
        validation::validate_non_empty_string(HEALTHCHECK_COLLECTION, &self.collection)?;
        if let Some(host) = &self.firestore_emulator_host {
            validation::validate_host_port(FIRESTORE_EMULATOR_HOST, host)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_env_file_level() {
        let missing = dotenvy::from_path("/definitely/not/here/.env").unwrap_err();
        assert!(missing.not_found());
        assert_eq!(missing_env_file_level(true, &missing), Some(tracing::Level::WARN));
        assert_eq!(missing_env_file_level(false, &missing), Some(tracing::Level::DEBUG));

        let malformed = dotenvy::Error::LineParse("=broken".to_string(), 0);
        assert_eq!(missing_env_file_level(true, &malformed), None);
    }

    #[test]
    fn test_resolve_pair() {
        let source = MapConfig::new()
            .with(GEMINI_API_KEY, "abc")
            .with(FIREBASE_SERVICE_ACCOUNT, "/keys/sa.json");

        let pair = resolve_pair(&source).unwrap();
        assert_eq!(pair.ai_api_key, "abc");
        assert_eq!(pair.database_credential_path, PathBuf::from("/keys/sa.json"));
    }

    #[test]
    fn test_resolve_pair_missing_combinations() {
        let cases = [
            MapConfig::new(),
            MapConfig::new().with(GEMINI_API_KEY, "abc"),
            MapConfig::new().with(FIREBASE_SERVICE_ACCOUNT, "/keys/sa.json"),
            MapConfig::new()
                .with(GEMINI_API_KEY, "")
                .with(FIREBASE_SERVICE_ACCOUNT, "/keys/sa.json"),
            MapConfig::new()
                .with(GEMINI_API_KEY, "abc")
                .with(FIREBASE_SERVICE_ACCOUNT, "  "),
        ];

        for source in &cases {
            let err = resolve_pair(source).unwrap_err();
            assert!(matches!(err, BootError::ConfigError { .. }), "{:?}", source);
        }
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::from_source(&MapConfig::new());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.firestore_api_base(), DEFAULT_FIRESTORE_API_BASE);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_overrides() {
        let source = MapConfig::new()
            .with(GEMINI_API_BASE_URL, "http://127.0.0.1:9000/v1beta/")
            .with(GEMINI_MODEL, "gemini-2.0-flash")
            .with(HEALTHCHECK_COLLECTION, "trucks")
            .with(FIRESTORE_EMULATOR_HOST, "localhost:8085");

        let settings = Settings::from_source(&source);
        assert_eq!(settings.gemini_api_base, "http://127.0.0.1:9000/v1beta");
        assert_eq!(settings.primary_model, "gemini-2.0-flash");
        assert_eq!(settings.fallback_model, DEFAULT_FALLBACK_MODEL);
        assert_eq!(settings.collection, "trucks");
        assert_eq!(settings.firestore_api_base(), "http://localhost:8085/v1");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_rejects_bad_base_url() {
        let source = MapConfig::new().with(GEMINI_API_BASE_URL, "not a url");
        assert!(Settings::from_source(&source).validate().is_err());
    }
}
