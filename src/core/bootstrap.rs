use crate::adapters::credentials::ServiceAccountCredentials;
use crate::adapters::firestore::FirestoreClient;
use crate::adapters::gemini::GeminiClient;
use crate::config::{self, ConfigSource, Settings};
use crate::core::registry::{AppRegistry, DEFAULT_APP_NAME};
use crate::domain::model::ServiceHandles;
use crate::utils::error::Result;
use crate::utils::validation::Validate;

pub type Handles = ServiceHandles<GeminiClient, FirestoreClient>;

/// Resolves configuration and builds both service handles.
pub struct Bootstrapper<'a, S: ConfigSource> {
    source: S,
    registry: &'a AppRegistry,
    settings: Settings,
}

impl<'a, S: ConfigSource> Bootstrapper<'a, S> {
    pub fn new(source: S, registry: &'a AppRegistry) -> Self {
        let settings = Settings::from_source(&source);
        Self {
            source,
            registry,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Safe to call repeatedly: the database app is initialized on the first
    /// successful call and reused afterwards. No network I/O happens here.
    pub fn bootstrap(&self) -> Result<Handles> {
        let pair = config::resolve_pair(&self.source)?;
        self.settings.validate()?;

        let ai = GeminiClient::new(&pair.ai_api_key, &self.settings.gemini_api_base)?;
        tracing::debug!(base_url = %self.settings.gemini_api_base, "Gemini client ready");

        let credentials = ServiceAccountCredentials::from_file(&pair.database_credential_path)?;
        let app = self.registry.get_or_init(DEFAULT_APP_NAME, credentials);

        let db = FirestoreClient::new(
            app,
            &self.settings.firestore_api_base(),
            self.settings.firestore_emulator_host.is_some(),
        );
        tracing::debug!(project = %db.project_id(), "Firestore client ready");

        Ok(ServiceHandles { ai, db })
    }
}
