use crate::adapters::credentials::ServiceAccountCredentials;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

pub const DEFAULT_APP_NAME: &str = "[DEFAULT]";

/// An initialized database application instance.
#[derive(Debug)]
pub struct FirebaseApp {
    name: String,
    credentials: ServiceAccountCredentials,
}

impl FirebaseApp {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn credentials(&self) -> &ServiceAccountCredentials {
        &self.credentials
    }
}

/// Named application instances. Initialization is check-then-act under one
/// lock, so concurrent callers with the same name all get the same instance.
#[derive(Debug, Default)]
pub struct AppRegistry {
    apps: Mutex<HashMap<String, Arc<FirebaseApp>>>,
}

static GLOBAL: OnceLock<AppRegistry> = OnceLock::new();

impl AppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry used by the binaries.
    pub fn global() -> &'static AppRegistry {
        GLOBAL.get_or_init(AppRegistry::new)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<FirebaseApp>>> {
        self.apps.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the instance registered under `name`, creating it from
    /// `credentials` if there is none. An existing instance is never replaced.
    pub fn get_or_init(
        &self,
        name: &str,
        credentials: ServiceAccountCredentials,
    ) -> Arc<FirebaseApp> {
        let mut apps = self.lock();
        if let Some(app) = apps.get(name) {
            tracing::debug!(app = %name, "Reusing initialized app");
            return Arc::clone(app);
        }

        tracing::debug!(app = %name, project = %credentials.project_id, "Initializing app");
        let app = Arc::new(FirebaseApp {
            name: name.to_string(),
            credentials,
        });
        apps.insert(name.to_string(), Arc::clone(&app));
        app
    }

    pub fn get(&self, name: &str) -> Option<Arc<FirebaseApp>> {
        self.lock().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn reset(&self) {
        self.lock().clear();
    }
}
