use crate::config::{ConfigSource, Settings};
use crate::core::bootstrap::Bootstrapper;
use crate::domain::ports::{DocumentStore, Reporter, TextGenerator};

pub const HEALTHCHECK_PROMPT: &str = "Reply only with: \"Gemini connection successful 🚀\"";
pub const UNKNOWN_FIELD: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbCheckOutcome {
    Found { make: String, model: String },
    /// The query succeeded but returned nothing. Not a failure.
    Empty,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiCheckOutcome {
    Primary {
        text: String,
    },
    Fallback {
        primary_error: String,
        text: String,
    },
    Failed {
        primary_error: String,
        fallback_error: String,
    },
}

impl AiCheckOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthReport {
    pub bootstrap_error: Option<String>,
    pub database: Option<DbCheckOutcome>,
    pub ai: Option<AiCheckOutcome>,
}

/// Runs one read-only call against each handle. Failures are reported, never
/// returned, so one failing service cannot hide the status of the other.
pub struct HealthCheckRunner<'r, R: Reporter> {
    settings: Settings,
    reporter: &'r mut R,
}

impl<'r, R: Reporter> HealthCheckRunner<'r, R> {
    pub fn new(settings: Settings, reporter: &'r mut R) -> Self {
        Self { settings, reporter }
    }

    pub async fn check_database<D: DocumentStore + ?Sized>(&mut self, db: &D) -> DbCheckOutcome {
        let collection = self.settings.collection.clone();
        self.reporter.report("🔥 Testing Firestore connection...");

        let outcome = match db.query(&collection, 1).await {
            Ok(records) => match records.first() {
                Some(record) => DbCheckOutcome::Found {
                    make: record
                        .field_str("make")
                        .unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
                    model: record.field_str("model").unwrap_or_default(),
                },
                None => DbCheckOutcome::Empty,
            },
            Err(e) => {
                tracing::warn!(collection = %collection, "Firestore check failed: {}", e);
                DbCheckOutcome::Failed(e.to_string())
            }
        };

        let line = match &outcome {
            DbCheckOutcome::Found { make, model } => format!(
                "✅ Connection successful. Sample record: {} {}",
                make, model
            )
            .trim_end()
            .to_string(),
            DbCheckOutcome::Empty => format!(
                "✅ Connection successful (collection '{}' is empty or missing).",
                collection
            ),
            DbCheckOutcome::Failed(e) => format!("❌ Error reading Firestore: {}", e),
        };
        self.reporter.report(&line);
        outcome
    }

    /// Primary model, then at most one fallback.
    pub async fn check_ai<A: TextGenerator + ?Sized>(&mut self, ai: &A) -> AiCheckOutcome {
        let primary = self.settings.primary_model.clone();
        let fallback = self.settings.fallback_model.clone();
        self.reporter.report("🧠 Testing Gemini connection...");

        let primary_error = match ai.generate(&primary, HEALTHCHECK_PROMPT).await {
            Ok(text) => {
                self.reporter.report(&format!("✅ Gemini response: {}", text));
                return AiCheckOutcome::Primary { text };
            }
            Err(e) => e.to_string(),
        };

        tracing::warn!(model = %primary, "Primary model failed: {}", primary_error);
        self.reporter
            .report(&format!("❌ Error calling Gemini: {}", primary_error));
        self.reporter
            .report(&format!("💡 Retrying with '{}'...", fallback));

        match ai.generate(&fallback, HEALTHCHECK_PROMPT).await {
            Ok(text) => {
                self.reporter.report(&format!("✅ Gemini response: {}", text));
                AiCheckOutcome::Fallback {
                    primary_error,
                    text,
                }
            }
            Err(e) => {
                tracing::warn!(model = %fallback, "Fallback model failed: {}", e);
                let fallback_error = e.to_string();
                self.reporter
                    .report(&format!("❌ Final error: {}", fallback_error));
                AiCheckOutcome::Failed {
                    primary_error,
                    fallback_error,
                }
            }
        }
    }
}

/// Bootstraps, then checks the database and the AI service in that order.
pub async fn run_health_checks<S: ConfigSource, R: Reporter>(
    bootstrapper: &Bootstrapper<'_, S>,
    reporter: &mut R,
) -> HealthReport {
    let mut report = HealthReport::default();
    reporter.report("🔄 Starting integration checks...");

    let handles = match bootstrapper.bootstrap() {
        Ok(handles) => {
            reporter.report("✅ Credentials loaded and clients initialized.");
            handles
        }
        Err(e) => {
            tracing::error!(category = ?e.category(), "Bootstrap failed: {}", e);
            reporter.report(&format!("❌ Initialization error: {}", e));
            report.bootstrap_error = Some(e.to_string());
            return report;
        }
    };

    let mut runner = HealthCheckRunner::new(bootstrapper.settings().clone(), reporter);
    report.database = Some(runner.check_database(&handles.db).await);
    report.ai = Some(runner.check_ai(&handles.ai).await);
    report
}
