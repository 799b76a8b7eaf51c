use thiserror::Error;

#[derive(Error, Debug)]
pub enum BootError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Failed to load credentials from '{path}': {reason}")]
    CredentialLoadError { path: String, reason: String },

    #[error("Client initialization failed: {message}")]
    ClientInitError { message: String },

    #[error("{service} call failed: {message}")]
    ServiceCallError { service: String, message: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Credentials,
    Client,
    Service,
}

impl BootError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn credentials(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::CredentialLoadError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn client_init(message: impl std::fmt::Display) -> Self {
        Self::ClientInitError {
            message: message.to_string(),
        }
    }

    pub fn service(service: &str, message: impl std::fmt::Display) -> Self {
        Self::ServiceCallError {
            service: service.to_string(),
            message: message.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::CredentialLoadError { .. } => ErrorCategory::Credentials,
            Self::ClientInitError { .. } => ErrorCategory::Client,
            Self::ServiceCallError { .. } => ErrorCategory::Service,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Set GEMINI_API_KEY and FIREBASE_SERVICE_ACCOUNT in the environment or in .env"
            }
            ErrorCategory::Credentials => {
                "Check that FIREBASE_SERVICE_ACCOUNT points to a service account JSON key file"
            }
            ErrorCategory::Client => "Check that GEMINI_API_KEY is a valid API key",
            ErrorCategory::Service => "Check network access, quotas and model availability",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ConfigError { message } => message.clone(),
            Self::CredentialLoadError { path, reason } => {
                format!("Could not load credentials from {}: {}", path, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BootError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            BootError::config("missing").category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            BootError::credentials("/a.json", "nope").category(),
            ErrorCategory::Credentials
        );
        assert_eq!(
            BootError::service("Gemini", "quota").category(),
            ErrorCategory::Service
        );
        assert_eq!(
            BootError::client_init("bad key").category(),
            ErrorCategory::Client
        );
    }

    #[test]
    fn test_credential_message_names_path() {
        let err = BootError::credentials("/missing/path.json", "No such file or directory");
        assert!(err.to_string().contains("/missing/path.json"));
        assert!(err.user_friendly_message().contains("No such file"));
    }
}
