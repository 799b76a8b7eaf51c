// Adapters layer: concrete clients for the external services.

pub mod credentials;
pub mod firestore;
pub mod gemini;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiErrorBody {
    Google { error: ApiErrorDetail },
    OAuth {
        error: String,
        error_description: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Short reason from a Google API or OAuth error body, falling back to the raw body.
pub(crate) fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody::Google { error }) => error.message,
        Ok(ApiErrorBody::OAuth {
            error,
            error_description: Some(description),
        }) => format!("{}: {}", error, description),
        Ok(ApiErrorBody::OAuth { error, .. }) => error,
        Err(_) => body.trim().to_string(),
    }
}
