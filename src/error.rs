use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug)]
pub enum AppError {
    /// The service has no such resource.
    NotFound(String),
    /// Transport failure or unexpected status from the data service.
    Network(String),
    Parse(String),
    /// A resource URL without a trailing numeric id.
    MalformedReference(String),
    InvalidQuery,
    Config(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound(what) => write!(f, "\"{}\" not found", what),
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Parse(msg) => write!(f, "Parse error: {}", msg),
            AppError::MalformedReference(url) => {
                write!(f, "Resource reference has no numeric id: {}", url)
            }
            AppError::InvalidQuery => write!(f, "Search query is empty"),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Parse(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidQuery => StatusCode::BAD_REQUEST,
            _ => StatusCode::BAD_GATEWAY,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::NotFound("missingno".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InvalidQuery.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Network("timed out".into()).into_response().status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_not_found_message_names_resource() {
        let err = AppError::NotFound("missingno".to_string());
        assert_eq!(err.to_string(), "\"missingno\" not found");

        let err = AppError::NotFound("pokemon list".to_string());
        assert!(!err.to_string().contains("Pokémon"));
    }
}
