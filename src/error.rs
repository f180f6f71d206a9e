use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::io;

/// Custom error type for gitlab_webhook_receiver operations
#[derive(Debug, thiserror::Error)]
pub enum ReceiverError {
    #[error("Unknown project '{project}'")]
    UnknownProject { project: String },

    #[error("No gitlab token in configuration of project '{project}'")]
    MissingTokenConfig { project: String },

    #[error("Invalid token for project '{project}'")]
    InvalidToken { project: String },

    #[error("Malformed webhook payload: {0}")]
    PayloadShape(String),

    #[error("Invalid substitution ${name} in command")]
    Substitution { name: String, available: Vec<String> },

    #[error("No command defined for project '{project}'")]
    EmptyCommand { project: String },

    #[error("Could not call command '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not split command of project '{project}': {source}")]
    CommandSplit {
        project: String,
        #[source]
        source: shell_words::ParseError,
    },

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ReceiverError {
    /// HTTP status reported to the webhook sender for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            ReceiverError::UnknownProject { .. } => StatusCode::NOT_FOUND,
            ReceiverError::InvalidToken { .. } => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ReceiverError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ReceiverError::Substitution { available, .. } => {
                format!("{}\nAvailable substitutions: {}\n", self, available.join(", "))
            }
            _ => format!("{}\n", self),
        };
        (status, body).into_response()
    }
}

/// Helper type for Results that use ReceiverError
pub type Result<T> = std::result::Result<T, ReceiverError>;
