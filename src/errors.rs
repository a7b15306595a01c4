use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error ({status}): {body}")]
    GitHub { status: u16, body: String },

    #[error("Recognizer error ({status}): {body}")]
    Recognizer { status: u16, body: String },

    #[error("Connector error ({status}): {body}")]
    Connector { status: u16, body: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error("Invalid GitHub login: {0}")]
    InvalidLogin(String),
}

pub type Result<T> = std::result::Result<T, BotError>;

impl IntoResponse for BotError {
    fn into_response(self) -> Response {
        let status = match self {
            BotError::Connector { .. } | BotError::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
