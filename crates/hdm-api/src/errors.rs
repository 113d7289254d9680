use reqwest::StatusCode;
use thiserror::Error;

/// Request-layer error types.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-2xx reply. The message comes from the JSON body's `message`
    /// field when the backend sends one, otherwise from the status text.
    #[error("{message}")]
    Http {
        status: StatusCode,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Success reply missing a payload the operation requires.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// HTTP status of the failed reply, when there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Description shown when a failure carries no user-readable message.
pub const GENERIC_ERROR_MESSAGE: &str = "Ocorreu um erro inesperado. Tente novamente.";

/// User-facing presentation of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    pub title: String,
    pub description: String,
    pub status_code: Option<u16>,
}

/// Convert an error into the details the presentation layer displays.
///
/// The title is classified by status code; the description is the extracted
/// backend message for HTTP errors and a generic sentence for everything
/// below the HTTP layer.
pub fn format_error(error: &ApiError, fallback_title: &str) -> ErrorDetails {
    let status_code = error.status().map(|status| status.as_u16());

    let title = match status_code {
        Some(401 | 403) => "Acesso negado",
        Some(404) => "Não encontrado",
        Some(code) if code >= 500 => "Erro no servidor",
        _ => fallback_title,
    };

    let description = match error {
        ApiError::Http { message, .. } => message.clone(),
        _ => GENERIC_ERROR_MESSAGE.to_string(),
    };

    ErrorDetails {
        title: title.to_string(),
        description,
        status_code,
    }
}
