use hdm_api::{ApiError, ErrorDetails};
use thiserror::Error;

/// Session-layer error types.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The system browser hand-off for the Google redirect failed before
    /// navigating.
    #[error("Login com Google está disponível apenas no navegador.")]
    BrowserUnavailable(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AuthError>;

impl AuthError {
    /// UI-facing details for this failure.
    pub fn details(&self, fallback_title: &str) -> ErrorDetails {
        match self {
            Self::Api(api) => hdm_api::format_error(api, fallback_title),
            Self::BrowserUnavailable(_) => ErrorDetails {
                title: fallback_title.to_string(),
                description: self.to_string(),
                status_code: None,
            },
        }
    }
}
