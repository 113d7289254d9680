use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use hdm_api::User;
use tracing::{instrument, warn};
use url::Url;

use crate::session::AuthSession;

/// Delay before the automatic redirect to the login route on failure.
pub const LOGIN_REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// Where the UI lands after a callback outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    PetRegister,
}

/// Notification the presentation layer shows for a callback outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

impl Notice {
    fn new(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
        }
    }
}

/// Result of processing one redirect landing.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackOutcome {
    /// Exchange succeeded; show the welcome notice and navigate to
    /// [`Route::PetRegister`] right away.
    Completed { user: User, notice: Notice },
    /// Callback failed; show the notice and redirect to [`Route::Login`]
    /// after [`LOGIN_REDIRECT_DELAY`].
    Failed { notice: Notice },
    /// A previous invocation already consumed the one-time code.
    AlreadyHandled,
}

impl CallbackOutcome {
    /// Route the UI navigates to, with the delay to apply first.
    pub fn destination(&self) -> Option<(Route, Option<Duration>)> {
        match self {
            Self::Completed { .. } => Some((Route::PetRegister, None)),
            Self::Failed { .. } => Some((Route::Login, Some(LOGIN_REDIRECT_DELAY))),
            Self::AlreadyHandled => None,
        }
    }
}

/// Query parameters carried back by the provider redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

impl CallbackParams {
    /// Extract `code` and `error` from the redirect URL.
    ///
    /// A URL that does not parse yields empty params, which downstream is
    /// the missing-code failure; this never raises.
    pub fn from_redirect_url(redirect_url: &str) -> Self {
        let Ok(url) = Url::parse(redirect_url) else {
            warn!("Malformed redirect URL");
            return Self::default();
        };

        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => params.code = Some(value.into_owned()),
                "error" => params.error = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }
}

/// One-shot processor for the OAuth redirect landing.
///
/// The exchange code is single-use, so the handler keeps an explicit
/// processed flag: a re-invocation (a re-rendered landing page, a duplicate
/// navigation event) performs no second exchange.
#[derive(Debug)]
pub struct CallbackHandler {
    session: AuthSession,
    processed: AtomicBool,
}

impl CallbackHandler {
    pub fn new(session: AuthSession) -> Self {
        Self {
            session,
            processed: AtomicBool::new(false),
        }
    }

    /// Process a redirect landing given the full redirect URL.
    #[instrument(skip(self, redirect_url))]
    pub async fn process_redirect(&self, redirect_url: &str) -> CallbackOutcome {
        self.process(CallbackParams::from_redirect_url(redirect_url))
            .await
    }

    /// Process already-extracted redirect parameters.
    pub async fn process(&self, params: CallbackParams) -> CallbackOutcome {
        if self.processed.swap(true, Ordering::SeqCst) {
            return CallbackOutcome::AlreadyHandled;
        }

        if params.error.is_some() {
            return CallbackOutcome::Failed {
                notice: Notice::new(
                    "Erro na autenticação",
                    "A autenticação com Google foi cancelada ou falhou.",
                ),
            };
        }

        let Some(code) = params.code else {
            return CallbackOutcome::Failed {
                notice: Notice::new("Erro", "Código de autenticação não encontrado."),
            };
        };

        match self.session.handle_google_callback(&code).await {
            Ok(user) => {
                let description = if user.nome.is_empty() {
                    "Bem-vindo!".to_string()
                } else {
                    format!("Bem-vindo, {}!", user.nome)
                };
                CallbackOutcome::Completed {
                    user,
                    notice: Notice::new("Login realizado!", description),
                }
            }
            Err(e) => {
                let details = e.details("Erro ao fazer login");
                CallbackOutcome::Failed {
                    notice: Notice {
                        title: details.title,
                        description: details.description,
                    },
                }
            }
        }
    }
}
