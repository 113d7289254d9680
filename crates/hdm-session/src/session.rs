use std::sync::{Arc, RwLock};

use hdm_api::{ApiClient, AuthResponse, RegisterRequest, User};
use tracing::{debug, instrument, warn};

use crate::errors::{AuthError, Result};

/// Authentication lifecycle of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No confirmed session.
    Unauthenticated,
    /// Startup hydration has not finished yet.
    Loading,
    /// A session confirmed against the backend (or just issued by it).
    Authenticated(User),
}

/// Orchestrates login, registration, logout, startup hydration and the
/// OAuth callback exchange.
///
/// Sole writer of the authenticated-user state; everything else reads
/// clones through the accessors. Steps within one flow run strictly in
/// sequence. Across flows the token is last-write-wins; the embedding UI is
/// expected to keep auth attempts serial.
#[derive(Debug, Clone)]
pub struct AuthSession {
    client: ApiClient,
    state: Arc<RwLock<SessionState>>,
}

impl AuthSession {
    /// New manager in the [`SessionState::Loading`] state. Call
    /// [`AuthSession::hydrate`] once at process start.
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(SessionState::Loading)),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn state(&self) -> SessionState {
        self.state
            .read()
            .map(|state| state.clone())
            .unwrap_or(SessionState::Unauthenticated)
    }

    pub fn user(&self) -> Option<User> {
        match self.state() {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state(), SessionState::Authenticated(_))
    }

    fn set_state(&self, next: SessionState) {
        if let Ok(mut state) = self.state.write() {
            *state = next;
        }
    }

    /// Persist the issued token, then flip to authenticated. The token is
    /// written through before the state changes so readers triggered by the
    /// transition already resolve it.
    async fn adopt_session(&self, response: AuthResponse) -> Result<User> {
        let AuthResponse { token, user } = response;
        self.client.store().set_token(&token, true).await?;
        self.set_state(SessionState::Authenticated(user.clone()));
        Ok(user)
    }

    /// Rebuild session state from durable storage at process start.
    ///
    /// A stored token the backend rejects is cleared locally and the session
    /// resets to unauthenticated; hydration never raises.
    #[instrument(skip(self))]
    pub async fn hydrate(&self) {
        let store = self.client.store();

        if store.token().await.is_none() {
            self.set_state(SessionState::Unauthenticated);
            return;
        }

        match self.client.current_user().await {
            Ok(user) => {
                debug!("Session restored for user {}", user.id);
                self.set_state(SessionState::Authenticated(user));
            }
            Err(e) => {
                warn!("Stored session rejected, clearing token: {}", e);
                if let Err(e) = store.clear_token().await {
                    warn!("Failed to clear stored token: {}", e);
                }
                self.set_state(SessionState::Unauthenticated);
            }
        }
    }

    /// Password login. On success the token is persisted and the session
    /// becomes authenticated; on failure the state is left untouched and the
    /// error propagates.
    #[instrument(skip(self, senha))]
    pub async fn login(&self, email: &str, senha: &str) -> Result<User> {
        let response = self
            .client
            .login(email, senha)
            .await
            .inspect_err(|e| warn!("Login failed: {}", e))?;

        self.adopt_session(response).await
    }

    /// Create an account. Registration does not log the user in; the
    /// session state is left untouched and the caller routes to the login
    /// flow afterwards.
    #[instrument(skip(self, data))]
    pub async fn register(&self, data: &RegisterRequest) -> Result<()> {
        self.client
            .register(data)
            .await
            .inspect_err(|e| warn!("Registration failed: {}", e))?;
        Ok(())
    }

    /// Hand the user off to the Google OAuth flow in the system browser.
    ///
    /// Fails before navigating when the target URL does not resolve or no
    /// browser hand-off is available.
    #[instrument(skip(self))]
    pub fn login_with_google(&self) -> Result<()> {
        let target = url::Url::parse(&self.client.google_login_url())
            .map_err(hdm_api::ApiError::from)
            .inspect_err(|e| warn!("Google login target rejected: {}", e))?;

        open::that(target.as_str()).map_err(AuthError::BrowserUnavailable)?;
        Ok(())
    }

    /// Redeem the one-time code carried back by the provider redirect.
    /// Mirrors [`AuthSession::login`] on success.
    #[instrument(skip(self, code))]
    pub async fn handle_google_callback(&self, code: &str) -> Result<User> {
        let response = self
            .client
            .google_callback(code)
            .await
            .inspect_err(|e| warn!("Callback exchange failed: {}", e))?;

        self.adopt_session(response).await
    }

    /// End the session. Always a local success: durable-clear failures are
    /// logged, never raised, and the state resets regardless.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Err(e) = self.client.store().clear_token().await {
            warn!("Failed to clear durable token on logout: {}", e);
        }
        self.set_state(SessionState::Unauthenticated);
    }
}
