use reqwest::{Client, Response, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::errors::{ApiError, Result};
use crate::models::{
    AuthResponse, Document, DocumentKind, ErrorBody, Pet, PetRegisterRequest, RegisterRequest,
    User,
};
use crate::store::SessionStore;

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    senha: &'a str,
}

#[derive(Serialize)]
struct CallbackBody<'a> {
    code: &'a str,
}

/// HTTP client for the hosteldamel backend.
///
/// Wraps every outbound call: resolves the bearer token through the session
/// store, normalizes empty and non-JSON success replies into a fallback
/// outcome, and converts non-2xx statuses into typed errors. The client only
/// reads the store; session mutations belong to the session manager.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ClientConfig,
    store: SessionStore,
    http: Client,
}

impl ApiClient {
    /// Create a new client over the resolved configuration.
    pub fn new(config: ClientConfig, store: SessionStore) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(config.timeouts.connect)
            .timeout(config.timeouts.request)
            .user_agent(config.user_agent.as_deref().unwrap_or("hdm-client"))
            .build()?;

        Ok(Self {
            config,
            store,
            http,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    /// Read-only handle to the token store this client resolves bearers from.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Attach the bearer (when one is stored) and send.
    ///
    /// Transport failures propagate unchanged to the caller after being
    /// logged.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<Response> {
        let builder = match self.store.token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        builder.send().await.map_err(|e| {
            warn!("Request could not reach the backend: {}", e);
            ApiError::from(e)
        })
    }

    /// Normalize a reply into `Some(payload)`, `None` (empty or non-JSON
    /// success body), or a typed HTTP error.
    async fn read_body<R: DeserializeOwned>(response: Response) -> Result<Option<R>> {
        let status = response.status();

        if !status.is_success() {
            return Err(Self::error_from_response(status, response).await);
        }

        if status == StatusCode::NO_CONTENT
            || status == StatusCode::RESET_CONTENT
            || response.content_length() == Some(0)
        {
            return Ok(None);
        }

        let is_json = Self::is_json(&response);
        let raw = response.text().await?;

        if raw.is_empty() || !is_json {
            return Ok(None);
        }

        match serde_json::from_str(&raw) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) => {
                // A malformed success body must not crash the caller.
                warn!("Could not parse JSON success body: {}", e);
                Ok(None)
            }
        }
    }

    /// Extract the backend's message from a failed reply, falling back to
    /// the status text.
    async fn error_from_response(status: StatusCode, response: Response) -> ApiError {
        let fallback = format!(
            "Erro na requisição: {}",
            status.canonical_reason().unwrap_or(status.as_str())
        );

        let message = if Self::is_json(&response) {
            match response.json::<ErrorBody>().await {
                Ok(body) if !body.message.is_empty() => body.message,
                Ok(_) => fallback,
                Err(e) => {
                    warn!("Could not read error body: {}", e);
                    fallback
                }
            }
        } else {
            fallback
        };

        ApiError::Http { status, message }
    }

    fn is_json(response: &Response) -> bool {
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|content_type| content_type.contains("application/json"))
    }

    async fn get_json<R: DeserializeOwned>(&self, endpoint: &str) -> Result<Option<R>> {
        let url = format!("{}{}", self.config.api_url, endpoint);
        debug!("GET {}", url);

        let builder = self
            .http
            .get(&url)
            .header(header::CONTENT_TYPE, "application/json");

        let response = self.send(builder).await?;
        Self::read_body(response).await
    }

    async fn post_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<Option<R>> {
        let url = format!("{}{}", self.config.api_url, endpoint);
        debug!("POST {}", url);

        let builder = self
            .http
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(body);

        let response = self.send(builder).await?;
        Self::read_body(response).await
    }

    /// Create an account. The backend replies with no content.
    #[instrument(skip(self, data))]
    pub async fn register(&self, data: &RegisterRequest) -> Result<()> {
        self.post_json::<_, serde_json::Value>("/auth/register", data)
            .await?;
        Ok(())
    }

    /// Password login, returning the issued token and user.
    #[instrument(skip(self, senha))]
    pub async fn login(&self, email: &str, senha: &str) -> Result<AuthResponse> {
        self.post_json("/auth/login", &LoginBody { email, senha })
            .await?
            .ok_or_else(|| {
                ApiError::InvalidResponse("Login reply missing the token payload".to_string())
            })
    }

    /// Fetch the user the stored bearer belongs to.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<User> {
        self.get_json("/auth/me").await?.ok_or_else(|| {
            ApiError::InvalidResponse("Current-user reply carried no body".to_string())
        })
    }

    /// Navigation target of the Google OAuth redirect flow.
    pub fn google_login_url(&self) -> String {
        format!("{}/auth/google", self.config.api_url)
    }

    /// Redeem the one-time code the provider redirect carried back.
    #[instrument(skip(self, code))]
    pub async fn google_callback(&self, code: &str) -> Result<AuthResponse> {
        self.post_json("/auth/google/callback", &CallbackBody { code })
            .await?
            .ok_or_else(|| {
                ApiError::InvalidResponse("Callback reply missing the token payload".to_string())
            })
    }

    /// Register a pet for the authenticated user.
    #[instrument(skip(self, data))]
    pub async fn register_pet(&self, data: &PetRegisterRequest) -> Result<Pet> {
        self.post_json("/pets", data).await?.ok_or_else(|| {
            ApiError::InvalidResponse("Pet registration reply missing the created pet".to_string())
        })
    }

    /// List the authenticated user's pets.
    #[instrument(skip(self))]
    pub async fn pets(&self) -> Result<Vec<Pet>> {
        Ok(self.get_json("/pets").await?.unwrap_or_default())
    }

    /// Upload a pet document as multipart form data.
    ///
    /// The reply shape is backend-defined, so the parsed document is
    /// optional.
    #[instrument(skip(self, bytes))]
    pub async fn upload_document(
        &self,
        pet_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
        kind: DocumentKind,
    ) -> Result<Option<Document>> {
        let url = format!("{}/pets/{}/documents", self.config.api_url, pet_id);
        debug!("POST {} (multipart)", url);

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("type", kind.as_str());

        let response = self.send(self.http.post(&url).multipart(form)).await?;
        Self::read_body(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn user_json() -> serde_json::Value {
        serde_json::json!({
            "id": "u1",
            "nome": "Maria",
            "email": "maria@example.com",
            "telefone": "11999990000"
        })
    }

    async fn client_for(server: &MockServer) -> (ApiClient, SessionStore) {
        let store = SessionStore::in_memory();
        let client =
            ApiClient::new(ClientConfig::with_api_url(server.uri()), store.clone()).unwrap();
        (client, store)
    }

    #[tokio::test]
    async fn login_parses_token_and_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_string_contains("maria@example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": "abc",
                "user": user_json(),
            })))
            .mount(&server)
            .await;

        let (client, _) = client_for(&server).await;
        let response = client.login("maria@example.com", "pw").await.unwrap();

        assert_eq!(response.token, "abc");
        assert_eq!(response.user.nome, "Maria");
    }

    #[tokio::test]
    async fn error_message_extracted_from_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(serde_json::json!({ "message": "email já cadastrado" })),
            )
            .mount(&server)
            .await;

        let (client, _) = client_for(&server).await;
        let data = RegisterRequest {
            nome: "Maria".to_string(),
            telefone: "11999990000".to_string(),
            email: "maria@example.com".to_string(),
            endereco: "Rua A, 1".to_string(),
            aniversario: None,
            senha: "pw".to_string(),
        };

        let error = client.register(&data).await.unwrap_err();
        assert_eq!(error.to_string(), "email já cadastrado");
        assert_eq!(error.status().map(|s| s.as_u16()), Some(422));
    }

    #[tokio::test]
    async fn non_json_error_falls_back_to_status_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let (client, _) = client_for(&server).await;
        let error = client.current_user().await.unwrap_err();

        assert!(error.to_string().contains("Internal Server Error"));
        assert_eq!(error.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn register_with_204_resolves_without_a_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let (client, _) = client_for(&server).await;
        let data = RegisterRequest {
            nome: "Maria".to_string(),
            telefone: "11999990000".to_string(),
            email: "maria@example.com".to_string(),
            endereco: "Rua A, 1".to_string(),
            aniversario: None,
            senha: "pw".to_string(),
        };

        client.register(&data).await.unwrap();
    }

    #[tokio::test]
    async fn bearer_attached_when_a_token_is_stored() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .and(header("Authorization", "Bearer stored-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
            .mount(&server)
            .await;

        let (client, store) = client_for(&server).await;
        store.set_token("stored-token", true).await.unwrap();

        let user = client.current_user().await.unwrap();
        assert_eq!(user.id, "u1");
    }

    #[tokio::test]
    async fn no_authorization_header_without_a_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let (client, _) = client_for(&server).await;
        client.pets().await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn malformed_json_success_body_is_the_fallback_case() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pets"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("{not json", "application/json"),
            )
            .mount(&server)
            .await;

        let (client, _) = client_for(&server).await;
        assert_eq!(client.pets().await.unwrap(), vec![]);
    }

    #[tokio::test]
    async fn non_json_success_body_is_the_fallback_case() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pets"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("ok", "text/plain"))
            .mount(&server)
            .await;

        let (client, _) = client_for(&server).await;
        assert_eq!(client.pets().await.unwrap(), vec![]);
    }

    #[tokio::test]
    async fn required_payload_missing_is_an_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let (client, _) = client_for(&server).await;
        let error = client.login("a@b.com", "pw").await.unwrap_err();
        assert!(matches!(error, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn pet_registration_returns_the_created_pet() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pets"))
            .and(header("Authorization", "Bearer t"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "p1",
                "nome": "Rex",
                "raca": "vira-lata",
                "peso": 12.5,
                "frequenta_creche": true,
                "adestrado": false,
                "castrado": true,
                "usuario_id": "u1",
                "created_at": "2024-05-01T12:00:00Z",
                "updated_at": "2024-05-01T12:00:00Z"
            })))
            .mount(&server)
            .await;

        let (client, store) = client_for(&server).await;
        store.set_token("t", true).await.unwrap();

        let data = PetRegisterRequest {
            nome: "Rex".to_string(),
            raca: "vira-lata".to_string(),
            peso: 12.5,
            aniversario: None,
            frequenta_creche: true,
            adestrado: false,
            castrado: true,
            alimentacao: None,
        };

        let pet = client.register_pet(&data).await.unwrap();
        assert_eq!(pet.id, "p1");
        assert_eq!(pet.nome, "Rex");
    }

    #[tokio::test]
    async fn document_upload_sends_bearer_and_type_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pets/p1/documents"))
            .and(header("Authorization", "Bearer t"))
            .and(body_string_contains("name=\"type\""))
            .and(body_string_contains("vacina"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let (client, store) = client_for(&server).await;
        store.set_token("t", true).await.unwrap();

        let uploaded = client
            .upload_document("p1", "carteira.pdf", b"pdf-bytes".to_vec(), DocumentKind::Vacina)
            .await
            .unwrap();
        assert!(uploaded.is_none());
    }

    #[tokio::test]
    async fn google_callback_mirrors_login() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/google/callback"))
            .and(body_string_contains("one-time-code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": "gtk",
                "user": user_json(),
            })))
            .mount(&server)
            .await;

        let (client, _) = client_for(&server).await;
        let response = client.google_callback("one-time-code").await.unwrap();
        assert_eq!(response.token, "gtk");
    }

    #[test]
    fn google_login_url_is_rooted_at_the_base_url() {
        let store = SessionStore::in_memory();
        let client = ApiClient::new(
            ClientConfig::with_api_url("https://api.hosteldamel.com"),
            store,
        )
        .unwrap();

        assert_eq!(
            client.google_login_url(),
            "https://api.hosteldamel.com/auth/google"
        );
    }
}
