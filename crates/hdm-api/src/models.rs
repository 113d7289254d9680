use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated account holder.
///
/// Field names follow the backend wire format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub nome: String,
    pub email: String,
    pub telefone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endereco: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aniversario: Option<NaiveDate>,
}

/// Reply from `POST /auth/login` and `POST /auth/google/callback`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub nome: String,
    pub telefone: String,
    pub email: String,
    pub endereco: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aniversario: Option<NaiveDate>,
    pub senha: String,
}

/// Pet as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pet {
    pub id: String,
    pub nome: String,
    pub raca: String,
    pub peso: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aniversario: Option<NaiveDate>,
    pub frequenta_creche: bool,
    pub adestrado: bool,
    pub castrado: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alimentacao: Option<String>,
    pub usuario_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /pets`.
#[derive(Debug, Clone, Serialize)]
pub struct PetRegisterRequest {
    pub nome: String,
    pub raca: String,
    pub peso: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aniversario: Option<NaiveDate>,
    pub frequenta_creche: bool,
    pub adestrado: bool,
    pub castrado: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alimentacao: Option<String>,
}

/// Kind of document attached to a pet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Vacina,
    Convenio,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vacina => "vacina",
            Self::Convenio => "convenio",
        }
    }
}

/// Stored pet document metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub pet_id: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub file_path: String,
    pub created_at: DateTime<Utc>,
}

/// JSON error envelope used by the backend on non-2xx replies.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
