use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

/// Error taxonomy for the JSON API surface. Every variant renders as the
/// `{success: false, message}` envelope with the matching status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("E-mail já cadastrado.")]
    DuplicateEmail,
    /// Unified for unknown email and wrong password so the response does not
    /// reveal which check failed.
    #[error("Credenciais inválidas.")]
    InvalidCredentials,
    #[error("Usuário não autenticado.")]
    NotAuthenticated,
    #[error("{0}")]
    NotFound(String),
    /// A store write that could not be applied; the list API reports these
    /// as a 400 with the store's message rather than a 500.
    #[error("{0}")]
    StoreFailure(String),
    #[error("Erro interno do servidor.")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) | ApiError::StoreFailure(_) => StatusCode::BAD_REQUEST,
            ApiError::DuplicateEmail => StatusCode::CONFLICT,
            ApiError::InvalidCredentials | ApiError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(source) => {
                // The source never reaches the client.
                error!(error = %source, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(serde_json::json!({
            "success": false,
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}
