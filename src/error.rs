use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

/// Per-field detail attached to schema validation failures.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Central error taxonomy. Every handler returns `Result<_, AppError>` and
/// the `IntoResponse` impl below is the single place errors become HTTP.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Request doesn't match the schema")]
    Validation(Vec<FieldError>),

    #[error("{message}")]
    BadRequest {
        message: String,
        display_message: String,
    },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{message}")]
    NotFound {
        message: String,
        display_message: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn bad_request(message: &str, display_message: &str) -> Self {
        Self::BadRequest {
            message: message.into(),
            display_message: display_message.into(),
        }
    }

    pub fn not_found(message: &str, display_message: &str) -> Self {
        Self::NotFound {
            message: message.into(),
            display_message: display_message.into(),
        }
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: &str) -> Self {
        Self::Forbidden(message.into())
    }
}

/// True when a store write hit a UNIQUE constraint (Postgres 23505).
/// Uniqueness of user email and course slug is enforced at the store level
/// and surfaced to callers through this check.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message, display_message, errors) = match self {
            AppError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                "Validation Error",
                "Request doesn't match the schema".to_string(),
                "Dados da requisição inválidos.".to_string(),
                Some(fields),
            ),
            AppError::BadRequest {
                message,
                display_message,
            } => (
                StatusCode::BAD_REQUEST,
                "Bad Request",
                message,
                display_message,
                None,
            ),
            AppError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                message,
                "Sessão inválida ou expirada.".to_string(),
                None,
            ),
            AppError::Forbidden(message) => (
                StatusCode::FORBIDDEN,
                "Forbidden",
                message,
                "Você não tem permissão para este recurso.".to_string(),
                None,
            ),
            AppError::NotFound {
                message,
                display_message,
            } => (
                StatusCode::NOT_FOUND,
                "Not Found",
                message,
                display_message,
                None,
            ),
            AppError::Database(e) => {
                tracing::error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "Internal server error".to_string(),
                    "Erro interno do servidor.".to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "Internal server error".to_string(),
                    "Erro interno do servidor.".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": error,
            "message": message,
            "displayMessage": display_message,
            "statusCode": status.as_u16(),
        });
        if let Some(fields) = errors {
            body["errors"] = serde_json::to_value(fields).unwrap_or_default();
        }

        (status, Json(body)).into_response()
    }
}
