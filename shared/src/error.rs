use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    #[error("failed to run the transaction")]
    TransactionError(#[source] sqlx::Error),
    #[error("database query failed")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("{0}")]
    NoRowsAffectedError(String),
    #[error("failed to hash the password")]
    HashPasswordError(#[source] bcrypt::BcryptError),
    #[error("failed to verify the password")]
    VerifyPasswordError(#[source] bcrypt::BcryptError),
    #[error("key value store operation failed")]
    KeyValueStoreError(#[from] redis::RedisError),
    #[error("failed to upload the image")]
    ImageUploadError(#[source] reqwest::Error),
    #[error("{0}")]
    ConvertToUuidError(#[from] uuid::Error),
    #[error("Unauthorized")]
    UnauthenticatedError,
    #[error("Not authorized to perform this operation")]
    ForbiddenOperation,
    #[error("This action requires a full account")]
    GuestAccountForbidden,
    #[error("{0}")]
    ConversionEntityError(String),
}

// Bodies that fail to deserialize come back as 400 in the common
// message shape, not as axum's plain-text rejection.
impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        match value {
            JsonRejection::JsonDataError(_) => {
                Self::UnprocessableEntity("All fields are required".into())
            }
            other => Self::UnprocessableEntity(other.body_text()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = match self {
            AppError::UnprocessableEntity(_)
            | AppError::ValidationError(_)
            | AppError::ConvertToUuidError(_) => StatusCode::BAD_REQUEST,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnauthenticatedError => StatusCode::UNAUTHORIZED,
            AppError::ForbiddenOperation | AppError::GuestAccountForbidden => {
                StatusCode::FORBIDDEN
            }
            ref e => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Unexpected error happened"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        // Clients only ever see a status and a plain message, never the cause chain.
        (status_code, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_client_statuses() {
        let cases: Vec<(AppError, StatusCode)> = vec![
            (
                AppError::UnprocessableEntity("full".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::EntityNotFound("missing".into()),
                StatusCode::NOT_FOUND,
            ),
            (AppError::UnauthenticatedError, StatusCode::UNAUTHORIZED),
            (AppError::ForbiddenOperation, StatusCode::FORBIDDEN),
            (AppError::GuestAccountForbidden, StatusCode::FORBIDDEN),
            (
                AppError::NoRowsAffectedError("nothing deleted".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
