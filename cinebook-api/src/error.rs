use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cinebook_core::identity::AuthError;
use cinebook_core::BookingError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Validation(e) => AppError::ValidationError(e.to_string()),
            BookingError::MalformedRequest(msg) => AppError::ValidationError(msg),
            BookingError::NoActiveConfirmation => AppError::NotFoundError(err.to_string()),
            BookingError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Conflict => AppError::ConflictError(err.to_string()),
            AuthError::InvalidCredentials => AppError::AuthenticationError(err.to_string()),
            AuthError::Hashing(msg) => AppError::InternalServerError(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinebook_core::ValidationError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AppError::from(BookingError::from(ValidationError::MissingField("zip"))),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(BookingError::MalformedRequest("bad".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(BookingError::Internal("store down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AppError::from(AuthError::Conflict), StatusCode::CONFLICT),
            (
                AppError::from(AuthError::InvalidCredentials),
                StatusCode::UNAUTHORIZED,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
