//! Unified error handling.
//!
//! Provides a unified `AppError` type mapped to the `{ok:false, message}` JSON
//! envelope at the route boundary. All route handlers should return
//! `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::StoreError;
use crate::services::auth::AuthError;

/// Generic message for failures whose details must not reach the client.
const SERVER_ERROR_MESSAGE: &str = "Lỗi máy chủ";

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session layer failure.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// User is not authenticated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Server-side failures are logged; their details stay out of the body.
        if matches!(
            self,
            Self::Store(_) | Self::Session(_) | Self::Auth(AuthError::Store(_) | AuthError::PasswordHash)
        ) {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            Self::Store(_) | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::EmailTaken => StatusCode::CONFLICT,
                AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::PasswordHash | AuthError::Store(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        let message = match self {
            Self::Store(_) | Self::Session(_) => SERVER_ERROR_MESSAGE.to_owned(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Email hoặc mật khẩu không đúng".to_owned(),
                AuthError::EmailTaken => "Email đã được đăng ký".to_owned(),
                AuthError::InvalidEmail(_) => "Email không hợp lệ".to_owned(),
                AuthError::PasswordHash | AuthError::Store(_) => SERVER_ERROR_MESSAGE.to_owned(),
            },
            Self::Unauthorized(message) | Self::BadRequest(message) => message,
        };

        (status, Json(json!({ "ok": false, "message": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(AppError::BadRequest("thiếu".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Unauthorized("chưa đăng nhập".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::EmailTaken)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Store(crate::db::StoreError::Conflict(
                "x".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_messages_pass_through() {
        let response = AppError::BadRequest("Giỏ hàng đang trống".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_errors_hide_details() {
        let err = AppError::Store(crate::db::StoreError::Conflict(
            "internal detail".to_string(),
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
