use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{service}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E2xxx: Profile errors
/// - E3xxx: Matching errors
/// - E4xxx: Chat errors
/// - E5xxx: Notification errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    NotFound,
    Unauthorized,
    Forbidden,
    ServiceUnavailable,
    BadRequest,

    // Profile (E2xxx)
    ProfileNotFound,
    ProfileDeleted,
    OnboardingIncomplete,
    ProfileNotVerified,
    ProfileBanned,
    AlreadyVerified,

    // Matching (E3xxx)
    MatchNotFound,
    NotMatchMember,
    InvalidCronSecret,
    InvalidStatusTransition,
    MatchingRunFailed,

    // Chat (E4xxx)
    RoomNotFound,
    NotRoomMember,
    MessageNotFound,
    NotMessageSender,
    EmptyMessage,

    // Notification (E5xxx)
    NotificationNotFound,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::NotFound => "E0003",
            Self::Unauthorized => "E0004",
            Self::Forbidden => "E0005",
            Self::ServiceUnavailable => "E0006",
            Self::BadRequest => "E0007",

            // Profile
            Self::ProfileNotFound => "E2001",
            Self::ProfileDeleted => "E2002",
            Self::OnboardingIncomplete => "E2003",
            Self::ProfileNotVerified => "E2004",
            Self::ProfileBanned => "E2005",
            Self::AlreadyVerified => "E2006",

            // Matching
            Self::MatchNotFound => "E3001",
            Self::NotMatchMember => "E3002",
            Self::InvalidCronSecret => "E3003",
            Self::InvalidStatusTransition => "E3004",
            Self::MatchingRunFailed => "E3005",

            // Chat
            Self::RoomNotFound => "E4001",
            Self::NotRoomMember => "E4002",
            Self::MessageNotFound => "E4003",
            Self::NotMessageSender => "E4004",
            Self::EmptyMessage => "E4005",

            // Notification
            Self::NotificationNotFound => "E5001",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError | Self::ServiceUnavailable | Self::MatchingRunFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::ValidationError | Self::BadRequest | Self::EmptyMessage
            | Self::InvalidStatusTransition => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::ProfileNotFound | Self::MatchNotFound
            | Self::RoomNotFound | Self::MessageNotFound | Self::NotificationNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::Unauthorized | Self::InvalidCronSecret => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::ProfileDeleted | Self::OnboardingIncomplete
            | Self::ProfileNotVerified | Self::ProfileBanned | Self::NotMatchMember
            | Self::NotRoomMember | Self::NotMessageSender => StatusCode::FORBIDDEN,
            Self::AlreadyVerified => StatusCode::CONFLICT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Known { code, message, details } => {
                let status = code.status_code();
                let mut resp = ApiErrorResponse::new(code.code(), message);
                if let Some(d) = details {
                    resp = resp.with_details(d.clone());
                }
                (status, resp)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::new("E0001", "internal server error"),
                )
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                match err {
                    diesel::result::Error::NotFound => (
                        StatusCode::NOT_FOUND,
                        ApiErrorResponse::new("E0003", "resource not found"),
                    ),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiErrorResponse::new("E0001", "database error"),
                    ),
                }
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorResponse::new("E0002", msg),
            ),
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_unique() {
        let codes = [
            ErrorCode::InternalError,
            ErrorCode::ValidationError,
            ErrorCode::NotFound,
            ErrorCode::Unauthorized,
            ErrorCode::Forbidden,
            ErrorCode::ServiceUnavailable,
            ErrorCode::BadRequest,
            ErrorCode::ProfileNotFound,
            ErrorCode::ProfileDeleted,
            ErrorCode::OnboardingIncomplete,
            ErrorCode::ProfileNotVerified,
            ErrorCode::ProfileBanned,
            ErrorCode::AlreadyVerified,
            ErrorCode::MatchNotFound,
            ErrorCode::NotMatchMember,
            ErrorCode::InvalidCronSecret,
            ErrorCode::InvalidStatusTransition,
            ErrorCode::MatchingRunFailed,
            ErrorCode::RoomNotFound,
            ErrorCode::NotRoomMember,
            ErrorCode::MessageNotFound,
            ErrorCode::NotMessageSender,
            ErrorCode::EmptyMessage,
            ErrorCode::NotificationNotFound,
        ];
        let mut seen = std::collections::HashSet::new();
        for c in codes {
            assert!(seen.insert(c.code()), "duplicate code {}", c.code());
        }
    }

    #[test]
    fn cron_secret_maps_to_unauthorized() {
        assert_eq!(
            ErrorCode::InvalidCronSecret.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn matching_run_failure_is_server_error() {
        assert_eq!(
            ErrorCode::MatchingRunFailed.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
