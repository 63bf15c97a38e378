use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use validator::ValidationErrors;

use crate::movies::MovieError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`MovieError`] for upstream failures and adds HTTP-specific variants.
/// Every variant renders as the JSON error envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Movie(#[from] MovieError),

    #[error("{0}")]
    Validation(String),

    #[error("Too many requests, please try again later.")]
    RateLimited { retry_after: u64 },

    #[error("Cannot {method} {path}")]
    RouteNotFound { method: String, path: String },

    #[error("{0}")]
    Internal(String),
}

/// Handler result alias
pub type AppResult<T> = Result<T, AppError>;

/// Classified error, attached to the response so the envelope middleware can
/// render it with the request path
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    pub status: StatusCode,
    pub code: &'static str,
    /// Message shown to the client
    pub message: String,
    /// Full error for the logs
    pub detail: String,
}

/// Error envelope returned for every failed request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
    pub error_code: &'static str,
    pub timestamp: String,
    pub path: String,
}

impl ErrorBody {
    pub fn new(details: &ErrorDetails, path: impl Into<String>) -> Self {
        Self {
            status_code: details.status.as_u16(),
            message: details.message.clone(),
            error_code: details.code,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            path: path.into(),
        }
    }
}

impl AppError {
    /// Status, error code and client-facing message
    pub fn classify(&self) -> ErrorDetails {
        let (status, code, message) = match self {
            Self::Movie(err) => match err {
                MovieError::NotFound(msg) => (StatusCode::NOT_FOUND, "MOVIE_NOT_FOUND", msg.clone()),
                MovieError::Upstream { status, message } => (
                    StatusCode::from_u16(*status)
                        .ok()
                        .filter(|s| s.is_client_error() || s.is_server_error())
                        .unwrap_or(StatusCode::BAD_GATEWAY),
                    "UPSTREAM_API_ERROR",
                    message.clone(),
                ),
                MovieError::Parse(_) => (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_API_ERROR",
                    "Upstream API returned an invalid response".to_string(),
                ),
                MovieError::Unavailable { message, timed_out } => (
                    if *timed_out {
                        StatusCode::GATEWAY_TIMEOUT
                    } else {
                        StatusCode::BAD_GATEWAY
                    },
                    "UPSTREAM_UNAVAILABLE",
                    message.clone(),
                ),
                MovieError::Cache(_) | MovieError::Config(_) => internal(),
            },
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            Self::RateLimited { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMIT_EXCEEDED",
                self.to_string(),
            ),
            Self::RouteNotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            Self::Internal(_) => internal(),
        };

        ErrorDetails {
            status,
            code,
            message,
            detail: self.to_string(),
        }
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_SERVER_ERROR",
        "Internal server error".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let details = self.classify();
        let body = ErrorBody::new(&details, "");

        let mut response = (details.status, Json(body)).into_response();

        if let Self::RateLimited { retry_after } = self {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_after));
        }

        response.extensions_mut().insert(details);
        response
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| format!("{field} is invalid"), ToString::to_string)
                })
            })
            .collect();
        messages.sort();

        Self::Validation(messages.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_and_code(err: AppError) -> (StatusCode, &'static str) {
        let details = err.classify();
        (details.status, details.code)
    }

    #[test]
    fn test_movie_error_mapping() {
        assert_eq!(
            status_and_code(MovieError::NotFound("Movie with ID 1 not found".into()).into()),
            (StatusCode::NOT_FOUND, "MOVIE_NOT_FOUND")
        );
        assert_eq!(
            status_and_code(
                MovieError::Upstream {
                    status: 401,
                    message: "Invalid API key".into()
                }
                .into()
            ),
            (StatusCode::UNAUTHORIZED, "UPSTREAM_API_ERROR")
        );
        assert_eq!(
            status_and_code(
                MovieError::Upstream {
                    status: 302,
                    message: "Found".into()
                }
                .into()
            ),
            (StatusCode::BAD_GATEWAY, "UPSTREAM_API_ERROR")
        );
        assert_eq!(
            status_and_code(MovieError::Parse("bad json".into()).into()),
            (StatusCode::BAD_GATEWAY, "UPSTREAM_API_ERROR")
        );
        assert_eq!(
            status_and_code(
                MovieError::Unavailable {
                    message: "Upstream request timed out".into(),
                    timed_out: true
                }
                .into()
            ),
            (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_UNAVAILABLE")
        );
        assert_eq!(
            status_and_code(
                MovieError::Unavailable {
                    message: "connection refused".into(),
                    timed_out: false
                }
                .into()
            ),
            (StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE")
        );
    }

    #[test]
    fn test_internal_errors_hide_detail() {
        let details = AppError::Movie(MovieError::Config("TMDB_API_KEY is required".into())).classify();

        assert_eq!(details.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(details.code, "INTERNAL_SERVER_ERROR");
        assert_eq!(details.message, "Internal server error");
        assert!(details.detail.contains("TMDB_API_KEY"));
    }

    #[test]
    fn test_rate_limited_response_has_retry_after() {
        let response = AppError::RateLimited { retry_after: 42 }.into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[RETRY_AFTER], "42");
        assert!(response.extensions().get::<ErrorDetails>().is_some());
    }

    #[test]
    fn test_envelope_shape() {
        let details = AppError::Validation("page must not be less than 1".into()).classify();
        let body = serde_json::to_value(ErrorBody::new(&details, "/api/movies/search?page=0")).unwrap();

        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["errorCode"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "page must not be less than 1");
        assert_eq!(body["path"], "/api/movies/search?page=0");
        assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    }
}
