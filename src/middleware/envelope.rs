use axum::{
    Json,
    extract::Request,
    http::header::CONTENT_LENGTH,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::error::{AppError, ErrorBody, ErrorDetails};

/// Render error responses with the request path and log them.
///
/// Server errors are logged at `error` with the full detail, client errors at
/// `warn`.
pub async fn error_envelope(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_string(), |pq| pq.as_str().to_string());

    let response = next.run(request).await;
    let Some(details) = response.extensions().get::<ErrorDetails>().cloned() else {
        return response;
    };

    if details.status.is_server_error() {
        error!(%method, %path, status = details.status.as_u16(), "{}", details.detail);
    } else {
        warn!(%method, %path, status = details.status.as_u16(), "{}", details.message);
    }

    let (mut parts, _) = response.into_parts();
    parts.extensions.remove::<ErrorDetails>();
    parts.headers.remove(CONTENT_LENGTH);

    let (rendered, body) = Json(ErrorBody::new(&details, path))
        .into_response()
        .into_parts();
    parts.headers.extend(rendered.headers);

    Response::from_parts(parts, body)
}

/// Fallback for unmatched routes
pub async fn not_found(request: Request) -> AppError {
    AppError::RouteNotFound {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
    }
}
