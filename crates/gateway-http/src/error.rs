//! The fixed HTTP error envelope, unchanged from `entity.ErrorResponse`:
//! `{ "error": { "type", "code", "message" }, "requestId" }`, with the HTTP
//! status carried out of band.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid Action '{0}'")]
    InvalidAction(String),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("ack result for message '{0}' not found")]
    AckResultNotFound(String),

    #[error(transparent)]
    Broker(#[from] gateway_broker::Error),

    #[error(transparent)]
    Dispatch(#[from] gateway_dispatch::Error),

    #[error(transparent)]
    Store(#[from] gateway_store::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: &'static str,
    code: u16,
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
    #[serde(rename = "requestId")]
    request_id: String,
}

impl Error {
    fn status(&self) -> StatusCode {
        match self {
            Error::InvalidAction(_) | Error::MissingField(_) => StatusCode::BAD_REQUEST,
            Error::AckResultNotFound(_) => StatusCode::NOT_FOUND,
            Error::Broker(
                gateway_broker::Error::MissingField(_) | gateway_broker::Error::InvalidStreamSrn(_),
            ) => StatusCode::BAD_REQUEST,
            Error::Broker(_) | Error::Dispatch(_) | Error::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self.status() {
            StatusCode::BAD_REQUEST => "InvalidParameter",
            StatusCode::NOT_FOUND => "NotFound",
            StatusCode::FORBIDDEN => "AuthorizationError",
            _ => "InternalError",
        }
    }
}

/// Renders `error` into the fixed envelope, tagging it with `request_id` so
/// a client can correlate a failure with server-side logs.
pub fn into_response(error: Error, request_id: String) -> Response {
    let status = error.status();
    let body = ErrorResponse {
        error: ErrorBody {
            kind: error.kind(),
            code: status.as_u16(),
            message: error.to_string(),
        },
        request_id,
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_maps_to_400() {
        let err = Error::MissingField("topicName");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "InvalidParameter");
    }

    #[test]
    fn ack_result_not_found_maps_to_404() {
        let err = Error::AckResultNotFound("abc".to_string());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.kind(), "NotFound");
    }

    #[test]
    fn store_error_maps_to_500() {
        let err = Error::Store(gateway_store::Error::Connect {
            addr: "127.0.0.1:6379".to_string(),
            source: redis::RedisError::from(std::io::Error::other("boom")),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
