use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::core::TabconvError;

use super::types::ErrorResponse;

/// API-specific errors with HTTP status code mapping.
#[derive(Debug)]
pub enum ApiError {
    Conversion(TabconvError),
    Multipart(StatusCode, String),
    InvalidRequest(String),
    Internal(String),
}

impl From<TabconvError> for ApiError {
    fn from(err: TabconvError) -> Self {
        ApiError::Conversion(err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart(err.status(), err.body_text())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl ApiError {
    fn parts(self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Conversion(err) => {
                let (status, code) = match &err {
                    TabconvError::MalformedRow { .. } => (StatusCode::BAD_REQUEST, "MALFORMED_ROW"),
                    TabconvError::MalformedJson(_) => (StatusCode::BAD_REQUEST, "MALFORMED_JSON"),
                    TabconvError::CsvError(_) => (StatusCode::BAD_REQUEST, "MALFORMED_CSV"),
                    TabconvError::InvalidMode(_) => (StatusCode::BAD_REQUEST, "INVALID_MODE"),
                    TabconvError::FileNotFound(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "FILE_NOT_FOUND")
                    }
                    TabconvError::IoError(_) | TabconvError::ConfigParsingError(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                    }
                };
                (status, code, err.to_string())
            }
            ApiError::Multipart(status, msg) => {
                let code = match status {
                    StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
                    _ => "INVALID_REQUEST",
                };
                (status, code, format!("invalid multipart body: {msg}"))
            }
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        log::error!("conversion request failed ({code}): {message}");

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
