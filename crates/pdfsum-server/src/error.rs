//! Error responses for the pdfsum server.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use pdfsum_core::{ErrorKind, ErrorResponse, PdfsumError};

/// Server error types.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The request body could not be read as JSON.
    #[error("Invalid request: {message}")]
    InvalidRequest { status: StatusCode, message: String },

    /// A pipeline stage failed.
    #[error(transparent)]
    Pipeline(#[from] PdfsumError),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::InvalidRequest { status, .. } => *status,
            ServerError::Pipeline(err) => match err.kind() {
                ErrorKind::Input => StatusCode::BAD_REQUEST,
                ErrorKind::Extraction => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::Upstream => StatusCode::BAD_GATEWAY,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        // A body that parses badly or has the wrong shape is bad input. 422
        // stays reserved for PDFs that cannot be read.
        let status = match &rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                StatusCode::BAD_REQUEST
            }
            other => other.status(),
        };

        ServerError::InvalidRequest {
            status,
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfsum_core::{InputError, PdfError, UpstreamError};

    #[test]
    fn test_status_mapping() {
        let status = |e: PdfsumError| ServerError::from(e).status();

        assert_eq!(status(InputError::MissingPayload.into()), StatusCode::BAD_REQUEST);
        assert_eq!(status(PdfError::NoPages.into()), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            status(UpstreamError::Transport("timeout".into()).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(PdfsumError::Server {
                status: 500,
                message: "bad".into()
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let rejected = ServerError::InvalidRequest {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "length limit exceeded".into(),
        };
        assert_eq!(rejected.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_missing_payload_message_is_verbatim() {
        let err = ServerError::from(PdfsumError::from(InputError::MissingPayload));
        assert_eq!(err.to_string(), "No PDF data provided");
    }
}
