use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::validator::SubmitProofError;

/// Failure of an HTTP request, rendered as a JSON string body.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),

    #[error("{0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_string())).into_response()
    }
}

impl From<SubmitProofError> for ApiError {
    fn from(error: SubmitProofError) -> Self {
        let message = error.to_string();
        match error {
            SubmitProofError::NotProveTime => {
                Self::BadRequest("Failure to submit proof within the proof time".to_string())
            }
            SubmitProofError::InvalidProof => Self::BadRequest(message),
            SubmitProofError::QueueFull => Self::ServiceUnavailable(message),
            SubmitProofError::EngineStopped => Self::Internal(message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_errors_map_to_status_codes() {
        let cases = [
            (SubmitProofError::NotProveTime, StatusCode::BAD_REQUEST),
            (SubmitProofError::InvalidProof, StatusCode::BAD_REQUEST),
            (SubmitProofError::QueueFull, StatusCode::SERVICE_UNAVAILABLE),
            (
                SubmitProofError::EngineStopped,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
    }
}
