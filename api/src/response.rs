use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use facility_service::{ErrorKind, FacilityError};
use serde::Serialize;
use tracing::{debug, error};

use crate::StatusPolicy;

/// Successful response body: `{"success": true, "method": ..., <data fields>}`.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<&'static str>,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn ok(method: Option<&'static str>, data: T) -> Self {
        Self {
            success: true,
            method,
            data,
        }
    }
}

/// Data of a delete response; the envelope carries everything.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Deleted {}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub method: &'static str,
    pub message: String,
}

/// A failed request, rendered as an [`ErrorBody`] with the status chosen by
/// the configured [`StatusPolicy`].
#[derive(Debug)]
pub struct ApiError {
    pub method: &'static str,
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn from_facility(method: &'static str, policy: StatusPolicy, err: FacilityError) -> Self {
        let kind = err.kind();
        match kind {
            ErrorKind::Failure => error!(method, error = %err, "facility request failed"),
            _ => debug!(method, error = %err, "facility request rejected"),
        }

        Self {
            method,
            status: policy.status(kind),
            message: err.to_string(),
        }
    }

    /// A body that could not be read as JSON never reaches the store.
    pub fn from_rejection(method: &'static str, rejection: JsonRejection) -> Self {
        debug!(method, error = %rejection, "malformed request body");

        Self {
            method,
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            method: self.method,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}
