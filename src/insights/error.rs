//! Insights failure taxonomy and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::insights::transport::TransportError;

pub const CONFIG_MISSING_MESSAGE: &str =
    "Missing ABN API credentials or certificates in environment variables.";
pub const TRANSPORT_FAILURE_MESSAGE: &str =
    "An error occurred while connecting to the ABN AMRO API.";

#[derive(Debug, Error)]
pub enum InsightsError {
    /// Credentials incomplete; no call was attempted.
    #[error("missing configuration values: {}", .0.join(", "))]
    ConfigMissing(Vec<&'static str>),

    /// Upstream answered with something other than 200.
    #[error("upstream returned {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    /// Upstream could not be reached.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Upstream answered 200 with a body that is not JSON.
    #[error("upstream body is not JSON: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

impl IntoResponse for InsightsError {
    fn into_response(self) -> Response {
        match self {
            InsightsError::ConfigMissing(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, CONFIG_MISSING_MESSAGE).into_response()
            }
            InsightsError::Upstream { status, body } => (
                status,
                format!("ABN AMRO API returned an error: {}", body),
            )
                .into_response(),
            InsightsError::Transport(_) | InsightsError::InvalidBody(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, TRANSPORT_FAILURE_MESSAGE).into_response()
            }
        }
    }
}
