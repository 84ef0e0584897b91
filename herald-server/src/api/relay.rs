//! Relay endpoint.
//!
//! `POST /relay/{alpha}/{beta}/{gamma}` takes a raw webhook body, runs it
//! through admission, and reports the outcome:
//!
//! | Outcome           | Status | `X-Processing-Status`       | Body              |
//! |-------------------|--------|-----------------------------|-------------------|
//! | forwarded         | 200    | `processed`                 | confirmation text |
//! | skipped-duplicate | 200    | `skipped;already-processed` | empty             |
//! | body read error   | 400    | –                           | error text        |
//! | parse-error       | 400    | –                           | error text        |
//! | relay-error       | 500    | –                           | error text        |
//!
//! Any method other than POST gets 405 from the router.

use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use herald_core::admission::{AdmissionError, Admitted, Delivery};
use herald_core::relay::Destination;
use kanau::processor::Processor;
use thiserror::Error;

use crate::state::AppState;

/// Header carrying the machine-readable outcome.
pub const PROCESSING_STATUS_HEADER: &str = "x-processing-status";
/// Header value for relayed events.
pub const STATUS_PROCESSED: &str = "processed";
/// Header value for duplicates.
pub const STATUS_SKIPPED: &str = "skipped;already-processed";

/// Upper bound on an inbound webhook body.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the relay router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/relay/{alpha}/{beta}/{gamma}", post(relay))
        .route("/slack/{alpha}/{beta}/{gamma}", post(relay))
}

/// `POST /relay/{alpha}/{beta}/{gamma}`: relay one webhook delivery.
async fn relay(
    State(state): State<AppState>,
    Path((alpha, beta, gamma)): Path<(String, String, String)>,
    body: Body,
) -> Result<Response, RelayApiError> {
    let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Error reading body");
            RelayApiError::BodyRead(e)
        })?;

    let delivery = Delivery {
        destination: Destination::new(alpha, beta, gamma),
        body,
    };

    let response = match state.admission.process(delivery).await? {
        Admitted::Forwarded { confirmation, .. } => (
            StatusCode::OK,
            [(PROCESSING_STATUS_HEADER, STATUS_PROCESSED)],
            confirmation,
        )
            .into_response(),
        Admitted::SkippedDuplicate { .. } => {
            (StatusCode::OK, [(PROCESSING_STATUS_HEADER, STATUS_SKIPPED)]).into_response()
        }
    };
    Ok(response)
}

/// Errors that can occur in the relay handler.
#[derive(Debug, Error)]
enum RelayApiError {
    #[error("failed to read request body: {0}")]
    BodyRead(axum::Error),

    #[error(transparent)]
    Admission(#[from] AdmissionError),
}

impl IntoResponse for RelayApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            RelayApiError::BodyRead(_) => StatusCode::BAD_REQUEST,
            RelayApiError::Admission(AdmissionError::Parse(_)) => StatusCode::BAD_REQUEST,
            RelayApiError::Admission(AdmissionError::Relay { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}
