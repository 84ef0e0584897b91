//! Liveness endpoint.

use axum::Json;
use serde::Serialize;

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct PingResponse {
    /// Current unix time in seconds.
    pub ping: i64,
    /// Program name.
    pub what: &'static str,
}

/// `GET /`: report that the process is up.
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        ping: time::OffsetDateTime::now_utc().unix_timestamp(),
        what: crate::WHAT,
    })
}
