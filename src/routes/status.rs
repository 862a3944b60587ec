//! Dependency status endpoint.
//!
//! Reports database and bucket connectivity. The response is always 200 OK:
//! dependency health is carried in the body, so the endpoint keeps answering
//! when everything it probes is down.

use axum::{extract::State, Json};

use crate::state::AppState;
use crate::status::{get_status, StatusReport};

/// `GET /api/status`
pub async fn status(State(state): State<AppState>) -> Json<StatusReport> {
    let report = get_status(&state.config, state.database.as_ref(), state.storage.as_ref()).await;
    Json(report)
}
