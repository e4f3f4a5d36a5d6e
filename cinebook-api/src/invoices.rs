use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
};

use crate::{bookings::CONFIRMATION_PATH, state::AppState};

/// GET /download-bill/{handle}
/// Unknown handles send the visitor back to the confirmation view.
pub async fn download_bill(State(state): State<AppState>, Path(handle): Path<String>) -> Response {
    match state.workflow.retrieve_invoice(&handle).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", handle),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!("Error downloading bill: {}", e);
            Redirect::to(CONFIRMATION_PATH).into_response()
        }
    }
}
