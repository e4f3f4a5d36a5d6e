use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::post,
    Extension, Json, Router,
};
use cinebook_booking::generate_ticket_preview;
use cinebook_core::booking::TicketSummary;
use cinebook_core::BookingError;
use serde::Serialize;

use crate::{error::AppError, middleware::auth::CustomerClaims, state::AppState};

pub const CONFIRMATION_PATH: &str = "/payment-confirmation";
pub const DEFAULT_VIEW_PATH: &str = "/";

#[derive(Debug, Serialize)]
pub struct ConfirmPaymentResponse {
    pub message: String,
    pub booking_id: String,
    pub redirect_url: String,
    pub bill_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TicketResponse {
    pub message: String,
    pub ticket: TicketSummary,
}

/// Routes open to anonymous visitors.
pub fn routes() -> Router<AppState> {
    Router::new().route("/generate-ticket", post(generate_ticket))
}

/// POST /confirm-payment
pub async fn confirm_payment(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    body: Bytes,
) -> Result<Json<ConfirmPaymentResponse>, AppError> {
    let receipt = state
        .workflow
        .confirm_payment(&body, &claims.session())
        .await?;

    Ok(Json(ConfirmPaymentResponse {
        message: "Payment successful!".to_string(),
        booking_id: receipt.booking_id.to_string(),
        redirect_url: CONFIRMATION_PATH.to_string(),
        bill_url: receipt
            .invoice
            .map(|handle| format!("/download-bill/{}", handle)),
    }))
}

/// GET /payment-confirmation
/// Shows the staged confirmation once, then it is gone.
pub async fn payment_confirmation(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
) -> Result<Response, AppError> {
    match state.workflow.view_confirmation(&claims.session()).await {
        Ok(pending) => Ok(Json(pending).into_response()),
        Err(BookingError::NoActiveConfirmation) => {
            Ok(Redirect::to(DEFAULT_VIEW_PATH).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /generate-ticket
async fn generate_ticket(body: Bytes) -> Result<Json<TicketResponse>, AppError> {
    let ticket = generate_ticket_preview(&body)?;
    Ok(Json(TicketResponse {
        message: "Ticket generated successfully".to_string(),
        ticket,
    }))
}
