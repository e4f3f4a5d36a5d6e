use cinebook_core::booking::{BookingId, BookingRecord, PendingConfirmation, TicketSummary};
use cinebook_core::clock::Clock;
use cinebook_core::invoice::{InvoiceHandle, InvoiceNotFound};
use cinebook_core::repository::{BookingStore, SessionHandle, SessionState};
use cinebook_core::request::{parse_ticket_preview, ConfirmPaymentRequest};
use cinebook_core::{BookingError, CoreResult};
use cinebook_shared::Masked;
use std::sync::Arc;
use tracing::{error, info};

use crate::ids::IdGenerator;
use crate::invoice::InvoiceRenderer;

/// Outcome of a confirmed payment. `invoice` is `None` when rendering failed;
/// the booking itself still stands.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationReceipt {
    pub booking_id: BookingId,
    pub invoice: Option<InvoiceHandle>,
}

/// Drives a booking from payment confirmation to invoice and confirmation view.
pub struct BookingWorkflow {
    store: Arc<dyn BookingStore>,
    sessions: Arc<dyn SessionState>,
    renderer: Arc<InvoiceRenderer>,
    booking_ids: IdGenerator,
    clock: Arc<dyn Clock>,
}

impl BookingWorkflow {
    pub fn new(
        store: Arc<dyn BookingStore>,
        sessions: Arc<dyn SessionState>,
        renderer: Arc<InvoiceRenderer>,
        booking_ids: IdGenerator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            sessions,
            renderer,
            booking_ids,
            clock,
        }
    }

    /// Validates the payload, records the booking, renders its invoice and
    /// stages the confirmation for `session`.
    ///
    /// The append is irreversible: a later session failure reports an
    /// internal error but the booking stays recorded.
    pub async fn confirm_payment(
        &self,
        body: &[u8],
        session: &SessionHandle,
    ) -> CoreResult<ConfirmationReceipt> {
        let request = ConfirmPaymentRequest::from_json(body)?;

        let booking_id = BookingId::new(self.booking_ids.next());
        let record = Arc::new(BookingRecord::new(
            booking_id.clone(),
            request,
            self.clock.now(),
        ));

        self.store.append(record.clone()).await.map_err(|e| {
            error!("Payment confirmation error: failed to record {}: {}", booking_id, e);
            BookingError::Internal(format!("booking store: {e}"))
        })?;

        info!(
            booking_id = %booking_id,
            customer = %Masked::from(record.customer.email.as_str()),
            seats = record.seats.len(),
            "Booking confirmed"
        );

        let invoice = match self.renderer.render(&record).await {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!(booking_id = %booking_id, "Error generating invoice: {}", e);
                None
            }
        };

        self.sessions
            .stage(session, PendingConfirmation::from(record.as_ref()))
            .await
            .map_err(|e| {
                error!("Payment confirmation error: failed to stage {}: {}", booking_id, e);
                BookingError::Internal(format!("session state: {e}"))
            })?;

        Ok(ConfirmationReceipt {
            booking_id,
            invoice,
        })
    }

    /// Single-use read of the session's staged confirmation.
    pub async fn view_confirmation(&self, session: &SessionHandle) -> CoreResult<PendingConfirmation> {
        match self.sessions.take_and_clear(session).await {
            Ok(Some(pending)) => Ok(pending),
            Ok(None) => Err(BookingError::NoActiveConfirmation),
            Err(e) => {
                error!("Failed to read confirmation for session {}: {}", session, e);
                Err(BookingError::Internal(format!("session state: {e}")))
            }
        }
    }

    pub async fn retrieve_invoice(&self, handle: &str) -> Result<Vec<u8>, InvoiceNotFound> {
        self.renderer.retrieve(handle).await
    }
}

/// Echoes a prospective ticket back without storing anything.
pub fn generate_ticket_preview(body: &[u8]) -> CoreResult<TicketSummary> {
    parse_ticket_preview(body)
}
