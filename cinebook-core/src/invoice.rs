use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::booking::{BookingId, BookingRecord};

/// File name of a stored invoice, e.g. `bill_20240101180000.pdf`.
///
/// Only plain file names are accepted so a handle can never address anything
/// outside the invoice directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceHandle(String);

impl InvoiceHandle {
    pub fn parse(value: &str) -> Option<Self> {
        let valid = !value.is_empty()
            && value.len() <= 128
            && !value.starts_with('.')
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        valid.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvoiceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct InvoiceDocument {
    pub handle: InvoiceHandle,
    pub source_booking_id: BookingId,
    pub content: Vec<u8>,
}

/// Engine-neutral content of an invoice: a title and labelled lines.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceLayout {
    pub title: String,
    pub lines: Vec<(String, String)>,
}

impl InvoiceLayout {
    pub const TITLE: &'static str = "Movie Ticket Booking - Bill";

    pub fn for_booking(record: &BookingRecord, currency_symbol: &str) -> Self {
        let customer = &record.customer;
        let lines = [
            ("Booking ID", record.booking_id.to_string()),
            ("Name", customer.name.clone()),
            ("Email", customer.email.clone()),
            ("Phone", customer.phone.clone()),
            ("Address", customer.address_line()),
            ("Movie", record.movie.clone()),
            ("Theater", record.theater.clone()),
            ("Date", record.date.clone()),
            ("Time", record.time.clone()),
            ("Seats", record.seats_display()),
            (
                "Total Price",
                cinebook_shared::format_amount(currency_symbol, record.total_price),
            ),
        ]
        .into_iter()
        .map(|(label, value)| (label.to_string(), value))
        .collect();

        Self {
            title: Self::TITLE.to_string(),
            lines,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RenderError {
    #[error("Document engine unavailable: {0}")]
    EngineUnavailable(String),
    #[error("Document conversion failed: {0}")]
    EngineFailed(String),
    #[error("Document conversion timed out after {0:?}")]
    Timeout(Duration),
    #[error("Failed to store document: {0}")]
    Storage(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invoice not found: {0}")]
pub struct InvoiceNotFound(pub String);

/// Converts an invoice layout into PDF bytes.
#[async_trait]
pub trait DocumentEngine: Send + Sync {
    fn name(&self) -> &'static str;

    async fn convert(&self, layout: &InvoiceLayout) -> Result<Vec<u8>, RenderError>;
}
