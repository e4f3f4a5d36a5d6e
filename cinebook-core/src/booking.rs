use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::request::ConfirmPaymentRequest;

/// Payment method recorded when the client does not name one.
pub const DEFAULT_PAYMENT_METHOD: &str = "upi";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl CustomerDetails {
    /// Single-line postal form used on invoices: `City, State - Zip`.
    pub fn address_line(&self) -> String {
        format!("{}, {} - {}", self.city, self.state, self.zip_code)
    }
}

/// A finalized reservation. Records are shared behind `Arc` once appended
/// to the booking store and expose no mutators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub booking_id: BookingId,
    pub movie: String,
    pub theater: String,
    pub date: String,
    pub time: String,
    pub seats: Vec<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    #[serde(flatten)]
    pub customer: CustomerDetails,
    pub payment_method: String,
    pub booking_timestamp: NaiveDateTime,
}

impl BookingRecord {
    pub fn new(
        booking_id: BookingId,
        request: ConfirmPaymentRequest,
        booking_timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            booking_id,
            movie: request.movie,
            theater: request.theater,
            date: request.date,
            time: request.time,
            seats: request.seats,
            total_price: request.total_price,
            customer: request.customer,
            payment_method: request
                .payment_method
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
            booking_timestamp,
        }
    }

    pub fn seats_display(&self) -> String {
        self.seats.join(", ")
    }
}

/// What the confirmation view shows, staged in the session until read once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingConfirmation {
    pub booking_id: BookingId,
    pub movie_name: String,
    pub show_time: String,
    pub seats: String,
    pub booking_date: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

impl From<&BookingRecord> for PendingConfirmation {
    fn from(record: &BookingRecord) -> Self {
        Self {
            booking_id: record.booking_id.clone(),
            movie_name: record.movie.clone(),
            show_time: record.time.clone(),
            seats: record.seats_display(),
            booking_date: record.date.clone(),
            total_amount: record.total_price,
        }
    }
}

/// Echo of a prospective ticket. Nothing about it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketSummary {
    pub movie: String,
    pub theater: String,
    pub date: String,
    pub time: String,
    pub seats: Vec<String>,
    pub name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
}
