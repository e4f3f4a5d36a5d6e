use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::booking::{CustomerDetails, TicketSummary};
use crate::BookingError;

/// Fields a payment confirmation must carry, in the order they are checked.
pub const REQUIRED_CONFIRMATION_FIELDS: [&str; 12] = [
    "name",
    "email",
    "phone",
    "city",
    "state",
    "zip",
    "movie",
    "theater",
    "date",
    "time",
    "seats",
    "total_price",
];

/// Fields read by the ticket preview.
pub const TICKET_PREVIEW_FIELDS: [&str; 11] = [
    "movie",
    "theater",
    "date",
    "time",
    "seats",
    "name",
    "email",
    "address",
    "city",
    "state",
    "zipcode",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid value for field {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField(field) => field,
            ValidationError::InvalidField { field, .. } => field,
        }
    }
}

/// A validated payment confirmation, ready to become a booking record.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmPaymentRequest {
    pub movie: String,
    pub theater: String,
    pub date: String,
    pub time: String,
    pub seats: Vec<String>,
    pub total_price: Decimal,
    pub customer: CustomerDetails,
    pub payment_method: Option<String>,
}

impl ConfirmPaymentRequest {
    /// Parses and validates a raw JSON body.
    ///
    /// Presence of every required field is checked first so the error names
    /// the first absent field; value checks follow.
    pub fn from_json(body: &[u8]) -> Result<Self, BookingError> {
        let object = parse_object(body)?;
        if object.is_empty() {
            return Err(BookingError::MalformedRequest("No data received".to_string()));
        }

        if let Some(field) = first_missing(&object, &REQUIRED_CONFIRMATION_FIELDS) {
            return Err(ValidationError::MissingField(field).into());
        }

        let customer = CustomerDetails {
            name: text_field(&object, "name")?,
            email: text_field(&object, "email")?,
            phone: text_field(&object, "phone")?,
            city: text_field(&object, "city")?,
            state: text_field(&object, "state")?,
            zip_code: text_field(&object, "zip")?,
        };

        let payment_method = match object.get("payment_method") {
            None | Some(Value::Null) => None,
            Some(_) => Some(text_field(&object, "payment_method")?),
        };

        Ok(Self {
            movie: text_field(&object, "movie")?,
            theater: text_field(&object, "theater")?,
            date: text_field(&object, "date")?,
            time: text_field(&object, "time")?,
            seats: seats_field(&object, "seats")?,
            total_price: price_field(&object, "total_price")?,
            customer,
            payment_method,
        })
    }
}

/// Builds a ticket summary from a raw JSON body. Every problem is reported as
/// a malformed request because the preview has no field-level contract.
pub fn parse_ticket_preview(body: &[u8]) -> Result<TicketSummary, BookingError> {
    let object = parse_object(body)?;
    if let Some(field) = first_missing(&object, &TICKET_PREVIEW_FIELDS) {
        return Err(BookingError::MalformedRequest(format!(
            "Missing required field: {field}"
        )));
    }

    let summary = (|| -> Result<TicketSummary, ValidationError> {
        Ok(TicketSummary {
            movie: text_field(&object, "movie")?,
            theater: text_field(&object, "theater")?,
            date: text_field(&object, "date")?,
            time: text_field(&object, "time")?,
            seats: preview_seats_field(&object, "seats")?,
            name: text_field(&object, "name")?,
            email: text_field(&object, "email")?,
            address: text_field(&object, "address")?,
            city: text_field(&object, "city")?,
            state: text_field(&object, "state")?,
            zipcode: text_field(&object, "zipcode")?,
        })
    })();

    summary.map_err(|e| BookingError::MalformedRequest(e.to_string()))
}

fn parse_object(body: &[u8]) -> Result<Map<String, Value>, BookingError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(BookingError::MalformedRequest(
            "Expected a JSON object".to_string(),
        )),
        Err(e) => Err(BookingError::MalformedRequest(e.to_string())),
    }
}

fn first_missing(object: &Map<String, Value>, fields: &[&'static str]) -> Option<&'static str> {
    fields
        .iter()
        .copied()
        .find(|field| matches!(object.get(*field), None | Some(Value::Null)))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text_field(object: &Map<String, Value>, field: &'static str) -> Result<String, ValidationError> {
    let value = object.get(field).ok_or(ValidationError::MissingField(field))?;
    scalar_text(value).ok_or(ValidationError::InvalidField {
        field,
        reason: "expected a string",
    })
}

fn seats_field(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Vec<String>, ValidationError> {
    let Some(Value::Array(items)) = object.get(field) else {
        return Err(ValidationError::InvalidField {
            field,
            reason: "expected a list of seat identifiers",
        });
    };

    if items.is_empty() {
        return Err(ValidationError::InvalidField {
            field,
            reason: "at least one seat is required",
        });
    }

    items
        .iter()
        .map(|item| {
            scalar_text(item).ok_or(ValidationError::InvalidField {
                field,
                reason: "seat identifiers must be strings",
            })
        })
        .collect()
}

/// Echo-only variant: any list (even empty) or a single seat.
fn preview_seats_field(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Vec<String>, ValidationError> {
    let invalid = ValidationError::InvalidField {
        field,
        reason: "seat identifiers must be strings",
    };

    match object.get(field) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| scalar_text(item).ok_or(invalid.clone()))
            .collect(),
        Some(value) => scalar_text(value).map(|seat| vec![seat]).ok_or(invalid),
        None => Err(ValidationError::MissingField(field)),
    }
}

fn price_field(object: &Map<String, Value>, field: &'static str) -> Result<Decimal, ValidationError> {
    let invalid = ValidationError::InvalidField {
        field,
        reason: "expected a non-negative amount",
    };

    let price = match object.get(field) {
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .map_err(|_| invalid.clone())?,
        Some(Value::String(s)) => Decimal::from_str(s.trim()).map_err(|_| invalid.clone())?,
        _ => return Err(invalid),
    };

    if price.is_sign_negative() && !price.is_zero() {
        return Err(invalid);
    }
    Ok(price)
}
