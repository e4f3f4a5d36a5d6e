pub mod account_repo;
pub mod app_config;
pub mod booking_repo;
pub mod document_repo;
pub mod redis_repo;
pub mod session_repo;

pub use account_repo::Argon2AccountStore;
pub use booking_repo::InMemoryBookingStore;
pub use document_repo::FsDocumentStore;
pub use redis_repo::RedisSessionStore;
pub use session_repo::InMemorySessionStore;

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;
    use cinebook_core::booking::{BookingId, BookingRecord, CustomerDetails};
    use rust_decimal::Decimal;

    pub fn record(id: &str) -> BookingRecord {
        BookingRecord {
            booking_id: BookingId::new(id),
            movie: "M".to_string(),
            theater: "T".to_string(),
            date: "2024-01-01".to_string(),
            time: "18:00".to_string(),
            seats: vec!["A1".to_string(), "A2".to_string()],
            total_price: Decimal::from(500),
            customer: CustomerDetails {
                name: "A".to_string(),
                email: "a@x.com".to_string(),
                phone: "1".to_string(),
                city: "C".to_string(),
                state: "S".to_string(),
                zip_code: "1".to_string(),
            },
            payment_method: "upi".to_string(),
            booking_timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(18, 0, 0)
                .unwrap(),
        }
    }
}
