use async_trait::async_trait;
use cinebook_core::booking::BookingRecord;
use cinebook_core::repository::BookingStore;
use cinebook_core::BackendError;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Process-lifetime booking list. Appends take the write lock, so concurrent
/// confirmations land one after another.
#[derive(Default)]
pub struct InMemoryBookingStore {
    records: RwLock<Vec<Arc<BookingRecord>>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn append(&self, record: Arc<BookingRecord>) -> Result<(), BackendError> {
        let mut records = self.records.write().await;
        records.push(record);
        debug!("Booking store holds {} records", records.len());
        Ok(())
    }

    async fn snapshot(&self) -> Result<Vec<Arc<BookingRecord>>, BackendError> {
        Ok(self.records.read().await.clone())
    }

    async fn len(&self) -> Result<usize, BackendError> {
        Ok(self.records.read().await.len())
    }
}
