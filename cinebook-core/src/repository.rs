use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::booking::{BookingRecord, PendingConfirmation};
use crate::invoice::{InvoiceDocument, InvoiceHandle};
use crate::BackendError;

/// Opaque id of one signed-in user's server-side scratch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionHandle(Uuid);

impl SessionHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Append-only collection of finalized bookings
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Adds a record. Uniqueness of booking ids is not checked here.
    async fn append(&self, record: Arc<BookingRecord>) -> Result<(), BackendError>;

    /// All records in append order.
    async fn snapshot(&self) -> Result<Vec<Arc<BookingRecord>>, BackendError>;

    async fn len(&self) -> Result<usize, BackendError>;
}

/// At most one staged confirmation per session.
#[async_trait]
pub trait SessionState: Send + Sync {
    /// Overwrites whatever was staged for the session before.
    async fn stage(
        &self,
        session: &SessionHandle,
        confirmation: PendingConfirmation,
    ) -> Result<(), BackendError>;

    /// Returns the staged confirmation and removes it in one step.
    async fn take_and_clear(
        &self,
        session: &SessionHandle,
    ) -> Result<Option<PendingConfirmation>, BackendError>;

    async fn clear(&self, session: &SessionHandle) -> Result<(), BackendError>;
}

/// Blob storage for rendered invoices, keyed by handle.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn put(&self, document: &InvoiceDocument) -> Result<(), BackendError>;

    async fn get(&self, handle: &InvoiceHandle) -> Result<Option<Vec<u8>>, BackendError>;
}
