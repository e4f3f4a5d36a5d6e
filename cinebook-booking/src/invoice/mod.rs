mod pdf;
mod wkhtmltopdf;

pub use pdf::BuiltinPdfEngine;
pub use wkhtmltopdf::WkhtmltopdfEngine;

use cinebook_core::booking::BookingRecord;
use cinebook_core::invoice::{
    DocumentEngine, InvoiceDocument, InvoiceHandle, InvoiceLayout, InvoiceNotFound, RenderError,
};
use cinebook_core::repository::DocumentStore;
use cinebook_store::app_config::{EngineKind, InvoiceConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::ids::IdGenerator;

pub fn engine_from_config(config: &InvoiceConfig) -> Arc<dyn DocumentEngine> {
    match config.engine {
        EngineKind::Builtin => Arc::new(BuiltinPdfEngine),
        EngineKind::Wkhtmltopdf => Arc::new(WkhtmltopdfEngine::new(&config.wkhtmltopdf_path)),
    }
}

/// Turns booking records into stored PDF invoices and serves them back.
pub struct InvoiceRenderer {
    engine: Arc<dyn DocumentEngine>,
    documents: Arc<dyn DocumentStore>,
    handles: IdGenerator,
    timeout: Duration,
    currency_symbol: String,
}

impl InvoiceRenderer {
    pub fn new(
        engine: Arc<dyn DocumentEngine>,
        documents: Arc<dyn DocumentStore>,
        handles: IdGenerator,
        timeout: Duration,
        currency_symbol: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            documents,
            handles,
            timeout,
            currency_symbol: currency_symbol.into(),
        }
    }

    pub async fn render(&self, record: &BookingRecord) -> Result<InvoiceHandle, RenderError> {
        let layout = InvoiceLayout::for_booking(record, &self.currency_symbol);

        let content = tokio::time::timeout(self.timeout, self.engine.convert(&layout))
            .await
            .map_err(|_| RenderError::Timeout(self.timeout))??;

        let handle = InvoiceHandle::parse(&self.handles.next()).ok_or_else(|| {
            RenderError::Storage("invoice handle prefix must be a plain file name".to_string())
        })?;

        let document = InvoiceDocument {
            handle: handle.clone(),
            source_booking_id: record.booking_id.clone(),
            content,
        };
        self.documents
            .put(&document)
            .await
            .map_err(|e| RenderError::Storage(e.to_string()))?;

        info!(
            booking_id = %record.booking_id,
            handle = %handle,
            engine = self.engine.name(),
            bytes = document.content.len(),
            "Invoice rendered"
        );
        Ok(handle)
    }

    pub async fn retrieve(&self, handle: &str) -> Result<Vec<u8>, InvoiceNotFound> {
        let not_found = || InvoiceNotFound(handle.to_string());
        let parsed = InvoiceHandle::parse(handle).ok_or_else(not_found)?;

        match self.documents.get(&parsed).await {
            Ok(Some(bytes)) => Ok(bytes),
            Ok(None) => {
                warn!("Invoice {} requested but not on file", parsed);
                Err(not_found())
            }
            Err(e) => {
                error!("Error reading invoice {}: {}", parsed, e);
                Err(not_found())
            }
        }
    }
}
