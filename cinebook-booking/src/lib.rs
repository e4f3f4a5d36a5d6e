pub mod ids;
pub mod invoice;
pub mod workflow;

pub use ids::IdGenerator;
pub use invoice::{engine_from_config, BuiltinPdfEngine, InvoiceRenderer, WkhtmltopdfEngine};
pub use workflow::{generate_ticket_preview, BookingWorkflow, ConfirmationReceipt};
