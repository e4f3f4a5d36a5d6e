pub mod money;
pub mod pii;

pub use money::format_amount;
pub use pii::Masked;
