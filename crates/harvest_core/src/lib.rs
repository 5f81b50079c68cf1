//! Harvest core: pure pagination, projection and response classification.
mod classify;
mod outcome;
mod range;
mod record;

pub use classify::classify_body;
pub use outcome::{Completion, FetchOutcome, PageOutcome, TransientReason};
pub use range::PageRange;
pub use record::{FieldSchema, Record};
