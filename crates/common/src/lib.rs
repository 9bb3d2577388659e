pub mod types;

pub use types::{DocumentId, InvalidDocumentId, Timestamp};
