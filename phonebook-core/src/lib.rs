mod client;
mod record;

pub use client::{ApiErrorClass, DEFAULT_BASE_URL, DirectoryClient, DirectoryError};
pub use record::{ContactFields, Record, RecordId};
