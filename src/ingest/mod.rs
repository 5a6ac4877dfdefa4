//! Ingestion records and their delivery

mod dispatcher;
mod record;

pub use dispatcher::Dispatcher;
pub use record::{content_id, IngestionRecord};
