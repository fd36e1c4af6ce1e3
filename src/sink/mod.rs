//! Record sinks
//!
//! A sink receives finalized extracted records, one push per record, fire
//! and forget. Workers complete in arbitrary order, so sinks must treat the
//! stream as unordered. A failed push affects only that record: the
//! orchestrator logs it as a warning and the crawl continues.

mod jsonl;
mod memory;
mod sqlite;

pub use jsonl::JsonLinesSink;
pub use memory::MemorySink;
pub use sqlite::SqliteSink;

use crate::config::{OutputConfig, SinkFormat};
use crate::extract::ExtractedRecord;
use crate::SinkError;
use std::path::Path;
use std::sync::Arc;

/// Append-only destination for extracted records
pub trait RecordSink: Send + Sync {
    /// Appends one record
    fn push(&self, record: &ExtractedRecord) -> Result<(), SinkError>;
}

/// Builds the sink named by the output configuration
pub fn build_sink(output: &OutputConfig) -> Result<Arc<dyn RecordSink>, SinkError> {
    let sink: Arc<dyn RecordSink> = match output.format {
        SinkFormat::Jsonl => Arc::new(JsonLinesSink::create(Path::new(&output.path))?),
        SinkFormat::Sqlite => Arc::new(SqliteSink::create(Path::new(&output.path))?),
    };
    Ok(sink)
}
