use crate::extract::ExtractedRecord;
use crate::sink::RecordSink;
use crate::SinkError;
use std::sync::Mutex;

/// In-memory sink for tests and dry runs
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<ExtractedRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything pushed so far, in push order
    pub fn records(&self) -> Vec<ExtractedRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Number of records pushed so far
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Returns whether nothing has been pushed yet
    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }
}

impl RecordSink for MemorySink {
    fn push(&self, record: &ExtractedRecord) -> Result<(), SinkError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}
