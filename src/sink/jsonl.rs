use crate::extract::ExtractedRecord;
use crate::sink::RecordSink;
use crate::SinkError;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

/// Newline-delimited JSON sink, one record per line
///
/// The file is opened in append mode so interrupted runs never clobber
/// records from earlier ones. Each push serializes, writes, and flushes one
/// line under the writer lock.
pub struct JsonLinesSink {
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesSink {
    /// Opens (or creates) the sink file for appending
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

impl RecordSink for JsonLinesSink {
    fn push(&self, record: &ExtractedRecord) -> Result<(), SinkError> {
        let line = serde_json::to_string(record)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| SinkError::Write("sink writer lock poisoned".to_string()))?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}
