use crate::extract::ExtractedRecord;
use crate::sink::RecordSink;
use crate::SinkError;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

/// Schema for the records table
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    address TEXT NOT NULL,
    price TEXT NOT NULL,
    beds TEXT NOT NULL,
    baths TEXT NOT NULL,
    area TEXT NOT NULL,
    zpid TEXT NOT NULL,
    url TEXT NOT NULL,
    crawled_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_records_zpid ON records(zpid);
CREATE INDEX IF NOT EXISTS idx_records_url ON records(url);
";

/// SQLite sink, one row per record
///
/// The connection runs in WAL mode so concurrent readers (e.g. a live
/// dashboard tailing the crawl) never block pushes.
pub struct SqliteSink {
    conn: Mutex<Connection>,
}

impl SqliteSink {
    /// Opens (or creates) the database and ensures the schema exists
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Number of records stored so far
    pub fn count(&self) -> Result<u64, SinkError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| SinkError::Write("sink connection lock poisoned".to_string()))?;
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl RecordSink for SqliteSink {
    fn push(&self, record: &ExtractedRecord) -> Result<(), SinkError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| SinkError::Write("sink connection lock poisoned".to_string()))?;
        conn.execute(
            "INSERT INTO records (address, price, beds, baths, area, zpid, url, crawled_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.address,
                record.price,
                record.beds,
                record.baths,
                record.area,
                record.zpid,
                record.url,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}
