//! Per-port record sink
//!
//! Appends one line per completed frame to the port's log file and echoes
//! the frame to stdout so the operator can watch the stream live. Writes go
//! through a buffer; durability is whatever the OS provides, there is no
//! fsync.

use crate::types::{Result, TimestampedRecord};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes timestamped records for one port
pub struct RecordSink {
    path: PathBuf,
    writer: BufWriter<File>,
    echo: bool,
}

impl RecordSink {
    /// Create the output file, truncating any previous contents.
    ///
    /// With `echo` set, every written frame is also printed to stdout.
    pub fn create(path: impl Into<PathBuf>, echo: bool) -> Result<Self> {
        let path = path.into();
        let file = File::create(&path)?;
        log::info!("logging to {}", path.display());
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            echo,
        })
    }

    /// Path of the output file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as `"<unix_time> <frame_text>"`.
    ///
    /// Records with empty frame text are skipped silently.
    pub fn write(&mut self, record: &TimestampedRecord) -> Result<()> {
        if record.text.is_empty() {
            return Ok(());
        }
        self.writer.write_all(record.render().as_bytes())?;
        if self.echo {
            print!("{}", record.text);
        }
        Ok(())
    }

    /// Flush buffered records to the file
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_write_renders_line_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gps.txt");

        let mut sink = RecordSink::create(&path, false).unwrap();
        sink.write(&TimestampedRecord {
            unix_time: 1470241727.5,
            text: "#AAA\n".to_string(),
        })
        .unwrap();
        sink.write(&TimestampedRecord {
            unix_time: 1470241728.25,
            text: "#BBB\n".to_string(),
        })
        .unwrap();
        sink.flush().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "1470241727.500000 #AAA\n1470241728.250000 #BBB\n");
    }

    #[test]
    fn test_empty_record_skipped_silently() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("imu.txt");

        let mut sink = RecordSink::create(&path, false).unwrap();
        sink.write(&TimestampedRecord {
            unix_time: 1.0,
            text: String::new(),
        })
        .unwrap();
        sink.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_create_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.txt");
        fs::write(&path, "stale contents").unwrap();

        let mut sink = RecordSink::create(&path, false).unwrap();
        sink.flush().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
