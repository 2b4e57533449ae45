use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::info;

use crate::error::ScrapeError;
use crate::schema::{self, CheckResult};

/// Append-only CSV store shared by every check task.
///
/// The whole probe-open-append-flush sequence runs under one lock; two
/// writers racing past the existence check would both write the header.
pub struct OutputSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl OutputSink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        OutputSink {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one result row, creating the store with its header row on
    /// first use.
    pub fn append(&self, result: &CheckResult) -> Result<(), ScrapeError> {
        let _guard = self.lock.lock().unwrap();

        let exists = self.path.exists();
        if !exists {
            if let Some(dir) = self.path.parent() {
                if !dir.as_os_str().is_empty() {
                    fs::create_dir_all(dir)?;
                }
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(!exists)
            .from_writer(file);

        if !exists {
            writer.write_record(schema::header())?;
            info!("Created output store {:?}", self.path);
        }
        writer.write_record(result.row())?;
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CheckStatus;

    #[test]
    fn header_is_written_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let sink = OutputSink::new(dir.path().join("results.csv"));

        sink.append(&CheckResult::not_found("XTAKS045LK1178313"))
            .unwrap();
        sink.append(&CheckResult::error("Z8NBAABD0L0108892")).unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("VIN,status,Lot number"));
        assert!(lines[1].starts_with("XTAKS045LK1178313,not_found"));
        assert!(lines[2].starts_with("Z8NBAABD0L0108892,error"));
    }

    #[test]
    fn rows_carry_field_values_in_schema_order() {
        let dir = tempfile::tempdir().unwrap();
        let sink = OutputSink::new(dir.path().join("results.csv"));

        let mut result = CheckResult::with_status("XTAKS045LK1178313", CheckStatus::Success);
        result.fields[0] = "1".to_string();
        sink.append(&result).unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        let row = content.lines().nth(1).unwrap();
        assert!(row.starts_with("XTAKS045LK1178313,success,1,"));
    }

    #[test]
    fn missing_parent_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let sink = OutputSink::new(dir.path().join("output").join("results.csv"));
        sink.append(&CheckResult::not_found("XTAKS045LK1178313"))
            .unwrap();
        assert!(sink.path().exists());
    }
}
