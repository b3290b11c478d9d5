#![warn(missing_docs)]
//! Event stream and run-report sinks for the headless runner and tests.

mod metrics;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use voxelwild_core::SimTick;

pub use metrics::*;

/// Primary event record captured by headless runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord<'a> {
    /// Simulation tick when the event occurred.
    pub tick: SimTick,
    /// Event kind label (e.g. "creature_spawned").
    pub kind: &'a str,
    /// Structured payload.
    pub payload: Value,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    writer: BufWriter<File>,
    written: usize,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent directories if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create event log {}", path.display()))?;
        Ok(Self {
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    /// Append an event to the log.
    pub fn write(&mut self, event: &EventRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(event)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Number of events written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush buffered events to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl Drop for JsonlSink {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

/// Read back a JSONL event log as generic JSON values.
pub fn read_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read event log {}", path.display()))?;
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).context("Malformed event line"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn jsonl_sink_writes_one_line_per_event() {
        let path = std::env::temp_dir().join(format!(
            "voxelwild-events-{}.jsonl",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        {
            let mut sink = JsonlSink::create(&path).expect("sink create");
            sink.write(&EventRecord {
                tick: SimTick(3),
                kind: "creature_spawned",
                payload: json!({ "species": "cow" }),
            })
            .expect("write succeeds");
            sink.write(&EventRecord {
                tick: SimTick(9),
                kind: "creature_died",
                payload: json!({ "id": 1 }),
            })
            .expect("write succeeds");
            assert_eq!(sink.written(), 2);
        }

        let events = read_jsonl(&path).expect("readable");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["kind"], "creature_spawned");
        assert_eq!(events[0]["payload"]["species"], "cow");
        assert_eq!(events[1]["tick"], 9);
        let _ = fs::remove_file(&path);
    }
}
