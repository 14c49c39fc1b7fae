//! Newline-delimited JSON trace files.
//!
//! One event per line: `{"ts": <nanos>, "type": "<name>", "payload": {...}}`.
//! Locations are byte offsets into the file, so a checkpoint pins an exact
//! resume position and seeks re-enter the file without replaying the prefix.
//! Blank lines are skipped; malformed JSON mid-stream is an unrecoverable
//! parse failure, not an end of stream.

use crate::parser::EventParser;
use parking_lot::Mutex;
use sediment_core::{CoreError, Event, Result, Timestamp};
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Byte offset into the trace file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteLocation(pub u64);

#[derive(Deserialize)]
struct RawEvent {
    ts: i64,
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    payload: Value,
}

/// Parser for newline-delimited JSON event files.
///
/// One open handle is shared behind a mutex and re-seeked per parse; the
/// location alone determines the result, so parsing stays pure and
/// deterministic as the contract requires.
#[derive(Debug)]
pub struct JsonlParser {
    path: PathBuf,
    reader: Mutex<BufReader<File>>,
}

impl JsonlParser {
    /// Open a trace file.
    ///
    /// A missing or unreadable path fails fatally — the trace construction
    /// that wraps this parser never yields a partial object.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::open(&path).map_err(|e| CoreError::TraceOpen {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(JsonlParser {
            path,
            reader: Mutex::new(BufReader::new(file)),
        })
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventParser for JsonlParser {
    type Location = ByteLocation;

    fn start_location(&self) -> ByteLocation {
        ByteLocation(0)
    }

    fn parse_at(&self, location: &ByteLocation) -> Result<Option<(Event, ByteLocation)>> {
        let mut reader = self.reader.lock();
        reader.seek(SeekFrom::Start(location.0))?;

        let mut offset = location.0;
        let mut line = String::new();
        loop {
            line.clear();
            let n = reader.read_line(&mut line)?;
            if n == 0 {
                return Ok(None);
            }
            let line_start = offset;
            offset += n as u64;
            if line.trim().is_empty() {
                continue;
            }
            let raw: RawEvent = serde_json::from_str(line.trim()).map_err(|e| CoreError::Parse {
                location: format!("byte {line_start}"),
                reason: e.to_string(),
            })?;
            let event = Event::new(Timestamp::from_nanos(raw.ts), raw.event_type, raw.payload);
            return Ok(Some((event, ByteLocation(offset))));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_trace(lines: &[&str]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let mut file = File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        (dir, path)
    }

    #[test]
    fn test_sequential_parse() {
        let (_dir, path) = write_trace(&[
            r#"{"ts": 100, "type": "a", "payload": {"x": 1}}"#,
            r#"{"ts": 200, "type": "b"}"#,
        ]);
        let parser = JsonlParser::open(&path).unwrap();

        let (first, next) = parser.parse_at(&parser.start_location()).unwrap().unwrap();
        assert_eq!(first.timestamp(), Timestamp::from_nanos(100));
        assert_eq!(first.event_type, "a");
        assert_eq!(first.payload["x"], 1);

        let (second, end) = parser.parse_at(&next).unwrap().unwrap();
        assert_eq!(second.timestamp(), Timestamp::from_nanos(200));
        assert_eq!(second.payload, Value::Null);

        assert!(parser.parse_at(&end).unwrap().is_none());
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let (_dir, path) = write_trace(&[
            r#"{"ts": 1, "type": "a"}"#,
            "",
            r#"{"ts": 2, "type": "b"}"#,
        ]);
        let parser = JsonlParser::open(&path).unwrap();
        let (_, next) = parser.parse_at(&parser.start_location()).unwrap().unwrap();
        let (second, _) = parser.parse_at(&next).unwrap().unwrap();
        assert_eq!(second.event_type, "b");
    }

    #[test]
    fn test_reparse_at_same_location() {
        let (_dir, path) = write_trace(&[
            r#"{"ts": 1, "type": "a"}"#,
            r#"{"ts": 2, "type": "b"}"#,
        ]);
        let parser = JsonlParser::open(&path).unwrap();
        let (_, next) = parser.parse_at(&parser.start_location()).unwrap().unwrap();
        let once = parser.parse_at(&next).unwrap().unwrap();
        let twice = parser.parse_at(&next).unwrap().unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_malformed_line_is_fatal() {
        let (_dir, path) = write_trace(&[r#"{"ts": 1, "type": "a"}"#, "not json"]);
        let parser = JsonlParser::open(&path).unwrap();
        let (_, next) = parser.parse_at(&parser.start_location()).unwrap().unwrap();
        let err = parser.parse_at(&next).unwrap_err();
        assert!(matches!(err, CoreError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_fails_open() {
        let err = JsonlParser::open("/no/such/trace.jsonl").unwrap_err();
        assert!(matches!(err, CoreError::TraceOpen { .. }));
    }
}
