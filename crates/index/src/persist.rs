//! On-disk snapshots of a built checkpoint index.
//!
//! Re-indexing a multi-gigabyte trace on every open is wasted work; the
//! checkpoint collection is small and cheap to persist beside the trace. A
//! snapshot is a single file:
//!
//! ```text
//! magic   u32  BE   "SEDI"
//! version u16  BE   format version (currently 1)
//! length  u64  BE   body length in bytes
//! crc     u32  BE   CRC32 of the body
//! body    [u8]      bincode of (interval, Vec<Checkpoint<L>>)
//! ```
//!
//! Validation failures surface as [`CoreError::Corruption`]; callers discard
//! the snapshot and re-index from the trace, which is always safe.

use crate::checkpoint::Checkpoint;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use sediment_core::{CoreError, Location, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

const MAGIC: u32 = 0x5345_4449; // "SEDI"
const VERSION: u16 = 1;

/// Write the checkpoint interval and entries to `path`, atomically enough
/// for a sidecar file: the previous snapshot is truncated and rewritten.
pub fn write_snapshot<L>(path: &Path, interval: u64, checkpoints: &[Checkpoint<L>]) -> Result<()>
where
    L: Location + Serialize,
{
    let body = bincode::serialize(&(interval, checkpoints))
        .map_err(|e| CoreError::Serialization(e.to_string()))?;
    let crc = crc32fast::hash(&body);

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_u32::<BigEndian>(MAGIC)?;
    writer.write_u16::<BigEndian>(VERSION)?;
    writer.write_u64::<BigEndian>(body.len() as u64)?;
    writer.write_u32::<BigEndian>(crc)?;
    writer.write_all(&body)?;
    writer.flush()?;

    debug!(path = %path.display(), entries = checkpoints.len(), "wrote index snapshot");
    Ok(())
}

/// Read a snapshot back: the persisted interval and checkpoints.
///
/// Magic/version mismatches, truncation, and checksum failures all return
/// [`CoreError::Corruption`].
pub fn read_snapshot<L>(path: &Path) -> Result<(u64, Vec<Checkpoint<L>>)>
where
    L: Location + DeserializeOwned,
{
    let mut reader = BufReader::new(File::open(path)?);

    let magic = reader.read_u32::<BigEndian>()?;
    if magic != MAGIC {
        return Err(CoreError::Corruption(format!(
            "bad magic {magic:#010x}, expected {MAGIC:#010x}"
        )));
    }
    let version = reader.read_u16::<BigEndian>()?;
    if version != VERSION {
        return Err(CoreError::Corruption(format!(
            "unsupported snapshot version {version}"
        )));
    }
    let length = reader.read_u64::<BigEndian>()?;
    let crc = reader.read_u32::<BigEndian>()?;

    let mut body = vec![0u8; length as usize];
    reader
        .read_exact(&mut body)
        .map_err(|_| CoreError::Corruption("truncated snapshot body".into()))?;
    if crc32fast::hash(&body) != crc {
        return Err(CoreError::Corruption("checksum mismatch".into()));
    }

    let (interval, checkpoints): (u64, Vec<Checkpoint<L>>) = bincode::deserialize(&body)
        .map_err(|e| CoreError::Serialization(e.to_string()))?;
    debug!(path = %path.display(), entries = checkpoints.len(), "read index snapshot");
    Ok((interval, checkpoints))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sediment_core::Timestamp;

    fn sample_checkpoints() -> Vec<Checkpoint<u64>> {
        (0..5i64)
            .map(|i| Checkpoint::new(Timestamp::from_nanos(i * 100), (i * 3) as u64, (i * 512) as u64))
            .collect()
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.idx");
        let checkpoints = sample_checkpoints();

        write_snapshot(&path, 3, &checkpoints).unwrap();
        let (interval, restored) = read_snapshot::<u64>(&path).unwrap();
        assert_eq!(interval, 3);
        assert_eq!(restored, checkpoints);
    }

    #[test]
    fn test_flipped_byte_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.idx");
        write_snapshot(&path, 3, &sample_checkpoints()).unwrap();

        // Corrupt one byte of the body (past the 18-byte header).
        let mut bytes = std::fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        std::fs::write(&path, &bytes).unwrap();

        let err = read_snapshot::<u64>(&path).unwrap_err();
        assert!(err.is_corruption(), "expected corruption, got: {err}");
    }

    #[test]
    fn test_truncated_snapshot_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.idx");
        write_snapshot(&path, 3, &sample_checkpoints()).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

        let err = read_snapshot::<u64>(&path).unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_wrong_magic_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.idx");
        std::fs::write(&path, b"not a snapshot at all").unwrap();

        let err = read_snapshot::<u64>(&path).unwrap_err();
        assert!(err.is_corruption());
    }
}
