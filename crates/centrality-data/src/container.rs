//! Reading and writing container files
//!
//! Containers are JSON documents. A path ending in `.zst` is read and written
//! through a zstd stream, so large campaigns can be stored compressed without
//! any change for the caller.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};

const ZSTD_LEVEL: i32 = 3;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ContainerError {
    #[display("failed to open {}", path.display())]
    Open {
        path: PathBuf,
        #[error(source)]
        source: io::Error,
    },
    #[display("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[error(source)]
        source: serde_json::Error,
    },
    #[display("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[error(source)]
        source: io::Error,
    },
}

/// Whether `path` names a zstd-compressed container.
#[must_use]
pub fn is_compressed(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "zst")
}

/// Deserializes a container file, decompressing it if needed.
pub fn read_json<T>(path: &Path) -> Result<T, ContainerError>
where
    T: DeserializeOwned,
{
    let open_error = |source| ContainerError::Open {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(open_error)?;
    let reader: Box<dyn Read> = if is_compressed(path) {
        Box::new(zstd::Decoder::new(file).map_err(open_error)?)
    } else {
        Box::new(BufReader::new(file))
    };
    serde_json::from_reader(reader).map_err(|source| ContainerError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serializes `value` into a container file.
///
/// Uncompressed output is pretty-printed and ends with a newline, so that
/// writing the same value twice produces identical bytes.
pub fn write_json<T>(path: &Path, value: &T) -> Result<(), ContainerError>
where
    T: Serialize + ?Sized,
{
    let write_error = |source| ContainerError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_error)?;
    if is_compressed(path) {
        let mut encoder = zstd::Encoder::new(file, ZSTD_LEVEL).map_err(write_error)?;
        serde_json::to_writer(&mut encoder, value).map_err(io::Error::from).map_err(write_error)?;
        encoder.finish().map_err(write_error)?;
    } else {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)
            .map_err(io::Error::from)
            .map_err(write_error)?;
        writeln!(writer).map_err(write_error)?;
        writer.flush().map_err(write_error)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::{dataset::Dataset, event::EventDatabase};

    fn sample() -> BTreeMap<String, Vec<f64>> {
        [("a".to_owned(), vec![1.0, 2.5]), ("b".to_owned(), vec![])]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_plain_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        write_json(&path, &sample()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("}\n"));
        assert_eq!(read_json::<BTreeMap<String, Vec<f64>>>(&path).unwrap(), sample());
    }

    #[test]
    fn test_compressed_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json.zst");
        write_json(&path, &sample()).unwrap();

        let raw = std::fs::read(&path).unwrap();
        // zstd frame magic number
        assert_eq!(raw[..4], [0x28, 0xb5, 0x2f, 0xfd]);
        assert_eq!(read_json::<BTreeMap<String, Vec<f64>>>(&path).unwrap(), sample());
    }

    #[test]
    fn test_database_through_compressed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json.zst");
        let database: EventDatabase =
            serde_json::from_str(r#"{"event_0": {"x": [[1, null]], "y": 2}}"#).unwrap();
        write_json(&path, &database).unwrap();

        let loaded: EventDatabase = read_json(&path).unwrap();
        let event = loaded.get("event_0").unwrap();
        assert_eq!(event.get("y"), Some(&Dataset::scalar(2.0)));
        assert!(event.get("x").unwrap().values()[1].is_nan());
    }

    #[test]
    fn test_rewrite_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        write_json(&path, &sample()).unwrap();
        let first = std::fs::read(&path).unwrap();
        write_json(&path, &sample()).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), first);
    }

    #[test]
    fn test_missing_file() {
        let err = read_json::<EventDatabase>(Path::new("/nonexistent/events.json")).unwrap_err();
        assert!(matches!(err, ContainerError::Open { .. }));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_json::<EventDatabase>(&path).unwrap_err();
        assert!(matches!(err, ContainerError::Parse { .. }));
    }
}
