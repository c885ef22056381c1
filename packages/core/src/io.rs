//! Whole-file helpers shared by the codecs' file entry points.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    log::debug!("Reading {}...", path.display());
    fs::read(path).map_err(|err| Error::io(path, err))
}

pub fn read_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    log::debug!("Reading {}...", path.display());
    fs::read_to_string(path).map_err(|err| Error::io(path, err))
}

/// Write `contents`, replacing the file if it exists.
pub fn write_file(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    let contents = contents.as_ref();
    log::debug!("Writing {} ({} bytes)...", path.display(), contents.len());
    fs::write(path, contents).map_err(|err| Error::io(path, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parrot.txt");
        write_file(&path, "pining for the fjords").unwrap();
        assert_eq!(read_text(&path).unwrap(), "pining for the fjords");
        assert_eq!(read_file(&path).unwrap(), b"pining for the fjords");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = read_file(&path).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/out.bin");
        assert!(matches!(write_file(&path, b"x"), Err(Error::Io { .. })));
    }
}
