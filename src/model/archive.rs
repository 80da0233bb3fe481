//! Downloadable archive of refactored files
//!
//! The archive bytes live in a temp file for as long as the handle exists.
//! Dropping the handle deletes the file, which is how a reset or a newer
//! archive revokes the old one.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Handle to a fetched archive
#[derive(Debug)]
pub struct ArchiveHandle {
    file: NamedTempFile,
    size: u64,
}

impl ArchiveHandle {
    /// Persist `bytes` to a fresh temp file
    pub fn from_bytes(bytes: &[u8]) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("refactor-tui-")
            .suffix(".zip")
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self {
            file,
            size: bytes.len() as u64,
        })
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Copy the archive to `dest`, returning the number of bytes written
    pub fn save_as(&self, dest: &Path) -> io::Result<u64> {
        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::copy(self.file.path(), dest)
    }

    /// Human readable size, e.g. `12.4 KB`
    pub fn formatted_size(&self) -> String {
        let size = self.size as f64;
        if size < 1024.0 {
            format!("{} B", self.size)
        } else if size < 1024.0 * 1024.0 {
            format!("{:.1} KB", size / 1024.0)
        } else {
            format!("{:.1} MB", size / (1024.0 * 1024.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_as_copies_bytes() {
        let handle = ArchiveHandle::from_bytes(b"PK\x03\x04data").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out").join("refactored-project.zip");

        let written = handle.save_as(&dest).unwrap();

        assert_eq!(written, 8);
        assert_eq!(fs::read(&dest).unwrap(), b"PK\x03\x04data");
    }

    #[test]
    fn test_drop_revokes_temp_file() {
        let handle = ArchiveHandle::from_bytes(b"abc").unwrap();
        let path = handle.path().to_path_buf();
        assert!(path.exists());

        drop(handle);
        assert!(!path.exists());
    }

    #[test]
    fn test_formatted_size() {
        let handle = ArchiveHandle::from_bytes(&[0u8; 2048]).unwrap();
        assert_eq!(handle.formatted_size(), "2.0 KB");
        assert_eq!(handle.size(), 2048);
    }
}
