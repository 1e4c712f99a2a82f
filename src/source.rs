//! Loading the Go source to rewrite.
//!
//! Editors can hand over unsaved buffers as a "modified files" archive on
//! stdin. Each entry is the file name, a newline, the decimal size in bytes,
//! a newline, and then exactly that many bytes of content.

use std::fs;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::core::Result;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("archive entry {0:?} is missing its size line")]
    MissingSize(String),

    #[error("invalid size {size:?} for archive entry {name:?}")]
    InvalidSize { name: String, size: String },

    #[error("archive entry {name:?} is truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("archive entry {0:?} is not valid UTF-8")]
    InvalidUtf8(String),

    #[error("Failed to read archive: {0}")]
    Io(#[from] std::io::Error),
}

/// Files with unsaved contents, in archive order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    entries: Vec<(String, String)>,
}

impl Archive {
    /// Read a whole archive from `reader`
    pub fn read(mut reader: impl Read) -> std::result::Result<Self, ArchiveError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::parse(&data)
    }

    pub fn parse(mut data: &[u8]) -> std::result::Result<Self, ArchiveError> {
        let mut entries = Vec::new();

        while !data.is_empty() {
            let (name, rest) = split_line(data);
            let name = String::from_utf8_lossy(name).into_owned();

            let Some(rest) = rest else {
                return Err(ArchiveError::MissingSize(name));
            };
            let (size, rest) = split_line(rest);
            let size = String::from_utf8_lossy(size).into_owned();
            let expected: usize = size.trim().parse().map_err(|_| ArchiveError::InvalidSize {
                name: name.clone(),
                size: size.clone(),
            })?;

            let rest = rest.unwrap_or_default();
            if rest.len() < expected {
                return Err(ArchiveError::Truncated {
                    name,
                    expected,
                    actual: rest.len(),
                });
            }

            let (content, rest) = rest.split_at(expected);
            let content = String::from_utf8(content.to_vec())
                .map_err(|_| ArchiveError::InvalidUtf8(name.clone()))?;
            entries.push((name, content));
            data = rest;
        }

        Ok(Self { entries })
    }

    /// Contents recorded for `path`; the last entry wins on duplicates
    pub fn get(&self, path: &Path) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(name, _)| Path::new(name) == path)
            .map(|(_, content)| content.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Split at the first newline; `None` for the rest when there is none
fn split_line(data: &[u8]) -> (&[u8], Option<&[u8]>) {
    match data.iter().position(|&b| b == b'\n') {
        Some(end) => (&data[..end], Some(&data[end + 1..])),
        None => (data, None),
    }
}

/// Source for `path`, preferring the archive's unsaved contents
pub fn load_source(path: &Path, modified: Option<&Archive>) -> Result<String> {
    if let Some(content) = modified.and_then(|archive| archive.get(path)) {
        debug!("Using modified contents for {}", path.display());
        return Ok(content.to_string());
    }

    debug!("Reading {}", path.display());
    Ok(fs::read_to_string(path)?)
}
