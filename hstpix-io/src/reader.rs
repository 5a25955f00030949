//! Memory-mapped file readers.
//!

use crate::{Error, Result};
use hstpix_hst::{EventFile, FileHeader, HEADER_SIZE, RECORD_SIZE};
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A memory-mapped file reader.
///
/// Uses memmap2 to access file contents without copying the whole file
/// into memory first.
pub struct MappedFileReader {
    mmap: Mmap,
    path: PathBuf,
}

impl MappedFileReader {
    /// Opens a file for memory-mapped reading.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or memory-mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        // SAFETY: The file is opened read-only and we assume it is not modified concurrently.
        // This is the standard safety contract for memory mapping.
        #[allow(unsafe_code)]
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self {
            mmap,
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Returns the file contents as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap[..]
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// Returns true if the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Path the mapping was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A `.hst` event file reader over a memory mapping.
pub struct HstFileReader {
    reader: MappedFileReader,
}

impl HstFileReader {
    /// Opens an event file for reading.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or memory-mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            reader: MappedFileReader::open(path)?,
        })
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn file_size(&self) -> usize {
        self.reader.len()
    }

    /// Parses only the header.
    ///
    /// # Errors
    /// Returns an error if the header is truncated or malformed.
    pub fn header(&self) -> Result<FileHeader> {
        FileHeader::parse(self.reader.as_bytes()).map_err(|source| self.decode_error(source))
    }

    /// Number of event records implied by the header and file size.
    ///
    /// # Errors
    /// Returns an error if the header cannot be parsed.
    pub fn record_count(&self) -> Result<usize> {
        let header = self.header()?;
        let offset = usize::from(header.data_offset).max(HEADER_SIZE);
        Ok(self.reader.len().saturating_sub(offset) / RECORD_SIZE)
    }

    /// Decodes the whole file.
    ///
    /// # Errors
    /// Returns an error if the file is not a well-formed event file.
    pub fn read(&self) -> Result<EventFile> {
        let file = EventFile::from_bytes(self.reader.as_bytes())
            .map_err(|source| self.decode_error(source))?;
        log::debug!(
            "read {} events from {}",
            file.len(),
            self.reader.path().display()
        );
        Ok(file)
    }

    fn decode_error(&self, source: hstpix_hst::Error) -> Error {
        Error::Decode {
            path: self.reader.path().to_path_buf(),
            source,
        }
    }
}

/// Opens and decodes an event file in one step.
///
/// # Errors
/// Returns an error if the file cannot be mapped or decoded.
pub fn open_event_file<P: AsRef<Path>>(path: P) -> Result<EventFile> {
    HstFileReader::open(path)?.read()
}
