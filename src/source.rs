//! Byte sources for the tokenizer.
//!
//! A `Source` is either a borrowed caller buffer or a read-only memory map
//! of a whole file. The map lives exactly as long as the `Source`, so it is
//! released on every exit path, including a failed parse.

use std::fs::File;
use std::io;
use std::ops::Deref;

use memmap2::{Mmap, MmapOptions};

use crate::error::Result;

/// Contiguous read-only input bytes.
#[derive(Debug)]
pub enum Source<'a> {
    /// Caller-owned buffer. Borrowed for the duration of the parse.
    Borrowed(&'a [u8]),
    /// Memory-mapped file contents.
    Mapped(Mmap),
    /// Zero-length file; nothing to map.
    Empty,
}

impl<'a> Source<'a> {
    pub fn from_buffer(bytes: &'a [u8]) -> Self {
        Source::Borrowed(bytes)
    }

    /// Map the full contents of `file` read-only.
    ///
    /// Fails with `TipError::Io` if the size cannot be determined, does not
    /// fit in the address space, or the map cannot be created.
    pub fn from_file(file: &File) -> Result<Source<'static>> {
        let size = file_size(file)?;
        if size == 0 {
            return Ok(Source::Empty);
        }
        let len = usize::try_from(size).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("file of {} bytes does not fit in memory", size),
            )
        })?;

        // SAFETY: the map is read-only and owned by the returned Source.
        // Concurrent modification of the file by another process is outside
        // this crate's control, as with any file-backed map.
        let mmap = unsafe { MmapOptions::new().len(len).map(file)? };

        #[cfg(unix)]
        {
            let _ = mmap.advise(memmap2::Advice::Sequential);
        }

        tracing::debug!(bytes = len, "Mapped input file");
        Ok(Source::Mapped(mmap))
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Source::Borrowed(bytes) => *bytes,
            Source::Mapped(mmap) => &mmap[..],
            Source::Empty => &[],
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, Source::Mapped(_))
    }
}

impl Deref for Source<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for Source<'_> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Size of `file` in bytes.
///
/// Only regular files have a meaningful length; pipes, sockets and devices
/// report 0 or garbage and are rejected as `TipError::Io`.
pub fn file_size(file: &File) -> Result<u64> {
    let metadata = file.metadata()?;
    if !metadata.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cannot determine size of non-regular file ({:?})", metadata.file_type()),
        )
        .into());
    }
    Ok(metadata.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_buffer() {
        let buf = b"1,2\n".to_vec();
        let source = Source::from_buffer(&buf);
        assert!(!source.is_mapped());
        assert_eq!(source.as_bytes(), b"1,2\n");
        assert_eq!(source.len(), 4);
    }

    #[test]
    fn test_from_file_maps_contents() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(b"a,b\nc,d\n").unwrap();
        file.flush().unwrap();

        assert_eq!(file_size(&file).unwrap(), 8);
        let source = Source::from_file(&file).unwrap();
        assert!(source.is_mapped());
        assert_eq!(&source[..], b"a,b\nc,d\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_size_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let handle = File::open(dir.path()).unwrap();
        let err = file_size(&handle).unwrap_err();
        assert_eq!(err.code(), "IO_ERROR");
        let err = Source::from_file(&handle).unwrap_err();
        assert_eq!(err.code(), "IO_ERROR");
    }

    #[cfg(unix)]
    #[test]
    fn test_character_device_is_io_error() {
        let handle = File::open("/dev/null").unwrap();
        let err = Source::from_file(&handle).unwrap_err();
        assert_eq!(err.code(), "IO_ERROR");
    }

    #[test]
    fn test_from_empty_file() {
        let file = tempfile::tempfile().unwrap();
        let source = Source::from_file(&file).unwrap();
        assert!(!source.is_mapped());
        assert!(source.is_empty());
    }
}
