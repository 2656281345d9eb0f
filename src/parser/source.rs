//! Byte sources the parser pulls its input from.
//!
//! A [`Source`] is opened once before the first read, read in fixed-size
//! chunks as the parser demands bytes, and closed exactly once when parsing
//! ends, whether it succeeded or not. The parser detects end of input by
//! comparing [`Source::offset`] with [`Source::total_size`], so both
//! counters must be accurate for every implementation.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// A pull interface over the raw input bytes.
///
/// The two provided implementations are [`FileSource`] and
/// [`BufferSource`]; the parser treats them identically.
///
/// # Examples
///
/// ```
/// use littlexml::{BufferSource, Source};
///
/// let mut source = BufferSource::new(&b"<a/>"[..]);
/// source.open().unwrap();
/// let mut chunk = [0u8; 2];
/// assert_eq!(source.read(&mut chunk).unwrap(), 2);
/// assert_eq!(&chunk, b"<a");
/// assert_eq!(source.offset(), 2);
/// assert_eq!(source.total_size(), 4);
/// source.close().unwrap();
/// ```
pub trait Source {
    /// Prepares the source for reading. Called once, before any `read`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the underlying resource cannot be opened.
    fn open(&mut self) -> io::Result<()>;

    /// Reads up to `chunk.len()` bytes into `chunk` and returns how many
    /// were read. Advances [`offset`](Source::offset) by the same amount.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the underlying resource cannot be read.
    fn read(&mut self, chunk: &mut [u8]) -> io::Result<usize>;

    /// Releases the underlying resource. Called once, after the last `read`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the resource cannot be released cleanly.
    fn close(&mut self) -> io::Result<()>;

    /// Number of bytes handed out so far.
    fn offset(&self) -> u64;

    /// Total number of bytes the source will hand out.
    fn total_size(&self) -> u64;
}

impl<S: Source + ?Sized> Source for &mut S {
    fn open(&mut self) -> io::Result<()> {
        (**self).open()
    }

    fn read(&mut self, chunk: &mut [u8]) -> io::Result<usize> {
        (**self).read(chunk)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }

    fn offset(&self) -> u64 {
        (**self).offset()
    }

    fn total_size(&self) -> u64 {
        (**self).total_size()
    }
}

fn not_open() -> io::Error {
    io::Error::other("source is not open")
}

/// Reads a file in fixed-size chunks.
///
/// The total size is taken from the file's metadata when the source is
/// opened.
#[derive(Debug)]
pub struct FileSource {
    path: Option<PathBuf>,
    file: Option<File>,
    offset: u64,
    total_size: u64,
}

impl FileSource {
    /// Creates a source that opens `path` when the parse begins.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            file: None,
            offset: 0,
            total_size: 0,
        }
    }

    /// Creates a source over a file handle that is already open.
    ///
    /// The handle must be positioned at the start of the file, since the
    /// total size comes from its metadata.
    #[must_use]
    pub fn from_file(file: File) -> Self {
        Self {
            path: None,
            file: Some(file),
            offset: 0,
            total_size: 0,
        }
    }

    /// Returns the path this source reads from, if it was created from one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Source for FileSource {
    fn open(&mut self) -> io::Result<()> {
        let file = match (self.file.take(), &self.path) {
            (Some(file), _) => file,
            (None, Some(path)) => File::open(path)?,
            (None, None) => return Err(not_open()),
        };
        self.total_size = file.metadata()?.len();
        self.offset = 0;
        self.file = Some(file);
        Ok(())
    }

    fn read(&mut self, chunk: &mut [u8]) -> io::Result<usize> {
        let file = self.file.as_mut().ok_or_else(not_open)?;
        let read = file.read(chunk)?;
        self.offset += read as u64;
        Ok(read)
    }

    fn close(&mut self) -> io::Result<()> {
        drop(self.file.take());
        Ok(())
    }

    fn offset(&self) -> u64 {
        self.offset
    }

    fn total_size(&self) -> u64 {
        self.total_size
    }
}

/// Reads from bytes that are already in memory.
#[derive(Debug, Clone)]
pub struct BufferSource<'a> {
    data: Cow<'a, [u8]>,
    offset: usize,
    open: bool,
}

impl<'a> BufferSource<'a> {
    /// Creates a source over borrowed or owned bytes.
    #[must_use]
    pub fn new(data: impl Into<Cow<'a, [u8]>>) -> Self {
        Self {
            data: data.into(),
            offset: 0,
            open: false,
        }
    }

    /// Returns the bytes not yet handed out.
    #[must_use]
    pub fn remaining(&self) -> &[u8] {
        &self.data[self.offset..]
    }
}

impl Source for BufferSource<'_> {
    fn open(&mut self) -> io::Result<()> {
        self.offset = 0;
        self.open = true;
        Ok(())
    }

    fn read(&mut self, chunk: &mut [u8]) -> io::Result<usize> {
        if !self.open {
            return Err(not_open());
        }
        let remaining = &self.data[self.offset..];
        let count = remaining.len().min(chunk.len());
        chunk[..count].copy_from_slice(&remaining[..count]);
        self.offset += count;
        Ok(count)
    }

    fn close(&mut self) -> io::Result<()> {
        self.open = false;
        Ok(())
    }

    fn offset(&self) -> u64 {
        self.offset as u64
    }

    fn total_size(&self) -> u64 {
        self.data.len() as u64
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn drain(source: &mut impl Source, chunk_size: usize) -> Vec<u8> {
        let mut out = Vec::new();
        let mut chunk = vec![0u8; chunk_size];
        source.open().unwrap();
        while source.offset() < source.total_size() {
            let read = source.read(&mut chunk).unwrap();
            out.extend_from_slice(&chunk[..read]);
        }
        source.close().unwrap();
        out
    }

    #[test]
    fn test_buffer_source_reads_in_chunks() {
        let mut source = BufferSource::new(&b"<root>text</root>"[..]);
        assert_eq!(drain(&mut source, 4), b"<root>text</root>");
        assert_eq!(source.offset(), 17);
        assert_eq!(source.total_size(), 17);
        assert!(source.remaining().is_empty());
    }

    #[test]
    fn test_buffer_source_owned_bytes() {
        let mut source = BufferSource::new(b"<a/>".to_vec());
        assert_eq!(drain(&mut source, 1), b"<a/>");
    }

    #[test]
    fn test_buffer_source_read_before_open_fails() {
        let mut source = BufferSource::new(&b"<a/>"[..]);
        let mut chunk = [0u8; 4];
        assert!(source.read(&mut chunk).is_err());
    }

    #[test]
    fn test_file_source_matches_buffer_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<doc><item id=\"1\"/></doc>").unwrap();

        let mut from_file = FileSource::new(file.path());
        let mut from_buffer = BufferSource::new(&b"<doc><item id=\"1\"/></doc>"[..]);

        assert_eq!(drain(&mut from_file, 3), drain(&mut from_buffer, 3));
        assert_eq!(from_file.total_size(), from_buffer.total_size());
        assert_eq!(from_file.offset(), from_buffer.offset());
    }

    #[test]
    fn test_file_source_from_open_handle() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(b"<a></a>").unwrap();
        std::io::Seek::rewind(&mut file).unwrap();

        let mut source = FileSource::from_file(file);
        assert_eq!(source.path(), None);
        assert_eq!(drain(&mut source, 16), b"<a></a>");
    }

    #[test]
    fn test_file_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = FileSource::new(dir.path().join("missing.xml"));
        let err = source.open().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
