//! Byte streams over files, standard streams and pipes
//!
//! A [`StreamHandle`] owns exactly one OS resource and releases it once, either
//! through [`StreamHandle::close`] or when dropped. Output is buffered and
//! flushed before release.
//!
//! [`ByteSource`] adds the look-ahead the detector and decoders need: bytes can
//! be peeked without being consumed, and the source keeps track of how many
//! bytes have been consumed so far (used for error offsets).

use crate::error::{Error, Result};
use std::fs;
use std::io::{self, BufWriter, PipeReader, PipeWriter, Read, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Stream identity used for standard input
pub const STDIN_NAME: &str = "<stdin>";
/// Stream identity used for standard output
pub const STDOUT_NAME: &str = "<stdout>";
/// Stream identity used for pipe ends
pub const PIPE_NAME: &str = "<pipe>";

/// Default read chunk for [`ByteSource`]
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// One end of an anonymous pipe
#[derive(Debug)]
pub enum PipeEnd {
    Reader(PipeReader),
    Writer(PipeWriter),
}

/// What a stream is opened on
#[derive(Debug)]
pub enum Target {
    /// A file system path
    Path(PathBuf),
    /// The process's standard input
    Stdin,
    /// The process's standard output
    Stdout,
    /// A pipe endpoint
    Pipe(PipeEnd),
}

impl Target {
    /// Identity attached to errors and log records
    pub fn display_name(&self) -> String {
        match self {
            Target::Path(path) => path.display().to_string(),
            Target::Stdin => STDIN_NAME.to_string(),
            Target::Stdout => STDOUT_NAME.to_string(),
            Target::Pipe(_) => PIPE_NAME.to_string(),
        }
    }
}

impl From<PathBuf> for Target {
    fn from(path: PathBuf) -> Self {
        Target::Path(path)
    }
}

impl From<&std::path::Path> for Target {
    fn from(path: &std::path::Path) -> Self {
        Target::Path(path.to_path_buf())
    }
}

/// Direction of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
}

enum Inner {
    Reader(Box<dyn Read + Send>),
    Writer(BufWriter<Box<dyn Write + Send>>),
    Closed,
}

/// Exclusive owner of one readable or writable resource
pub struct StreamHandle {
    name: String,
    mode: Mode,
    inner: Inner,
}

impl StreamHandle {
    /// Open `target` for reading or writing.
    ///
    /// Writing to a path creates or truncates the file. Reading a path that
    /// does not exist fails with [`Error::Io`]. Standard input can only be
    /// read and standard output only written; pipe ends follow their kind.
    pub fn open(target: Target, mode: Mode) -> Result<Self> {
        let name = target.display_name();
        let inner = match (target, mode) {
            (Target::Path(path), Mode::Read) => {
                let file = fs::File::open(&path).map_err(|e| Error::io(&name, e))?;
                Inner::Reader(Box::new(file))
            }
            (Target::Path(path), Mode::Write) => {
                let file = fs::File::create(&path).map_err(|e| Error::io(&name, e))?;
                Inner::Writer(BufWriter::new(Box::new(file)))
            }
            (Target::Stdin, Mode::Read) => Inner::Reader(Box::new(io::stdin())),
            (Target::Stdout, Mode::Write) => Inner::Writer(BufWriter::new(Box::new(io::stdout()))),
            (Target::Pipe(PipeEnd::Reader(reader)), Mode::Read) => Inner::Reader(Box::new(reader)),
            (Target::Pipe(PipeEnd::Writer(writer)), Mode::Write) => {
                Inner::Writer(BufWriter::new(Box::new(writer)))
            }
            (_, mode) => {
                return Err(Error::InvalidOperation {
                    stream: name,
                    reason: match mode {
                        Mode::Read => "target cannot be opened for reading",
                        Mode::Write => "target cannot be opened for writing",
                    },
                });
            }
        };
        debug!(stream = %name, ?mode, "opened stream");
        Ok(Self { name, mode, inner })
    }

    /// Create an anonymous pipe, returning its (read, write) ends as handles
    pub fn pipe() -> Result<(StreamHandle, StreamHandle)> {
        let (reader, writer) = io::pipe().map_err(|e| Error::io(PIPE_NAME, e))?;
        let reader = Self::open(Target::Pipe(PipeEnd::Reader(reader)), Mode::Read)?;
        let writer = Self::open(Target::Pipe(PipeEnd::Writer(writer)), Mode::Write)?;
        Ok((reader, writer))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.inner, Inner::Closed)
    }

    /// Read up to `max_bytes`, blocking until that many are available.
    ///
    /// Fewer bytes are returned only at end of data.
    pub fn read(&mut self, max_bytes: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; max_bytes];
        let n = self.read_full(&mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }

    /// Fill `buf` completely unless end of data comes first; returns the count read
    pub fn read_full(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read_some(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::io(&self.name, e)),
            }
        }
        Ok(filled)
    }

    /// Fill `buf` completely; end of data first is [`Error::UnexpectedEof`]
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.read_full(buf)? < buf.len() {
            return Err(Error::UnexpectedEof { stream: self.name.clone() });
        }
        Ok(())
    }

    /// Write all of `bytes`; returns the count written
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        match &mut self.inner {
            Inner::Writer(writer) => {
                writer.write_all(bytes).map_err(|e| Error::io(&self.name, e))?;
                Ok(bytes.len())
            }
            Inner::Reader(_) => Err(self.invalid("stream is open for reading")),
            Inner::Closed => Err(self.invalid("stream is closed")),
        }
    }

    /// Push buffered output to the underlying resource
    pub fn flush(&mut self) -> Result<()> {
        match &mut self.inner {
            Inner::Writer(writer) => writer.flush().map_err(|e| Error::io(&self.name, e)),
            Inner::Reader(_) | Inner::Closed => Ok(()),
        }
    }

    /// Flush pending output and release the resource. Calling it again is a no-op.
    pub fn close(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.inner, Inner::Closed) {
            Inner::Closed => return Ok(()),
            Inner::Writer(mut writer) => {
                writer.flush().map_err(|e| Error::io(&self.name, e))?;
            }
            Inner::Reader(_) => {}
        }
        debug!(stream = %self.name, "closed stream");
        Ok(())
    }

    fn read_some(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.inner {
            Inner::Reader(reader) => reader.read(buf),
            Inner::Writer(_) => Err(io::Error::new(io::ErrorKind::Unsupported, "stream is open for writing")),
            Inner::Closed => Err(io::Error::new(io::ErrorKind::Other, "stream is closed")),
        }
    }

    fn invalid(&self, reason: &'static str) -> Error {
        Error::InvalidOperation { stream: self.name.clone(), reason }
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Read for StreamHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_some(buf)
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(stream = %self.name, error = %e, "failed to flush stream on drop");
        }
    }
}

/// Buffered byte source with look-ahead and a consumed-byte counter
pub struct ByteSource<R> {
    inner: R,
    name: String,
    buf: Vec<u8>,
    pos: usize,
    offset: u64,
    eof: bool,
    chunk_size: usize,
}

impl<R: Read> ByteSource<R> {
    /// Wrap a reader; `name` identifies it in errors
    pub fn new(inner: R, name: impl Into<String>) -> Self {
        Self::with_chunk_size(inner, name, DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(inner: R, name: impl Into<String>, chunk_size: usize) -> Self {
        Self {
            inner,
            name: name.into(),
            buf: Vec::new(),
            pos: 0,
            offset: 0,
            eof: false,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of bytes consumed so far
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Look at up to `n` bytes without consuming them.
    ///
    /// Blocks until `n` bytes are buffered; returns fewer only at end of data.
    pub fn peek(&mut self, n: usize) -> Result<&[u8]> {
        while self.available() < n && !self.eof {
            self.fill_more()?;
        }
        let len = self.available().min(n);
        Ok(&self.buf[self.pos..self.pos + len])
    }

    /// Drop `n` already peeked bytes
    pub fn consume(&mut self, n: usize) {
        let n = n.min(self.available());
        self.pos += n;
        self.offset += n as u64;
    }

    /// True once every byte has been consumed and the reader reported end of data
    pub fn is_at_end(&mut self) -> Result<bool> {
        Ok(self.peek(1)?.is_empty())
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Give back the reader; buffered but unconsumed bytes are lost
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn available(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn fill_more(&mut self) -> Result<()> {
        if self.pos > 0 {
            self.buf.drain(..self.pos);
            self.pos = 0;
        }
        let old_len = self.buf.len();
        self.buf.resize(old_len + self.chunk_size, 0);
        loop {
            match self.inner.read(&mut self.buf[old_len..]) {
                Ok(0) => {
                    self.eof = true;
                    self.buf.truncate(old_len);
                    return Ok(());
                }
                Ok(n) => {
                    self.buf.truncate(old_len + n);
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.buf.truncate(old_len);
                    return Err(Error::io(&self.name, e));
                }
            }
        }
    }
}

impl ByteSource<StreamHandle> {
    /// Wrap an open stream, naming the source after it
    pub fn from_handle(handle: StreamHandle, chunk_size: usize) -> Self {
        let name = handle.name().to_string();
        Self::with_chunk_size(handle, name, chunk_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reader that hands out one byte per call, like a slow pipe
    struct Trickle(Vec<u8>, usize);

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.1 >= self.0.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.0[self.1];
            self.1 += 1;
            Ok(1)
        }
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut src = ByteSource::new(Cursor::new(b"abcdef".to_vec()), "mem");
        assert_eq!(src.peek(3).unwrap(), b"abc");
        assert_eq!(src.peek(4).unwrap(), b"abcd");
        assert_eq!(src.offset(), 0);
        src.consume(2);
        assert_eq!(src.peek(2).unwrap(), b"cd");
        assert_eq!(src.offset(), 2);
    }

    #[test]
    fn test_peek_collects_across_short_reads() {
        let mut src = ByteSource::with_chunk_size(Trickle(b"\xFF\xFE\x00\x00x".to_vec(), 0), "pipe", 2);
        assert_eq!(src.peek(4).unwrap(), b"\xFF\xFE\x00\x00");
        src.consume(4);
        assert_eq!(src.peek(4).unwrap(), b"x");
        src.consume(1);
        assert!(src.is_at_end().unwrap());
        assert_eq!(src.offset(), 5);
    }

    #[test]
    fn test_consume_clamps_to_available() {
        let mut src = ByteSource::new(Cursor::new(b"ab".to_vec()), "mem");
        src.peek(2).unwrap();
        src.consume(10);
        assert_eq!(src.offset(), 2);
    }

    #[test]
    fn test_open_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        let err = StreamHandle::open(Target::Path(path.clone()), Mode::Read).unwrap_err();
        match err {
            Error::Io { stream, source } => {
                assert_eq!(stream, path.display().to_string());
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_write_truncates_and_close_flushes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"old content that is longer").unwrap();

        let mut handle = StreamHandle::open(Target::Path(path.clone()), Mode::Write).unwrap();
        assert_eq!(handle.write(b"new").unwrap(), 3);
        handle.close().unwrap();
        handle.close().unwrap();
        assert!(handle.is_closed());

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn test_read_returns_short_only_at_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.bin");
        std::fs::write(&path, b"0123456789").unwrap();

        let mut handle = StreamHandle::open(Target::Path(path), Mode::Read).unwrap();
        assert_eq!(handle.read(4).unwrap(), b"0123");
        assert_eq!(handle.read(4).unwrap(), b"4567");
        assert_eq!(handle.read(4).unwrap(), b"89");
        assert!(handle.read(4).unwrap().is_empty());
    }

    #[test]
    fn test_read_exact_reports_premature_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.bin");
        std::fs::write(&path, b"abc").unwrap();

        let mut handle = StreamHandle::open(Target::Path(path), Mode::Read).unwrap();
        let mut buf = [0u8; 2];
        handle.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ab");
        assert!(matches!(handle.read_exact(&mut buf), Err(Error::UnexpectedEof { .. })));
    }

    #[test]
    fn test_direction_mismatch_rejected() {
        assert!(matches!(
            StreamHandle::open(Target::Stdin, Mode::Write),
            Err(Error::InvalidOperation { .. })
        ));
        assert!(matches!(
            StreamHandle::open(Target::Stdout, Mode::Read),
            Err(Error::InvalidOperation { .. })
        ));
    }

    #[test]
    fn test_write_after_close_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut handle = StreamHandle::open(Target::Path(dir.path().join("x")), Mode::Write).unwrap();
        handle.close().unwrap();
        assert!(matches!(handle.write(b"x"), Err(Error::InvalidOperation { .. })));
    }

    #[test]
    fn test_pipe_round_trip() {
        let (mut reader, mut writer) = StreamHandle::pipe().unwrap();
        writer.write(b"through the pipe").unwrap();
        writer.close().unwrap();
        drop(writer);
        assert_eq!(reader.read(64).unwrap(), b"through the pipe");
    }
}
