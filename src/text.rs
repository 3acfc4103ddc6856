//! Text readers and writers over streams
//!
//! Input side: stream → BOM detection → [`Decoder`] → [`LineReader`].
//! Output side: text → [`Encoder`] → stream.
//!
//! The encoding of a stream is fixed when it is opened, either given by the
//! caller or detected from a BOM (falling back to the host encoding).

use crate::codec::{Codec, TextCodec};
use crate::config::TextIoConfig;
use crate::decoder::Decoder;
use crate::detect::detect_bom;
use crate::encoder::Encoder;
use crate::encoding::Encoding;
use crate::error::{Error, Result};
use crate::lines::LineReader;
use crate::stream::{ByteSource, Mode, StreamHandle, Target};
use std::io::Read;
use tracing::debug;

/// Line-oriented reader over an encoded byte stream
pub struct TextReader<R = StreamHandle> {
    lines: LineReader<Decoder<R>>,
    had_bom: bool,
}

impl TextReader<StreamHandle> {
    /// Open `target` for reading.
    ///
    /// With `encoding == None` the encoding comes from a BOM, or is the
    /// configured host encoding when there is none.
    pub fn open(target: Target, encoding: Option<Encoding>, config: &TextIoConfig) -> Result<Self> {
        let handle = StreamHandle::open(target, Mode::Read)?;
        let src = ByteSource::from_handle(handle, config.buffer_size);
        Self::from_source(src, encoding, config)
    }

    /// Release the underlying stream
    pub fn close(self) -> Result<()> {
        self.lines.into_inner().into_source().into_inner().close()
    }
}

impl<R: Read> TextReader<R> {
    /// Read from any byte reader; `name` identifies it in errors
    pub fn from_reader(reader: R, name: &str, encoding: Option<Encoding>, config: &TextIoConfig) -> Result<Self> {
        let src = ByteSource::with_chunk_size(reader, name, config.buffer_size);
        Self::from_source(src, encoding, config)
    }

    /// Select the encoding at the current position of `src` and start decoding.
    ///
    /// When `encoding` is given explicitly, a leading BOM of that same
    /// encoding is skipped; any other leading bytes are text.
    pub fn from_source(mut src: ByteSource<R>, encoding: Option<Encoding>, config: &TextIoConfig) -> Result<Self> {
        let (encoding, had_bom) = match encoding {
            None => match detect_bom(&mut src)? {
                Some(found) => (found.encoding, true),
                None => (Encoding::Host, false),
            },
            Some(requested) => {
                let bom = requested.bom();
                let had_bom = !bom.is_empty() && src.peek(bom.len())? == bom;
                if had_bom {
                    src.consume(bom.len());
                }
                (requested, had_bom)
            }
        };
        let codec = TextCodec::resolve(encoding, config.host_encoding);
        debug!(stream = src.name(), requested = %encoding, resolved = %codec.encoding(), had_bom, "reader ready");
        Ok(Self { lines: LineReader::new(Decoder::new(src, codec)), had_bom })
    }

    /// Concrete encoding the stream is decoded with
    pub fn encoding(&self) -> Encoding {
        self.lines.get_ref().encoding()
    }

    /// Whether a BOM was found and skipped
    pub fn had_bom(&self) -> bool {
        self.had_bom
    }

    /// Next line without its terminator, or `None` at the end
    pub fn read_line(&mut self) -> Result<Option<String>> {
        self.lines.next().transpose()
    }

    /// 1-based number of the last line read
    pub fn line_number(&self) -> usize {
        self.lines.line_number()
    }

    /// Decode everything that is left, terminators included
    pub fn read_to_string(&mut self) -> Result<String> {
        self.lines.get_mut().collect()
    }

    /// Scalar values that have not been read yet
    pub fn chars(&mut self) -> &mut Decoder<R> {
        self.lines.get_mut()
    }
}

impl<R: Read> Iterator for TextReader<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next()
    }
}

/// Encoding writer over a stream.
///
/// Output is buffered in the stream and flushed on [`TextWriter::close`] or
/// drop.
pub struct TextWriter {
    handle: StreamHandle,
    encoder: Encoder,
    scratch: Vec<u8>,
}

impl TextWriter {
    /// Open `target` for writing (files are truncated). `None` selects the
    /// host encoding.
    pub fn open(target: Target, encoding: Option<Encoding>, config: &TextIoConfig) -> Result<Self> {
        let handle = StreamHandle::open(target, Mode::Write)?;
        Self::from_handle(handle, encoding, config)
    }

    /// Write through an already opened handle
    pub fn from_handle(handle: StreamHandle, encoding: Option<Encoding>, config: &TextIoConfig) -> Result<Self> {
        if handle.mode() != Mode::Write {
            return Err(Error::InvalidOperation {
                stream: handle.name().to_string(),
                reason: "text writer needs a stream opened for writing",
            });
        }
        let encoding = encoding.unwrap_or(Encoding::Host);
        let encoder = Encoder::for_encoding(encoding, config);
        debug!(stream = handle.name(), requested = %encoding, resolved = %encoder.encoding(), "writer ready");
        Ok(Self { handle, encoder, scratch: Vec::new() })
    }

    pub fn encoding(&self) -> Encoding {
        self.encoder.encoding()
    }

    pub fn write_str(&mut self, text: &str) -> Result<()> {
        self.scratch.clear();
        self.encoder.encode_str(text, &mut self.scratch);
        self.handle.write(&self.scratch)?;
        Ok(())
    }

    /// Write `line` followed by `\n`
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.scratch.clear();
        self.encoder.encode_str(line, &mut self.scratch);
        self.encoder.encode_str("\n", &mut self.scratch);
        self.handle.write(&self.scratch)?;
        Ok(())
    }

    /// Write raw code points; nothing is written if any of them is invalid
    pub fn write_code_points<I>(&mut self, code_points: I) -> Result<()>
    where
        I: IntoIterator<Item = u32>,
    {
        self.scratch.clear();
        if let Err(e) = self.encoder.encode_code_points(code_points, &mut self.scratch) {
            debug!(stream = self.handle.name(), error = %e, "encode failed");
            return Err(e.into());
        }
        self.handle.write(&self.scratch)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.handle.flush()
    }

    /// Emit a pending BOM, flush and release the stream. Idempotent.
    pub fn close(&mut self) -> Result<()> {
        if self.handle.is_closed() {
            return Ok(());
        }
        self.scratch.clear();
        self.encoder.finish(&mut self.scratch);
        if !self.scratch.is_empty() {
            self.handle.write(&self.scratch)?;
        }
        self.handle.close()
    }
}
