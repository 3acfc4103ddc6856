//! Lazy decoding of bytes into Unicode scalar values

use crate::codec::{Codec, TextCodec};
use crate::config::TextIoConfig;
use crate::encoding::Encoding;
use crate::error::{Error, Result};
use crate::stream::ByteSource;
use std::io::{Cursor, Read};
use tracing::debug;

/// Forward-only sequence of scalar values decoded from a byte source.
///
/// The sequence ends at end of data or at the first error; once it has
/// ended, every further pull returns `None`. It cannot be restarted.
pub struct Decoder<R> {
    src: ByteSource<R>,
    codec: TextCodec,
    finished: bool,
}

impl<R: Read> Decoder<R> {
    /// Decode `src` with `codec`, starting at the source's current position
    pub fn new(src: ByteSource<R>, codec: TextCodec) -> Self {
        Self { src, codec, finished: false }
    }

    pub fn encoding(&self) -> Encoding {
        self.codec.encoding()
    }

    /// Bytes consumed from the source so far, BOM included
    pub fn offset(&self) -> u64 {
        self.src.offset()
    }

    /// Pull the next scalar value: `Ok(None)` at the end, `Err` on malformed
    /// input or I/O failure
    pub fn decode_next(&mut self) -> Result<Option<char>> {
        if self.finished {
            return Ok(None);
        }
        match self.codec.decode_next(&mut self.src) {
            Ok(Some(ch)) => Ok(Some(ch)),
            Ok(None) => {
                self.finished = true;
                Ok(None)
            }
            Err(e) => {
                self.finished = true;
                if let Error::Decode(decode) = &e {
                    debug!(
                        stream = self.src.name(),
                        encoding = %decode.encoding,
                        kind = %decode.kind,
                        offset = decode.offset,
                        "decode failed"
                    );
                }
                Err(e)
            }
        }
    }

    pub fn source(&self) -> &ByteSource<R> {
        &self.src
    }

    pub fn into_source(self) -> ByteSource<R> {
        self.src
    }
}

impl<R: Read> Iterator for Decoder<R> {
    type Item = Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        self.decode_next().transpose()
    }
}

impl<R: Read> std::iter::FusedIterator for Decoder<R> {}

/// Decode a complete buffer (no BOM handling). `Host` resolves to the
/// default host encoding.
pub fn decode_all(bytes: &[u8], encoding: Encoding) -> Result<String> {
    let codec = TextCodec::resolve(encoding, TextIoConfig::default().host_encoding);
    let src = ByteSource::new(Cursor::new(bytes), "<memory>");
    Decoder::new(src, codec).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorKind;

    #[test]
    fn test_decode_iterates_scalars() {
        let codec = TextCodec::resolve(Encoding::Utf16Le, Encoding::Utf8);
        let src = ByteSource::new(Cursor::new(b"h\x00i\x00".to_vec()), "mem");
        let chars: Vec<char> = Decoder::new(src, codec).map(|r| r.unwrap()).collect();
        assert_eq!(chars, vec!['h', 'i']);
    }

    #[test]
    fn test_decoder_stops_after_error() {
        let codec = TextCodec::resolve(Encoding::Utf8, Encoding::Utf8);
        let src = ByteSource::new(Cursor::new(b"a\xFFb".to_vec()), "mem");
        let mut decoder = Decoder::new(src, codec);

        assert_eq!(decoder.next().unwrap().unwrap(), 'a');
        let err = decoder.next().unwrap().unwrap_err();
        assert_eq!(err.as_decode().unwrap().kind, DecodeErrorKind::InvalidStartByte);
        assert!(decoder.next().is_none());
        assert!(decoder.next().is_none());
    }

    #[test]
    fn test_decode_all_host_is_utf8() {
        assert_eq!(decode_all("caf\u{E9}".as_bytes(), Encoding::Host).unwrap(), "caf\u{E9}");
    }

    #[test]
    fn test_decode_all_lone_high_surrogate() {
        let bytes = b"\x00T\x00e\xD8\x3D";
        let err = decode_all(bytes, Encoding::Utf16Be).unwrap_err();
        let decode = err.as_decode().unwrap();
        assert_eq!(decode.kind, DecodeErrorKind::InvalidSurrogate);
        assert_eq!(decode.offset, 4);
    }

    #[test]
    fn test_decode_empty() {
        for enc in Encoding::CONCRETE {
            assert_eq!(decode_all(b"", enc).unwrap(), "");
        }
    }
}
