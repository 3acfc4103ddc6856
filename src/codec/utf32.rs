//! UTF-32, both byte orders

use super::{scalar_value, u32_from, u32_to, Codec};
use crate::encoding::{ByteOrder, Encoding};
use crate::error::{DecodeError, DecodeErrorKind, EncodeError, Error, Result};
use crate::stream::ByteSource;
use std::io::Read;

/// UTF-32 codec: one 4-byte code unit per scalar value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Utf32 {
    order: ByteOrder,
}

impl Utf32 {
    pub fn new(order: ByteOrder) -> Self {
        Self { order }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    pub(crate) fn push_char(&self, ch: char, out: &mut Vec<u8>) {
        out.extend_from_slice(&u32_to(self.order, u32::from(ch)));
    }
}

impl Codec for Utf32 {
    fn encoding(&self) -> Encoding {
        match self.order {
            ByteOrder::BigEndian => Encoding::Utf32Be,
            ByteOrder::LittleEndian => Encoding::Utf32Le,
        }
    }

    fn decode_next<R: Read>(&self, src: &mut ByteSource<R>) -> Result<Option<char>> {
        let offset = src.offset();
        let encoding = self.encoding();
        let fail = |kind| Error::from(DecodeError::new(kind, offset, encoding));

        let cp = match *src.peek(4)? {
            [] => return Ok(None),
            [a, b, c, d] => u32_from(self.order, [a, b, c, d]),
            _ => return Err(fail(DecodeErrorKind::TruncatedSequence)),
        };
        if (0xD800..=0xDFFF).contains(&cp) {
            return Err(fail(DecodeErrorKind::InvalidSurrogate));
        }
        let ch = char::from_u32(cp).ok_or_else(|| fail(DecodeErrorKind::OutOfRangeScalar))?;
        src.consume(4);
        Ok(Some(ch))
    }

    fn encode(&self, code_point: u32, out: &mut Vec<u8>) -> std::result::Result<(), EncodeError> {
        self.push_char(scalar_value(code_point)?, out);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const BE: Utf32 = Utf32 { order: ByteOrder::BigEndian };
    const LE: Utf32 = Utf32 { order: ByteOrder::LittleEndian };

    fn decode(codec: Utf32, bytes: &[u8]) -> Result<String> {
        let mut src = ByteSource::new(Cursor::new(bytes.to_vec()), "mem");
        let mut out = String::new();
        while let Some(ch) = codec.decode_next(&mut src)? {
            out.push(ch);
        }
        Ok(out)
    }

    fn decode_err(codec: Utf32, bytes: &[u8]) -> DecodeError {
        match decode(codec, bytes) {
            Err(Error::Decode(e)) => e,
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_both_orders() {
        assert_eq!(decode(LE, b"A\x00\x00\x00\x00\xF6\x01\x00").unwrap(), "A\u{1F600}");
        assert_eq!(decode(BE, b"\x00\x00\x00A\x00\x01\xF6\x00").unwrap(), "A\u{1F600}");
    }

    #[test]
    fn test_decode_surrogate_value() {
        let err = decode_err(BE, b"\x00\x00\x00A\x00\x00\xD8\x00");
        assert_eq!(err.kind, DecodeErrorKind::InvalidSurrogate);
        assert_eq!(err.offset, 4);
    }

    #[test]
    fn test_decode_out_of_range() {
        assert_eq!(decode_err(LE, b"\x00\x00\x11\x00").kind, DecodeErrorKind::OutOfRangeScalar);
        assert_eq!(decode_err(BE, b"\xFF\xFF\xFF\xFF").kind, DecodeErrorKind::OutOfRangeScalar);
    }

    #[test]
    fn test_decode_truncated() {
        assert_eq!(decode_err(LE, b"A\x00\x00\x00B\x00").kind, DecodeErrorKind::TruncatedSequence);
    }

    #[test]
    fn test_encode_direct() {
        let mut out = Vec::new();
        LE.encode(0x1F600, &mut out).unwrap();
        assert_eq!(out, b"\x00\xF6\x01\x00");
    }

    #[test]
    fn test_encode_rejects_surrogate() {
        let mut out = Vec::new();
        assert_eq!(BE.encode(0xD801, &mut out), Err(EncodeError::SurrogateScalar(0xD801)));
    }
}
