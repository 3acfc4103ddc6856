//! UTF-8

use super::{scalar_value, Codec};
use crate::encoding::Encoding;
use crate::error::{DecodeError, DecodeErrorKind, EncodeError, Error, Result};
use crate::stream::ByteSource;
use std::io::Read;

/// UTF-8 codec: 1 to 4 bytes per scalar value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Utf8;

impl Utf8 {
    pub(crate) fn push_char(&self, ch: char, out: &mut Vec<u8>) {
        let mut buf = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
    }
}

impl Codec for Utf8 {
    fn encoding(&self) -> Encoding {
        Encoding::Utf8
    }

    fn decode_next<R: Read>(&self, src: &mut ByteSource<R>) -> Result<Option<char>> {
        let offset = src.offset();
        let fail = |kind| Error::from(DecodeError::new(kind, offset, Encoding::Utf8));

        let lead = match src.peek(1)?.first() {
            Some(&b) => b,
            None => return Ok(None),
        };

        // (sequence length, payload bits of the lead byte, smallest value for that length)
        let (len, mut cp, min) = match lead {
            0x00..=0x7F => {
                src.consume(1);
                return Ok(Some(char::from(lead)));
            }
            0x80..=0xBF => return Err(fail(DecodeErrorKind::InvalidStartByte)),
            0xC0..=0xDF => (2, u32::from(lead & 0x1F), 0x80),
            0xE0..=0xEF => (3, u32::from(lead & 0x0F), 0x800),
            0xF0..=0xF7 => (4, u32::from(lead & 0x07), 0x1_0000),
            0xF8..=0xFF => return Err(fail(DecodeErrorKind::InvalidStartByte)),
        };

        let bytes = src.peek(len)?;
        for i in 1..len {
            match bytes.get(i) {
                Some(&b) if b & 0xC0 == 0x80 => cp = (cp << 6) | u32::from(b & 0x3F),
                _ => return Err(fail(DecodeErrorKind::TruncatedSequence)),
            }
        }

        if cp < min {
            return Err(fail(DecodeErrorKind::OverlongEncoding));
        }
        if (0xD800..=0xDFFF).contains(&cp) {
            return Err(fail(DecodeErrorKind::InvalidSurrogate));
        }
        let ch = char::from_u32(cp).ok_or_else(|| fail(DecodeErrorKind::OutOfRangeScalar))?;
        src.consume(len);
        Ok(Some(ch))
    }

    fn encode(&self, code_point: u32, out: &mut Vec<u8>) -> std::result::Result<(), EncodeError> {
        self.push_char(scalar_value(code_point)?, out);
        Ok(())
    }
}
