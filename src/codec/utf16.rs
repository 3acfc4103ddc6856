//! UTF-16, both byte orders

use super::{scalar_value, u16_from, u16_to, Codec};
use crate::encoding::{ByteOrder, Encoding};
use crate::error::{DecodeError, DecodeErrorKind, EncodeError, Error, Result};
use crate::stream::ByteSource;
use std::io::Read;

const HIGH_SURROGATES: std::ops::RangeInclusive<u16> = 0xD800..=0xDBFF;
const LOW_SURROGATES: std::ops::RangeInclusive<u16> = 0xDC00..=0xDFFF;

/// UTF-16 codec: 2-byte code units, surrogate pairs above U+FFFF
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Utf16 {
    order: ByteOrder,
}

impl Utf16 {
    pub fn new(order: ByteOrder) -> Self {
        Self { order }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    pub(crate) fn push_char(&self, ch: char, out: &mut Vec<u8>) {
        let mut units = [0u16; 2];
        for unit in ch.encode_utf16(&mut units) {
            out.extend_from_slice(&u16_to(self.order, *unit));
        }
    }
}

impl Codec for Utf16 {
    fn encoding(&self) -> Encoding {
        match self.order {
            ByteOrder::BigEndian => Encoding::Utf16Be,
            ByteOrder::LittleEndian => Encoding::Utf16Le,
        }
    }

    fn decode_next<R: Read>(&self, src: &mut ByteSource<R>) -> Result<Option<char>> {
        let offset = src.offset();
        let encoding = self.encoding();
        let fail = |kind| Error::from(DecodeError::new(kind, offset, encoding));

        let head = src.peek(2)?;
        let unit = match *head {
            [] => return Ok(None),
            [_] => return Err(fail(DecodeErrorKind::TruncatedSequence)),
            [a, b, ..] => u16_from(self.order, [a, b]),
        };

        if LOW_SURROGATES.contains(&unit) {
            return Err(fail(DecodeErrorKind::InvalidSurrogate));
        }
        if !HIGH_SURROGATES.contains(&unit) {
            let ch = char::from_u32(u32::from(unit))
                .ok_or_else(|| fail(DecodeErrorKind::InvalidSurrogate))?;
            src.consume(2);
            return Ok(Some(ch));
        }

        let pair = src.peek(4)?;
        let low = match *pair {
            [_, _, c, d] => u16_from(self.order, [c, d]),
            // high surrogate is the last code unit
            [_, _] => return Err(fail(DecodeErrorKind::InvalidSurrogate)),
            _ => return Err(fail(DecodeErrorKind::TruncatedSequence)),
        };
        if !LOW_SURROGATES.contains(&low) {
            return Err(fail(DecodeErrorKind::InvalidSurrogate));
        }

        let cp = 0x1_0000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
        let ch = char::from_u32(cp).ok_or_else(|| fail(DecodeErrorKind::OutOfRangeScalar))?;
        src.consume(4);
        Ok(Some(ch))
    }

    fn encode(&self, code_point: u32, out: &mut Vec<u8>) -> std::result::Result<(), EncodeError> {
        self.push_char(scalar_value(code_point)?, out);
        Ok(())
    }
}
