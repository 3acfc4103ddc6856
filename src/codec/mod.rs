//! Per-encoding transcoding
//!
//! Every concrete encoding implements [`Codec`]: it knows its BOM, can pull
//! one scalar value out of a [`ByteSource`], and can append one scalar value
//! to a byte buffer. [`TextCodec`] is the closed set of codecs, selected from
//! an [`Encoding`] once `Host` has been resolved.

mod utf16;
mod utf32;
mod utf8;

pub use utf16::Utf16;
pub use utf32::Utf32;
pub use utf8::Utf8;

use crate::encoding::{ByteOrder, Encoding};
use crate::error::{EncodeError, Result};
use crate::stream::ByteSource;
use std::io::Read;

/// Capabilities shared by all encodings
pub trait Codec {
    /// The concrete encoding handled by this codec
    fn encoding(&self) -> Encoding;

    /// Signature written when BOM emission is requested
    fn bom_bytes(&self) -> &'static [u8] {
        self.encoding().bom()
    }

    /// Decode the next scalar value, consuming its bytes.
    ///
    /// Returns `Ok(None)` at end of data. On malformed input nothing is
    /// consumed and a [`crate::DecodeError`] is returned whose offset points at
    /// the first byte of the bad sequence.
    fn decode_next<R: Read>(&self, src: &mut ByteSource<R>) -> Result<Option<char>>;

    /// Append the encoded form of `code_point` to `out`
    fn encode(&self, code_point: u32, out: &mut Vec<u8>) -> std::result::Result<(), EncodeError>;
}

/// One codec per concrete encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCodec {
    Utf8(Utf8),
    Utf16(Utf16),
    Utf32(Utf32),
}

impl TextCodec {
    /// Codec for `encoding`, with `Host` resolved to `host`.
    ///
    /// A `host` that is itself `Host` is treated as UTF-8.
    pub fn resolve(encoding: Encoding, host: Encoding) -> Self {
        match encoding.resolve(host) {
            Encoding::Host | Encoding::Utf8 => TextCodec::Utf8(Utf8),
            Encoding::Utf16Be => TextCodec::Utf16(Utf16::new(ByteOrder::BigEndian)),
            Encoding::Utf16Le => TextCodec::Utf16(Utf16::new(ByteOrder::LittleEndian)),
            Encoding::Utf32Be => TextCodec::Utf32(Utf32::new(ByteOrder::BigEndian)),
            Encoding::Utf32Le => TextCodec::Utf32(Utf32::new(ByteOrder::LittleEndian)),
        }
    }

    /// Encode a whole string
    pub fn encode_str(&self, text: &str, out: &mut Vec<u8>) {
        for ch in text.chars() {
            self.encode_char(ch, out);
        }
    }

    /// Encode a `char`, which is always a valid scalar value
    pub fn encode_char(&self, ch: char, out: &mut Vec<u8>) {
        match self {
            TextCodec::Utf8(c) => c.push_char(ch, out),
            TextCodec::Utf16(c) => c.push_char(ch, out),
            TextCodec::Utf32(c) => c.push_char(ch, out),
        }
    }
}

impl Codec for TextCodec {
    fn encoding(&self) -> Encoding {
        match self {
            TextCodec::Utf8(c) => c.encoding(),
            TextCodec::Utf16(c) => c.encoding(),
            TextCodec::Utf32(c) => c.encoding(),
        }
    }

    fn decode_next<R: Read>(&self, src: &mut ByteSource<R>) -> Result<Option<char>> {
        match self {
            TextCodec::Utf8(c) => c.decode_next(src),
            TextCodec::Utf16(c) => c.decode_next(src),
            TextCodec::Utf32(c) => c.decode_next(src),
        }
    }

    fn encode(&self, code_point: u32, out: &mut Vec<u8>) -> std::result::Result<(), EncodeError> {
        match self {
            TextCodec::Utf8(c) => c.encode(code_point, out),
            TextCodec::Utf16(c) => c.encode(code_point, out),
            TextCodec::Utf32(c) => c.encode(code_point, out),
        }
    }
}

/// Check that `code_point` is a Unicode scalar value
pub fn scalar_value(code_point: u32) -> std::result::Result<char, EncodeError> {
    if (0xD800..=0xDFFF).contains(&code_point) {
        return Err(EncodeError::SurrogateScalar(code_point));
    }
    char::from_u32(code_point).ok_or(EncodeError::ScalarOutOfRange(code_point))
}

fn u16_from(order: ByteOrder, bytes: [u8; 2]) -> u16 {
    match order {
        ByteOrder::BigEndian => u16::from_be_bytes(bytes),
        ByteOrder::LittleEndian => u16::from_le_bytes(bytes),
    }
}

fn u16_to(order: ByteOrder, unit: u16) -> [u8; 2] {
    match order {
        ByteOrder::BigEndian => unit.to_be_bytes(),
        ByteOrder::LittleEndian => unit.to_le_bytes(),
    }
}

fn u32_from(order: ByteOrder, bytes: [u8; 4]) -> u32 {
    match order {
        ByteOrder::BigEndian => u32::from_be_bytes(bytes),
        ByteOrder::LittleEndian => u32::from_le_bytes(bytes),
    }
}

fn u32_to(order: ByteOrder, unit: u32) -> [u8; 4] {
    match order {
        ByteOrder::BigEndian => unit.to_be_bytes(),
        ByteOrder::LittleEndian => unit.to_le_bytes(),
    }
}
