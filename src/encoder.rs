//! Encoding of Unicode scalar values into bytes

use crate::codec::{Codec, TextCodec};
use crate::config::TextIoConfig;
use crate::encoding::Encoding;
use crate::error::EncodeError;

/// Converts scalar values into bytes in one target encoding.
///
/// No BOM is produced unless requested with [`Encoder::with_bom`]; when it
/// is, the BOM precedes the first encoded bytes and is written only once.
#[derive(Debug, Clone)]
pub struct Encoder {
    codec: TextCodec,
    bom_pending: bool,
}

impl Encoder {
    /// Create an encoder that writes no BOM
    pub fn new(codec: TextCodec) -> Self {
        Self { codec, bom_pending: false }
    }

    /// Encoder for `encoding` as configured: `Host` resolves to the config's
    /// host encoding and never gets a BOM
    pub fn for_encoding(encoding: Encoding, config: &TextIoConfig) -> Self {
        let codec = TextCodec::resolve(encoding, config.host_encoding);
        Self::new(codec).with_bom(config.emit_bom && !encoding.is_host())
    }

    /// Request (or cancel) BOM emission before the first output
    pub fn with_bom(mut self, emit: bool) -> Self {
        self.bom_pending = emit;
        self
    }

    pub fn encoding(&self) -> Encoding {
        self.codec.encoding()
    }

    /// True until a requested BOM has been written
    pub fn bom_pending(&self) -> bool {
        self.bom_pending
    }

    /// Encode one code point.
    ///
    /// Surrogates and values above U+10FFFF are rejected and leave `out`
    /// untouched.
    pub fn encode_code_point(&mut self, code_point: u32, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        self.encode_code_points(std::iter::once(code_point), out)
    }

    /// Encode a run of code points. On failure `out` is restored to its
    /// length before the call.
    pub fn encode_code_points<I>(&mut self, code_points: I, out: &mut Vec<u8>) -> Result<(), EncodeError>
    where
        I: IntoIterator<Item = u32>,
    {
        let mark = out.len();
        let bom_was_pending = self.bom_pending;
        self.write_bom(out);
        for cp in code_points {
            if let Err(e) = self.codec.encode(cp, out) {
                out.truncate(mark);
                self.bom_pending = bom_was_pending;
                return Err(e);
            }
        }
        Ok(())
    }

    /// Encode text; every `char` is a valid scalar value so this cannot fail
    pub fn encode_str(&mut self, text: &str, out: &mut Vec<u8>) {
        self.write_bom(out);
        self.codec.encode_str(text, out);
    }

    /// Write a BOM that was requested but not yet emitted (empty output)
    pub fn finish(&mut self, out: &mut Vec<u8>) {
        self.write_bom(out);
    }

    fn write_bom(&mut self, out: &mut Vec<u8>) {
        if self.bom_pending {
            out.extend_from_slice(self.codec.bom_bytes());
            self.bom_pending = false;
        }
    }
}

/// Encode a complete string without a BOM. `Host` resolves to the default
/// host encoding.
pub fn encode_all(text: &str, encoding: Encoding) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    Encoder::for_encoding(encoding, &TextIoConfig::default()).encode_str(text, &mut out);
    out
}
