//! # emx-textio
//!
//! Encoding-aware text streams over files, standard input/output and pipes.
//!
//! Supported encodings are UTF-8, UTF-16 and UTF-32 in both byte orders, plus
//! `Host`, an alias for whichever of them the configuration names (UTF-8 by
//! default).
//!
//! ## Reading
//!
//! ```text
//! bytes → BOM detection → Decoder → LineReader → lines
//! ```
//!
//! When no encoding is requested, the first bytes of the stream are checked
//! for a byte order mark:
//!
//! | Encoding | BOM |
//! |---|---|
//! | UTF-8 | `EF BB BF` |
//! | UTF-16BE | `FE FF` |
//! | UTF-16LE | `FF FE` |
//! | UTF-32BE | `00 00 FE FF` |
//! | UTF-32LE | `FF FE 00 00` |
//!
//! Longer signatures are tried first, so `FF FE 00 00` is UTF-32LE. Without a
//! BOM nothing is consumed and the host encoding is used.
//!
//! Decoding is strict: malformed input stops the stream with a
//! [`DecodeError`] carrying the byte offset and the kind of failure.
//!
//! ## Writing
//!
//! ```text
//! text → Encoder → stream
//! ```
//!
//! Output carries no BOM unless [`TextIoConfig::emit_bom`] is set.
//!
//! ```rust
//! use emx_textio::{decode_all, encode_all, Encoding};
//!
//! let bytes = encode_all("Line 1st\n", Encoding::Utf16Be);
//! assert_eq!(&bytes[..4], b"\x00L\x00i");
//! assert_eq!(decode_all(&bytes, Encoding::Utf16Be).unwrap(), "Line 1st\n");
//! ```

pub mod codec;
pub mod config;
pub mod decoder;
pub mod detect;
pub mod encoder;
pub mod encoding;
pub mod error;
pub mod lines;
pub mod stream;
pub mod text;

pub use codec::{Codec, TextCodec};
pub use config::TextIoConfig;
pub use decoder::{decode_all, Decoder};
pub use detect::{detect_bom, match_bom, Detection};
pub use encoder::{encode_all, Encoder};
pub use encoding::{ByteOrder, Encoding, UnknownEncoding};
pub use error::{DecodeError, DecodeErrorKind, EncodeError, Error, Result};
pub use lines::LineReader;
pub use stream::{ByteSource, Mode, PipeEnd, StreamHandle, Target};
pub use text::{TextReader, TextWriter};
