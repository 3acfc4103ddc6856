//! Byte order mark detection

use crate::encoding::{Encoding, BOM_SIGNATURES, MAX_BOM_LEN};
use crate::error::Result;
use crate::stream::ByteSource;
use std::io::Read;
use tracing::trace;

/// Outcome of a BOM match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub encoding: Encoding,
    /// Bytes consumed from the source (the BOM length)
    pub bom_len: usize,
}

/// Match `bytes` against the known signatures, longest first.
///
/// Pure function over a prefix; see [`detect_bom`] for the consuming version.
pub fn match_bom(bytes: &[u8]) -> Option<Detection> {
    BOM_SIGNATURES
        .iter()
        .find(|(bom, _)| bytes.starts_with(bom))
        .map(|(bom, encoding)| Detection { encoding: *encoding, bom_len: bom.len() })
}

/// Look for a BOM at the current position of `src`.
///
/// Peeks up to four bytes. On a match exactly the signature is consumed; with
/// no match nothing is consumed and `Ok(None)` is returned. Absence of a BOM
/// is not an error. Only I/O failures while peeking are reported.
pub fn detect_bom<R: Read>(src: &mut ByteSource<R>) -> Result<Option<Detection>> {
    let detection = match_bom(src.peek(MAX_BOM_LEN)?);
    match detection {
        Some(found) => {
            src.consume(found.bom_len);
            trace!(stream = src.name(), encoding = %found.encoding, "BOM detected");
        }
        None => trace!(stream = src.name(), "no BOM"),
    }
    Ok(detection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn source(bytes: &[u8]) -> ByteSource<Cursor<Vec<u8>>> {
        ByteSource::new(Cursor::new(bytes.to_vec()), "mem")
    }

    #[test]
    fn test_each_bom_consumes_its_length() {
        for enc in Encoding::CONCRETE {
            let mut bytes = enc.bom().to_vec();
            bytes.extend_from_slice(b"\x41\x42\x43\x44\x45");
            let mut src = source(&bytes);

            let found = detect_bom(&mut src).unwrap().unwrap();
            assert_eq!(found.encoding, enc);
            assert_eq!(found.bom_len, enc.bom().len());
            assert_eq!(src.offset(), enc.bom().len() as u64);
        }
    }

    #[test]
    fn test_utf32le_wins_over_utf16le() {
        let mut src = source(b"\xFF\xFE\x00\x00A\x00\x00\x00");
        let found = detect_bom(&mut src).unwrap().unwrap();
        assert_eq!(found.encoding, Encoding::Utf32Le);
        assert_eq!(src.offset(), 4);
    }

    #[test]
    fn test_utf16le_when_not_followed_by_zeros() {
        let mut src = source(b"\xFF\xFEA\x00");
        let found = detect_bom(&mut src).unwrap().unwrap();
        assert_eq!(found.encoding, Encoding::Utf16Le);
        assert_eq!(src.offset(), 2);
    }

    #[test]
    fn test_no_bom_consumes_nothing() {
        let mut src = source(b"Line 1st\n");
        assert_eq!(detect_bom(&mut src).unwrap(), None);
        assert_eq!(src.offset(), 0);
        assert_eq!(src.peek(4).unwrap(), b"Line");
    }

    #[test]
    fn test_short_and_empty_input() {
        assert_eq!(detect_bom(&mut source(b"")).unwrap(), None);
        assert_eq!(detect_bom(&mut source(b"\xEF\xBB")).unwrap(), None);

        let mut src = source(b"\xFE\xFF");
        assert_eq!(detect_bom(&mut src).unwrap().unwrap().encoding, Encoding::Utf16Be);
        assert!(src.is_at_end().unwrap());
    }

    #[test]
    fn test_match_bom_prefix_only() {
        assert_eq!(match_bom(b"\x00\x00\xFE\xFF").unwrap().encoding, Encoding::Utf32Be);
        assert_eq!(match_bom(b"x\xEF\xBB\xBF"), None);
    }
}
