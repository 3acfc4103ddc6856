//! Supported encodings and their byte order marks

use std::fmt;
use std::str::FromStr;

// BOM signatures
pub const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
pub const UTF16BE_BOM: &[u8] = &[0xFE, 0xFF];
pub const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];
pub const UTF32BE_BOM: &[u8] = &[0x00, 0x00, 0xFE, 0xFF];
pub const UTF32LE_BOM: &[u8] = &[0xFF, 0xFE, 0x00, 0x00];

/// Length of the longest known BOM
pub const MAX_BOM_LEN: usize = 4;

/// BOM signatures in detection order.
///
/// Longest first: `FF FE 00 00` (UTF-32LE) starts with `FF FE` (UTF-16LE).
pub const BOM_SIGNATURES: &[(&[u8], Encoding)] = &[
    (UTF32LE_BOM, Encoding::Utf32Le),
    (UTF32BE_BOM, Encoding::Utf32Be),
    (UTF8_BOM, Encoding::Utf8),
    (UTF16LE_BOM, Encoding::Utf16Le),
    (UTF16BE_BOM, Encoding::Utf16Be),
];

/// Byte order of multi-byte code units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

/// A Unicode transformation format.
///
/// `Host` stands for whichever concrete encoding the configuration resolves it
/// to (see [`crate::TextIoConfig`]); it never carries a BOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Host,
    Utf8,
    Utf16Be,
    Utf16Le,
    Utf32Be,
    Utf32Le,
}

impl Encoding {
    /// All concrete encodings (everything but `Host`)
    pub const CONCRETE: [Encoding; 5] = [
        Encoding::Utf8,
        Encoding::Utf16Be,
        Encoding::Utf16Le,
        Encoding::Utf32Be,
        Encoding::Utf32Le,
    ];

    /// Canonical name
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Host => "host",
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16Be => "UTF-16BE",
            Encoding::Utf16Le => "UTF-16LE",
            Encoding::Utf32Be => "UTF-32BE",
            Encoding::Utf32Le => "UTF-32LE",
        }
    }

    pub fn is_host(&self) -> bool {
        matches!(self, Encoding::Host)
    }

    /// Replace `Host` with `host`; concrete encodings are returned unchanged
    pub fn resolve(self, host: Encoding) -> Encoding {
        match self {
            Encoding::Host => host,
            other => other,
        }
    }

    /// The BOM for this encoding; empty for `Host`
    pub fn bom(&self) -> &'static [u8] {
        match self {
            Encoding::Host => &[],
            Encoding::Utf8 => UTF8_BOM,
            Encoding::Utf16Be => UTF16BE_BOM,
            Encoding::Utf16Le => UTF16LE_BOM,
            Encoding::Utf32Be => UTF32BE_BOM,
            Encoding::Utf32Le => UTF32LE_BOM,
        }
    }

    /// Size in bytes of one code unit, or `None` for `Host`, which has to be
    /// resolved first
    pub fn code_unit_size(&self) -> Option<usize> {
        match self {
            Encoding::Host => None,
            Encoding::Utf8 => Some(1),
            Encoding::Utf16Be | Encoding::Utf16Le => Some(2),
            Encoding::Utf32Be | Encoding::Utf32Le => Some(4),
        }
    }

    /// Byte order of code units; `None` for UTF-8 and `Host`
    pub fn byte_order(&self) -> Option<ByteOrder> {
        match self {
            Encoding::Utf16Be | Encoding::Utf32Be => Some(ByteOrder::BigEndian),
            Encoding::Utf16Le | Encoding::Utf32Le => Some(ByteOrder::LittleEndian),
            Encoding::Host | Encoding::Utf8 => None,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognized encoding name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown encoding '{0}' (expected host, utf8, utf16be, utf16le, utf32be or utf32le)")]
pub struct UnknownEncoding(pub String);

impl FromStr for Encoding {
    type Err = UnknownEncoding;

    /// Accepts `utf8`, `utf-8`, `UTF_16BE` and similar spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "host" => Ok(Encoding::Host),
            "utf8" => Ok(Encoding::Utf8),
            "utf16be" => Ok(Encoding::Utf16Be),
            "utf16le" => Ok(Encoding::Utf16Le),
            "utf32be" => Ok(Encoding::Utf32Be),
            "utf32le" => Ok(Encoding::Utf32Le),
            _ => Err(UnknownEncoding(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signatures_longest_first() {
        for pair in BOM_SIGNATURES.windows(2) {
            assert!(pair[0].0.len() >= pair[1].0.len());
        }
        assert!(BOM_SIGNATURES.iter().all(|(bom, _)| bom.len() <= MAX_BOM_LEN));
    }

    #[test]
    fn test_signatures_match_bom() {
        for (bom, enc) in BOM_SIGNATURES {
            assert_eq!(enc.bom(), *bom);
        }
        assert!(Encoding::Host.bom().is_empty());
    }

    #[test]
    fn test_resolve_host() {
        assert_eq!(Encoding::Host.resolve(Encoding::Utf16Le), Encoding::Utf16Le);
        assert_eq!(Encoding::Utf32Be.resolve(Encoding::Utf8), Encoding::Utf32Be);
    }

    #[test]
    fn test_code_unit_size() {
        assert_eq!(Encoding::Utf8.code_unit_size(), Some(1));
        assert_eq!(Encoding::Utf16Le.code_unit_size(), Some(2));
        assert_eq!(Encoding::Utf32Be.code_unit_size(), Some(4));
        assert_eq!(Encoding::Host.code_unit_size(), None);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("utf8".parse::<Encoding>().unwrap(), Encoding::Utf8);
        assert_eq!("UTF-16BE".parse::<Encoding>().unwrap(), Encoding::Utf16Be);
        assert_eq!("utf_32le".parse::<Encoding>().unwrap(), Encoding::Utf32Le);
        assert_eq!("Host".parse::<Encoding>().unwrap(), Encoding::Host);
        assert!("latin1".parse::<Encoding>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for enc in Encoding::CONCRETE {
            assert_eq!(enc.to_string().parse::<Encoding>().unwrap(), enc);
        }
    }
}
