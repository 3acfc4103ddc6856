//! Stream configuration

use crate::encoding::Encoding;
use crate::stream::DEFAULT_CHUNK_SIZE;
use tracing::warn;

/// Environment variable naming the host encoding
pub const HOST_ENCODING_ENV: &str = "EMX_TEXTIO_HOST_ENCODING";

/// Settings shared by readers and writers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextIoConfig {
    /// Concrete encoding that `Encoding::Host` stands for
    pub host_encoding: Encoding,
    /// Write the encoding's BOM at the start of output (never for `Host`)
    pub emit_bom: bool,
    /// Read chunk size in bytes
    pub buffer_size: usize,
}

impl Default for TextIoConfig {
    fn default() -> Self {
        Self {
            host_encoding: Encoding::Utf8,
            emit_bom: false,
            buffer_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl TextIoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config with the host encoding taken from [`HOST_ENCODING_ENV`].
    ///
    /// Unset, unknown or `host` values fall back to UTF-8.
    pub fn from_env() -> Self {
        let host_encoding = match std::env::var(HOST_ENCODING_ENV) {
            Ok(value) => Self::parse_host(&value),
            Err(_) => Encoding::Utf8,
        };
        Self { host_encoding, ..Self::default() }
    }

    /// Set the host encoding; `Host` itself is replaced by UTF-8
    pub fn with_host_encoding(mut self, encoding: Encoding) -> Self {
        self.host_encoding = encoding.resolve(Encoding::Utf8);
        self
    }

    pub fn with_emit_bom(mut self, emit_bom: bool) -> Self {
        self.emit_bom = emit_bom;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    fn parse_host(value: &str) -> Encoding {
        match value.parse::<Encoding>() {
            Ok(Encoding::Host) => {
                warn!(value, "{} cannot be 'host', using UTF-8", HOST_ENCODING_ENV);
                Encoding::Utf8
            }
            Ok(encoding) => encoding,
            Err(e) => {
                warn!(value, "{}: {}, using UTF-8", HOST_ENCODING_ENV, e);
                Encoding::Utf8
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TextIoConfig::default();
        assert_eq!(config.host_encoding, Encoding::Utf8);
        assert!(!config.emit_bom);
        assert_eq!(config.buffer_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_host_never_resolves_to_host() {
        let config = TextIoConfig::new().with_host_encoding(Encoding::Host);
        assert_eq!(config.host_encoding, Encoding::Utf8);
    }

    #[test]
    fn test_parse_host_values() {
        assert_eq!(TextIoConfig::parse_host("utf-16le"), Encoding::Utf16Le);
        assert_eq!(TextIoConfig::parse_host("host"), Encoding::Utf8);
        assert_eq!(TextIoConfig::parse_host("ebcdic"), Encoding::Utf8);
    }

    #[test]
    fn test_builder_setters() {
        let config = TextIoConfig::new().with_emit_bom(true).with_buffer_size(0);
        assert!(config.emit_bom);
        assert_eq!(config.buffer_size, 1);
    }
}
