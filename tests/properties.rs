//! Round-trip and detection properties over arbitrary text

use emx_textio::{decode_all, detect_bom, encode_all, ByteSource, Encoding, TextIoConfig, TextReader};
use proptest::prelude::*;
use std::io::Cursor;

fn any_encoding() -> impl Strategy<Value = Encoding> {
    prop::sample::select(Encoding::CONCRETE.to_vec())
}

proptest! {
    #[test]
    fn prop_decode_inverts_encode(text in any::<String>(), enc in any_encoding()) {
        let bytes = encode_all(&text, enc);
        prop_assert_eq!(decode_all(&bytes, enc).unwrap(), text);
    }

    #[test]
    fn prop_bom_detection_consumes_exactly_bom(enc in any_encoding(), tail in prop::collection::vec(any::<u8>(), 0..16)) {
        let mut bytes = enc.bom().to_vec();
        bytes.extend_from_slice(&tail);
        let mut src = ByteSource::new(Cursor::new(bytes), "mem");
        let found = detect_bom(&mut src).unwrap().unwrap();

        // FF FE followed by 00 00 reads as UTF-32LE whatever the intended encoding
        if enc == Encoding::Utf16Le && tail.starts_with(&[0, 0]) {
            prop_assert_eq!(found.encoding, Encoding::Utf32Le);
        } else {
            prop_assert_eq!(found.encoding, enc);
            prop_assert_eq!(src.offset(), enc.bom().len() as u64);
        }
    }

    #[test]
    fn prop_lines_survive_any_encoding(lines in prop::collection::vec("[^\n\x00]{0,12}", 0..6), enc in any_encoding()) {
        let mut text = String::new();
        for line in &lines {
            text.push_str(line);
            text.push('\n');
        }
        let mut bytes = enc.bom().to_vec();
        bytes.extend(encode_all(&text, enc));

        let reader = TextReader::from_reader(Cursor::new(bytes), "mem", None, &TextIoConfig::default()).unwrap();
        let read: Vec<String> = reader.collect::<Result<_, _>>().unwrap();
        prop_assert_eq!(read, lines);
    }
}
