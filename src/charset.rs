//! Text encoding lookup by label.
//!
//! Labels resolve through the WHATWG registry in `encoding_rs`, except for
//! two families the registry folds into windows-1252: ASCII labels reject
//! every byte above 0x7F, and ISO-8859-1 labels map each byte to the code
//! point of the same value.

use crate::utils::decode_latin1;
use encoding_rs::Encoding;

const ASCII_LABELS: &[&str] = &[
    "ascii",
    "us-ascii",
    "us",
    "ansi_x3.4-1968",
    "iso646-us",
    "iso-ir-6",
    "646",
    "cp367",
];

const LATIN1_LABELS: &[&str] = &[
    "latin1",
    "latin-1",
    "latin",
    "l1",
    "iso-8859-1",
    "iso8859-1",
    "iso_8859-1",
    "iso8859_1",
    "iso_8859-1:1987",
    "iso-ir-100",
    "cp819",
    "ibm819",
    "8859",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Ascii,
    Latin1,
    Registry(&'static Encoding),
}

impl Charset {
    /// Resolve `label` case-insensitively, or `None` if it names nothing known.
    pub fn for_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        if ASCII_LABELS.contains(&label.as_str()) {
            Some(Self::Ascii)
        } else if LATIN1_LABELS.contains(&label.as_str()) {
            Some(Self::Latin1)
        } else {
            Encoding::for_label(label.as_bytes()).map(Self::Registry)
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ascii => "US-ASCII",
            Self::Latin1 => "ISO-8859-1",
            Self::Registry(encoding) => encoding.name(),
        }
    }

    /// Decode `bytes`, or `None` if any of them is malformed for this charset.
    pub fn decode_strict(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Ascii if bytes.is_ascii() => Some(decode_latin1(bytes)),
            Self::Ascii => None,
            Self::Latin1 => Some(decode_latin1(bytes)),
            Self::Registry(encoding) => encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
        }
    }

    /// Decode `bytes`, substituting U+FFFD for malformed input.
    pub fn decode_lossy(&self, bytes: &[u8]) -> String {
        match self {
            Self::Ascii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
                .collect(),
            Self::Latin1 => decode_latin1(bytes),
            Self::Registry(encoding) => encoding.decode_without_bom_handling(bytes).0.into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_labels_reject_high_bytes() {
        for label in ["ascii", "US-ASCII", " us-ascii "] {
            let charset = Charset::for_label(label).unwrap();
            assert_eq!(charset, Charset::Ascii);
            assert_eq!(charset.decode_strict(b"Caf\xe9"), None);
            assert_eq!(charset.decode_strict(b"Cafe").as_deref(), Some("Cafe"));
        }
    }

    #[test]
    fn test_latin1_labels_keep_c1_controls() {
        for label in ["latin1", "ISO-8859-1", "iso8859-1"] {
            let charset = Charset::for_label(label).unwrap();
            assert_eq!(charset, Charset::Latin1);
            assert_eq!(charset.decode_strict(b"\x80\xe9").as_deref(), Some("\u{80}é"));
        }
    }

    #[test]
    fn test_windows_1252_still_maps_euro() {
        let charset = Charset::for_label("windows-1252").unwrap();
        assert_eq!(charset.name(), "windows-1252");
        assert_eq!(charset.decode_strict(b"\x80").as_deref(), Some("€"));
    }

    #[test]
    fn test_registry_labels_are_strict() {
        let charset = Charset::for_label("utf-8").unwrap();
        assert_eq!(charset.decode_strict(b"Caf\xe9"), None);
        assert_eq!(charset.decode_lossy(b"Caf\xe9"), "Caf\u{fffd}");
    }

    #[test]
    fn test_unknown_label() {
        assert_eq!(Charset::for_label("klingon-8"), None);
    }

    #[test]
    fn test_ascii_lossy() {
        assert_eq!(Charset::Ascii.decode_lossy(b"a\xffb"), "a\u{fffd}b");
    }
}
