//! RFC 2047 encoded-word decoding for overview subjects.
//!
//! Subjects arrive as `=?charset?encoding?text?=` runs mixed with plain
//! ASCII. `B` (base64) and `Q` (quoted-printable with `_` for space) are
//! understood; charsets are resolved through [`Charset`]. Anything that
//! does not decode cleanly is passed through unchanged.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use crate::charset::Charset;

/// Decode every encoded word in a header value.
///
/// Whitespace between two adjacent encoded words is dropped; whitespace next
/// to plain text is kept.
///
/// ```ignore
/// assert_eq!(decode_header("Re: =?UTF-8?B?SGVsbG8=?= World"), "Re: Hello World");
/// assert_eq!(decode_header("=?ISO-8859-1?Q?M=FCnchen?="), "München");
/// ```
pub fn decode_header(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_space = String::new();
    let mut last_was_encoded = false;
    let mut rest = value;

    while !rest.is_empty() {
        if let Some(end) = encoded_word_end(rest) {
            if let Some(decoded) = decode_word(&rest[..end]) {
                if !last_was_encoded {
                    out.push_str(&pending_space);
                }
                pending_space.clear();
                out.push_str(&decoded);
                last_was_encoded = true;
                rest = &rest[end..];
                continue;
            }
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        if ch == ' ' || ch == '\t' {
            pending_space.push(ch);
        } else {
            out.push_str(&pending_space);
            pending_space.clear();
            out.push(ch);
            last_was_encoded = false;
        }
        rest = &rest[ch.len_utf8()..];
    }

    out.push_str(&pending_space);
    out
}

/// Byte index just past the closing `?=` of an encoded word at the start
/// of `input`.
fn encoded_word_end(input: &str) -> Option<usize> {
    if !input.starts_with("=?") {
        return None;
    }

    let bytes = input.as_bytes();
    let mut question_marks = 0;
    for i in 2..bytes.len() {
        match bytes[i] {
            b'?' => {
                question_marks += 1;
                if question_marks >= 3 && bytes.get(i + 1) == Some(&b'=') {
                    return Some(i + 2);
                }
            }
            b' ' | b'\t' => return None,
            _ => {}
        }
    }
    None
}

/// Decode a single `=?charset?encoding?text?=` word.
fn decode_word(word: &str) -> Option<String> {
    let inner = word.strip_prefix("=?")?.strip_suffix("?=")?;
    let mut parts = inner.splitn(3, '?');
    let charset = parts.next()?;
    let encoding = parts.next()?;
    let text = parts.next()?;

    let bytes = match encoding {
        "B" | "b" => BASE64.decode(text).ok()?,
        "Q" | "q" => decode_q(text),
        _ => return None,
    };

    // RFC 2231 language suffix: charset*lang
    let charset = charset.split('*').next().unwrap_or(charset);
    let text = match Charset::for_label(charset) {
        Some(charset) => charset.decode_lossy(&bytes),
        None => String::from_utf8_lossy(&bytes).into_owned(),
    };
    Some(text)
}

/// `Q` encoding: `_` is a space, `=XX` is a hex byte.
fn decode_q(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'_' => out.push(b' '),
            b'=' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                        continue;
                    }
                    None => out.push(b'='),
                }
            }
            other => out.push(other),
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_header_plain_text() {
        assert_eq!(decode_header("ANN: Python 3.13.0 released"), "ANN: Python 3.13.0 released");
    }

    #[test]
    fn test_decode_header_base64_utf8() {
        assert_eq!(decode_header("=?UTF-8?B?SGVsbG8gV29ybGQ=?="), "Hello World");
    }

    #[test]
    fn test_decode_header_quoted_printable_latin1() {
        assert_eq!(decode_header("=?ISO-8859-1?Q?Caf=E9?="), "Café");
        assert_eq!(decode_header("=?iso-8859-1?q?M=FCnchen?="), "München");
    }

    #[test]
    fn test_decode_header_q_underscore_is_space() {
        assert_eq!(
            decode_header("=?UTF-8?Q?Fran=C3=A7ois_Dupr=C3=A9?="),
            "François Dupré"
        );
    }

    #[test]
    fn test_decode_header_adjacent_words_join() {
        assert_eq!(
            decode_header("=?UTF-8?B?SGVsbG8=?= =?UTF-8?B?V29ybGQ=?="),
            "HelloWorld"
        );
    }

    #[test]
    fn test_decode_header_mixed_keeps_spacing() {
        assert_eq!(decode_header("Re: =?UTF-8?B?SGVsbG8=?= World"), "Re: Hello World");
    }

    #[test]
    fn test_decode_header_invalid_passthrough() {
        assert_eq!(decode_header("=?invalid"), "=?invalid");
        assert_eq!(decode_header("=?UTF-8?X?test?="), "=?UTF-8?X?test?=");
        assert_eq!(decode_header("=?UTF-8?B?!!!?="), "=?UTF-8?B?!!!?=");
    }

    #[test]
    fn test_decode_header_non_ascii_plain_text() {
        assert_eq!(decode_header("Grüße aus Köln"), "Grüße aus Köln");
    }

    #[test]
    fn test_decode_q_invalid_hex_passes_through() {
        assert_eq!(decode_q("Hello=ZZ"), b"Hello=ZZ");
        assert_eq!(decode_q("end="), b"end=");
    }

    #[test]
    fn test_encoded_word_end() {
        assert_eq!(encoded_word_end("=?UTF-8?B?test?="), Some(16));
        assert_eq!(encoded_word_end("=?UTF-8?B?te st?="), None);
        assert_eq!(encoded_word_end("=?UTF-8?B?test"), None);
    }

    #[test]
    fn test_latin1_word_keeps_c1_range() {
        assert_eq!(decode_header("=?iso-8859-1?Q?=80?="), "\u{80}");
        assert_eq!(decode_header("=?windows-1252?Q?=80?="), "€");
    }
}
