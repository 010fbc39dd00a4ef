//! Text helpers shared by sources and outputs.
//!
//! - Reflowing scraped paragraphs into fixed-width lines
//! - Single-byte ISO-8859-1 decoding for Usenet bodies
//! - String truncation for logging
//! - Output directory preparation for file destinations

use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

/// Column width used when reflowing scraped bodies.
pub const FILL_WIDTH: usize = 70;

/// Tab stop used when expanding tabs before reflowing.
const TAB_SIZE: usize = 8;

/// Reflow `text` into lines no longer than `width` characters.
///
/// Tabs are expanded to 8-column stops and every other ASCII whitespace
/// character becomes a space. Lines then break at runs of spaces, or after
/// a hyphen joining two letter sequences (`well-known`). Spaces are dropped
/// at line ends and at the start of every line but the first; spacing
/// inside a line is kept. Words longer than `width` first fill what is
/// left of the current line, then carry on over the following lines.
/// The result has no trailing newline; an all-whitespace input gives `""`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(reflow("a  b\nc", 70), "a  b c");
/// assert_eq!(reflow("ab cdefgh", 4), "ab c\ndefg\nh");
/// ```
pub fn reflow(text: &str, width: usize) -> String {
    let width = width.max(1);
    let mut chunks = split_chunks(&munge_whitespace(text));
    chunks.reverse();
    let mut lines: Vec<String> = Vec::new();

    while !chunks.is_empty() {
        if !lines.is_empty() && chunks.last().is_some_and(|c| is_blank(c)) {
            chunks.pop();
        }

        let mut line: Vec<Vec<char>> = Vec::new();
        let mut line_len = 0;
        while let Some(chunk) = chunks.pop() {
            if line_len + chunk.len() > width {
                chunks.push(chunk);
                break;
            }
            line_len += chunk.len();
            line.push(chunk);
        }

        if let Some(chunk) = chunks.last_mut()
            && chunk.len() > width
        {
            let end = long_word_break(chunk, width - line_len);
            line.push(chunk.drain(..end).collect());
        }

        if line.last().is_some_and(|c| is_blank(c)) {
            line.pop();
        }
        if !line.is_empty() {
            lines.push(line.concat().into_iter().collect());
        }
    }

    lines.join("\n")
}

/// Expand tabs, then turn the remaining ASCII whitespace into spaces.
fn munge_whitespace(text: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(text.len());
    let mut column = 0;
    for ch in text.chars() {
        match ch {
            '\t' => {
                let pad = TAB_SIZE - column % TAB_SIZE;
                out.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            '\n' | '\r' => {
                out.push(' ');
                column = 0;
            }
            '\x0b' | '\x0c' => {
                out.push(' ');
                column += 1;
            }
            other => {
                out.push(other);
                column += 1;
            }
        }
    }
    out
}

/// Split into alternating runs of spaces and words, breaking words after
/// their inner hyphens.
fn split_chunks(text: &[char]) -> Vec<Vec<char>> {
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < text.len() {
        let blank = text[start] == ' ';
        let mut end = start;
        while end < text.len() && (text[end] == ' ') == blank {
            end += 1;
        }
        if blank {
            chunks.push(text[start..end].to_vec());
        } else {
            let word = &text[start..end];
            let mut from = 0;
            for i in 0..word.len() {
                if breaks_after(word, i) {
                    chunks.push(word[from..=i].to_vec());
                    from = i + 1;
                }
            }
            chunks.push(word[from..].to_vec());
        }
        start = end;
    }
    chunks
}

fn is_letter(ch: Option<&char>) -> bool {
    ch.is_some_and(|c| c.is_alphabetic() || *c == '_')
}

/// Whether `word` may break after the hyphen at `i`: two letters (or
/// letter, hyphen, letter) before it and two letters (optionally joined by
/// a hyphen) after it.
fn breaks_after(word: &[char], i: usize) -> bool {
    if word[i] != '-' || i < 2 {
        return false;
    }
    let before = |k: usize| word.get(i - k);
    let after = |k: usize| word.get(i + k);

    let letters_before = is_letter(before(1))
        && (is_letter(before(2))
            || (before(2) == Some(&'-') && i >= 3 && is_letter(before(3))));
    let letters_after = is_letter(after(1))
        && (is_letter(after(2)) || (after(2) == Some(&'-') && is_letter(after(3))));
    letters_before && letters_after
}

/// Where to cut an over-long `chunk` given `space_left` columns: after the
/// last hyphen that fits, or else right at the edge.
fn long_word_break(chunk: &[char], space_left: usize) -> usize {
    chunk[..space_left]
        .iter()
        .rposition(|&c| c == '-')
        .filter(|&h| h > 0 && chunk[..h].iter().any(|&c| c != '-'))
        .map_or(space_left, |h| h + 1)
}

fn is_blank(chunk: &[char]) -> bool {
    chunk.iter().all(|&c| c == ' ')
}

/// Decode ISO-8859-1 bytes. Every byte maps straight to the code point of
/// the same value, so this never fails.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` bytes (backed off to a char boundary) with
/// an ellipsis and the number of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Create the parent directory of `path` if it does not exist yet.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).await?;
            debug!(dir = %parent.display(), "Output directory ready");
            Ok(())
        }
        _ => Ok(()),
    }
}
