//! NNTP status codes, command builders, and response parsers.

use crate::error::{NewsError, Result};

/// Response codes this client acts on (RFC 3977).
pub mod codes {
    /// Server ready, posting allowed
    pub const READY_POSTING_ALLOWED: u16 = 200;
    /// Server ready, no posting
    pub const READY_NO_POSTING: u16 = 201;
    /// Closing connection
    pub const CLOSING_CONNECTION: u16 = 205;
    /// Group selected
    pub const GROUP_SELECTED: u16 = 211;
    /// Body follows
    pub const BODY_FOLLOWS: u16 = 222;
    /// Overview information follows
    pub const OVERVIEW_INFO_FOLLOWS: u16 = 224;
    /// No current article
    pub const NO_CURRENT_ARTICLE: u16 = 420;
    /// No article with that number (or none in the range)
    pub const NO_SUCH_ARTICLE_NUMBER: u16 = 423;
    /// Unknown command
    pub const UNKNOWN_COMMAND: u16 = 500;
}

pub fn group(name: &str) -> String {
    format!("GROUP {name}\r\n")
}

pub fn over(first: u64, last: u64) -> String {
    format!("OVER {first}-{last}\r\n")
}

/// Pre-RFC 3977 spelling of `OVER`, still the only one some servers know.
pub fn xover(first: u64, last: u64) -> String {
    format!("XOVER {first}-{last}\r\n")
}

pub fn body(number: u64) -> String {
    format!("BODY {number}\r\n")
}

pub fn quit() -> &'static str {
    "QUIT\r\n"
}

/// Split a status line into its three-digit code and message text.
pub fn parse_status_line(line: &str) -> Result<(u16, String)> {
    let code = line
        .get(..3)
        .and_then(|digits| digits.parse::<u16>().ok())
        .ok_or_else(|| NewsError::InvalidResponse(line.to_string()))?;
    let message = line.get(3..).unwrap_or_default().trim().to_string();
    Ok((code, message))
}

/// Article count and number range reported by `GROUP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupInfo {
    /// Estimated number of articles in the group
    pub count: u64,
    /// Lowest article number
    pub first: u64,
    /// Highest article number
    pub last: u64,
}

/// Parse the message part of a `211 count first last name` reply.
pub fn parse_group_message(message: &str) -> Result<GroupInfo> {
    let numbers: Vec<u64> = message
        .split_whitespace()
        .take(3)
        .map_while(|p| p.parse().ok())
        .collect();

    match numbers[..] {
        [count, first, last] => Ok(GroupInfo { count, first, last }),
        _ => Err(NewsError::InvalidResponse(message.to_string())),
    }
}

/// The overview fields the group source reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewEntry {
    /// Article number within the group
    pub number: u64,
    /// Subject header, still RFC 2047 encoded
    pub subject: String,
    /// From header
    pub author: String,
    pub date: String,
    pub message_id: String,
}

/// Parse one tab-separated overview line.
///
/// Format: `number\tsubject\tfrom\tdate\tmessage-id\treferences\tbytes\tlines...`.
/// Trailing fields may be missing; the article number is required.
pub fn parse_overview_line(line: &str) -> Result<OverviewEntry> {
    let parts: Vec<&str> = line.split('\t').collect();
    let number = parts[0]
        .trim()
        .parse()
        .map_err(|_| NewsError::InvalidResponse(line.to_string()))?;
    let field = |i: usize| parts.get(i).copied().unwrap_or_default().to_string();

    Ok(OverviewEntry {
        number,
        subject: field(1),
        author: field(2),
        date: field(3),
        message_id: field(4),
    })
}
