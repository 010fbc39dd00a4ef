//! Minimal NNTP reader plumbing for pulling recent postings out of a group.
//!
//! Only the four operations the group source needs are spoken (RFC 3977):
//!
//! | Operation | Command | Success code |
//! |-----------|---------|--------------|
//! | group metadata | `GROUP name` | 211 |
//! | batched overview | `OVER first-last` (falls back to `XOVER`) | 224 |
//! | posting body | `BODY n` | 222 |
//! | close | `QUIT` | 205 |
//!
//! The source talks to a server through the [`GroupConnector`] /
//! [`GroupSession`] pair so the wire session can be swapped for an
//! in-memory fake in tests.

pub mod encoded_words;
pub mod response;
pub mod session;

use crate::error::Result;
use async_trait::async_trait;

pub use response::{GroupInfo, OverviewEntry};
pub use session::TcpConnector;

/// Port used when a server address carries none.
pub const DEFAULT_PORT: u16 = 119;

/// One open reader session on a news server.
#[async_trait]
pub trait GroupSession: Send {
    /// Select `name` and return its article count and number range.
    async fn group(&mut self, name: &str) -> Result<GroupInfo>;

    /// Overview records for every existing article in `first..=last`, in
    /// ascending article order. Numbers with no article are simply absent.
    async fn over(&mut self, first: u64, last: u64) -> Result<Vec<OverviewEntry>>;

    /// Raw body lines of article `number`, CRLF stripped and dot-unstuffed.
    async fn body(&mut self, number: u64) -> Result<Vec<Vec<u8>>>;

    /// Say goodbye and close the connection.
    async fn quit(&mut self) -> Result<()>;
}

/// Opens [`GroupSession`]s to a named server.
#[async_trait]
pub trait GroupConnector: Send + Sync {
    async fn connect(&self, server: &str) -> Result<Box<dyn GroupSession>>;
}

/// Append [`DEFAULT_PORT`] to `server` unless it already names a port.
pub fn with_default_port(server: &str) -> String {
    match server.rsplit_once(':') {
        Some((host, port))
            if !host.is_empty() && !host.ends_with(':') && port.parse::<u16>().is_ok() =>
        {
            server.to_string()
        }
        _ => format!("{server}:{DEFAULT_PORT}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_default_port_appends() {
        assert_eq!(with_default_port("nntp.aioe.org"), "nntp.aioe.org:119");
    }

    #[test]
    fn test_with_default_port_keeps_explicit_port() {
        assert_eq!(with_default_port("news.example.com:563"), "news.example.com:563");
        assert_eq!(with_default_port("[::1]:1119"), "[::1]:1119");
    }

    #[test]
    fn test_with_default_port_bracketed_ipv6() {
        assert_eq!(with_default_port("[::1]"), "[::1]:119");
    }
}
