//! Error types shared by sources, destinations, and the distributor.

use thiserror::Error;

/// Everything that can go wrong during one distribution cycle.
#[derive(Error, Debug)]
pub enum NewsError {
    /// IO error on a socket, stdout, or an output file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport failure or non-success status
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// NNTP status line outside the expected range
    #[error("NNTP error {code}: {message}")]
    Protocol {
        /// NNTP response code (e.g. 411, 423, 502)
        code: u16,
        /// Message text from the server
        message: String,
    },

    /// Server sent something that could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Server hung up mid-response
    #[error("Connection closed")]
    ConnectionClosed,

    /// Page bytes were not valid in the declared encoding
    #[error("Page is not valid {encoding}")]
    Decode {
        /// Canonical name of the encoding that rejected the input
        encoding: &'static str,
    },

    /// Encoding label that names no known charset
    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),

    /// Title or body pattern failed to compile
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("Config file error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Semantically invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, NewsError>;
