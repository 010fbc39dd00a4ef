//! Line-oriented NNTP reader session over any async byte stream.

use super::response::{self, GroupInfo, OverviewEntry, codes};
use super::{GroupConnector, GroupSession, with_default_port};
use crate::error::{NewsError, Result};
use crate::utils::decode_latin1;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, instrument, trace};

/// Strip the line terminator (`\r\n` or bare `\n`).
fn trim_line_end(mut line: &[u8]) -> &[u8] {
    if let Some(rest) = line.strip_suffix(b"\n") {
        line = rest;
    }
    if let Some(rest) = line.strip_suffix(b"\r") {
        line = rest;
    }
    line
}

/// Undo NNTP dot-stuffing (a leading `..` becomes `.`).
fn strip_byte_stuffing(line: &[u8]) -> &[u8] {
    if line.starts_with(b"..") { &line[1..] } else { line }
}

/// Overview text: UTF-8 when it is valid, otherwise raw 8-bit ISO-8859-1.
fn decode_overview_line(line: &[u8]) -> String {
    match std::str::from_utf8(line) {
        Ok(text) => text.to_string(),
        Err(_) => decode_latin1(line),
    }
}

/// A reader session on an already-connected stream.
///
/// Generic over the transport so tests can drive it through
/// [`tokio::io::duplex`].
pub struct NntpSession<S> {
    stream: BufReader<S>,
}

impl<S> NntpSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap `stream` and consume the server greeting.
    pub async fn open(stream: S) -> Result<Self> {
        let mut session = Self {
            stream: BufReader::new(stream),
        };
        let (code, message) = session.read_status().await?;
        match code {
            codes::READY_POSTING_ALLOWED | codes::READY_NO_POSTING => {
                debug!(code, %message, "Server ready");
                Ok(session)
            }
            _ => Err(NewsError::Protocol { code, message }),
        }
    }

    async fn send_command(&mut self, command: &str) -> Result<()> {
        trace!(command = command.trim_end(), "Sending command");
        let writer = self.stream.get_mut();
        writer.write_all(command.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<Vec<u8>> {
        let mut line = Vec::with_capacity(512);
        let n = self.stream.read_until(b'\n', &mut line).await?;
        if n == 0 {
            return Err(NewsError::ConnectionClosed);
        }
        let len = trim_line_end(&line).len();
        line.truncate(len);
        Ok(line)
    }

    async fn read_status(&mut self) -> Result<(u16, String)> {
        let line = self.read_line().await?;
        let line = String::from_utf8_lossy(&line);
        trace!(line = %line, "Received");
        response::parse_status_line(&line)
    }

    /// Read a multi-line block up to the lone `.` terminator.
    async fn read_block(&mut self) -> Result<Vec<Vec<u8>>> {
        let mut lines = Vec::new();
        loop {
            let line = self.read_line().await?;
            if line == b"." {
                break;
            }
            lines.push(strip_byte_stuffing(&line).to_vec());
        }
        Ok(lines)
    }

    async fn read_overview_block(&mut self) -> Result<Vec<OverviewEntry>> {
        self.read_block()
            .await?
            .iter()
            .map(|line| response::parse_overview_line(&decode_overview_line(line)))
            .collect()
    }
}

#[async_trait]
impl<S> GroupSession for NntpSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn group(&mut self, name: &str) -> Result<GroupInfo> {
        self.send_command(&response::group(name)).await?;
        let (code, message) = self.read_status().await?;
        if code != codes::GROUP_SELECTED {
            return Err(NewsError::Protocol { code, message });
        }
        response::parse_group_message(&message)
    }

    async fn over(&mut self, first: u64, last: u64) -> Result<Vec<OverviewEntry>> {
        self.send_command(&response::over(first, last)).await?;
        let (mut code, mut message) = self.read_status().await?;

        if code == codes::UNKNOWN_COMMAND {
            debug!("OVER not supported, retrying with XOVER");
            self.send_command(&response::xover(first, last)).await?;
            (code, message) = self.read_status().await?;
        }

        match code {
            codes::OVERVIEW_INFO_FOLLOWS => self.read_overview_block().await,
            codes::NO_SUCH_ARTICLE_NUMBER | codes::NO_CURRENT_ARTICLE => {
                debug!(code, %message, "No articles in range");
                Ok(Vec::new())
            }
            _ => Err(NewsError::Protocol { code, message }),
        }
    }

    async fn body(&mut self, number: u64) -> Result<Vec<Vec<u8>>> {
        self.send_command(&response::body(number)).await?;
        let (code, message) = self.read_status().await?;
        if code != codes::BODY_FOLLOWS {
            return Err(NewsError::Protocol { code, message });
        }
        self.read_block().await
    }

    async fn quit(&mut self) -> Result<()> {
        self.send_command(response::quit()).await?;
        let (code, message) = self.read_status().await?;
        self.stream.get_mut().shutdown().await?;
        if code != codes::CLOSING_CONNECTION {
            return Err(NewsError::Protocol { code, message });
        }
        Ok(())
    }
}

/// Connects to news servers over plain TCP.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpConnector;

#[async_trait]
impl GroupConnector for TcpConnector {
    #[instrument(level = "debug", skip(self))]
    async fn connect(&self, server: &str) -> Result<Box<dyn GroupSession>> {
        let addr = with_default_port(server);
        let stream = TcpStream::connect(&addr).await?;
        debug!(%addr, "Connected");
        Ok(Box::new(NntpSession::open(stream).await?))
    }
}
