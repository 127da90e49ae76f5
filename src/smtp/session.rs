use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufStream};
use tokio::net::TcpStream;

use super::error::SmtpProbeError;
use super::types::{SmtpReply, Stage};

/// RFC 5321 §4.5.3.1.5 caps reply lines at 512 octets; leave some slack.
const MAX_REPLY_LINE: u64 = 2048;
/// Upper bound on continuation lines accepted for one reply.
const MAX_REPLY_LINES: usize = 64;

pub(crate) struct SmtpSession {
    host: String,
    stream: BufStream<TcpStream>,
    command_timeout: Duration,
}

impl SmtpSession {
    pub(crate) async fn connect(
        host: &str,
        port: u16,
        connect_timeout: Duration,
        command_timeout: Duration,
    ) -> Result<Self, SmtpProbeError> {
        let stream = tokio::time::timeout(connect_timeout, TcpStream::connect((host, port)))
            .await
            .map_err(|_| SmtpProbeError::ConnectTimeout {
                host: host.to_string(),
                port,
                timeout: connect_timeout,
            })?
            .map_err(|source| SmtpProbeError::Connect {
                host: host.to_string(),
                port,
                source,
            })?;
        Ok(Self {
            host: host.to_string(),
            stream: BufStream::new(stream),
            command_timeout,
        })
    }

    pub(crate) async fn read_reply(&mut self, stage: Stage) -> Result<SmtpReply, SmtpProbeError> {
        let timeout = self.command_timeout;
        let reply = tokio::time::timeout(timeout, self.read_reply_inner(stage))
            .await
            .map_err(|_| SmtpProbeError::Timeout { stage, timeout })??;
        tracing::debug!(host = %self.host, %stage, code = reply.code, "S: {}", reply.message());
        Ok(reply)
    }

    pub(crate) async fn command(
        &mut self,
        command: &str,
        stage: Stage,
    ) -> Result<SmtpReply, SmtpProbeError> {
        tracing::debug!(host = %self.host, %stage, "C: {command}");
        let timeout = self.command_timeout;
        tokio::time::timeout(timeout, self.write_line(command))
            .await
            .map_err(|_| SmtpProbeError::Timeout { stage, timeout })?
            .map_err(|source| SmtpProbeError::Io { stage, source })?;
        self.read_reply(stage).await
    }

    /// Best-effort `QUIT`; the socket is closed when the session drops.
    pub(crate) async fn quit(mut self) {
        if let Err(err) = self.command("QUIT", Stage::Quit).await {
            tracing::debug!(host = %self.host, error = %err, "QUIT not acknowledged");
        }
        let _ = self.stream.get_mut().shutdown().await;
    }

    async fn write_line(&mut self, command: &str) -> std::io::Result<()> {
        self.stream.write_all(command.as_bytes()).await?;
        self.stream.write_all(b"\r\n").await?;
        self.stream.flush().await
    }

    async fn read_reply_inner(&mut self, stage: Stage) -> Result<SmtpReply, SmtpProbeError> {
        let mut code: Option<u16> = None;
        let mut lines = Vec::new();
        loop {
            let mut raw = String::new();
            let read = (&mut self.stream)
                .take(MAX_REPLY_LINE)
                .read_line(&mut raw)
                .await
                .map_err(|source| SmtpProbeError::Io { stage, source })?;
            if read == 0 {
                return Err(SmtpProbeError::Io {
                    stage,
                    source: std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        "connection closed while reading reply",
                    ),
                });
            }
            if read as u64 >= MAX_REPLY_LINE && !raw.ends_with('\n') {
                return Err(SmtpProbeError::protocol(stage, "reply line too long"));
            }
            let line = parse_reply_line(&raw).map_err(|msg| SmtpProbeError::protocol(stage, msg))?;
            match code {
                Some(existing) if existing != line.code => {
                    return Err(SmtpProbeError::protocol(
                        stage,
                        format!("inconsistent reply codes: {existing} vs {}", line.code),
                    ));
                }
                _ => code = Some(line.code),
            }
            lines.push(line.text);
            if line.last {
                break;
            }
            if lines.len() >= MAX_REPLY_LINES {
                return Err(SmtpProbeError::protocol(stage, "reply has too many lines"));
            }
        }
        Ok(SmtpReply {
            code: code.unwrap_or_default(),
            lines,
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ReplyLine {
    pub(crate) code: u16,
    pub(crate) last: bool,
    pub(crate) text: String,
}

/// Parses `250-text` / `250 text` / `250`, with or without the line ending.
pub(crate) fn parse_reply_line(raw: &str) -> Result<ReplyLine, String> {
    let line = raw.trim_end_matches(['\r', '\n']);
    let code_part = line
        .get(..3)
        .filter(|c| c.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| format!("invalid SMTP reply: '{line}'"))?;
    let code = code_part
        .parse::<u16>()
        .map_err(|_| format!("invalid SMTP status code: '{code_part}'"))?;
    if !(200..600).contains(&code) {
        return Err(format!("SMTP status code out of range: {code}"));
    }
    let (last, text) = match line.as_bytes().get(3) {
        None => (true, ""),
        Some(b' ') => (true, &line[4..]),
        Some(b'-') => (false, &line[4..]),
        Some(_) => return Err(format!("invalid SMTP reply separator: '{line}'")),
    };
    Ok(ReplyLine {
        code,
        last,
        text: text.to_string(),
    })
}
