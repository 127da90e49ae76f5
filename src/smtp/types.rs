use std::fmt;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Connect,
    Greeting,
    Helo,
    MailFrom,
    RcptTo,
    Quit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect",
            Self::Greeting => "greeting",
            Self::Helo => "EHLO/HELO",
            Self::MailFrom => "MAIL FROM",
            Self::RcptTo => "RCPT TO",
            Self::Quit => "QUIT",
        })
    }
}

/// A complete (possibly multi-line) SMTP reply.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpReply {
    pub code: u16,
    pub lines: Vec<String>,
}

impl SmtpReply {
    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    pub fn is_permanent_failure(&self) -> bool {
        (500..600).contains(&self.code)
    }

    pub fn message(&self) -> String {
        self.lines.join("\n")
    }
}

/// Outcome of one probe. `host` is set once a connection to the exchanger
/// was established, even when the dialogue later failed.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmtpProbeResult {
    pub success: bool,
    pub code: Option<u16>,
    pub response: String,
    pub host: Option<String>,
}

impl SmtpProbeResult {
    /// The server answered at `stage` with `reply`; only a 2xx answer to
    /// `RCPT TO` counts as success.
    pub fn from_reply(host: &str, stage: Stage, reply: &SmtpReply) -> Self {
        Self {
            success: stage == Stage::RcptTo && reply.is_positive_completion(),
            code: Some(reply.code),
            response: reply.message(),
            host: Some(host.to_string()),
        }
    }

    /// Connected, but the dialogue broke down without a usable reply.
    pub fn fault(host: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: None,
            response: message.into(),
            host: Some(host.to_string()),
        }
    }

    /// No connection could be established.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: None,
            response: message.into(),
            host: None,
        }
    }

    pub fn reached_server(&self) -> bool {
        self.host.is_some()
    }

    /// Best available description: the response text, else the code.
    pub fn detail(&self) -> String {
        if !self.response.trim().is_empty() {
            self.response.clone()
        } else if let Some(code) = self.code {
            code.to_string()
        } else {
            "Unknown error".to_string()
        }
    }
}
