use std::time::Duration;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

use super::util::random_token;

/// Connection and envelope settings for [`SmtpProber`](super::SmtpProber).
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpProbeOptions {
    pub port: u16,
    pub helo_domain: String,
    pub sender_domain: String,
    pub connect_timeout: Duration,
    pub command_timeout: Duration,
}

impl Default for SmtpProbeOptions {
    fn default() -> Self {
        Self {
            port: 25,
            helo_domain: "localhost".to_string(),
            sender_domain: "mydomain.com".to_string(),
            connect_timeout: Duration::from_secs(10),
            command_timeout: Duration::from_secs(10),
        }
    }
}

impl SmtpProbeOptions {
    pub fn helo_name(&self) -> &str {
        let trimmed = self.helo_domain.trim();
        if trimmed.is_empty() {
            "localhost"
        } else {
            trimmed
        }
    }

    /// A fresh `verif_xxxx@<sender_domain>` per call so servers cannot key
    /// caches or rate limits on a fixed sender.
    pub fn envelope_sender(&self) -> String {
        format!("verif_{}@{}", random_token(4), self.sender_domain.trim())
    }
}
