use std::time::Duration;

use thiserror::Error;

use super::types::Stage;

#[derive(Debug, Error)]
pub enum SmtpProbeError {
    #[error("connection to {host}:{port} failed: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },
    #[error("connection to {host}:{port} timed out after {timeout:?}")]
    ConnectTimeout {
        host: String,
        port: u16,
        timeout: Duration,
    },
    #[error("no reply during {stage} within {timeout:?}")]
    Timeout { stage: Stage, timeout: Duration },
    #[error("I/O error during {stage}: {source}")]
    Io {
        stage: Stage,
        #[source]
        source: std::io::Error,
    },
    #[error("protocol error during {stage}: {message}")]
    Protocol { stage: Stage, message: String },
}

impl SmtpProbeError {
    pub(crate) fn protocol(stage: Stage, message: impl Into<String>) -> Self {
        Self::Protocol {
            stage,
            message: message.into(),
        }
    }
}
