use thiserror::Error;

use crate::catchall::CatchAllError;

/// Everything that can end up in [`VerificationReport::errors`](super::VerificationReport).
/// The `Display` text is the exact entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("Invalid email syntax")]
    SyntaxInvalid,
    #[error("role-based address skipped (e.g. info, support)")]
    RoleAccountSkipped,
    #[error("no valid MX record for domain (cannot route email)")]
    NoMxRecord,
    #[error("disposable address skipped")]
    DisposableSkipped,
    /// No exchanger could be reached.
    #[error("SMTP connection failed: {detail}")]
    SmtpConnectionFailure { detail: String },
    /// A server answered but declined the recipient or the dialogue broke.
    #[error("SMTP verification failed for mailbox: {detail}")]
    SmtpMailboxRejected { detail: String },
    #[error("Catch-all detection error: {0}")]
    CatchAllProbe(#[from] CatchAllError),
    #[error("Cannot perform catch-all check: MX or SMTP host unavailable")]
    CatchAllHostUnavailable,
    #[error("{0}")]
    Unknown(String),
}
