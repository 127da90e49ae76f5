//! Single-shot SMTP mailbox probing.
//!
//! [`SmtpProber`] opens one connection to an exchanger, walks the minimal
//! dialogue up to `RCPT TO` and classifies the answer into an
//! [`SmtpProbeResult`]. The session always ends with `QUIT` once connected.

mod error;
mod options;
mod probe;
mod session;
mod types;
pub(crate) mod util;

pub use error::SmtpProbeError;
pub use options::SmtpProbeOptions;
pub use probe::{MailboxProbe, SmtpProber};
pub use types::{SmtpProbeResult, SmtpReply, Stage};
