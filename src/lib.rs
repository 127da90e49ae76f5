#![forbid(unsafe_code)]
//! mailprobe_lib — progressive e-mail deliverability checks.
//!
//! Syntax, role account, MX, disposable domain, SMTP `RCPT TO` probe and
//! catch-all detection, sequenced by [`Verifier`] into a
//! [`VerificationReport`].

pub mod catchall;
pub mod disposable;
pub mod error_log;
pub mod mx;
pub mod retry;
pub mod roles;
pub mod smtp;
pub mod validator;
pub mod verify;

pub use catchall::{CatchAllCache, CatchAllDetector, CatchAllError};
pub use disposable::{DisposableDomains, DisposableError};
pub use error_log::{ErrorLog, FileErrorLog, TracingErrorLog};
pub use mx::{Error as MxError, LookupMx, MxRecord, MxResolver, MxStatus};
pub use retry::{RetryExhausted, RetryPolicy};
pub use roles::is_role_account;
pub use smtp::{MailboxProbe, SmtpProbeOptions, SmtpProbeResult, SmtpProber};
pub use validator::{EmailAddress, ValidationReport, check_syntax, validate_address};
pub use verify::{PacingDelay, VerificationReport, Verifier, VerifierOptions, VerifyError};
