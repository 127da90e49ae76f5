//! DNS MX resolution.
//!
//! [`MxResolver`] wraps a [`LookupMx`] implementation (trust-dns' tokio
//! resolver in production) in the configured [`RetryPolicy`](crate::RetryPolicy)
//! and reports the outcome as an [`MxStatus`], sorted by ascending preference.

mod error;
mod resolver;
mod types;

pub use error::MxError as Error;
pub use resolver::{LookupMx, MxResolver, normalize_domain, system_resolver};
pub use types::{MxRecord, MxStatus};
