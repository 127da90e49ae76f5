use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatchAllError {
    #[error("address '{email}' has no domain")]
    InvalidAddress { email: String },
    /// The synthetic probe never reached a server; nothing was cached.
    #[error("catch-all probe for {domain} via {host} could not connect: {reason}")]
    Unreachable {
        domain: String,
        host: String,
        reason: String,
    },
}
