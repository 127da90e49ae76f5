use std::sync::Arc;

use async_trait::async_trait;
use trust_dns_resolver::TokioAsyncResolver;
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};

use super::{Error, MxRecord, MxStatus};
use crate::retry::RetryPolicy;

/// Source of raw MX records. A definitive "no such records" answer is
/// `Ok(vec![])`, not an error, so it is never retried.
#[async_trait]
pub trait LookupMx: Send + Sync {
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, ResolveError>;
}

#[async_trait]
impl LookupMx for TokioAsyncResolver {
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, ResolveError> {
        let lookup = match self.mx_lookup(domain).await {
            Ok(lookup) => lookup,
            Err(err) if matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. }) => {
                return Ok(Vec::new());
            }
            Err(err) => return Err(err),
        };
        Ok(lookup
            .iter()
            .map(|mx| MxRecord::new(mx.preference(), normalize_exchange(&mx.exchange().to_utf8())))
            .collect())
    }
}

/// Resolver built from the host's DNS configuration (`/etc/resolv.conf`).
pub fn system_resolver() -> Result<Arc<dyn LookupMx>, Error> {
    let resolver = TokioAsyncResolver::tokio_from_system_conf().map_err(Error::resolver_init)?;
    Ok(Arc::new(resolver))
}

#[derive(Clone)]
pub struct MxResolver {
    lookup: Arc<dyn LookupMx>,
    retry: RetryPolicy,
}

impl MxResolver {
    pub fn new(lookup: Arc<dyn LookupMx>, retry: RetryPolicy) -> Self {
        Self { lookup, retry }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Resolves the exchangers of `domain`. Errors that survive every retry
    /// are reported as [`MxStatus::Failed`].
    pub async fn resolve(&self, domain: &str) -> MxStatus {
        match self.try_resolve(domain).await {
            Ok(status) => status,
            Err(err) => {
                tracing::warn!(%domain, error = %err, "MX resolution failed");
                MxStatus::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    pub async fn try_resolve(&self, domain: &str) -> Result<MxStatus, Error> {
        let ascii = normalize_domain(domain)?;
        let records = self
            .retry
            .run(|| self.lookup.lookup_mx(&ascii))
            .await
            .map_err(Error::lookup)?;
        let status = sort_records(records);
        tracing::debug!(domain = %ascii, exchangers = status.records().len(), "MX lookup done");
        Ok(status)
    }
}

/// Ascending preference, duplicates and null MX ("." per RFC 7505) removed.
pub(crate) fn sort_records(mut records: Vec<MxRecord>) -> MxStatus {
    records.retain(|r| !r.exchange.is_empty());
    records.sort();
    records.dedup();
    if records.is_empty() {
        MxStatus::NoRecords
    } else {
        MxStatus::Records(records)
    }
}

pub fn normalize_domain(domain: &str) -> Result<String, Error> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(Error::idna)
}

pub(crate) fn normalize_exchange(exchange: &str) -> String {
    exchange.trim_end_matches('.').to_ascii_lowercase()
}
