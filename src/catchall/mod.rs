//! Catch-all domain detection.
//!
//! A domain "accepts all" when its exchanger answers `RCPT TO` positively for
//! a random local part nobody could own. The verdict is cached per domain and
//! concurrent lookups for the same domain share one probe.

mod cache;
mod error;

pub use cache::{CatchAllCache, DEFAULT_CAPACITY};
pub use error::CatchAllError;

use std::sync::Arc;

use crate::smtp::MailboxProbe;
use crate::smtp::util::random_token;

const SYNTHETIC_LOCAL_LEN: usize = 10;

#[derive(Clone)]
pub struct CatchAllDetector {
    probe: Arc<dyn MailboxProbe>,
    cache: CatchAllCache,
}

impl CatchAllDetector {
    pub fn new(probe: Arc<dyn MailboxProbe>, cache: CatchAllCache) -> Self {
        Self { probe, cache }
    }

    pub fn cache(&self) -> &CatchAllCache {
        &self.cache
    }

    /// Cached verdict for `domain`, without touching the network.
    pub async fn cached(&self, domain: &str) -> Option<bool> {
        self.cache.get(domain).await
    }

    /// Probes `<random>@<domain of email>` against `host` unless a verdict is
    /// already cached. Callers racing on one domain wait for the same probe.
    pub async fn detect(&self, email: &str, host: &str) -> Result<bool, CatchAllError> {
        let domain = email
            .trim()
            .rsplit_once('@')
            .map(|(_, d)| d.trim().to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .ok_or_else(|| CatchAllError::InvalidAddress {
                email: email.to_string(),
            })?;

        self.cache
            .entries()
            .try_get_with(domain.clone(), self.probe_domain(&domain, host))
            .await
            .map_err(|err| (*err).clone())
    }

    async fn probe_domain(&self, domain: &str, host: &str) -> Result<bool, CatchAllError> {
        let synthetic = format!("{}@{domain}", random_token(SYNTHETIC_LOCAL_LEN));
        tracing::debug!(%domain, %host, %synthetic, "probing for catch-all");
        let result = self.probe.probe(host, &synthetic).await;
        if !result.reached_server() {
            return Err(CatchAllError::Unreachable {
                domain: domain.to_string(),
                host: host.to_string(),
                reason: result.detail(),
            });
        }
        tracing::info!(%domain, catch_all = result.success, "catch-all verdict cached");
        Ok(result.success)
    }
}

impl std::fmt::Debug for CatchAllDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatchAllDetector")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
