//! Disposable (throw-away) mailbox domains.
//!
//! The list is loaded once at startup. A missing or unreadable list is a
//! hard error: running without it would silently report throw-away
//! addresses as deliverable.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisposableError {
    #[error("disposable domains file not found at {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read disposable domains file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DisposableDomains {
    domains: HashSet<String>,
}

impl DisposableDomains {
    /// Reads one domain per line. Blank lines and `#` comments are skipped,
    /// entries are trimmed and lower-cased.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DisposableError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DisposableError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let raw = std::fs::read_to_string(path).map_err(|source| DisposableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let list = Self::parse(&raw);
        tracing::info!(path = %path.display(), domains = list.len(), "disposable domain list loaded");
        Ok(list)
    }

    pub fn parse(raw: &str) -> Self {
        Self::from_domains(
            raw.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn from_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|d| d.as_ref().trim().to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn contains_domain(&self, domain: &str) -> bool {
        self.domains.contains(&domain.trim().to_ascii_lowercase())
    }

    /// `true` when the domain of `email` is on the list.
    pub fn is_disposable(&self, email: &str) -> bool {
        email
            .rsplit_once('@')
            .is_some_and(|(_, domain)| self.contains_domain(domain))
    }
}
