//! The verification pipeline.
//!
//! [`Verifier::verify`] runs syntax, role account, MX, disposable, SMTP and
//! catch-all checks strictly in that order and always returns a
//! [`VerificationReport`]. Every failure is appended to the report's
//! `errors` in the order it happened and forwarded to the [`ErrorLog`],
//! whose writes are bounded by `VerifierOptions::error_log_timeout`.

mod error;
mod options;
mod report;

pub use error::VerifyError;
pub use options::{PacingDelay, VerifierOptions};
pub use report::VerificationReport;

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::catchall::{CatchAllCache, CatchAllDetector};
use crate::disposable::DisposableDomains;
use crate::error_log::{ErrorLog, TracingErrorLog};
use crate::mx::{self, LookupMx, MxResolver};
use crate::roles::is_role_local_part;
use crate::smtp::{MailboxProbe, SmtpProbeResult, SmtpProber};
use crate::validator::{EmailAddress, check_syntax};

/// Cheap to clone; clones share the resolver, prober, catch-all cache and
/// error log.
#[derive(Clone)]
pub struct Verifier {
    options: VerifierOptions,
    resolver: MxResolver,
    probe: Arc<dyn MailboxProbe>,
    catch_all: CatchAllDetector,
    disposable: Arc<DisposableDomains>,
    log: Arc<dyn ErrorLog>,
}

impl Verifier {
    pub fn from_parts(
        options: VerifierOptions,
        lookup: Arc<dyn LookupMx>,
        probe: Arc<dyn MailboxProbe>,
        disposable: DisposableDomains,
        log: Arc<dyn ErrorLog>,
    ) -> Self {
        let resolver = MxResolver::new(lookup, options.mx_retry);
        let cache = CatchAllCache::new(options.catch_all_cache_capacity);
        let catch_all = CatchAllDetector::new(probe.clone(), cache);
        Self {
            options,
            resolver,
            probe,
            catch_all,
            disposable: Arc::new(disposable),
            log,
        }
    }

    /// System DNS configuration, real SMTP probing, errors logged through
    /// `tracing`.
    pub fn from_system(
        options: VerifierOptions,
        disposable: DisposableDomains,
    ) -> Result<Self, mx::Error> {
        let lookup = mx::system_resolver()?;
        let probe = Arc::new(SmtpProber::new(options.smtp.clone()));
        Ok(Self::from_parts(
            options,
            lookup,
            probe,
            disposable,
            Arc::new(TracingErrorLog),
        ))
    }

    pub fn with_error_log(mut self, log: Arc<dyn ErrorLog>) -> Self {
        self.log = log;
        self
    }

    pub fn options(&self) -> &VerifierOptions {
        &self.options
    }

    pub fn catch_all(&self) -> &CatchAllDetector {
        &self.catch_all
    }

    pub async fn verify(&self, email: &str) -> VerificationReport {
        let mut report = VerificationReport::new(email);
        let outcome = AssertUnwindSafe(self.run_stages(email, &mut report))
            .catch_unwind()
            .await;
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(stop)) => self.record(&mut report, stop).await,
            Err(panic) => {
                let err = VerifyError::Unknown(panic_message(panic.as_ref()));
                tracing::error!(%email, error = %err, "verification panicked");
                self.record(&mut report, err).await;
            }
        }
        tracing::info!(
            %email,
            deliverable = report.is_deliverable(),
            errors = report.errors.len(),
            "verification finished"
        );
        report
    }

    /// Runs the stages in order. A terminal failure is returned for the
    /// caller to record; non-terminal ones are recorded here.
    async fn run_stages(
        &self,
        email: &str,
        report: &mut VerificationReport,
    ) -> Result<(), VerifyError> {
        let address = syntax_stage(email)?;
        report.syntax_valid = true;

        report.role_account = is_role_local_part(&address.local);
        if report.role_account {
            return Err(VerifyError::RoleAccountSkipped);
        }

        let host = self.mx_stage(&address.domain).await?;
        report.mx_valid = true;

        report.disposable = self.disposable.contains_domain(&address.domain);
        if report.disposable {
            return Err(VerifyError::DisposableSkipped);
        }

        let mailbox = address.to_string();
        report.smtp = self.probe.probe(&host, &mailbox).await;
        if let Err(err) = smtp_stage(&report.smtp) {
            self.record(report, err).await;
        }

        match self.catch_all_stage(&report.smtp, &mailbox).await {
            Ok(verdict) => report.catch_all = Some(verdict),
            Err(err) => self.record(report, err).await,
        }
        Ok(())
    }

    /// Host of the most preferred exchanger.
    async fn mx_stage(&self, domain: &str) -> Result<String, VerifyError> {
        let status = self.resolver.resolve(domain).await;
        match status.primary() {
            Some(record) => {
                tracing::debug!(%domain, host = %record.exchange, "using primary exchanger");
                Ok(record.exchange.clone())
            }
            None => {
                tracing::info!(%domain, ?status, "domain cannot receive mail");
                Err(VerifyError::NoMxRecord)
            }
        }
    }

    async fn catch_all_stage(
        &self,
        smtp: &SmtpProbeResult,
        email: &str,
    ) -> Result<bool, VerifyError> {
        let Some(host) = smtp.host.as_deref() else {
            return Err(VerifyError::CatchAllHostUnavailable);
        };
        let domain = email.rsplit_once('@').map(|(_, d)| d).unwrap_or_default();
        if self.catch_all.cached(domain).await.is_none() && !self.options.pacing.is_zero() {
            let pause = self.options.pacing.sample();
            tracing::debug!(%domain, pause_ms = pause.as_millis() as u64, "pacing before catch-all probe");
            tokio::time::sleep(pause).await;
        }
        Ok(self.catch_all.detect(email, host).await?)
    }

    async fn record(&self, report: &mut VerificationReport, err: VerifyError) {
        let message = err.to_string();
        let write = self.log.log_error(&report.email, &message);
        if tokio::time::timeout(self.options.error_log_timeout, write)
            .await
            .is_err()
        {
            tracing::error!(email = %report.email, %message, "error log write timed out");
        }
        report.errors.push(message);
    }
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verifier")
            .field("options", &self.options)
            .field("disposable_domains", &self.disposable.len())
            .finish_non_exhaustive()
    }
}

fn syntax_stage(email: &str) -> Result<EmailAddress, VerifyError> {
    if !check_syntax(email) {
        return Err(VerifyError::SyntaxInvalid);
    }
    EmailAddress::parse(email).map_err(|_| VerifyError::SyntaxInvalid)
}

fn smtp_stage(result: &SmtpProbeResult) -> Result<(), VerifyError> {
    if result.success {
        return Ok(());
    }
    let detail = result.detail();
    if result.reached_server() {
        Err(VerifyError::SmtpMailboxRejected { detail })
    } else {
        Err(VerifyError::SmtpConnectionFailure { detail })
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown error".to_string()
    }
}

#[cfg(test)]
mod tests;
