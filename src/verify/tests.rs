use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::*;
use crate::mx::MxRecord;
use crate::mx::tests::StubResolver;
use crate::smtp::tests::ScriptedProbe;

/// Keeps every entry in memory.
#[derive(Default)]
struct RecordingLog {
    entries: Mutex<Vec<(String, String)>>,
}

impl RecordingLog {
    fn entries(&self) -> Vec<(String, String)> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ErrorLog for RecordingLog {
    async fn log_error(&self, email: &str, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((email.to_string(), message.to_string()));
        }
    }
}

struct PanickingProbe;

#[async_trait]
impl MailboxProbe for PanickingProbe {
    async fn probe(&self, _host: &str, _email: &str) -> SmtpProbeResult {
        panic!("probe exploded")
    }
}

struct Harness {
    verifier: Verifier,
    resolver: Arc<StubResolver>,
    log: Arc<RecordingLog>,
}

fn harness(resolver: Arc<StubResolver>, probe: Arc<dyn MailboxProbe>) -> Harness {
    let log = Arc::new(RecordingLog::default());
    let verifier = Verifier::from_parts(
        VerifierOptions::without_delays(),
        resolver.clone(),
        probe,
        DisposableDomains::from_domains(["disposable-domain.test"]),
        log.clone(),
    );
    Harness {
        verifier,
        resolver,
        log,
    }
}

fn with_mx() -> Arc<StubResolver> {
    StubResolver::answering(vec![
        MxRecord::new(20, "mx2.example.com"),
        MxRecord::new(10, "mx1.example.com"),
    ])
}

#[tokio::test]
async fn malformed_address_stops_at_syntax() {
    let h = harness(with_mx(), ScriptedProbe::accepting_all().shared());
    let report = h.verifier.verify("not-an-email").await;

    assert!(!report.syntax_valid);
    assert!(!report.mx_valid);
    assert_eq!(report.smtp, SmtpProbeResult::default());
    assert_eq!(report.catch_all, None);
    assert_eq!(report.errors, vec!["Invalid email syntax"]);
    assert_eq!(h.resolver.calls(), 0);
    assert_eq!(
        h.log.entries(),
        vec![("not-an-email".to_string(), "Invalid email syntax".to_string())]
    );
}

#[tokio::test]
async fn role_account_skips_dns() {
    let probe = ScriptedProbe::accepting_all().shared();
    let h = harness(with_mx(), probe.clone());
    let report = h.verifier.verify("Support@example.com").await;

    assert!(report.syntax_valid);
    assert!(report.role_account);
    assert!(!report.mx_valid);
    assert_eq!(
        report.errors,
        vec!["role-based address skipped (e.g. info, support)"]
    );
    assert_eq!(h.resolver.calls(), 0);
    assert_eq!(probe.calls(), 0);
}

#[tokio::test]
async fn domain_without_mx_stops() {
    let probe = ScriptedProbe::accepting_all().shared();
    let h = harness(StubResolver::answering(vec![]), probe.clone());
    let report = h.verifier.verify("bob@nomx.example").await;

    assert!(report.syntax_valid);
    assert!(!report.mx_valid);
    assert_eq!(
        report.errors,
        vec!["no valid MX record for domain (cannot route email)"]
    );
    assert_eq!(probe.calls(), 0);
}

#[tokio::test]
async fn persistent_dns_failure_is_no_mx() {
    let h = harness(
        StubResolver::failing("SERVFAIL"),
        ScriptedProbe::accepting_all().shared(),
    );
    let report = h.verifier.verify("bob@example.com").await;

    assert!(!report.mx_valid);
    assert_eq!(h.resolver.calls(), 2);
    assert_eq!(report.errors.len(), 1);
}

#[tokio::test]
async fn disposable_domain_is_skipped_after_mx() {
    let probe = ScriptedProbe::accepting_all().shared();
    let h = harness(with_mx(), probe.clone());
    let report = h.verifier.verify("user@disposable-domain.test").await;

    assert!(report.syntax_valid);
    assert!(report.mx_valid);
    assert!(report.disposable);
    assert_eq!(report.smtp, SmtpProbeResult::default());
    assert_eq!(report.catch_all, None);
    assert_eq!(report.errors, vec!["disposable address skipped"]);
    assert_eq!(probe.calls(), 0);
}

#[tokio::test]
async fn catch_all_domain_is_flagged() {
    let probe = ScriptedProbe::accepting_all().shared();
    let h = harness(with_mx(), probe.clone());
    let report = h.verifier.verify("bob@example.com").await;

    assert!(report.smtp.success);
    assert_eq!(report.smtp.host.as_deref(), Some("mx1.example.com"));
    assert_eq!(report.catch_all, Some(true));
    assert!(report.errors.is_empty());
    assert!(!report.is_deliverable());

    let seen = probe.seen();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], ("mx1.example.com".to_string(), "bob@example.com".to_string()));
    assert!(seen[1].1.ends_with("@example.com"));
}

#[tokio::test]
async fn accepted_mailbox_is_deliverable() {
    let h = harness(with_mx(), ScriptedProbe::new(&[("bob", 250)]).shared());
    let report = h.verifier.verify("bob@example.com").await;

    assert_eq!(report.catch_all, Some(false));
    assert!(report.errors.is_empty());
    assert!(report.is_deliverable());
    assert!(h.log.entries().is_empty());
}

#[tokio::test]
async fn rejected_mailbox_still_checks_catch_all() {
    let probe = ScriptedProbe::new(&[]).shared();
    let h = harness(with_mx(), probe.clone());
    let report = h.verifier.verify("ghost@example.com").await;

    assert!(!report.smtp.success);
    assert_eq!(report.smtp.code, Some(550));
    assert_eq!(report.catch_all, Some(false));
    assert_eq!(probe.calls(), 2);
    insta::assert_debug_snapshot!(report.errors, @r###"
    [
        "SMTP verification failed for mailbox: 5.1.1 User unknown",
    ]
    "###);
}

#[tokio::test]
async fn unreachable_server_skips_catch_all() {
    let probe = ScriptedProbe::unreachable().shared();
    let h = harness(with_mx(), probe.clone());
    let report = h.verifier.verify("bob@example.com").await;

    assert_eq!(report.smtp.host, None);
    assert_eq!(report.catch_all, None);
    assert_eq!(probe.calls(), 1);
    insta::assert_debug_snapshot!(report.errors, @r###"
    [
        "SMTP connection failed: connection to mx1.example.com:25 refused",
        "Cannot perform catch-all check: MX or SMTP host unavailable",
    ]
    "###);
    let logged: Vec<String> = h.log.entries().into_iter().map(|(_, m)| m).collect();
    assert_eq!(logged, report.errors);
}

#[tokio::test]
async fn catch_all_verdict_is_reused_across_addresses() {
    let probe = ScriptedProbe::new(&[("*", 250)]).shared();
    let h = harness(with_mx(), probe.clone());
    h.verifier.verify("bob@example.com").await;
    let report = h.verifier.clone().verify("alice@example.com").await;

    assert_eq!(report.catch_all, Some(true));
    // two mailbox probes, one synthetic probe
    assert_eq!(probe.calls(), 3);
    assert_eq!(h.verifier.catch_all().cached("example.com").await, Some(true));
}

#[tokio::test(start_paused = true)]
async fn pacing_only_before_network_catch_all() {
    let probe = ScriptedProbe::new(&[("*", 250)]).shared();
    let log = Arc::new(RecordingLog::default());
    let options = VerifierOptions {
        pacing: PacingDelay::fixed(Duration::from_secs(2)),
        ..VerifierOptions::without_delays()
    };
    let verifier = Verifier::from_parts(
        options,
        with_mx(),
        probe.clone(),
        DisposableDomains::default(),
        log,
    );

    let start = tokio::time::Instant::now();
    verifier.verify("bob@example.com").await;
    assert_eq!(start.elapsed(), Duration::from_secs(2));

    let start = tokio::time::Instant::now();
    verifier.verify("alice@example.com").await;
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn panic_is_recorded_as_unknown() {
    let h = harness(with_mx(), Arc::new(PanickingProbe));
    let report = h.verifier.verify("bob@example.com").await;

    assert!(report.syntax_valid);
    assert!(report.mx_valid);
    assert_eq!(report.errors, vec!["probe exploded"]);
    assert_eq!(h.log.entries().len(), 1);
}

/// Replays results in order; the last one repeats.
struct SequenceProbe {
    results: Mutex<Vec<SmtpProbeResult>>,
}

impl SequenceProbe {
    fn new(mut results: Vec<SmtpProbeResult>) -> Self {
        results.reverse();
        Self {
            results: Mutex::new(results),
        }
    }
}

#[async_trait]
impl MailboxProbe for SequenceProbe {
    async fn probe(&self, _host: &str, _email: &str) -> SmtpProbeResult {
        let mut results = match self.results.lock() {
            Ok(results) => results,
            Err(poisoned) => poisoned.into_inner(),
        };
        if results.len() > 1 {
            results.pop().unwrap_or_default()
        } else {
            results.last().cloned().unwrap_or_default()
        }
    }
}

#[tokio::test]
async fn catch_all_connection_loss_is_recorded() {
    let probe = SequenceProbe::new(vec![
        SmtpProbeResult {
            success: true,
            code: Some(250),
            response: "2.1.5 Ok".into(),
            host: Some("mx1.example.com".into()),
        },
        SmtpProbeResult::unreachable("connection reset"),
    ]);
    let h = harness(with_mx(), Arc::new(probe));
    let report = h.verifier.verify("bob@example.com").await;

    assert!(report.smtp.success);
    assert_eq!(report.catch_all, None);
    insta::assert_debug_snapshot!(report.errors, @r###"
    [
        "Catch-all detection error: catch-all probe for example.com via mx1.example.com could not connect: connection reset",
    ]
    "###);
    assert_eq!(h.log.entries().len(), 1);
    assert_eq!(h.verifier.catch_all().cached("example.com").await, None);
}

/// Never finishes a write.
struct StalledLog;

#[async_trait]
impl ErrorLog for StalledLog {
    async fn log_error(&self, _email: &str, _message: &str) {
        std::future::pending::<()>().await;
    }
}

#[tokio::test(start_paused = true)]
async fn stalled_error_log_does_not_hold_verification() {
    let options = VerifierOptions {
        error_log_timeout: Duration::from_millis(300),
        ..VerifierOptions::without_delays()
    };
    let verifier = Verifier::from_parts(
        options,
        with_mx(),
        ScriptedProbe::unreachable().shared(),
        DisposableDomains::default(),
        Arc::new(StalledLog),
    );

    let start = tokio::time::Instant::now();
    let report = verifier.verify("bob@example.com").await;
    assert_eq!(report.errors.len(), 2);
    assert_eq!(start.elapsed(), Duration::from_millis(600));
}
