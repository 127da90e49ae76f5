use async_trait::async_trait;

use super::error::SmtpProbeError;
use super::options::SmtpProbeOptions;
use super::session::SmtpSession;
use super::types::{SmtpProbeResult, SmtpReply, Stage};

/// One mailbox check against one exchanger. Implementations must not retry:
/// every call is one externally visible connection.
#[async_trait]
pub trait MailboxProbe: Send + Sync {
    async fn probe(&self, host: &str, email: &str) -> SmtpProbeResult;
}

/// Probes over a plain SMTP session: greeting, `EHLO`, `MAIL FROM`,
/// `RCPT TO`, `QUIT`.
#[derive(Debug, Clone, Default)]
pub struct SmtpProber {
    options: SmtpProbeOptions,
}

/// The reply that settled the dialogue and the stage it answered.
struct Decisive {
    stage: Stage,
    reply: SmtpReply,
}

impl SmtpProber {
    pub fn new(options: SmtpProbeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SmtpProbeOptions {
        &self.options
    }

    pub async fn probe_mailbox(&self, host: &str, email: &str) -> SmtpProbeResult {
        let session = SmtpSession::connect(
            host,
            self.options.port,
            self.options.connect_timeout,
            self.options.command_timeout,
        )
        .await;
        let mut session = match session {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(%host, error = %err, "SMTP connection failed");
                return SmtpProbeResult::unreachable(err.to_string());
            }
        };

        let outcome = self.dialogue(&mut session, email).await;
        session.quit().await;

        let result = match outcome {
            Ok(decisive) => SmtpProbeResult::from_reply(host, decisive.stage, &decisive.reply),
            Err(err) => {
                tracing::warn!(%host, error = %err, "SMTP dialogue aborted");
                SmtpProbeResult::fault(host, err.to_string())
            }
        };
        tracing::info!(
            %host,
            %email,
            success = result.success,
            code = result.code,
            "SMTP probe finished"
        );
        result
    }

    async fn dialogue(
        &self,
        session: &mut SmtpSession,
        email: &str,
    ) -> Result<Decisive, SmtpProbeError> {
        let greeting = session.read_reply(Stage::Greeting).await?;
        if !greeting.is_positive_completion() {
            return Ok(Decisive {
                stage: Stage::Greeting,
                reply: greeting,
            });
        }

        let helo = self.options.helo_name();
        let mut hello = session.command(&format!("EHLO {helo}"), Stage::Helo).await?;
        if hello.is_permanent_failure() {
            hello = session.command(&format!("HELO {helo}"), Stage::Helo).await?;
        }
        if !hello.is_positive_completion() {
            return Ok(Decisive {
                stage: Stage::Helo,
                reply: hello,
            });
        }

        let sender = self.options.envelope_sender();
        let mail = session
            .command(&format!("MAIL FROM:<{sender}>"), Stage::MailFrom)
            .await?;
        if !mail.is_positive_completion() {
            return Ok(Decisive {
                stage: Stage::MailFrom,
                reply: mail,
            });
        }

        let rcpt = session
            .command(&format!("RCPT TO:<{email}>"), Stage::RcptTo)
            .await?;
        Ok(Decisive {
            stage: Stage::RcptTo,
            reply: rcpt,
        })
    }
}

#[async_trait]
impl MailboxProbe for SmtpProber {
    async fn probe(&self, host: &str, email: &str) -> SmtpProbeResult {
        self.probe_mailbox(host, email).await
    }
}
