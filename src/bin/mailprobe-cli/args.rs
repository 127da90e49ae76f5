use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use mailprobe_lib::{PacingDelay, RetryPolicy, SmtpProbeOptions, VerifierOptions};

#[derive(Parser)]
#[command(name = "mailprobe-cli", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,

    /// disposable domains, one per line
    #[arg(
        long,
        global = true,
        env = "MAILPROBE_DISPOSABLE_LIST",
        default_value = "data/disposable_domains.txt"
    )]
    pub disposable_list: PathBuf,

    /// directory receiving errors.log
    #[arg(long, global = true, env = "MAILPROBE_LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,

    /// MX lookup attempts
    #[arg(long, global = true, default_value_t = 2)]
    pub mx_attempts: u32,

    /// pause between MX lookup attempts (ms)
    #[arg(long, global = true, default_value_t = 1_000)]
    pub mx_retry_delay_ms: u64,

    /// lower bound of the pause before a catch-all probe (ms)
    #[arg(long, global = true, default_value_t = 1_000)]
    pub pacing_min_ms: u64,

    /// upper bound of the pause before a catch-all probe (ms)
    #[arg(long, global = true, default_value_t = 3_000)]
    pub pacing_max_ms: u64,

    /// SMTP port
    #[arg(long, global = true, env = "MAILPROBE_SMTP_PORT", default_value_t = 25)]
    pub port: u16,

    /// name sent with EHLO/HELO
    #[arg(long, global = true, env = "MAILPROBE_HELO", default_value = "localhost")]
    pub helo: String,

    /// domain of the MAIL FROM envelope sender
    #[arg(
        long,
        global = true,
        env = "MAILPROBE_SENDER_DOMAIN",
        default_value = "mydomain.com"
    )]
    pub sender_domain: String,

    /// SMTP connect and per-command timeout (ms)
    #[arg(long = "timeout-ms", global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// verify one address
    Verify {
        email: String,
        /// format: human|json
        #[arg(long, default_value = "human")]
        format: String,
    },
    /// verify every row of a CSV file
    #[cfg(feature = "with-csv")]
    Batch {
        #[arg(long, short = 'i', default_value = "input.csv")]
        input: PathBuf,
        #[arg(long, short = 'o', default_value = "output.csv")]
        output: PathBuf,
        /// verifications in flight at once
        #[arg(long, short = 'c', default_value_t = 1)]
        concurrency: usize,
        /// pause before each verification (ms)
        #[arg(long = "delay-ms", short = 'd', default_value_t = 0)]
        delay_ms: u64,
        /// column holding the address (case-insensitive)
        #[arg(long, short = 'e', default_value = "email")]
        email_column: String,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn verifier_options(&self) -> VerifierOptions {
        let timeout = Duration::from_millis(self.timeout_ms);
        VerifierOptions {
            mx_retry: RetryPolicy::new(
                self.mx_attempts,
                Duration::from_millis(self.mx_retry_delay_ms),
            ),
            pacing: PacingDelay::new(
                Duration::from_millis(self.pacing_min_ms),
                Duration::from_millis(self.pacing_max_ms),
            ),
            smtp: SmtpProbeOptions {
                port: self.port,
                helo_domain: self.helo.clone(),
                sender_domain: self.sender_domain.clone(),
                connect_timeout: timeout,
                command_timeout: timeout,
            },
            ..VerifierOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_options() {
        let cli = <Cli as Parser>::parse_from([
            "mailprobe-cli",
            "--mx-attempts",
            "3",
            "--pacing-min-ms",
            "0",
            "--pacing-max-ms",
            "0",
            "--port",
            "2525",
            "--timeout-ms",
            "500",
            "verify",
            "bob@example.com",
        ]);
        let options = cli.verifier_options();
        assert_eq!(options.mx_retry.attempts, 3);
        assert!(options.pacing.is_zero());
        assert_eq!(options.smtp.port, 2525);
        assert_eq!(options.smtp.command_timeout, Duration::from_millis(500));
        assert_eq!(options.smtp.sender_domain, "mydomain.com");
        assert!(matches!(cli.cmd, Commands::Verify { ref email, .. } if email == "bob@example.com"));
    }
}
