use std::sync::Arc;

use anyhow::{Context, Result};
use mailprobe_lib::{DisposableDomains, FileErrorLog, Verifier};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod args;
#[cfg(feature = "with-csv")]
mod batch;
mod output;

use args::{Cli, Commands};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let disposable = DisposableDomains::load(&cli.disposable_list)
        .context("cannot start without the disposable domain list")?;
    let error_log = FileErrorLog::new(&cli.log_dir)
        .with_context(|| format!("create log directory {}", cli.log_dir.display()))?;
    let verifier = Verifier::from_system(cli.verifier_options(), disposable)
        .context("initialise DNS resolver")?
        .with_error_log(Arc::new(error_log));

    match cli.cmd {
        Commands::Verify { email, format } => {
            let report = verifier.verify(&email).await;
            output::write_report(&report, &format)?;
            // codes de sortie : 0 deliverable, 2 sinon, 1 fatal
            if !report.is_deliverable() {
                std::process::exit(2);
            }
        }
        #[cfg(feature = "with-csv")]
        Commands::Batch {
            input,
            output,
            concurrency,
            delay_ms,
            email_column,
        } => {
            let opts = batch::BatchOptions {
                input,
                output,
                concurrency,
                delay: std::time::Duration::from_millis(delay_ms),
                email_column,
            };
            let summary = batch::run(&verifier, &opts).await?;
            println!(
                "Verification complete: {} rows ({} verified, {} skipped). Results saved to {}",
                summary.rows,
                summary.verified,
                summary.skipped,
                opts.output.display()
            );
        }
    }
    Ok(())
}
