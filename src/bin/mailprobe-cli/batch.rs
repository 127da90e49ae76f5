use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use futures::StreamExt;
use mailprobe_lib::{VerificationReport, Verifier, check_syntax};

const MISSING_EMAIL: &str = "Invalid or missing email column";
const FALLBACK_COLUMNS: [&str; 4] = ["email", "Email", "e-mail", "E-mail"];
const RESULT_COLUMNS: [&str; 8] = [
    "email",
    "disposable",
    "roleAccount",
    "success",
    "smtpCode",
    "smtpResponse",
    "catchAll",
    "errors",
];

pub struct BatchOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub concurrency: usize,
    pub delay: Duration,
    pub email_column: String,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub rows: usize,
    pub verified: usize,
    pub skipped: usize,
}

/// Address of a row: the requested column, then the usual names, then the
/// first cell that looks like an address.
pub fn extract_email(headers: &[String], cells: &[String], column: &str) -> Option<String> {
    let cell = |idx: usize| {
        cells
            .get(idx)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let wanted = column.trim().to_lowercase();
    if let Some(value) = headers
        .iter()
        .position(|h| h.trim().to_lowercase() == wanted)
        .and_then(cell)
    {
        return Some(value);
    }
    for alt in FALLBACK_COLUMNS {
        if let Some(value) = headers.iter().position(|h| h == alt).and_then(cell) {
            return Some(value);
        }
    }
    let found = cells.iter().map(|v| v.trim()).find(|v| check_syntax(v))?;
    tracing::warn!(email = found, "email column not found, extracted by syntax");
    Some(found.to_string())
}

fn bool_str(flag: bool) -> String {
    flag.to_string()
}

fn bool_opt_str(opt: Option<bool>) -> String {
    opt.map(|b| b.to_string()).unwrap_or_default()
}

fn report_fields(report: &VerificationReport) -> [String; 8] {
    [
        report.email.clone(),
        bool_str(report.disposable),
        bool_str(report.role_account),
        bool_str(report.smtp.success),
        report.smtp.code.map(|c| c.to_string()).unwrap_or_default(),
        report.smtp.response.clone(),
        bool_opt_str(report.catch_all),
        report.errors.join("; "),
    ]
}

fn skipped_fields(email: Option<&str>) -> [String; 8] {
    [
        email.unwrap_or("N/A").to_string(),
        bool_str(false),
        bool_str(false),
        bool_str(false),
        String::new(),
        "No valid email extracted".to_string(),
        String::new(),
        MISSING_EMAIL.to_string(),
    ]
}

/// Input headers with the result columns, an existing column of the same
/// name being overwritten in place. Returns the header and, per result
/// column, its index in the row.
fn output_layout(headers: &[String]) -> (Vec<String>, [usize; 8]) {
    let mut out = headers.to_vec();
    let mut slots = [0; 8];
    for (slot, name) in slots.iter_mut().zip(RESULT_COLUMNS) {
        *slot = match out.iter().position(|h| h == name) {
            Some(idx) => idx,
            None => {
                out.push(name.to_string());
                out.len() - 1
            }
        };
    }
    (out, slots)
}

fn merge_row(cells: &[String], width: usize, slots: &[usize; 8], fields: [String; 8]) -> Vec<String> {
    let mut row = cells.to_vec();
    row.resize(width, String::new());
    for (idx, value) in slots.iter().zip(fields) {
        row[*idx] = value;
    }
    row
}

pub async fn run(verifier: &Verifier, opts: &BatchOptions) -> Result<BatchSummary> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(&opts.input)
        .with_context(|| format!("open {}", opts.input.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .context("read CSV header")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("read CSV record")?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<String>>());
    }

    let (out_headers, slots) = output_layout(&headers);
    let width = out_headers.len();
    let mut summary = BatchSummary {
        rows: rows.len(),
        ..BatchSummary::default()
    };

    let results: Vec<(Vec<String>, bool)> = futures::stream::iter(rows)
        .map(|cells| {
            let email = extract_email(&headers, &cells, &opts.email_column);
            async move {
                match email.as_deref().filter(|e| check_syntax(e)) {
                    Some(address) => {
                        if !opts.delay.is_zero() {
                            tokio::time::sleep(opts.delay).await;
                        }
                        let report = verifier.verify(address).await;
                        (merge_row(&cells, width, &slots, report_fields(&report)), true)
                    }
                    None => {
                        tracing::error!(row = ?cells, "could not extract a valid email");
                        let fields = skipped_fields(email.as_deref());
                        (merge_row(&cells, width, &slots, fields), false)
                    }
                }
            }
        })
        .buffered(opts.concurrency.max(1))
        .collect()
        .await;

    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(Vec::new());
    writer.write_record(&out_headers)?;
    for (row, verified) in results {
        writer.write_record(&row)?;
        if verified {
            summary.verified += 1;
        } else {
            summary.skipped += 1;
        }
    }
    let data = writer.into_inner().context("flush CSV output")?;
    write_all_atomically(&opts.output, &data)?;
    tracing::info!(
        output = %opts.output.display(),
        rows = summary.rows,
        verified = summary.verified,
        skipped = summary.skipped,
        "batch complete"
    );
    Ok(summary)
}

fn write_all_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let tmp = path.with_extension("tmp");
    {
        let mut f = std::fs::File::create(&tmp)
            .with_context(|| format!("create {}", tmp.display()))?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
