use anyhow::{Result, bail};
use mailprobe_lib::VerificationReport;

pub fn write_report(report: &VerificationReport, format: &str) -> Result<()> {
    match format {
        "human" => {
            for line in human_lines(report) {
                println!("{line}");
            }
            Ok(())
        }
        "json" => write_json(report),
        other => bail!("unknown --format '{other}', use: human|json"),
    }
}

#[cfg(feature = "with-serde")]
fn write_json(report: &VerificationReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_json(_: &VerificationReport) -> Result<()> {
    bail!("format=json requires the 'with-serde' feature")
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

pub fn human_lines(report: &VerificationReport) -> Vec<String> {
    let verdict = if report.is_deliverable() {
        "[DELIVERABLE]"
    } else {
        "[UNDELIVERABLE]"
    };
    let mut lines = vec![
        format!("{verdict} {}", report.email),
        format!(
            "        syntax: {}  role: {}  mx: {}  disposable: {}",
            if report.syntax_valid { "ok" } else { "invalid" },
            yes_no(report.role_account),
            if report.mx_valid { "ok" } else { "none" },
            yes_no(report.disposable),
        ),
    ];

    let smtp = &report.smtp;
    if smtp.code.is_some() || smtp.host.is_some() || !smtp.response.is_empty() {
        let code = smtp.code.map(|c| c.to_string()).unwrap_or_else(|| "-".into());
        let host = smtp.host.as_deref().unwrap_or("no host");
        lines.push(format!("        smtp: {code} {} ({host})", smtp.response));
    }
    if let Some(catch_all) = report.catch_all {
        lines.push(format!("        catch-all: {}", yes_no(catch_all)));
    }
    for err in &report.errors {
        lines.push(format!("        error: {err}"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailprobe_lib::SmtpProbeResult;

    #[test]
    fn human_output_for_rejected_mailbox() {
        let report = VerificationReport {
            syntax_valid: true,
            mx_valid: true,
            smtp: SmtpProbeResult {
                success: false,
                code: Some(550),
                response: "5.1.1 User unknown".into(),
                host: Some("mx1.example.com".into()),
            },
            catch_all: Some(false),
            errors: vec!["SMTP verification failed for mailbox: 5.1.1 User unknown".into()],
            ..VerificationReport::new("ghost@example.com")
        };
        assert_eq!(
            human_lines(&report),
            vec![
                "[UNDELIVERABLE] ghost@example.com",
                "        syntax: ok  role: no  mx: ok  disposable: no",
                "        smtp: 550 5.1.1 User unknown (mx1.example.com)",
                "        catch-all: no",
                "        error: SMTP verification failed for mailbox: 5.1.1 User unknown",
            ]
        );
    }

    #[test]
    fn untouched_smtp_is_omitted() {
        let report = VerificationReport {
            errors: vec!["Invalid email syntax".into()],
            ..VerificationReport::new("nope")
        };
        let lines = human_lines(&report);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("[UNDELIVERABLE]"));
    }
}
