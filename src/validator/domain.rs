/// TLD réservé (RFC 6761) qui ne résout jamais.
const NEVER_RESOLVES_TLD: &str = "invalid";

/// Valide le domaine: conversion IDNA, labels LDH, TLD plausible.
/// Push des raisons invalidantes dans `reasons`.
pub(crate) fn check_domain(domain: &str, reasons: &mut Vec<String>) {
    let ascii = match idna::domain_to_ascii(domain) {
        Ok(d) => d,
        Err(_) => {
            reasons.push("domain punycode conversion failed".to_string());
            return;
        }
    };

    if ascii.is_empty() {
        reasons.push("domain empty after IDNA conversion".to_string());
        return;
    }
    if ascii.len() > 253 {
        reasons.push(format!("domain length {} > 253", ascii.len()));
    }

    let labels: Vec<&str> = ascii.split('.').collect();
    if labels.len() < 2 {
        reasons.push("domain must contain at least one dot".to_string());
    }

    for label in &labels {
        if label.is_empty() {
            reasons.push("empty domain label".to_string());
            continue;
        }
        if label.len() > 63 {
            reasons.push(format!("domain label '{label}' length {} > 63", label.len()));
        }
        if label.starts_with('-') || label.ends_with('-') {
            reasons.push(format!("domain label '{label}' cannot start/end with '-'"));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            reasons.push(format!("domain label '{label}' has invalid chars"));
        }
    }

    if let Some(tld) = labels.last().filter(|_| labels.len() >= 2) {
        let punycode = tld.starts_with("xn--");
        if !punycode && (tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic())) {
            reasons.push(format!("top-level domain '{tld}' is not valid"));
        }
        if tld.eq_ignore_ascii_case(NEVER_RESOLVES_TLD) {
            reasons.push("'.invalid' domains never resolve".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reasons_for(domain: &str) -> Vec<String> {
        let mut reasons = vec![];
        check_domain(domain, &mut reasons);
        reasons
    }

    #[test]
    fn basic_domain_ok() {
        assert!(reasons_for("example.com").is_empty());
        assert!(reasons_for("mail.exämple.de").is_empty());
        assert!(reasons_for("disposable-domain.test").is_empty());
    }

    #[test]
    fn label_too_long() {
        let long = "a".repeat(64);
        assert!(!reasons_for(&format!("{long}.com")).is_empty());
    }

    #[test]
    fn requires_alphabetic_tld() {
        assert!(!reasons_for("example.c0m").is_empty());
        assert!(!reasons_for("example.c").is_empty());
        assert!(!reasons_for("localhost").is_empty());
    }

    #[test]
    fn rejects_reserved_invalid_tld() {
        let reasons = reasons_for("nowhere.invalid");
        assert!(reasons.iter().any(|r| r.contains(".invalid")));
    }
}
