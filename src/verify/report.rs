#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

use crate::smtp::SmtpProbeResult;

/// Outcome of one verification. Fields keep their initial value when the
/// stage that owns them never ran.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    pub email: String,
    pub syntax_valid: bool,
    pub role_account: bool,
    pub mx_valid: bool,
    pub disposable: bool,
    pub smtp: SmtpProbeResult,
    /// `None` when the catch-all check was not performed.
    pub catch_all: Option<bool>,
    pub errors: Vec<String>,
}

impl VerificationReport {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    /// Routable, not throw-away, mailbox accepted and the domain does not
    /// accept everything.
    pub fn is_deliverable(&self) -> bool {
        self.mx_valid && !self.disposable && self.smtp.success && self.catch_all != Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted() -> VerificationReport {
        VerificationReport {
            syntax_valid: true,
            mx_valid: true,
            smtp: SmtpProbeResult {
                success: true,
                code: Some(250),
                response: "Ok".into(),
                host: Some("mx.example.com".into()),
            },
            catch_all: Some(false),
            ..VerificationReport::new("bob@example.com")
        }
    }

    #[test]
    fn deliverable_requires_every_signal() {
        assert!(accepted().is_deliverable());
        assert!(VerificationReport { catch_all: None, ..accepted() }.is_deliverable());
        assert!(!VerificationReport { catch_all: Some(true), ..accepted() }.is_deliverable());
        assert!(!VerificationReport { disposable: true, ..accepted() }.is_deliverable());
        assert!(!VerificationReport::new("bob@example.com").is_deliverable());
    }

    #[cfg(feature = "with-serde")]
    #[test]
    fn serialises_camel_case() {
        let json = serde_json::to_value(accepted()).expect("serialise");
        assert_eq!(json["syntaxValid"], true);
        assert_eq!(json["roleAccount"], false);
        assert_eq!(json["catchAll"], false);
        assert_eq!(json["smtp"]["code"], 250);
    }
}
