//! Address syntax checks.
//!
//! Pure functions, no I/O. [`check_syntax`] is the boolean contract the
//! verification pipeline consumes; [`validate_address`] keeps the reasons for
//! diagnostics and the CLI.

mod domain;
mod local;
mod types;

pub use types::{AddressError, EmailAddress, ValidationReport};

use domain::check_domain;
use local::check_local;

impl EmailAddress {
    /// Splits `email` on its single `@`. Only the structural invariants are
    /// checked here; use [`check_syntax`] for full validation.
    pub fn parse(email: &str) -> Result<Self, AddressError> {
        let input = email.trim();
        let mut parts = input.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(AddressError::AtSign);
        };
        if domain.is_empty() {
            return Err(AddressError::EmptyDomain);
        }
        Ok(Self {
            local: local.to_string(),
            domain: domain.to_ascii_lowercase(),
        })
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.local, self.domain)
    }
}

pub fn validate_address(email: &str) -> ValidationReport {
    let input = email.trim();
    let mut reasons = Vec::new();

    if input.len() > 254 {
        reasons.push(format!("total length {} > 254", input.len()));
    }

    let address = match EmailAddress::parse(input) {
        Ok(address) => address,
        Err(err) => {
            reasons.push(err.to_string());
            return ValidationReport { ok: false, reasons };
        }
    };

    check_local(&address.local, &mut reasons);
    check_domain(&address.domain, &mut reasons);

    ValidationReport {
        ok: reasons.is_empty(),
        reasons,
    }
}

pub fn check_syntax(email: &str) -> bool {
    validate_address(email).ok
}
