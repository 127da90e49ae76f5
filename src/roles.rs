//! Role-account detection: addresses that name a function (support@, abuse@)
//! rather than a person.

use phf::phf_set;

static ROLE_LOCAL_PARTS: phf::Set<&'static str> = phf_set! {
    "admin", "info", "support", "sales", "contact", "help", "office", "billing",
    "abuse", "postmaster", "webmaster", "noc", "security", "legal", "hr", "jobs",
    "press", "media",
};

/// `true` when the local part of `email` is a known role name. Comparison is
/// case-insensitive; an address without `@` is treated as a bare local part.
pub fn is_role_account(email: &str) -> bool {
    let local = email.trim().split('@').next().unwrap_or_default();
    is_role_local_part(local)
}

pub fn is_role_local_part(local: &str) -> bool {
    ROLE_LOCAL_PARTS.contains(local.to_ascii_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn detects_roles() {
        assert!(is_role_account("admin@example.com"));
        assert!(is_role_account("Support@example.com"));
        assert!(is_role_account("POSTMASTER@example.org"));
    }

    #[test]
    fn people_are_not_roles() {
        assert!(!is_role_account("bob@example.com"));
        assert!(!is_role_account("info.desk@example.com"));
        assert!(!is_role_account("@example.com"));
    }

    proptest! {
        #[test]
        fn role_check_ignores_case_and_domain(idx in 0usize..18, domain in "[a-z]{1,12}\\.[a-z]{2,4}") {
            let role = ROLE_LOCAL_PARTS.iter().nth(idx).copied().unwrap_or("admin");
            let upper = format!("{}@{domain}", role.to_ascii_uppercase());
            prop_assert!(is_role_account(&upper));
        }
    }
}
