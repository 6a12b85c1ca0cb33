//! Role vocabulary and normalization rules.
//!
//! Every component that touches role names (role store, claims synchronizer,
//! request workflow) goes through [`normalize_roles`] so the canonical store,
//! the mirrored claims and the request records always agree on casing,
//! whitespace and ordering.

/// Baseline role every authenticated identity carries downstream.
pub const ROLE_USER: &str = "USER";
/// Role granting ownership-scoped write access to domain resources.
pub const ROLE_EDITOR: &str = "EDITOR";
/// Role granting unrestricted access.
pub const ROLE_ADMIN: &str = "ADMIN";

/// Roles the role store accepts. Anything outside this list fails the whole
/// call; partial application is not permitted.
pub const ASSIGNABLE_ROLES: &[&str] = &[ROLE_USER, ROLE_EDITOR, ROLE_ADMIN];

/// Roles a non-administrator may ask for through the request workflow.
/// A strict subset of [`ASSIGNABLE_ROLES`].
pub const REQUESTABLE_ROLES: &[&str] = &[ROLE_EDITOR];

/// Normalize a set of role names: trim whitespace, drop entries that are
/// empty after trimming, uppercase, dedupe, and sort for deterministic
/// ordering.
pub fn normalize_roles<I, S>(roles: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = roles
        .into_iter()
        .map(|r| r.as_ref().trim().to_uppercase())
        .filter(|r| !r.is_empty())
        .collect();
    normalized.sort();
    normalized.dedup();
    normalized
}

/// Return the subset of `roles` that is not in `allowed`.
///
/// Used to reject a call naming the offending roles rather than silently
/// applying the valid remainder.
pub fn disallowed_roles<'a>(roles: &'a [String], allowed: &[&str]) -> Vec<&'a str> {
    roles
        .iter()
        .map(String::as_str)
        .filter(|r| !allowed.contains(r))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_uppercases_and_dedupes() {
        let roles = normalize_roles(["editor", "EDITOR", " Editor "]);
        assert_eq!(roles, vec!["EDITOR".to_string()]);
    }

    #[test]
    fn normalize_drops_empty_entries() {
        let roles = normalize_roles(["", "  ", "admin"]);
        assert_eq!(roles, vec!["ADMIN".to_string()]);
    }

    #[test]
    fn normalize_sorts_for_determinism() {
        let roles = normalize_roles(["USER", "ADMIN", "EDITOR"]);
        assert_eq!(roles, vec!["ADMIN", "EDITOR", "USER"]);
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_roles(["editor", " user"]);
        let twice = normalize_roles(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn disallowed_roles_flags_unknown_names() {
        let roles = normalize_roles(["user", "superuser"]);
        let rejected = disallowed_roles(&roles, ASSIGNABLE_ROLES);
        assert_eq!(rejected, vec!["SUPERUSER"]);
    }

    #[test]
    fn requestable_roles_are_a_subset_of_assignable() {
        for role in REQUESTABLE_ROLES {
            assert!(ASSIGNABLE_ROLES.contains(role));
        }
    }
}
