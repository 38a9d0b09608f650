//! Prefixed identifier generation.
//!
//! # Responsibility
//! - Produce opaque, non-sequential record IDs.
//! - Keep the prefix namespace closed: one prefix per entity kind.
//!
//! # Invariants
//! - Prefixes come from [`IdPrefix`] only and are at most 7 characters.
//! - Requesting an unknown prefix is a programming defect and panics.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Longest prefix kept in front of the token.
pub const MAX_PREFIX_LEN: usize = 7;

static PREFIXED_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z]{1,7})_([0-9a-f]{32})$").expect("valid prefixed id regex"));

/// Closed set of ID prefixes, one per entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdPrefix {
    User,
    Essay,
    Planning,
}

impl IdPrefix {
    pub const ALL: [IdPrefix; 3] = [IdPrefix::User, IdPrefix::Essay, IdPrefix::Planning];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "usr",
            Self::Essay => "esa",
            Self::Planning => "plg",
        }
    }

    /// Resolves a textual prefix against the closed set.
    pub fn parse(value: &str) -> Result<Self, InvalidPrefix> {
        Self::ALL
            .into_iter()
            .find(|prefix| prefix.as_str() == value)
            .ok_or_else(|| InvalidPrefix(value.to_string()))
    }
}

/// Prefix outside the enumerated namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPrefix(pub String);

impl Display for InvalidPrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid id prefix `{}`", self.0)
    }
}

impl Error for InvalidPrefix {}

/// Returns a fresh opaque token (32 lowercase hex characters).
pub fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Generates an ID, optionally namespaced by a textual prefix.
///
/// # Panics
/// Panics when `prefix` is not one of [`IdPrefix`]; callers must never
/// forward untrusted input here.
pub fn generate_id(prefix: Option<&str>) -> String {
    let token = generate_token();
    let Some(prefix) = prefix.filter(|value| !value.is_empty()) else {
        return token;
    };

    match IdPrefix::parse(prefix) {
        Ok(valid) => join(valid.as_str(), &token),
        Err(err) => panic!("{err}"),
    }
}

/// Generates an ID for a known entity prefix.
pub fn generate_prefixed(prefix: IdPrefix) -> String {
    join(prefix.as_str(), &generate_token())
}

/// Checks that `id` has the `<prefix>_<token>` shape produced for `prefix`.
pub fn is_prefixed_id(id: &str, prefix: IdPrefix) -> bool {
    PREFIXED_ID_RE
        .captures(id)
        .and_then(|caps| caps.get(1))
        .is_some_and(|found| found.as_str() == prefix.as_str())
}

fn join(prefix: &str, token: &str) -> String {
    let truncated: String = prefix.chars().take(MAX_PREFIX_LEN).collect();
    format!("{truncated}_{token}")
}

#[cfg(test)]
mod tests {
    use super::{generate_id, generate_prefixed, generate_token, is_prefixed_id, IdPrefix};
    use std::collections::HashSet;

    #[test]
    fn known_prefix_is_joined_with_underscore() {
        let id = generate_id(Some("usr"));
        assert!(id.starts_with("usr_"));
        assert_eq!(id.len(), 4 + generate_token().len());
        assert!(is_prefixed_id(&id, IdPrefix::User));
        assert!(!is_prefixed_id(&id, IdPrefix::Essay));
    }

    #[test]
    fn missing_or_empty_prefix_returns_bare_token() {
        assert!(!generate_id(None).contains('_'));
        assert!(!generate_id(Some("")).contains('_'));
    }

    #[test]
    #[should_panic(expected = "invalid id prefix `xyz`")]
    fn unknown_prefix_is_fatal() {
        let _ = generate_id(Some("xyz"));
    }

    #[test]
    fn parse_rejects_unknown_prefix() {
        assert_eq!(IdPrefix::parse("plg"), Ok(IdPrefix::Planning));
        assert!(IdPrefix::parse("PLG").is_err());
    }

    #[test]
    fn generated_ids_do_not_collide() {
        let ids: HashSet<_> = (0..500)
            .map(|_| generate_prefixed(IdPrefix::Essay))
            .collect();
        assert_eq!(ids.len(), 500);
    }
}
