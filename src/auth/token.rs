use std::collections::HashMap;

use serde_json::Value as JsonValue;
use uuid::Uuid;

/// A token already verified by the identity provider's machinery.
///
/// Verification (signature, expiry, audience) happens outside this crate;
/// what arrives here is the fixed `subject` plus the open claims map. The
/// claim accessors return `None` for absent or differently-typed claims
/// rather than erroring — optional claims are genuinely optional.
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    subject: String,
    claims: HashMap<String, JsonValue>,
}

impl VerifiedToken {
    pub fn new(subject: impl Into<String>, claims: HashMap<String, JsonValue>) -> Self {
        Self {
            subject: subject.into(),
            claims,
        }
    }

    /// Build a token from a raw claims map, reading the subject from
    /// `subject_claim` and falling back to `fallback_claim`. Returns `None`
    /// when neither claim carries a non-empty string.
    pub fn from_claims(
        claims: HashMap<String, JsonValue>,
        subject_claim: &str,
        fallback_claim: &str,
    ) -> Option<Self> {
        let subject = [subject_claim, fallback_claim]
            .iter()
            .find_map(|name| claims.get(*name).and_then(JsonValue::as_str))
            .filter(|s| !s.is_empty())?
            .to_string();

        Some(Self { subject, claims })
    }

    /// External subject identifier.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// A string-valued claim, if present.
    pub fn string_claim(&self, name: &str) -> Option<&str> {
        self.claims.get(name).and_then(JsonValue::as_str)
    }

    /// A UUID-valued claim (stored as its string form), if present and valid.
    pub fn uuid_claim(&self, name: &str) -> Option<Uuid> {
        self.string_claim(name)
            .and_then(|s| Uuid::parse_str(s).ok())
    }

    /// A list-of-strings claim. Providers emit either a JSON array or a
    /// single string for one-element lists; both shapes are accepted.
    pub fn string_list_claim(&self, name: &str) -> Vec<String> {
        match self.claims.get(name) {
            Some(JsonValue::Array(values)) => values
                .iter()
                .filter_map(JsonValue::as_str)
                .map(str::to_string)
                .collect(),
            Some(JsonValue::String(value)) => vec![value.clone()],
            _ => Vec::new(),
        }
    }
}
