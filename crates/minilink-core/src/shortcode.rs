use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A short code identifier for a shortened link.
///
/// Codes are derived deterministically from the full link (see
/// [`crate::codegen`]), so the same link always maps to the same code.
/// Inbound codes from the transport layer are carried as-is; an unknown
/// code simply resolves to nothing.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShortCode(String);

impl ShortCode {
    /// Wraps a string as a `ShortCode` without further checks.
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
