use crate::shortcode::ShortCode;
use sha3::{Digest, Sha3_256};

/// Number of hex digits taken from the digest for a short code.
pub const CODE_LENGTH: usize = 5;

/// Derives a short code from a full link.
///
/// Implementations must be pure: the same link always yields the same code,
/// across calls and across process restarts. Any string input, including the
/// empty string, produces a code.
pub trait CodeGenerator: Send + Sync + 'static {
    fn derive(&self, full_link: &str) -> ShortCode;
}

/// Hash-based code generator.
///
/// Hashes the link with SHA3-256 and takes a fixed-width prefix of the
/// lowercase hex digest. No salt is involved, so derivation is reproducible.
/// Distinct links that share a digest prefix map to the same code; the link
/// store resolves that by overwriting (last write wins).
#[derive(Debug, Clone)]
pub struct DigestCodeGenerator {
    length: usize,
}

impl DigestCodeGenerator {
    pub fn new() -> Self {
        Self {
            length: CODE_LENGTH,
        }
    }

    /// Uses a custom prefix length, clamped to the hex digest length.
    pub fn with_length(length: usize) -> Self {
        Self {
            length: length.min(Sha3_256::output_size() * 2),
        }
    }
}

impl Default for DigestCodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator for DigestCodeGenerator {
    fn derive(&self, full_link: &str) -> ShortCode {
        let digest = Sha3_256::digest(full_link.as_bytes());
        let hex = hex::encode(digest);
        ShortCode::new_unchecked(&hex[..self.length])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let generator = DigestCodeGenerator::new();
        let first = generator.derive("https://example.com/some/page");
        let second = generator.derive("https://example.com/some/page");
        assert_eq!(first, second);
    }

    #[test]
    fn codes_have_fixed_length() {
        let generator = DigestCodeGenerator::new();
        for link in ["https://example.com", "a", "", "https://other.example"] {
            assert_eq!(generator.derive(link).as_str().len(), CODE_LENGTH);
        }
    }

    #[test]
    fn codes_are_lowercase_hex() {
        let generator = DigestCodeGenerator::new();
        let code = generator.derive("https://example.com");
        assert!(code
            .as_str()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn distinct_links_usually_differ() {
        let generator = DigestCodeGenerator::new();
        let a = generator.derive("https://example.com/a");
        let b = generator.derive("https://example.com/b");
        assert_ne!(a, b);
    }

    #[test]
    fn custom_length_is_clamped() {
        let generator = DigestCodeGenerator::with_length(1024);
        // SHA3-256 produces 64 hex digits.
        assert_eq!(generator.derive("https://example.com").as_str().len(), 64);
    }
}
