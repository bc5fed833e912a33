use crate::error::ShortenerError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, ShortenerError>;

/// Parameters for creating a shortened link.
#[derive(Debug, Clone)]
pub struct ShortenRequest {
    /// The link to shorten. Must be non-empty.
    pub full_link: String,
    /// Id of the creating user, if supplied by the caller.
    pub user_id: Option<String>,
    /// Credential for the creating user, if supplied by the caller.
    pub auth_token: Option<String>,
}

/// The outcome of resolving a short code.
///
/// The lookup count reflects the value read through the cache, which may
/// trail the authoritative store by up to one TTL window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLink {
    pub full_link: String,
    pub lookups: u64,
}

/// The three public operations of the shortener.
///
/// Transport adapters hold this as a trait object and exchange plain values
/// with it; HTTP never reaches below this seam.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Creates (or rewrites) the record for a link and returns its code.
    async fn shorten(&self, request: ShortenRequest) -> Result<ShortCode>;

    /// Resolves a code to its link and lookup count.
    /// Returns `None` if the code is unknown.
    async fn resolve(&self, code: &ShortCode) -> Result<Option<ResolvedLink>>;

    /// Resolves a code to its link only, for issuing a redirect.
    /// Returns `None` if the code is unknown.
    async fn resolve_and_redirect(&self, code: &ShortCode) -> Result<Option<String>>;
}
