use std::time::Duration;
use typed_builder::TypedBuilder;

/// Tunables for [`crate::ShortenerService`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct ServiceConfig {
    /// Require a valid `user_id` / `auth_token` pair on shorten.
    /// When disabled, unattributed links belong to the anonymous user.
    #[builder(default = false)]
    pub require_auth: bool,

    /// How long a resolved code-to-link mapping may be served from cache.
    #[builder(default = Duration::from_secs(300))]
    pub resolve_ttl: Duration,

    /// How long a full link record may be served from cache.
    #[builder(default = Duration::from_secs(1200))]
    pub record_ttl: Duration,

    /// Upper bound on any single store write; expiry fails the operation.
    #[builder(default = Duration::from_secs(5))]
    pub store_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
