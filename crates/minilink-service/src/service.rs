use crate::config::ServiceConfig;
use async_trait::async_trait;
use minilink_cache::{CachedOp, MemoCache};
use minilink_core::{
    CodeGenerator, LinkRecord, LinkStore, ResolvedLink, ShortCode, ShortenRequest, Shortener,
    ShortenerError, StoreError, UserRecord, UserStore, ANONYMOUS_USER,
};
use std::future::Future;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, trace, warn};

type Result<T> = std::result::Result<T, ShortenerError>;

const OP_LINK_RECORD: &str = "get_link_record";
const OP_RESOLVE: &str = "resolve_link";

/// Concrete implementation of the [`Shortener`] trait.
///
/// Orchestrates the code generator, the two stores, and two cached read
/// registrations on one shared [`MemoCache`]: full record reads under the
/// long TTL, code-to-link reads under the short one. The service itself is
/// stateless between calls; all state lives in the collaborators.
#[derive(Debug)]
pub struct ShortenerService<L, U, G> {
    links: Arc<L>,
    users: Arc<U>,
    generator: Arc<G>,
    config: ServiceConfig,
    record_reads: CachedOp<Option<LinkRecord>>,
    link_reads: CachedOp<Option<String>>,
}

impl<L, U, G> Clone for ShortenerService<L, U, G> {
    fn clone(&self) -> Self {
        Self {
            links: Arc::clone(&self.links),
            users: Arc::clone(&self.users),
            generator: Arc::clone(&self.generator),
            config: self.config.clone(),
            record_reads: self.record_reads.clone(),
            link_reads: self.link_reads.clone(),
        }
    }
}

impl<L: LinkStore, U: UserStore, G: CodeGenerator> ShortenerService<L, U, G> {
    /// Creates the service and, when authentication is disabled, seeds the
    /// anonymous user record so unattributed links always have an owner.
    pub async fn new(
        links: L,
        users: U,
        generator: G,
        cache: MemoCache,
        config: ServiceConfig,
    ) -> Result<Self> {
        let service = Self {
            links: Arc::new(links),
            users: Arc::new(users),
            generator: Arc::new(generator),
            record_reads: cache.register(OP_LINK_RECORD, config.record_ttl),
            link_reads: cache.register(OP_RESOLVE, config.resolve_ttl),
            config,
        };

        if !service.config.require_auth {
            service.seed_anonymous_user().await?;
        }

        Ok(service)
    }

    async fn seed_anonymous_user(&self) -> Result<()> {
        let existing = self
            .bounded("user read", self.users.get(ANONYMOUS_USER))
            .await?;
        if existing.is_none() {
            info!(user = ANONYMOUS_USER, "seeding anonymous user record");
            self.bounded(
                "user put",
                self.users.put(ANONYMOUS_USER, UserRecord::anonymous()),
            )
            .await?;
            self.bounded("user flush", self.users.flush()).await?;
        }
        Ok(())
    }

    /// Determines the owning user for a shorten call.
    ///
    /// With authentication required, both credentials must be present and
    /// valid. Without it, a supplied user id is still honored as the owner.
    async fn resolve_owner(&self, request: &ShortenRequest) -> Result<String> {
        if self.config.require_auth {
            let (Some(user_id), Some(token)) = (&request.user_id, &request.auth_token) else {
                return Err(ShortenerError::Unauthorized);
            };
            let authenticated = self
                .bounded("user auth", self.users.authenticate(user_id, token))
                .await?;
            if !authenticated {
                return Err(ShortenerError::Unauthorized);
            }
            Ok(user_id.clone())
        } else {
            Ok(request
                .user_id
                .clone()
                .unwrap_or_else(|| ANONYMOUS_USER.to_string()))
        }
    }

    /// Records one lookup against the authoritative store and flushes.
    async fn count_lookup(&self, code: &ShortCode) -> Result<()> {
        self.bounded("lookup increment", self.links.increment_lookups(code))
            .await?;
        self.bounded("link flush", self.links.flush()).await?;
        Ok(())
    }

    /// Runs a store operation under the configured time bound.
    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = std::result::Result<T, StoreError>>,
    ) -> Result<T> {
        match timeout(self.config.store_timeout, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(StoreError::Timeout(op.to_string()).into()),
        }
    }
}

#[async_trait]
impl<L: LinkStore, U: UserStore, G: CodeGenerator> Shortener for ShortenerService<L, U, G> {
    async fn shorten(&self, request: ShortenRequest) -> Result<ShortCode> {
        if request.full_link.is_empty() {
            return Err(ShortenerError::InvalidInput(
                "full_link must not be empty".to_string(),
            ));
        }

        let owner = self.resolve_owner(&request).await?;
        let code = self.generator.derive(&request.full_link);
        debug!(code = %code, owner = %owner, "shortening link");

        // Shortening the same link again rewrites the record, which resets
        // its lookup count to zero.
        let record = LinkRecord::new(request.full_link, &owner);
        self.bounded("link put", self.links.put(&code, record))
            .await?;
        self.bounded("link flush", self.links.flush()).await?;

        self.bounded("user append", self.users.append_link(&owner, &code))
            .await?;
        self.bounded("user flush", self.users.flush()).await?;

        Ok(code)
    }

    async fn resolve(&self, code: &ShortCode) -> Result<Option<ResolvedLink>> {
        trace!(code = %code, "resolving code");

        let links = Arc::clone(&self.links);
        let wanted = code.clone();
        let record = self
            .record_reads
            .get_or_compute(code.as_str(), || async move {
                match links.get(&wanted).await {
                    Ok(found) => Ok::<_, ShortenerError>(found),
                    Err(err) => {
                        warn!(code = %wanted, error = %err, "link read failed, treating as absent");
                        Ok(None)
                    }
                }
            })
            .await?;

        let Some(record) = record else {
            debug!(code = %code, "code not found");
            return Ok(None);
        };

        // The counter increment always reaches the store; the value handed
        // back is the cached one and may trail by up to the TTL window.
        self.count_lookup(code).await?;

        Ok(Some(ResolvedLink {
            full_link: record.full_link,
            lookups: record.lookups,
        }))
    }

    async fn resolve_and_redirect(&self, code: &ShortCode) -> Result<Option<String>> {
        trace!(code = %code, "resolving code for redirect");

        let links = Arc::clone(&self.links);
        let wanted = code.clone();
        let full_link = self
            .link_reads
            .get_or_compute(code.as_str(), || async move {
                match links.get(&wanted).await {
                    Ok(found) => Ok::<_, ShortenerError>(found.map(|record| record.full_link)),
                    Err(err) => {
                        warn!(code = %wanted, error = %err, "link read failed, treating as absent");
                        Ok(None)
                    }
                }
            })
            .await?;

        let Some(full_link) = full_link else {
            debug!(code = %code, "code not found");
            return Ok(None);
        };

        self.count_lookup(code).await?;

        Ok(Some(full_link))
    }
}
