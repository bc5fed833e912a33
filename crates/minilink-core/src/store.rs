use crate::error::StoreError;
use crate::record::{LinkRecord, UserRecord};
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use subtle::ConstantTimeEq;

type Result<T> = std::result::Result<T, StoreError>;

/// A durable mapping from short code to link record.
///
/// Implementations must be safe to call concurrently from multiple tasks
/// against the same instance. `get` on an unknown code returns `Ok(None)`,
/// never an error.
#[async_trait]
pub trait LinkStore: Send + Sync + 'static {
    /// Retrieves the record for a short code, if any.
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>>;

    /// Inserts a record, overwriting any existing record for the code.
    async fn put(&self, code: &ShortCode, record: LinkRecord) -> Result<()>;

    /// Adds one to the lookup counter of an existing record.
    ///
    /// The read-modify-write is atomic per key, so concurrent increments of
    /// the same code do not lose updates. Returns an error if the code is
    /// unknown; a dropped count should fail loudly rather than vanish.
    async fn increment_lookups(&self, code: &ShortCode) -> Result<()>;

    /// Makes all prior writes durable before returning.
    async fn flush(&self) -> Result<()>;
}

/// A durable mapping from user id to account record.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Retrieves the record for a user id, if any.
    async fn get(&self, user_id: &str) -> Result<Option<UserRecord>>;

    /// Inserts a record, overwriting any existing record for the id.
    async fn put(&self, user_id: &str, record: UserRecord) -> Result<()>;

    /// Appends a code to the user's link sequence.
    ///
    /// Creates the record if the user is unknown (first write wins), then
    /// appends. Atomic per key, like [`LinkStore::increment_lookups`].
    async fn append_link(&self, user_id: &str, code: &ShortCode) -> Result<()>;

    /// Makes all prior writes durable before returning.
    async fn flush(&self) -> Result<()>;

    /// Checks a credential against the stored record.
    ///
    /// True iff a record exists for `user_id` and its token matches. The
    /// comparison runs in constant time. An unknown user is simply not
    /// authenticated, never an error.
    async fn authenticate(&self, user_id: &str, token: &str) -> Result<bool> {
        let Some(user) = self.get(user_id).await? else {
            return Ok(false);
        };
        Ok(user.token.as_bytes().ct_eq(token.as_bytes()).into())
    }
}
