use crate::shortcode::ShortCode;
use serde::{Deserialize, Serialize};

/// User id that owns links created without authentication.
pub const ANONYMOUS_USER: &str = "anonymous";

/// A stored shortened link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// The original URL. Stored as an opaque string; the core does not
    /// validate its scheme or format.
    pub full_link: String,
    /// Id of the user that created the link, or [`ANONYMOUS_USER`].
    pub owner: String,
    /// Number of times the link has been resolved or redirected.
    pub lookups: u64,
}

impl LinkRecord {
    /// Creates a fresh record with a zero lookup count.
    pub fn new(full_link: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            full_link: full_link.into(),
            owner: owner.into(),
            lookups: 0,
        }
    }
}

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Authentication credential, compared in constant time.
    pub token: String,
    /// Display name. Stored but unused by the core logic.
    pub username: String,
    /// Codes created by this user, in creation order. Append-only.
    pub links: Vec<ShortCode>,
}

impl UserRecord {
    /// Creates a record with no links yet.
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
            links: Vec::new(),
        }
    }

    /// The well-known account that accumulates unattributed links.
    pub fn anonymous() -> Self {
        Self::new("", ANONYMOUS_USER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_link_record_starts_at_zero_lookups() {
        let record = LinkRecord::new("https://example.com", "alice");
        assert_eq!(record.lookups, 0);
        assert_eq!(record.owner, "alice");
    }

    #[test]
    fn anonymous_user_has_empty_token() {
        let user = UserRecord::anonymous();
        assert_eq!(user.token, "");
        assert_eq!(user.username, ANONYMOUS_USER);
        assert!(user.links.is_empty());
    }
}
