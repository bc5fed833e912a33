use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ShortenBody {
    pub full_link: String,
    pub user_id: Option<String>,
    pub auth_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub shortened: String,
}

/// Body of `GET /api/unshorten/{code}`.
///
/// A miss is reported in the body with status 200, which is the public
/// contract of this endpoint.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UnshortenResponse {
    Found { full_link: String, lookups: u64 },
    NotFound { error: &'static str },
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
