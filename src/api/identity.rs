use crate::error::{Error, Result};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use std::convert::Infallible;
use uuid::Uuid;

/// Header carrying the authenticated operator id, set by the upstream auth
/// gateway.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Identity of the acting operator. Extraction never fails; each operation
/// decides whether an absent identity is acceptable.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity(pub Option<Uuid>);

impl Identity {
    /// The operator id, or `AuthorizationRequired` when nobody is signed in.
    pub fn require(self) -> Result<Uuid> {
        self.0.ok_or(Error::AuthorizationRequired)
    }
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Infallible> {
        Ok(Identity(user_id_from_headers(&parts.headers)))
    }
}

fn user_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(USER_ID_HEADER)?
        .to_str()
        .ok()
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
}
