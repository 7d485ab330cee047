use crate::error::ServerError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use testmate_core::TestmateError;

/// Header carrying the authenticated user, set by the upstream auth proxy.
pub const IDENTITY_HEADER: &str = "x-user-id";

/// The caller's identity, taken from [`IDENTITY_HEADER`].
#[derive(Debug, Clone)]
pub struct CallerIdentity(pub String);

impl<S: Send + Sync> FromRequestParts<S> for CallerIdentity {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(IDENTITY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| CallerIdentity(v.to_string()))
            .ok_or_else(|| {
                TestmateError::AuthenticationUnavailable(format!(
                    "missing {IDENTITY_HEADER} header"
                ))
                .into()
            })
    }
}
