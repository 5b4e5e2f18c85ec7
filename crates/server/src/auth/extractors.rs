use axum::{extract::FromRequestParts, http::request::Parts};
use shared_types::{AppError, UserRole};
use uuid::Uuid;

use super::jwt::Claims;

/// The authenticated actor making a request.
///
/// Resolved from validated JWT claims; the role string is parsed once here
/// so every downstream decision works on the typed role. Unknown role
/// strings survive as `UserRole::Unknown` and are denied by the access
/// evaluator rather than at extraction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub role: UserRole,
}

impl Principal {
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            id: claims.sub,
            role: UserRole::from_str_or_default(&claims.role),
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .map(Principal::from_claims)
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

/// Extractor that optionally resolves a principal. Never fails.
pub struct MaybePrincipal(pub Option<Principal>);

impl<S: Send + Sync> FromRequestParts<S> for MaybePrincipal {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybePrincipal(
            parts.extensions.get::<Claims>().map(Principal::from_claims),
        ))
    }
}
