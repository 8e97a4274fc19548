// Identity extraction for every request, and the extractor handlers use to read it

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::auth::{error::AuthError, models::Identity, token::TokenService};

/// Pull the bearer token out of the Authorization header, if there is one
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolve the caller's identity from the request headers
///
/// Missing, malformed or unverifiable tokens all resolve to an anonymous caller.
pub fn resolve_identity(headers: &HeaderMap, tokens: &TokenService) -> Option<Identity> {
    let token = bearer_token(headers)?;
    match tokens.verify(token) {
        Ok(identity) => Some(identity),
        Err(_) => {
            debug!("Ignoring unverifiable bearer token, continuing anonymously");
            None
        }
    }
}

/// Middleware that attaches the verified [`Identity`] to the request extensions
///
/// Never rejects: access decisions belong to the policy layer.
pub async fn attach_identity(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(identity) = resolve_identity(request.headers(), &tokens) {
        debug!("Request from user_id={}", identity.id);
        request.extensions_mut().insert(identity);
    }
    next.run(request).await
}

/// Authenticated user extractor for protected handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AuthError::MissingToken)
    }
}
