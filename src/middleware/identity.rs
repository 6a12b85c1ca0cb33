use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::auth::{CallerIdentity, IdentityResolver, VerifiedToken};

/// Resolve the caller identity for one request.
///
/// The verification layer (out of scope here) inserts a [`VerifiedToken`]
/// extension for authenticated requests; this middleware resolves it and
/// attaches the resulting [`CallerIdentity`] as a request extension. The
/// extension is dropped with the request on every path, success or failure,
/// so a pooled worker's next request always starts clean — there is no
/// ambient storage to clear.
///
/// Requests without a token, and requests whose resolution fails, continue
/// as anonymous.
pub async fn resolve_identity(
    State(resolver): State<Arc<IdentityResolver>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = request.extensions().get::<VerifiedToken>().cloned() {
        match resolver.resolve(&token).await {
            Ok(identity) => {
                request.extensions_mut().insert(identity);
            }
            Err(e) => {
                tracing::warn!(
                    subject = %token.subject(),
                    error = %e,
                    "identity resolution failed; continuing as anonymous"
                );
            }
        }
    }

    next.run(request).await
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .unwrap_or_else(CallerIdentity::anonymous))
    }
}
