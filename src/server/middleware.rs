use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::debug;

use super::SharedState;
use crate::error::AppError;

/// Name of the cookie carrying the signed identity token.
pub const IDENTITY_COOKIE: &str = "identity";

/// The caller identity resolved for the current request.
///
/// Attached to request extensions by [`identity_gate`]. Handlers do not
/// currently consume it: forms and responses are not scoped to identities,
/// only the issue-or-verify gate itself is observable behavior.
#[derive(Debug, Clone)]
pub struct RequestIdentity(pub String);

/// Identity gate run ahead of every handler.
///
/// A request without an identity cookie gets a fresh identity minted and the
/// signed token set as a cookie on the response. A request with a cookie must
/// carry a verifiable token or the whole request fails; there is no fallback
/// issuance on a corrupt token.
pub async fn identity_gate(
    State(state): State<SharedState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<(CookieJar, Response), AppError> {
    let presented = jar.get(IDENTITY_COOKIE).map(|c| c.value().to_owned());

    let resolved = state.identity.resolve(presented.as_deref())?;

    if resolved.fresh_token.is_some() {
        debug!(identity = %resolved.identity, "Minted identity for new caller");
    }

    request
        .extensions_mut()
        .insert(RequestIdentity(resolved.identity));

    let jar = match resolved.fresh_token {
        Some(token) => jar.add(identity_cookie(token, &state.config.server.cookie_domain)),
        None => jar,
    };

    Ok((jar, next.run(request).await))
}

/// Session cookie: path `/`, pinned domain, secure, not script-readable.
fn identity_cookie(token: String, domain: &str) -> Cookie<'static> {
    Cookie::build((IDENTITY_COOKIE, token))
        .path("/")
        .domain(domain.to_owned())
        .secure(true)
        .http_only(true)
        .build()
}
