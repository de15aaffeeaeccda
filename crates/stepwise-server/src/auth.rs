//! Session resolution middleware.
//!
//! Identity is delegated to an opaque session token, accepted either as
//! `Authorization: Bearer <token>` or as the `stepwise_session` cookie. The
//! middleware resolves the token against the sessions table and attaches a
//! [`CurrentUser`] extension; it never rejects by itself — each handler
//! decides how to treat an anonymous caller (the goal list degrades to empty,
//! everything else returns 401).

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

pub const SESSION_COOKIE: &str = "stepwise_session";

/// Identity of the requester; `None` when no valid session was presented.
#[derive(Clone, Debug, Default)]
pub struct CurrentUser(pub Option<String>);

pub async fn resolve_session(
    State(app): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = bearer_token(req.headers()).or_else(|| cookie_token(req.headers()));

    let user = match token {
        Some(token) => match app.store.user_for_token(&token).await {
            Ok(user) => user,
            Err(e) => {
                // A store failure must not grant or fake a session.
                tracing::warn!(error = %e, "session lookup failed; treating request as anonymous");
                None
            }
        },
        None => None,
    };

    req.extensions_mut().insert(CurrentUser(user));
    next.run(req).await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get("cookie").and_then(|v| v.to_str().ok())?;
    cookies.split(';').find_map(|part| {
        part.trim()
            .strip_prefix(SESSION_COOKIE)?
            .strip_prefix('=')
            .map(str::to_string)
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(
                axum::http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn bearer_token_extracted() {
        let h = headers(&[("authorization", "Bearer abc123")]);
        assert_eq!(bearer_token(&h).as_deref(), Some("abc123"));
    }

    #[test]
    fn non_bearer_authorization_ignored() {
        let h = headers(&[("authorization", "Basic dXNlcjpwdw==")]);
        assert!(bearer_token(&h).is_none());
    }

    #[test]
    fn cookie_token_extracted() {
        let h = headers(&[("cookie", "theme=dark; stepwise_session=tok42; lang=en")]);
        assert_eq!(cookie_token(&h).as_deref(), Some("tok42"));
    }

    #[test]
    fn unrelated_cookies_yield_nothing() {
        let h = headers(&[("cookie", "theme=dark; lang=en")]);
        assert!(cookie_token(&h).is_none());
    }

    #[test]
    fn cookie_prefix_name_does_not_match() {
        let h = headers(&[("cookie", "stepwise_session_old=tok42")]);
        assert!(cookie_token(&h).is_none());
    }

    #[test]
    fn no_headers_no_token() {
        let h = HeaderMap::new();
        assert!(bearer_token(&h).is_none());
        assert!(cookie_token(&h).is_none());
    }
}
