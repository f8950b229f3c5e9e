//! Session identity for anonymous callers.
//!
//! A session is nothing more than an opaque token round-tripped through a
//! cookie: it is minted on the first transaction a caller records and reused
//! thereafter. Tokens are not registered anywhere on the server; the only
//! durable association between a token and data is the `session_id` column
//! on the rows that reference it.

use std::fmt::{self, Display};

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Duration;
use uuid::Uuid;

use crate::Error;

/// The name of the cookie that carries the session token.
pub(crate) const COOKIE_SESSION: &str = "session_id";

/// The default duration for which session cookies are valid.
pub(crate) const DEFAULT_SESSION_COOKIE_DURATION: Duration = Duration::days(7);

/// The opaque token that scopes ledger data to one anonymous caller.
///
/// Tokens are not validated against a registry of issued tokens: any
/// presented token is accepted as a valid scope. Possession of a token is
/// the only form of authentication the application has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Mint a new high-entropy, globally unique session token.
    pub fn mint() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap a token presented by a caller.
    pub fn from_token(token: &str) -> Self {
        Self(token.to_owned())
    }

    /// The token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for SessionId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for SessionId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().map(SessionId::from_token)
    }
}

/// Reuse the session token presented in `jar`, or mint a new one and add its
/// cookie to the jar so it is persisted back to the caller.
///
/// An existing token is never overwritten: the jar is returned unchanged in
/// that case, so no `Set-Cookie` header is produced for the response.
pub(crate) fn resolve_or_mint_session(
    jar: CookieJar,
    cookie_duration: Duration,
) -> (CookieJar, SessionId) {
    match jar.get(COOKIE_SESSION) {
        Some(cookie) => {
            let session_id = SessionId::from_token(cookie.value_trimmed());
            (jar, session_id)
        }
        None => {
            let session_id = SessionId::mint();
            let jar = jar.add(
                Cookie::build((COOKIE_SESSION, session_id.to_string()))
                    .path("/")
                    .max_age(cookie_duration)
                    .http_only(true)
                    .same_site(SameSite::Strict),
            );

            (jar, session_id)
        }
    }
}

/// Middleware function that rejects requests that do not present a session
/// cookie, before any database access occurs.
///
/// The session ID is placed into the request extensions when the cookie is
/// present. Route handlers can use the function argument
/// `Extension(session_id): Extension<SessionId>` to receive it.
///
/// Creating a transaction is the only operation permitted to bootstrap a new
/// session, so its route must not be wrapped with this middleware.
pub async fn session_guard(request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();
    let jar = CookieJar::from_headers(&parts.headers);

    let session_id = match jar.get(COOKIE_SESSION) {
        Some(cookie) => SessionId::from_token(cookie.value_trimmed()),
        None => return Error::Unauthorized.into_response(),
    };

    parts.extensions.insert(session_id);

    next.run(Request::from_parts(parts, body)).await
}
