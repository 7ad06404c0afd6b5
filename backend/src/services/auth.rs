//! Request guard shared by every `/api` handler.
//!
//! [`SessionToken`] resolves which session a request works on and enforces,
//! in order:
//! 1. the shared secret (`X-Badge-Secret`) when one is configured;
//! 2. for anything but GET/HEAD/OPTIONS, that `Origin` (or `Referer`) names
//!    an allowed host;
//! 3. that the session name in `X-Badge-Session` is well formed.

use crate::error::{BadgeError, BadgeResult};
use crate::state::AppState;
use actix_web::dev::Payload;
use actix_web::http::Method;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

pub const SESSION_HEADER: &str = "X-Badge-Session";
pub const SECRET_HEADER: &str = "X-Badge-Secret";
pub const DEFAULT_SESSION: &str = "default";
const MAX_TOKEN_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(pub String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequest for SessionToken {
    type Error = BadgeError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorize(req))
    }
}

fn header<'r>(req: &'r HttpRequest, name: &str) -> Option<&'r str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

fn authorize(req: &HttpRequest) -> BadgeResult<SessionToken> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| BadgeError::Internal("application state is missing".to_string()))?;
    let config = &state.config;

    if let Some(secret) = &config.shared_secret {
        if header(req, SECRET_HEADER) != Some(secret.as_str()) {
            return Err(BadgeError::Unauthorized(
                "missing or wrong shared secret".to_string(),
            ));
        }
    }

    let safe = matches!(*req.method(), Method::GET | Method::HEAD | Method::OPTIONS);
    if !safe {
        if let Some(source) = header(req, "Origin").or_else(|| header(req, "Referer")) {
            let allowed = origin_host(source)
                .map(|host| config.allowed_origins.iter().any(|a| *a == host))
                .unwrap_or(false);
            if !allowed {
                return Err(BadgeError::Forbidden("cross-origin request".to_string()));
            }
        }
    }

    let token = header(req, SESSION_HEADER)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_SESSION);
    let well_formed = token.len() <= MAX_TOKEN_LEN
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if !well_formed {
        return Err(BadgeError::InvalidInput(format!(
            "{} must be at most {} characters of [A-Za-z0-9._-]",
            SESSION_HEADER, MAX_TOKEN_LEN
        )));
    }
    Ok(SessionToken(token.to_string()))
}

/// Lower-cased host of an `Origin`/`Referer` value such as
/// `http://localhost:8080/editor`.
pub fn origin_host(value: &str) -> Option<String> {
    let rest = value.trim().split_once("://").map(|(_, rest)| rest)?;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host_port = authority.rsplit('@').next()?;

    let host = if let Some(bracketed) = host_port.strip_prefix('[') {
        bracketed.split(']').next()?
    } else {
        host_port.split(':').next()?
    };
    if host.is_empty() {
        None
    } else {
        Some(host.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_hosts() {
        assert_eq!(origin_host("http://localhost:8080").as_deref(), Some("localhost"));
        assert_eq!(
            origin_host("https://127.0.0.1/editor?x=1").as_deref(),
            Some("127.0.0.1")
        );
        assert_eq!(
            origin_host("http://user@Badges.Example.org:9/").as_deref(),
            Some("badges.example.org")
        );
        assert_eq!(origin_host("http://[::1]:8080/").as_deref(), Some("::1"));
        assert_eq!(origin_host("null"), None);
        assert_eq!(origin_host("http://"), None);
    }
}
