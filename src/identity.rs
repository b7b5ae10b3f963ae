//! Who is visiting, and where to send them to sign in or out.

use std::{borrow::Cow, sync::Arc};

use axum::{
    extract::{FromRef, FromRequestParts, OptionalFromRequestParts},
    http::{StatusCode, request::Parts},
};
use percent_encoding::NON_ALPHANUMERIC;
use tracing::error;
use uuid::Uuid;

use crate::{
    cookies::Cookies,
    dirs::Dirs,
    repositories::UserRepository,
    response::StatusTemplate,
    session::{COOKIE_SESSION, COOKIE_USERNAME},
    validate,
};

/// Sign-in page that sends the visitor to `dest` afterwards.
pub fn login_url(dest: &str) -> String {
    with_continue("/login", dest)
}

/// Sign-out link that sends the visitor to `dest` afterwards.
pub fn logout_url(dest: &str) -> String {
    with_continue("/logout", dest)
}

pub fn register_url(dest: &str) -> String {
    with_continue("/register", dest)
}

fn with_continue(path: &str, dest: &str) -> String {
    let dest = Cow::from(percent_encoding::utf8_percent_encode(dest, NON_ALPHANUMERIC));
    format!("{path}?continue={dest}")
}

/// The signed-in visitor of the current request.
///
/// Extract as `Option<Visitor>`: a missing, foreign or revoked session is no visitor at all.
#[derive(Debug)]
pub struct Visitor {
    pub nickname: String,
    pub token: Uuid,
}

impl Visitor {
    fn from_cookies(cookies: &Cookies) -> Option<Self> {
        let nickname = cookies.get(COOKIE_USERNAME)?.value().to_owned();
        if !validate::username(&nickname) {
            return None;
        }
        let token = cookies.get(COOKIE_SESSION)?.value().parse().ok()?;

        Some(Self { nickname, token })
    }
}

impl<S> OptionalFromRequestParts<S> for Visitor
where
    S: Send + Sync,
    cookie::Key: FromRef<S>,
    Arc<Dirs>: FromRef<S>,
{
    type Rejection = StatusTemplate;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        let Some(visitor) = Cookies::from_request_parts(parts, state)
            .await
            .ok()
            .and_then(|cookies| Self::from_cookies(&cookies))
        else {
            return Ok(None);
        };

        let dirs = Arc::<Dirs>::from_ref(state);
        let repo = UserRepository::for_user(&dirs, &visitor.nickname);

        if !repo.exists().await {
            return Ok(None);
        }

        match repo.is_valid_token(visitor.token).await {
            Ok(valid) => Ok(valid.then_some(visitor)),
            Err(e) => {
                error!(error = ?e, "failed checking session token");
                Err(StatusTemplate(StatusCode::INTERNAL_SERVER_ERROR))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_return_to_destination() {
        assert_eq!("/login?continue=%2F", login_url("/"));
        assert_eq!("/logout?continue=%2F", logout_url("/"));
        assert_eq!("/register?continue=%2Fsearch", register_url("/search"));
    }

    #[test]
    fn urls_encode_query() {
        assert_eq!(
            "/login?continue=%2Fa%3Fb%3Dc%26d",
            login_url("/a?b=c&d")
        );
    }
}
