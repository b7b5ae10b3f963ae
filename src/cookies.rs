use std::{borrow::Cow, convert::Infallible, fmt::Display};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header::COOKIE, request::Parts},
};

#[derive(Debug)]
pub struct Cookie(cookie::Cookie<'static>);

impl Cookie {
    /// Long-lived session cookie, only sent back over HTTPS and never visible to scripts.
    pub fn new<'a>(name: impl Into<Cow<'a, str>>, value: impl Into<Cow<'a, str>>) -> Self {
        Self(session_cookie(name, value).permanent().build().into_owned())
    }

    pub fn value(&self) -> &str {
        self.0.value()
    }
}

/// Request cookies, encrypted with the server key. Changes are collected and sent back through
/// [`crate::response::SetCookies`].
pub struct Cookies {
    jar: cookie::CookieJar,
    key: cookie::Key,
}

impl Cookies {
    pub fn get(&self, name: &str) -> Option<Cookie> {
        self.jar.private(&self.key).get(name).map(Cookie)
    }

    pub fn add(&mut self, cookie: Cookie) {
        self.jar.private_mut(&self.key).add(cookie.0);
    }

    pub fn remove(&mut self, name: &str) {
        let cookie = session_cookie(name, "").removal().build().into_owned();
        self.jar.private_mut(&self.key).remove(cookie);
    }

    pub fn delta(&self) -> impl Iterator<Item = impl Display + '_> + '_ {
        self.jar.delta()
    }
}

impl<S> FromRequestParts<S> for Cookies
where
    S: Send + Sync,
    cookie::Key: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = get_cookie_jar(&parts.headers);
        let key = cookie::Key::from_ref(state);

        Ok(Self { jar, key })
    }
}

fn session_cookie<'a>(
    name: impl Into<Cow<'a, str>>,
    value: impl Into<Cow<'a, str>>,
) -> cookie::CookieBuilder<'a> {
    cookie::Cookie::build((name, value))
        .path("/")
        .same_site(cookie::SameSite::Strict)
        .http_only(true)
        .secure(true)
}

pub fn generate_key() -> [u8; 64] {
    let mut key = [0; 64];
    rand::fill(&mut key);
    key
}

fn get_cookie_jar(map: &HeaderMap) -> cookie::CookieJar {
    let mut jar = cookie::CookieJar::new();

    for cookie in map.get_all(COOKIE) {
        let Ok(cookie) = cookie.to_str() else {
            continue;
        };

        for part in cookie.split(';').map(str::trim) {
            if let Ok(cookie) = part.parse::<cookie::Cookie<'static>>() {
                jar.add_original(cookie);
            }
        }
    }

    jar
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn encrypted_round_trip() {
        let key = cookie::Key::from(&generate_key());
        let mut outgoing = Cookies {
            jar: cookie::CookieJar::new(),
            key: key.clone(),
        };
        outgoing.add(Cookie::new("username", "Alice"));

        let header = outgoing
            .delta()
            .map(|c| c.to_string().split(';').next().unwrap().to_owned())
            .collect::<Vec<_>>()
            .join("; ");
        assert!(!header.contains("Alice"));

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(&header).unwrap());
        let incoming = Cookies {
            jar: get_cookie_jar(&headers),
            key,
        };

        assert_eq!("Alice", incoming.get("username").unwrap().value());
    }

    #[test]
    fn removal_expires_cookie() {
        let key = cookie::Key::from(&generate_key());
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("username=Alice"));
        let mut cookies = Cookies {
            jar: get_cookie_jar(&headers),
            key,
        };

        cookies.remove("username");

        let removals = cookies.delta().map(|c| c.to_string()).collect::<Vec<_>>();
        assert_eq!(1, removals.len());
        let removal = removals[0].parse::<cookie::Cookie<'_>>().unwrap();
        assert_eq!("username", removal.name());
        assert_eq!("", removal.value());
        assert_eq!(Some("/"), removal.path());
        assert_eq!(Some(true), removal.secure());
        assert_eq!(Some(true), removal.max_age().map(|age| age.is_zero()));
    }

    #[test]
    fn foreign_key_is_ignored() {
        let mut outgoing = Cookies {
            jar: cookie::CookieJar::new(),
            key: cookie::Key::from(&generate_key()),
        };
        outgoing.add(Cookie::new("username", "Alice"));
        let header = outgoing.delta().next().unwrap().to_string();

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(header.split(';').next().unwrap()).unwrap(),
        );
        let incoming = Cookies {
            jar: get_cookie_jar(&headers),
            key: cookie::Key::from(&generate_key()),
        };

        assert!(incoming.get("username").is_none());
    }
}
