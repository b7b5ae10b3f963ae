use axum::{
    http::{HeaderValue, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::{cookies::Cookies, templates};

/// Error page for the given status code.
pub struct StatusTemplate(pub StatusCode);

impl IntoResponse for StatusTemplate {
    fn into_response(self) -> Response {
        let mut res = templates::Error { code: self.0 }.into_response();

        if res.status() != StatusCode::INTERNAL_SERVER_ERROR {
            *res.status_mut() = self.0;
        }

        res
    }
}

impl From<askama::Error> for StatusTemplate {
    fn from(err: askama::Error) -> Self {
        error!(?err, "failed rendering template");
        Self(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Attach all cookie changes to the inner response.
pub struct SetCookies<T> {
    inner: T,
    cookies: Cookies,
}

impl<T> SetCookies<T> {
    pub fn new(inner: T, cookies: Cookies) -> Self {
        Self { inner, cookies }
    }
}

impl<T> IntoResponse for SetCookies<T>
where
    T: IntoResponse,
{
    fn into_response(self) -> Response {
        let mut res = self.inner.into_response();
        let headers = res.headers_mut();

        for cookie in self.cookies.delta() {
            match HeaderValue::try_from(cookie.to_string()) {
                Ok(value) => {
                    headers.append(SET_COOKIE, value);
                }
                Err(err) => error!(?err, "invalid cookie header"),
            }
        }

        res
    }
}
