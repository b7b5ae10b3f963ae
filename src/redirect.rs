use axum::response::Redirect;

use crate::identity;

/// Redirect to a caller supplied target, which must stay on this site.
pub fn to_target(target: &str) -> Redirect {
    Redirect::to(local_target(target))
}

pub fn to_login(target: &str) -> Redirect {
    Redirect::to(&identity::login_url(local_target(target)))
}

pub fn to_register(target: &str) -> Redirect {
    Redirect::to(&identity::register_url(local_target(target)))
}

/// Only absolute paths of this site are accepted, everything else collapses to the root page.
/// Protocol relative (`//host`) and backslash variants would let browsers leave the site.
pub fn local_target(target: &str) -> &str {
    if target.starts_with('/') && !target.starts_with("//") && !target.contains('\\') {
        target
    } else {
        "/"
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::header::LOCATION, response::IntoResponse};

    use super::*;

    fn get_location(redirect: Redirect) -> String {
        redirect
            .into_response()
            .headers()
            .get(LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned()
    }

    #[test]
    fn local_targets_pass() {
        assert_eq!("/", local_target("/"));
        assert_eq!("/search", local_target("/search"));
        assert_eq!("/a/b?c=d", local_target("/a/b?c=d"));
    }

    #[test]
    fn foreign_targets_collapse() {
        assert_eq!("/", local_target(""));
        assert_eq!("/", local_target("https://evil.example"));
        assert_eq!("/", local_target("//evil.example"));
        assert_eq!("/", local_target("/\\evil.example"));
        assert_eq!("/", local_target("search"));
    }

    #[test]
    fn redirects() {
        assert_eq!("/", get_location(to_target("/")));
        assert_eq!("/", get_location(to_target("//evil.example/")));
        assert_eq!("/login?continue=%2F", get_location(to_login("/")));
        assert_eq!(
            "/register?continue=%2F",
            get_location(to_register("http://evil.example"))
        );
    }
}
