use std::str::FromStr;

use anyhow::bail;
use askama::Template;
use askama_web::WebTemplate;
use axum::http::StatusCode;

/// Page header fragment, shared by all pages.
#[derive(Template)]
#[template(path = "page_begin.html")]
pub struct PageBegin;

/// Page footer fragment, closing what [`PageBegin`] opened.
#[derive(Template)]
#[template(path = "page_end.html")]
pub struct PageEnd;

#[derive(Template)]
#[template(path = "sign_in.html")]
pub struct SignIn {
    pub login_url: String,
}

/// Content of the start page for a signed-in visitor, without header and footer.
#[derive(Template)]
#[template(path = "welcome.html")]
pub struct Welcome<'a> {
    pub nickname: &'a str,
    pub logout_url: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct Login {
    pub error: Option<LoginError>,
    pub next: String,
    pub register_url: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginError {
    Empty,
    UnknownUser,
}

impl LoginError {
    pub fn message(self) -> &'static str {
        match self {
            Self::Empty => "Please enter username and password.",
            Self::UnknownUser => "Unknown user or wrong password.",
        }
    }
}

impl AsRef<str> for LoginError {
    fn as_ref(&self) -> &str {
        match *self {
            Self::Empty => "LoginError::Empty",
            Self::UnknownUser => "LoginError::UnknownUser",
        }
    }
}

impl FromStr for LoginError {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "LoginError::Empty" => Self::Empty,
            "LoginError::UnknownUser" => Self::UnknownUser,
            _ => bail!("unknown variant `{s}`"),
        })
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "register.html")]
pub struct Register {
    pub error: Option<RegisterError>,
    pub next: String,
    pub login_url: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterError {
    InvalidUsername,
    InvalidPassword,
    UsernameTaken,
}

impl RegisterError {
    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidUsername => {
                "Usernames need at least 3 characters of letters, digits, `-` or `_`."
            }
            Self::InvalidPassword => "Passwords need at least 6 characters.",
            Self::UsernameTaken => "This username is already taken.",
        }
    }
}

impl AsRef<str> for RegisterError {
    fn as_ref(&self) -> &str {
        match *self {
            Self::InvalidUsername => "RegisterError::InvalidUsername",
            Self::InvalidPassword => "RegisterError::InvalidPassword",
            Self::UsernameTaken => "RegisterError::UsernameTaken",
        }
    }
}

impl FromStr for RegisterError {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "RegisterError::InvalidUsername" => Self::InvalidUsername,
            "RegisterError::InvalidPassword" => Self::InvalidPassword,
            "RegisterError::UsernameTaken" => Self::UsernameTaken,
            _ => bail!("unknown variant `{s}`"),
        })
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct Error {
    pub code: StatusCode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_errors_survive_cookie_round_trip() {
        for error in [LoginError::Empty, LoginError::UnknownUser] {
            assert_eq!(error, error.as_ref().parse().unwrap());
        }

        for error in [
            RegisterError::InvalidUsername,
            RegisterError::InvalidPassword,
            RegisterError::UsernameTaken,
        ] {
            assert_eq!(error, error.as_ref().parse().unwrap());
        }

        assert!("LoginError::Other".parse::<LoginError>().is_err());
    }

    #[test]
    fn fragments_have_no_anchors() {
        let html = PageBegin.render().unwrap() + &PageEnd.render().unwrap();

        assert!(!html.contains("<a "));
        assert!(html.contains("<title>Voting Website</title>"));
    }

    #[test]
    fn nickname_is_escaped() {
        let html = Welcome {
            nickname: "<b>",
            logout_url: "/logout".to_owned(),
        }
        .render()
        .unwrap();

        assert!(!html.contains("<b>"));
        assert!(html.contains("Welcome, &"));
    }

    #[test]
    fn error_page_names_status() {
        let html = Error {
            code: StatusCode::NOT_FOUND,
        }
        .render()
        .unwrap();

        assert!(html.contains("404 Not Found"));
    }
}
