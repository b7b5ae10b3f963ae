#![allow(clippy::unused_async)]

use std::sync::Arc;

use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    cookies::{Cookie, Cookies},
    dirs::Dirs,
    identity::{self, Visitor},
    redirect,
    repositories::UserRepository,
    response::{SetCookies, StatusTemplate},
    session::{COOKIE_ERROR, COOKIE_SESSION, COOKIE_USERNAME},
    templates, validate,
};

/// Where to go once signed in or out, given as `?continue=/path`.
#[derive(Deserialize)]
pub struct Continue {
    #[serde(rename = "continue", default = "root")]
    next: String,
}

fn root() -> String {
    "/".to_owned()
}

pub async fn login(Query(query): Query<Continue>, mut cookies: Cookies) -> impl IntoResponse {
    let error = cookies
        .get(COOKIE_ERROR)
        .and_then(|cookie| cookie.value().parse().ok());

    if error.is_some() {
        cookies.remove(COOKIE_ERROR);
    }

    let next = redirect::local_target(&query.next).to_owned();

    SetCookies::new(
        templates::Login {
            error,
            register_url: identity::register_url(&next),
            next,
        },
        cookies,
    )
}

#[derive(Deserialize)]
pub struct Login {
    username: String,
    password: String,
    #[serde(rename = "continue", default = "root")]
    next: String,
}

#[instrument(skip_all, fields(?login.username))]
pub async fn login_post(
    State(dirs): State<Arc<Dirs>>,
    mut cookies: Cookies,
    Form(login): Form<Login>,
) -> Result<impl IntoResponse, StatusTemplate> {
    info!("got login request");

    if login.username.is_empty() || login.password.is_empty() {
        cookies.add(Cookie::new(
            COOKIE_ERROR,
            templates::LoginError::Empty.as_ref(),
        ));
        return Ok(SetCookies::new(redirect::to_login(&login.next), cookies));
    }

    if !validate::username(&login.username) {
        cookies.add(Cookie::new(
            COOKIE_ERROR,
            templates::LoginError::UnknownUser.as_ref(),
        ));
        return Ok(SetCookies::new(redirect::to_login(&login.next), cookies));
    }

    let user_repo = UserRepository::for_user(&dirs, &login.username);

    let valid = user_repo.exists().await
        && user_repo
            .is_valid_password(&login.password)
            .await
            .map_err(internal_error)?;

    if !valid {
        cookies.add(Cookie::new(
            COOKIE_ERROR,
            templates::LoginError::UnknownUser.as_ref(),
        ));
        return Ok(SetCookies::new(redirect::to_login(&login.next), cookies));
    }

    start_session(&user_repo, &login.username, &mut cookies).await?;

    Ok(SetCookies::new(redirect::to_target(&login.next), cookies))
}

pub async fn register(Query(query): Query<Continue>, mut cookies: Cookies) -> impl IntoResponse {
    let error = cookies
        .get(COOKIE_ERROR)
        .and_then(|cookie| cookie.value().parse().ok());

    if error.is_some() {
        cookies.remove(COOKIE_ERROR);
    }

    let next = redirect::local_target(&query.next).to_owned();

    SetCookies::new(
        templates::Register {
            error,
            login_url: identity::login_url(&next),
            next,
        },
        cookies,
    )
}

#[derive(Deserialize)]
pub struct Register {
    username: String,
    password: String,
    #[serde(rename = "continue", default = "root")]
    next: String,
}

#[instrument(skip_all, fields(?register.username))]
pub async fn register_post(
    State(dirs): State<Arc<Dirs>>,
    mut cookies: Cookies,
    Form(register): Form<Register>,
) -> Result<impl IntoResponse, StatusTemplate> {
    info!("got register request");

    let error = if !validate::username(&register.username) {
        Some(templates::RegisterError::InvalidUsername)
    } else if !validate::password(&register.password) {
        Some(templates::RegisterError::InvalidPassword)
    } else {
        None
    };

    if let Some(error) = error {
        cookies.add(Cookie::new(COOKIE_ERROR, error.as_ref()));
        return Ok(SetCookies::new(
            redirect::to_register(&register.next),
            cookies,
        ));
    }

    let user_repo = UserRepository::for_user(&dirs, &register.username);
    let created = user_repo
        .create_user(&register.password)
        .await
        .map_err(internal_error)?;

    if !created {
        cookies.add(Cookie::new(
            COOKIE_ERROR,
            templates::RegisterError::UsernameTaken.as_ref(),
        ));
        return Ok(SetCookies::new(
            redirect::to_register(&register.next),
            cookies,
        ));
    }

    start_session(&user_repo, &register.username, &mut cookies).await?;

    Ok(SetCookies::new(redirect::to_target(&register.next), cookies))
}

#[instrument(skip_all)]
pub async fn logout(
    State(dirs): State<Arc<Dirs>>,
    visitor: Option<Visitor>,
    Query(query): Query<Continue>,
    mut cookies: Cookies,
) -> Result<impl IntoResponse, StatusTemplate> {
    info!(signed_in = visitor.is_some(), "got logout request");

    if let Some(visitor) = visitor {
        UserRepository::for_user(&dirs, &visitor.nickname)
            .remove_token(visitor.token)
            .await
            .map_err(internal_error)?;
    }

    cookies.remove(COOKIE_SESSION);
    cookies.remove(COOKIE_USERNAME);

    Ok(SetCookies::new(redirect::to_target(&query.next), cookies))
}

async fn start_session(
    user_repo: &UserRepository<'_>,
    username: &str,
    cookies: &mut Cookies,
) -> Result<(), StatusTemplate> {
    let token = Uuid::new_v4();
    user_repo.add_token(token).await.map_err(internal_error)?;

    cookies.add(Cookie::new(COOKIE_SESSION, token.to_string()));
    cookies.add(Cookie::new(COOKIE_USERNAME, username.to_owned()));

    Ok(())
}

#[allow(clippy::needless_pass_by_value)]
fn internal_error(err: anyhow::Error) -> StatusTemplate {
    error!(error = ?err, "failed accessing user storage");
    StatusTemplate(StatusCode::INTERNAL_SERVER_ERROR)
}
