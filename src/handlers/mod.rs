#![allow(clippy::unused_async)]

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Html};
use tracing::{error, info, instrument};

use crate::{
    identity::{self, Visitor},
    page,
    repositories::VisitorRepository,
    response::StatusTemplate,
};

pub mod auth;

#[instrument(skip_all)]
pub async fn index(
    State(visitors): State<Arc<VisitorRepository>>,
    visitor: Option<Visitor>,
) -> Result<Html<String>, StatusTemplate> {
    info!(authorized = visitor.is_some(), "got index request");

    let Some(visitor) = visitor else {
        return Ok(Html(page::sign_in(identity::login_url("/"))?));
    };

    visitors
        .store_user(&visitor.nickname)
        .await
        .map_err(|e| {
            error!(error = ?e, nickname = %visitor.nickname, "failed storing visitor");
            StatusTemplate(StatusCode::INTERNAL_SERVER_ERROR)
        })?;

    Ok(Html(page::welcome(
        &visitor.nickname,
        identity::logout_url("/"),
    )?))
}

pub async fn handle_404() -> StatusTemplate {
    StatusTemplate(StatusCode::NOT_FOUND)
}
