#![forbid(unsafe_code)]
#![deny(rust_2018_idioms, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::{
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};

use anyhow::Result;
use axum::extract::FromRef;
use tokio::net::TcpListener;
use tokio_shutdown::Shutdown;
use tracing::{Level, info};
use tracing_subscriber::{filter::Targets, prelude::*};

use crate::{dirs::Dirs, repositories::VisitorRepository};

mod cookies;
mod dirs;
mod handlers;
mod identity;
mod middleware;
mod models;
mod page;
mod redirect;
mod repositories;
mod response;
mod routes;
mod ser;
mod session;
mod settings;
mod templates;
mod validate;

/// Plain HTTP only. Session cookies are `Secure`, so browsers need a TLS-terminating proxy in front.
const ADDRESS: Ipv4Addr = if cfg!(debug_assertions) {
    Ipv4Addr::LOCALHOST
} else {
    Ipv4Addr::UNSPECIFIED
};

const PORT: u16 = 8080;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let dirs = Dirs::new()?;
    info!(data_dir = %dirs.data_dir(), "loading settings");

    let settings = settings::load(&dirs).await?;
    let state = AppState::new(dirs, cookie::Key::from(&settings.key));

    let addr = SocketAddr::from((ADDRESS, PORT));
    let shutdown = Shutdown::new()?;
    let listener = TcpListener::bind(addr).await?;

    info!("Listening on http://{addr}");

    axum::serve(listener, routes::build(state))
        .with_graceful_shutdown(shutdown.handle())
        .await?;

    Ok(())
}

#[derive(Clone)]
pub struct AppState {
    dirs: Arc<Dirs>,
    key: cookie::Key,
    visitors: Arc<VisitorRepository>,
}

impl AppState {
    pub fn new(dirs: Dirs, key: cookie::Key) -> Self {
        let dirs = Arc::new(dirs);
        let visitors = Arc::new(VisitorRepository::new(Arc::clone(&dirs)));

        Self {
            dirs,
            key,
            visitors,
        }
    }
}

impl FromRef<AppState> for Arc<Dirs> {
    fn from_ref(input: &AppState) -> Self {
        Arc::clone(&input.dirs)
    }
}

impl FromRef<AppState> for cookie::Key {
    fn from_ref(input: &AppState) -> Self {
        input.key.clone()
    }
}

impl FromRef<AppState> for Arc<VisitorRepository> {
    fn from_ref(input: &AppState) -> Self {
        Arc::clone(&input.visitors)
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            Targets::new()
                .with_target(env!("CARGO_CRATE_NAME"), Level::TRACE)
                .with_target("tower_http", Level::TRACE)
                .with_default(Level::INFO),
        )
        .init();
}
