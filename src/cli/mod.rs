use std::sync::Arc;

use savesync::{Dashboard, SessionState};
use savesync::session::FileTokenStore;

pub mod error;
mod input;
mod util;
mod config;
mod commands;

use error::Context;

pub async fn run() -> error::Result {
    let app_matches = commands::cli().get_matches();
    let settings = config::Settings::from_matches(&app_matches)?;

    let store = Arc::new(FileTokenStore::new(settings.token_file.clone()));
    let dashboard = Dashboard::new(settings.client_builder(), store)
        .context("failed to create api client")?;

    if let SessionState::Authenticated(user) = dashboard.init().await {
        tracing::debug!("restored session for {}", user.email);
    }

    match app_matches.subcommand() {
        None => interactive(&dashboard).await,
        Some((cmd, cmd_matches)) => commands::run_subcommand(&dashboard, cmd, cmd_matches).await
    }
}

async fn interactive(dashboard: &Dashboard) -> error::Result {
    loop {
        let given = input::read_line("> ")?;

        // stdin closed
        if given.is_empty() {
            return Ok(());
        }

        let trimmed = given.trim();

        if trimmed.is_empty() {
            continue;
        }

        let Ok(args_list) = shell_words::split(trimmed) else {
            println!("failed to parse command line args");
            continue;
        };

        let matches = match commands::interactive().try_get_matches_from(args_list) {
            Ok(m) => m,
            Err(err) => {
                println!("{}", err);
                continue;
            }
        };

        let result = match matches.subcommand() {
            Some(("quit", _quit_matches)) => {
                return Ok(());
            },
            Some((cmd, cmd_matches)) => commands::run_subcommand(dashboard, cmd, cmd_matches).await,
            None => continue,
        };

        if let Err(err) = result {
            println!("{}", err);
        }
    }
}
