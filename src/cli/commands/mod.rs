use std::path::PathBuf;

use clap::{Command, Arg, ArgAction, ArgMatches, value_parser};
use savesync::Dashboard;

use crate::cli::error;
use crate::cli::util;

mod auth;
mod sources;
mod targets;
mod snapshots;
mod jobs;
mod users;
mod settings;
mod browse;

fn append_subcommands(command: Command) -> Command {
    command
        .subcommand(Command::new("login")
            .alias("connect")
            .about("starts a session on the server")
            .arg(util::default_help_arg())
            .arg(Arg::new("email")
                .short('e')
                .long("email")
                .help("email of the account. prompted for if not given")
            )
        )
        .subcommand(Command::new("register")
            .about("creates an account and starts a session")
            .arg(util::default_help_arg())
            .arg(Arg::new("email")
                .short('e')
                .long("email")
                .help("email of the new account. prompted for if not given")
            )
        )
        .subcommand(Command::new("logout")
            .alias("disconnect")
            .about("ends the current session")
        )
        .subcommand(Command::new("whoami")
            .about("displays the current user")
        )
        .subcommand(sources::command())
        .subcommand(targets::command())
        .subcommand(snapshots::command())
        .subcommand(jobs::command())
        .subcommand(users::command())
        .subcommand(settings::command())
        .subcommand(browse::command())
}

pub fn cli() -> Command {
    let command = Command::new("savesync")
        .about("operator console for a savesync backup server")
        .disable_help_flag(true)
        .arg(util::default_help_arg())
        .arg(Arg::new("config")
            .long("config")
            .action(ArgAction::Append)
            .value_parser(value_parser!(PathBuf))
            .help("yaml or json config file. may be given multiple times")
        )
        .arg(Arg::new("url")
            .long("url")
            .short('u')
            .help("base url of the server api. defaults to http://localhost:8080/api/")
        )
        .arg(Arg::new("token-file")
            .long("token-file")
            .value_parser(value_parser!(PathBuf))
            .help("file that stores the session token")
        );

    append_subcommands(command)
}

pub fn interactive() -> Command {
    let command = Command::new("")
        .subcommand_required(true)
        .no_binary_name(true)
        .disable_help_flag(true)
        .arg(util::default_help_arg())
        .subcommand(Command::new("quit")
            .alias("q")
            .about("exits program")
        );

    append_subcommands(command)
}

pub async fn run_subcommand(dashboard: &Dashboard, command: &str, matches: &ArgMatches) -> error::Result {
    match command {
        "login" => auth::login(dashboard, matches).await,
        "register" => auth::register(dashboard, matches).await,
        "logout" => auth::logout(dashboard),
        "whoami" => auth::whoami(dashboard),
        "sources" => sources::handle(dashboard, matches).await,
        "targets" => targets::handle(dashboard, matches).await,
        "snapshots" => snapshots::handle(dashboard, matches).await,
        "jobs" => jobs::handle(dashboard, matches).await,
        "users" => users::handle(dashboard, matches).await,
        "settings" => settings::handle(dashboard, matches).await,
        "browse" => browse::handle(dashboard, matches).await,
        _ => {
            println!("unknown command");

            Ok(())
        }
    }
}
