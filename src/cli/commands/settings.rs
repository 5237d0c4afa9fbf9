use clap::{Command, Arg, ArgAction, ArgMatches};
use savesync::Dashboard;

use crate::cli::error;
use crate::cli::util;

pub fn command() -> Command {
    Command::new("settings")
        .subcommand_required(true)
        .about("views and changes server settings")
        .arg(util::default_help_arg())
        .subcommand(Command::new("list")
            .about("lists all settings")
        )
        .subcommand(Command::new("set")
            .about("changes a single setting")
            .arg(util::default_help_arg())
            .arg(Arg::new("key")
                .short('k')
                .long("key")
                .required(true)
                .help("name of the setting")
            )
            .arg(Arg::new("value")
                .short('v')
                .long("value")
                .required(true)
                .help("new value of the setting")
            )
        )
        .subcommand(Command::new("registration")
            .about("opens or closes self registration")
            .arg(util::default_help_arg())
            .arg(Arg::new("enable")
                .long("enable")
                .action(ArgAction::SetTrue)
                .conflicts_with("disable")
            )
            .arg(Arg::new("disable")
                .long("disable")
                .action(ArgAction::SetTrue)
            )
        )
}

pub async fn handle(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    match args.subcommand() {
        Some(("list", _)) => list(dashboard).await,
        Some(("set", set_args)) => set(dashboard, set_args).await,
        Some(("registration", reg_args)) => registration(dashboard, reg_args).await,
        _ => unreachable!()
    }
}

async fn list(dashboard: &Dashboard) -> error::Result {
    let settings = dashboard.settings().get().await?;

    let mut found = false;

    for (key, value) in settings.iter() {
        println!("{}: {}", key, value);
        found = true;
    }

    if !found {
        println!("no contents");
    }

    Ok(())
}

async fn set(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    let key: String = util::required(args, "key")?;
    let value: String = util::required(args, "value")?;

    dashboard.settings().update(key, value).await?;

    println!("setting updated");

    Ok(())
}

async fn registration(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    let settings = dashboard.settings();

    if args.get_flag("enable") {
        settings.set_registration(true).await?;
    } else if args.get_flag("disable") {
        settings.set_registration(false).await?;
    }

    if settings.registration_enabled().await? {
        println!("registration is open");
    } else {
        println!("registration is closed");
    }

    Ok(())
}
