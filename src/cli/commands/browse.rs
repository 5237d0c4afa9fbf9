use clap::{Command, Arg, ArgMatches};
use savesync::Dashboard;

use crate::cli::error::{self, Context};
use crate::cli::util;

pub fn command() -> Command {
    Command::new("browse")
        .about("lists directories on the server, used to pick a source path")
        .arg(util::default_help_arg())
        .arg(Arg::new("path")
            .short('p')
            .long("path")
            .help("directory to list. defaults to the server's starting directory")
        )
}

pub async fn handle(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    let path = args.get_one::<String>("path").map(String::as_str);

    let listing = dashboard.list_directory(path)
        .await
        .context("failed to list directory")?;

    println!("{}", listing.current_path);

    if let Some(parent) = listing.parent_path() {
        println!("  .. -> {}", parent);
    }

    for entry in listing.directories() {
        if entry.name == ".." {
            continue;
        }

        println!("  {}/", entry.name);
    }

    for entry in listing.entries.iter().filter(|e| !e.is_dir) {
        println!("  {}", entry.name);
    }

    Ok(())
}
