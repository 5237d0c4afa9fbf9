use clap::{Command, Arg, ArgAction, ArgMatches, value_parser};
use savesync::Dashboard;
use savesync_lib::ids;

use crate::cli::error::{self, Context};
use crate::cli::{input, util};

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .value_parser(value_parser!(ids::UserId))
        .required(true)
        .help("id of the user")
}

pub fn command() -> Command {
    Command::new("users")
        .subcommand_required(true)
        .about("administers user accounts")
        .arg(util::default_help_arg())
        .subcommand(Command::new("list")
            .about("lists all users")
        )
        .subcommand(Command::new("create")
            .about("creates a new user. the password is prompted for")
            .arg(util::default_help_arg())
            .arg(Arg::new("email")
                .short('e')
                .long("email")
                .required(true)
                .help("email of the new user")
            )
        )
        .subcommand(Command::new("admin")
            .about("grants or revokes admin rights")
            .arg(util::default_help_arg())
            .arg(id_arg())
            .arg(Arg::new("revoke")
                .long("revoke")
                .action(ArgAction::SetTrue)
                .help("removes admin rights instead of granting them")
            )
        )
        .subcommand(Command::new("delete")
            .about("deletes a user")
            .arg(util::default_help_arg())
            .arg(id_arg())
            .arg(Arg::new("yes")
                .short('y')
                .long("yes")
                .action(ArgAction::SetTrue)
                .help("skips the confirmation prompt")
            )
        )
}

pub async fn handle(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    match args.subcommand() {
        Some(("list", _)) => list(dashboard).await,
        Some(("create", create_args)) => create(dashboard, create_args).await,
        Some(("admin", admin_args)) => admin(dashboard, admin_args).await,
        Some(("delete", delete_args)) => delete(dashboard, delete_args).await,
        _ => unreachable!()
    }
}

async fn list(dashboard: &Dashboard) -> error::Result {
    let users = dashboard.users().list().await?;

    if users.is_empty() {
        println!("no contents");

        return Ok(());
    }

    println!("{:>6} {:<32} {:<5} created", "id", "email", "admin");

    for user in users.iter() {
        let marker = if dashboard.session().is_current_user(user.id) {
            " (you)"
        } else {
            ""
        };

        println!(
            "{:>6} {:<32} {:<5} {}{}",
            user.id,
            user.email,
            if user.is_admin { "yes" } else { "no" },
            util::format_datetime(&user.created_at),
            marker
        );
    }

    Ok(())
}

async fn create(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    let email: String = util::required(args, "email")?;
    let password = input::read_password("password: ")
        .context("failed to read password from stdin")?;

    let user = dashboard.users().create(email, password).await?;

    println!("created user {} {}", user.id, user.email);

    Ok(())
}

async fn admin(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    let id: ids::UserId = util::required(args, "id")?;
    let is_admin = !args.get_flag("revoke");

    dashboard.users().set_admin(id, is_admin)
        .await
        .context("failed to update admin rights")?;

    if is_admin {
        println!("user {} is now an admin", id);
    } else {
        println!("user {} is no longer an admin", id);
    }

    Ok(())
}

async fn delete(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    let id: ids::UserId = util::required(args, "id")?;

    if !args.get_flag("yes") && !input::confirm(format!("delete user {}?", id))? {
        return Ok(());
    }

    dashboard.users().delete(id)
        .await
        .context("failed to delete user")?;

    println!("user deleted");

    Ok(())
}
