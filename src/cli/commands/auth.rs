use clap::ArgMatches;
use savesync::Dashboard;

use crate::cli::error::{self, Context};
use crate::cli::input;

fn read_credentials(matches: &ArgMatches) -> error::Result<(String, String)> {
    let email = match matches.get_one::<String>("email") {
        Some(email) => email.clone(),
        None => input::prompt("email: ")
            .context("failed to read email from stdin")?,
    };

    let password = input::read_password("password: ")
        .context("failed to read password from stdin")?;

    Ok((email, password))
}

pub async fn login(dashboard: &Dashboard, matches: &ArgMatches) -> error::Result {
    let (email, password) = read_credentials(matches)?;

    let user = dashboard.login(email, password)
        .await
        .context("login failed")?;

    println!("logged in as {}", user.email);

    Ok(())
}

pub async fn register(dashboard: &Dashboard, matches: &ArgMatches) -> error::Result {
    let (email, password) = read_credentials(matches)?;

    let confirm = input::read_password("confirm password: ")
        .context("failed to read password from stdin")?;

    if confirm != password {
        return Err(error::Error::from("passwords do not match"));
    }

    let user = dashboard.register(email, password).await?;

    println!("registered and logged in as {}", user.email);

    Ok(())
}

pub fn logout(dashboard: &Dashboard) -> error::Result {
    dashboard.logout();

    println!("session ended");

    Ok(())
}

pub fn whoami(dashboard: &Dashboard) -> error::Result {
    match dashboard.session().user() {
        Some(user) => {
            println!("{} {}", user.id, user.email);

            if user.is_admin {
                println!("admin");
            }
        },
        None => println!("not logged in"),
    }

    Ok(())
}
