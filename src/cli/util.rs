use chrono::{DateTime, Utc, Local, SecondsFormat};
use clap::{Arg, ArgMatches};

use crate::cli::error::{self, Context};

pub fn default_help_arg() -> Arg {
    use clap::ArgAction;

    Arg::new("help")
        .long("help")
        .action(ArgAction::Help)
        .help("display the current help information")
}

/// value of an argument clap already enforces as required
pub fn required<T>(matches: &ArgMatches, name: &str) -> error::Result<T>
where
    T: Clone + Send + Sync + 'static
{
    matches.get_one::<T>(name)
        .cloned()
        .context(format!("missing argument \"{}\"", name))
}

pub fn format_datetime(datetime: &DateTime<Utc>) -> String {
    datetime.with_timezone(&Local).to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn format_optional_datetime(datetime: Option<&DateTime<Utc>>) -> String {
    datetime.map(format_datetime)
        .unwrap_or_else(|| String::from("-"))
}

/// splits a `key=value` argument. the value may contain additional `=`
pub fn parse_field(given: &str) -> Result<(String, String), String> {
    let Some((key, value)) = given.split_once('=') else {
        return Err(format!("expected key=value, given \"{}\"", given));
    };

    let key = key.trim();

    if key.is_empty() {
        return Err(format!("missing key for \"{}\"", given));
    }

    Ok((key.to_owned(), value.to_owned()))
}

pub fn optional<T>(value: Option<T>) -> String
where
    T: std::fmt::Display
{
    value.map(|v| v.to_string())
        .unwrap_or_else(|| String::from("-"))
}
