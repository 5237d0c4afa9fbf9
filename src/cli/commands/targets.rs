use clap::{Command, Arg, ArgAction, ArgMatches, value_parser};
use savesync::Dashboard;
use savesync::api::targets::{Target, TargetType, TargetForm};
use savesync_lib::ids;
use strum::IntoEnumIterator;

use crate::cli::error::{self, Context};
use crate::cli::{input, util};

const MASKED: [&str; 2] = ["secret_key", "password"];

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .value_parser(value_parser!(ids::TargetId))
        .required(true)
        .help("id of the target")
}

fn field_arg() -> Arg {
    Arg::new("field")
        .short('f')
        .long("field")
        .action(ArgAction::Append)
        .value_parser(util::parse_field)
        .help("config value as key=value. may be given multiple times")
}

pub fn command() -> Command {
    Command::new("targets")
        .subcommand_required(true)
        .about("interacts with storage targets")
        .arg(util::default_help_arg())
        .subcommand(Command::new("list")
            .about("lists all targets")
        )
        .subcommand(Command::new("types")
            .about("lists the available target types and their config fields")
        )
        .subcommand(Command::new("get")
            .about("displays a single target")
            .arg(util::default_help_arg())
            .arg(id_arg())
            .arg(Arg::new("show-secrets")
                .long("show-secrets")
                .action(ArgAction::SetTrue)
                .help("displays credentials instead of masking them")
            )
        )
        .subcommand(Command::new("create")
            .about("creates a new target")
            .arg(util::default_help_arg())
            .arg(Arg::new("name")
                .short('n')
                .long("name")
                .required(true)
                .help("name of the target")
            )
            .arg(Arg::new("type")
                .short('t')
                .long("type")
                .required(true)
                .help("local | s3_generic | s3_aws | sftp")
            )
            .arg(field_arg())
        )
        .subcommand(Command::new("update")
            .about("updates an existing target")
            .arg(util::default_help_arg())
            .arg(id_arg())
            .arg(Arg::new("name")
                .long("name")
                .help("renames the target")
            )
            .arg(Arg::new("type")
                .short('t')
                .long("type")
                .help("selects a type. all current config fields are dropped")
            )
            .arg(field_arg())
        )
        .subcommand(Command::new("delete")
            .about("deletes a target")
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
        Some(("types", _)) => types(),
        Some(("get", get_args)) => get(dashboard, get_args).await,
        Some(("create", create_args)) => create(dashboard, create_args).await,
        Some(("update", update_args)) => update(dashboard, update_args).await,
        Some(("delete", delete_args)) => delete(dashboard, delete_args).await,
        _ => unreachable!()
    }
}

fn parse_type(given: &str) -> error::Result<TargetType> {
    given.parse::<TargetType>()
        .context(format!("unknown target type \"{}\"", given))
}

fn apply_fields(form: &mut TargetForm, args: &ArgMatches) {
    if let Some(fields) = args.get_many::<(String, String)>("field") {
        for (key, value) in fields {
            form.set_field(key.clone(), value.clone());
        }
    }
}

fn print_target(target: &Target, show_secrets: bool) {
    println!("{} {} ({})", target.id, target.name, target.target_type());

    for (key, value) in target.config.to_fields() {
        if !show_secrets && MASKED.contains(&key.as_str()) {
            println!("    {}: ********", key);
        } else {
            println!("    {}: {}", key, value);
        }
    }

    println!("created: {}", util::format_datetime(&target.created_at));
    println!("updated: {}", util::format_datetime(&target.updated_at));
}

async fn list(dashboard: &Dashboard) -> error::Result {
    let targets = dashboard.targets().list().await?;

    if targets.is_empty() {
        println!("no contents");

        return Ok(());
    }

    println!("{:>6} {:<24} type", "id", "name");

    for target in targets.iter() {
        println!("{:>6} {:<24} {}", target.id, target.name, target.target_type());
    }

    Ok(())
}

fn types() -> error::Result {
    for type_ in TargetType::iter() {
        println!("{}", type_);
        println!("    required: {}", type_.required_fields().join(", "));

        let optional = type_.optional_fields();

        if !optional.is_empty() {
            println!("    optional: {}", optional.join(", "));
        }
    }

    Ok(())
}

async fn get(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    let id: ids::TargetId = util::required(args, "id")?;

    let target = dashboard.targets().get(id)
        .await
        .context("failed to retrieve target")?
        .context("target not found")?;

    print_target(&target, args.get_flag("show-secrets"));

    Ok(())
}

async fn create(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    let type_ = parse_type(&util::required::<String>(args, "type")?)?;
    let mut form = TargetForm::new(type_);

    form.set_name(util::required::<String>(args, "name")?);
    apply_fields(&mut form, args);

    let body = form.build()?;
    let target = dashboard.targets().create(body).await?;

    print_target(&target, false);

    Ok(())
}

async fn update(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    let id: ids::TargetId = util::required(args, "id")?;
    let targets = dashboard.targets();

    let current = targets.get(id)
        .await
        .context("failed to retrieve target")?
        .context("target not found")?;

    let mut form = TargetForm::from_target(&current);

    if let Some(name) = args.get_one::<String>("name") {
        form.set_name(name.clone());
    }

    if let Some(given) = args.get_one::<String>("type") {
        form.set_type(parse_type(given)?);
    }

    apply_fields(&mut form, args);

    let body = form.build_update()?;
    let target = targets.update(id, body).await?;

    print_target(&target, false);

    Ok(())
}

async fn delete(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    let id: ids::TargetId = util::required(args, "id")?;

    if !args.get_flag("yes") && !input::confirm(format!("delete target {}?", id))? {
        return Ok(());
    }

    dashboard.targets().delete(id).await?;

    println!("target deleted");

    Ok(())
}
