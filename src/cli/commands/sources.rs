use clap::{Command, Arg, ArgAction, ArgMatches, value_parser};
use savesync::Dashboard;
use savesync::api::sources::{Source, CreateSource, UpdateSource};
use savesync_lib::ids;

use crate::cli::error::{self, Context};
use crate::cli::{input, util};

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .value_parser(value_parser!(ids::SourceId))
        .required(true)
        .help("id of the source")
}

pub fn command() -> Command {
    Command::new("sources")
        .subcommand_required(true)
        .about("interacts with backup sources")
        .arg(util::default_help_arg())
        .subcommand(Command::new("list")
            .about("lists all sources")
        )
        .subcommand(Command::new("get")
            .about("displays a single source")
            .arg(util::default_help_arg())
            .arg(id_arg())
        )
        .subcommand(Command::new("create")
            .about("creates a new source")
            .arg(util::default_help_arg())
            .arg(Arg::new("name")
                .short('n')
                .long("name")
                .required(true)
                .help("name of the source")
            )
            .arg(Arg::new("path")
                .short('p')
                .long("path")
                .required(true)
                .help("absolute path on the server to back up")
            )
            .arg(Arg::new("exclude")
                .long("exclude")
                .action(ArgAction::Append)
                .help("glob of files to skip. may be given multiple times")
            )
            .arg(Arg::new("target-id")
                .long("target-id")
                .value_parser(value_parser!(ids::TargetId))
                .help("target that receives the snapshots")
            )
            .arg(Arg::new("schedule-id")
                .long("schedule-id")
                .value_parser(value_parser!(ids::ScheduleId))
                .help("schedule that triggers backups")
            )
        )
        .subcommand(Command::new("update")
            .about("updates an existing source")
            .arg(util::default_help_arg())
            .arg(id_arg())
            .arg(Arg::new("name")
                .long("name")
                .help("renames the source")
            )
            .arg(Arg::new("path")
                .long("path")
                .help("changes the path to back up")
            )
            .arg(Arg::new("exclude")
                .long("exclude")
                .action(ArgAction::Append)
                .help("replaces the exclusion globs")
                .conflicts_with("clear-exclusions")
            )
            .arg(Arg::new("clear-exclusions")
                .long("clear-exclusions")
                .action(ArgAction::SetTrue)
                .help("removes all exclusion globs")
            )
            .arg(Arg::new("target-id")
                .long("target-id")
                .value_parser(value_parser!(ids::TargetId))
                .help("changes the target")
                .conflicts_with("no-target")
            )
            .arg(Arg::new("no-target")
                .long("no-target")
                .action(ArgAction::SetTrue)
                .help("detaches the source from its target")
            )
        )
        .subcommand(Command::new("delete")
            .about("deletes a source")
            .arg(util::default_help_arg())
            .arg(id_arg())
            .arg(Arg::new("yes")
                .short('y')
                .long("yes")
                .action(ArgAction::SetTrue)
                .help("skips the confirmation prompt")
            )
        )
        .subcommand(Command::new("run")
            .about("starts a backup of the source")
            .arg(util::default_help_arg())
            .arg(id_arg())
        )
}

pub async fn handle(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    match args.subcommand() {
        Some(("list", _)) => list(dashboard).await,
        Some(("get", get_args)) => get(dashboard, get_args).await,
        Some(("create", create_args)) => create(dashboard, create_args).await,
        Some(("update", update_args)) => update(dashboard, update_args).await,
        Some(("delete", delete_args)) => delete(dashboard, delete_args).await,
        Some(("run", run_args)) => run(dashboard, run_args).await,
        _ => unreachable!()
    }
}

fn exclusions(args: &ArgMatches) -> Option<Vec<String>> {
    args.get_many::<String>("exclude")
        .map(|given| given.cloned().collect())
}

async fn list(dashboard: &Dashboard) -> error::Result {
    let sources = dashboard.sources().list().await?;

    if sources.is_empty() {
        println!("no contents");

        return Ok(());
    }

    println!("{:>6} {:<24} {:>6} path", "id", "name", "target");

    for source in sources.iter() {
        println!(
            "{:>6} {:<24} {:>6} {}",
            source.id,
            source.name,
            util::optional(source.target_id),
            source.path
        );
    }

    Ok(())
}

fn print_source(source: &Source) {
    println!("{} {}", source.id, source.name);
    println!("path: {}", source.path);

    if !source.exclusions.is_empty() {
        println!("exclusions:");

        for glob in &source.exclusions {
            println!("    {}", glob);
        }
    }

    println!("schedule: {}", util::optional(source.schedule_id));
    println!("created: {}", util::format_datetime(&source.created_at));
    println!("updated: {}", util::format_datetime(&source.updated_at));
}

async fn get(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    let id: ids::SourceId = util::required(args, "id")?;
    let sources = dashboard.sources();

    let source = sources.get(id)
        .await
        .context("failed to retrieve source")?
        .context("source not found")?;

    print_source(&source);

    match sources.target_of(&source).await? {
        Some(target) => println!("target: {} {} ({})", target.id, target.name, target.target_type()),
        None => println!("target: -"),
    }

    Ok(())
}

async fn create(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    let body = CreateSource {
        name: util::required(args, "name")?,
        path: util::required(args, "path")?,
        exclusions: exclusions(args).unwrap_or_default(),
        target_id: args.get_one::<ids::TargetId>("target-id").cloned(),
        schedule_id: args.get_one::<ids::ScheduleId>("schedule-id").cloned(),
    };

    let source = dashboard.sources().create(body).await?;

    print_source(&source);

    Ok(())
}

async fn update(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    let id: ids::SourceId = util::required(args, "id")?;
    let sources = dashboard.sources();

    let current = sources.get(id)
        .await
        .context("failed to retrieve source")?
        .context("source not found")?;

    let mut body = UpdateSource::from(&current);

    if let Some(name) = args.get_one::<String>("name") {
        body.name = name.clone();
    }

    if let Some(path) = args.get_one::<String>("path") {
        body.path = path.clone();
    }

    if args.get_flag("clear-exclusions") {
        body.exclusions.clear();
    } else if let Some(given) = exclusions(args) {
        body.exclusions = given;
    }

    if args.get_flag("no-target") {
        body.target_id = None;
    } else if let Some(target_id) = args.get_one::<ids::TargetId>("target-id") {
        body.target_id = Some(*target_id);
    }

    let source = sources.update(id, body).await?;

    print_source(&source);

    Ok(())
}

async fn delete(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    let id: ids::SourceId = util::required(args, "id")?;

    if !args.get_flag("yes") && !input::confirm(format!("delete source {}?", id))? {
        return Ok(());
    }

    dashboard.sources().delete(id).await?;

    println!("source deleted");

    Ok(())
}

async fn run(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    let id: ids::SourceId = util::required(args, "id")?;

    let started = dashboard.sources().run(id).await?;

    println!("backup job {} {}", started.job_id, started.status);

    Ok(())
}
