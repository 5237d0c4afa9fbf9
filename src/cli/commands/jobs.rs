use clap::{Command, Arg, ArgAction, ArgMatches, value_parser};
use savesync::Dashboard;
use savesync::api::jobs::Job;
use savesync_lib::ids;

use crate::cli::error::{self, Context};
use crate::cli::util;

pub fn command() -> Command {
    Command::new("jobs")
        .subcommand_required(true)
        .about("inspects backup and restore jobs")
        .arg(util::default_help_arg())
        .subcommand(Command::new("list")
            .about("lists jobs")
            .arg(util::default_help_arg())
            .arg(Arg::new("active")
                .long("active")
                .action(ArgAction::SetTrue)
                .help("only jobs that are still pending or running")
            )
        )
        .subcommand(Command::new("get")
            .about("displays a single job")
            .arg(util::default_help_arg())
            .arg(Arg::new("id")
                .long("id")
                .value_parser(value_parser!(ids::JobId))
                .required(true)
                .help("id of the job")
            )
        )
}

pub async fn handle(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    match args.subcommand() {
        Some(("list", list_args)) => list(dashboard, list_args).await,
        Some(("get", get_args)) => get(dashboard, get_args).await,
        _ => unreachable!()
    }
}

fn duration(job: &Job) -> String {
    job.duration()
        .map(|d| format!("{}s", d.num_seconds()))
        .unwrap_or_else(|| String::from("-"))
}

async fn list(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    let jobs = if args.get_flag("active") {
        dashboard.jobs().active().await?
    } else {
        Vec::clone(&*dashboard.jobs().list().await?)
    };

    if jobs.is_empty() {
        println!("no contents");

        return Ok(());
    }

    println!("{:>6} {:<8} {:<8} {:>8} started", "id", "type", "status", "duration");

    for job in &jobs {
        println!(
            "{:>6} {:<8} {:<8} {:>8} {}",
            job.id,
            job.type_.to_string(),
            job.status.to_string(),
            duration(job),
            util::format_datetime(&job.started_at)
        );
    }

    Ok(())
}

async fn get(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    let id: ids::JobId = util::required(args, "id")?;

    let job = dashboard.jobs().get(id)
        .await
        .context("failed to retrieve job")?
        .context("job not found")?;

    println!("{} {} {}", job.id, job.type_, job.status);
    println!("source: {}", util::optional(job.source_id));
    println!("snapshot: {}", util::optional(job.snapshot_id));

    if let Some(err) = &job.error {
        println!("error: {}", err);
    }

    println!("started: {}", util::format_datetime(&job.started_at));
    println!("ended: {}", util::format_optional_datetime(job.ended_at.as_ref()));
    println!("duration: {}", duration(&job));

    Ok(())
}
