use std::path::PathBuf;

use clap::{Command, Arg, ArgAction, ArgMatches, value_parser};
use savesync::Dashboard;
use savesync::api::snapshots::Snapshot;
use savesync::api::client::snapshots::DownloadManifest;
use savesync::tree::{self, ExpandState, format_size};
use savesync_lib::ids;

use crate::cli::error::{self, Context};
use crate::cli::{input, util};

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .value_parser(value_parser!(ids::SnapshotId))
        .required(true)
        .help("id of the snapshot")
}

pub fn command() -> Command {
    Command::new("snapshots")
        .subcommand_required(true)
        .about("inspects snapshots and restores from them")
        .arg(util::default_help_arg())
        .subcommand(Command::new("list")
            .about("lists all snapshots")
            .arg(util::default_help_arg())
            .arg(Arg::new("source-id")
                .long("source-id")
                .value_parser(value_parser!(ids::SourceId))
                .help("only snapshots of the given source")
            )
        )
        .subcommand(Command::new("get")
            .about("displays a single snapshot")
            .arg(util::default_help_arg())
            .arg(id_arg())
        )
        .subcommand(Command::new("files")
            .about("displays the file tree of a snapshot")
            .arg(util::default_help_arg())
            .arg(id_arg())
            .arg(Arg::new("expand")
                .short('e')
                .long("expand")
                .action(ArgAction::Append)
                .help("path of a directory to expand. may be given multiple times")
                .conflicts_with("all")
            )
            .arg(Arg::new("all")
                .short('a')
                .long("all")
                .action(ArgAction::SetTrue)
                .help("expands every directory")
            )
        )
        .subcommand(Command::new("manifest")
            .about("downloads the manifest of a snapshot")
            .arg(util::default_help_arg())
            .arg(id_arg())
            .arg(Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(value_parser!(PathBuf))
                .help("file to write. defaults to manifest-{id}.json in the cwd")
            )
        )
        .subcommand(Command::new("restore")
            .about("restores the files of a snapshot")
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
        Some(("list", list_args)) => list(dashboard, list_args).await,
        Some(("get", get_args)) => get(dashboard, get_args).await,
        Some(("files", files_args)) => files(dashboard, files_args).await,
        Some(("manifest", manifest_args)) => manifest(dashboard, manifest_args).await,
        Some(("restore", restore_args)) => restore(dashboard, restore_args).await,
        _ => unreachable!()
    }
}

async fn list(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    let snapshots = dashboard.snapshots().list().await?;
    let source_id = args.get_one::<ids::SourceId>("source-id");

    let mut found = false;

    for snapshot in snapshots.iter() {
        if source_id.map(|id| snapshot.source_id != *id).unwrap_or(false) {
            continue;
        }

        if !found {
            println!("{:>6} {:>6} {:<8} {:>10} created", "id", "source", "status", "size");
            found = true;
        }

        println!(
            "{:>6} {:>6} {:<8} {:>10} {}",
            snapshot.id,
            snapshot.source_id,
            snapshot.status,
            format_size(snapshot.total_bytes),
            util::format_datetime(&snapshot.created_at)
        );
    }

    if !found {
        println!("no contents");
    }

    Ok(())
}

fn print_snapshot(snapshot: &Snapshot) {
    println!("{} {}", snapshot.id, snapshot.status);
    println!("source: {} target: {}", snapshot.source_id, snapshot.target_id);
    println!(
        "files: {} size: {} delta: {}",
        snapshot.file_count,
        format_size(snapshot.total_bytes),
        format_size(snapshot.delta_bytes)
    );

    if let Some(err) = &snapshot.error {
        println!("error: {}", err);
    }

    println!("created: {}", util::format_datetime(&snapshot.created_at));
    println!("completed: {}", util::format_optional_datetime(snapshot.completed_at.as_ref()));
}

async fn get(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    let id: ids::SnapshotId = util::required(args, "id")?;

    let snapshot = dashboard.snapshots().get(id)
        .await
        .context("failed to retrieve snapshot")?
        .context("snapshot not found")?;

    print_snapshot(&snapshot);

    Ok(())
}

async fn files(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    let id: ids::SnapshotId = util::required(args, "id")?;

    let root = dashboard.snapshots().files(id)
        .await
        .context("failed to retrieve snapshot files")?;

    let mut state = ExpandState::for_tree(&root);

    if args.get_flag("all") {
        state.expand_all(&root);
    } else if let Some(paths) = args.get_many::<String>("expand") {
        for path in paths {
            let Some(node) = tree::find_node(&root, path) else {
                println!("path not found \"{}\"", path);
                continue;
            };

            if !state.set_expanded(node, true) {
                println!("not an expandable directory \"{}\"", path);
            }
        }
    }

    for row in tree::visible_rows(&root, &state) {
        let marker = if !row.expandable {
            ' '
        } else if row.expanded {
            '-'
        } else {
            '+'
        };

        let size = if row.node.is_dir {
            format_size(row.node.total_size())
        } else {
            format_size(row.node.size.unwrap_or(0))
        };

        println!("{:indent$}{} {} {}", "", marker, row.node.name, size, indent = row.depth * 2);
    }

    Ok(())
}

async fn manifest(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    let id: ids::SnapshotId = util::required(args, "id")?;

    let output = match args.get_one::<PathBuf>("output") {
        Some(path) => path.clone(),
        None => std::env::current_dir()?.join(DownloadManifest::id(id).file_name()),
    };

    let bytes = dashboard.snapshots().manifest(id)
        .await
        .context("failed to download manifest")?;

    std::fs::write(&output, &bytes)
        .context(format!("failed to write manifest to \"{}\"", output.display()))?;

    println!("wrote {} to {}", format_size(bytes.len() as u64), output.display());

    Ok(())
}

async fn restore(dashboard: &Dashboard, args: &ArgMatches) -> error::Result {
    let id: ids::SnapshotId = util::required(args, "id")?;

    if !args.get_flag("yes") && !input::confirm(format!("restore snapshot {}?", id))? {
        return Ok(());
    }

    dashboard.snapshots().restore(id).await?;

    println!("restore started");

    Ok(())
}
