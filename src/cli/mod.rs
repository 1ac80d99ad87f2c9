pub mod notes;
pub mod process;
pub mod status;

use std::{env, path::PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{
    daemon::start_daemon,
    server::DEFAULT_API_PORT,
    state::notes::NoteLog,
    utils::{
        dir::{AppPaths, create_application_default_path},
        logging::{CLI_PREFIX, enable_logging},
    },
};
use notes::{NotesCommand, process_notes_command};
use process::{kill_previous_daemons, respawn_daemon};
use status::process_status_command;

#[derive(Parser, Debug)]
#[command(name = "Touchgrass", version, long_about = None)]
#[command(about = "Focus tracking companion with an on-screen pet", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Starts the tracking daemon for the application")]
    Init {
        #[arg(
            long,
            default_value_t = DEFAULT_API_PORT,
            help = "Port the dashboard API listens on"
        )]
        port: u16,
    },
    #[command(
        about = "Run the daemon directly in current console. Used for creating a daemon internally and for debugging"
    )]
    Serve {
        #[arg(
            long,
            help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
        )]
        dir: Option<PathBuf>,
        #[arg(
            long,
            default_value_t = DEFAULT_API_PORT,
            help = "Port the dashboard API listens on"
        )]
        port: u16,
    },
    #[command(about = "Stop currently running daemon.")]
    Stop {},
    #[command(about = "Show the current character state, focus points and mode")]
    Status {
        #[arg(long, help = "Application directory")]
        dir: Option<PathBuf>,
    },
    #[command(about = "Print the note log for a day")]
    Notes {
        #[command(flatten)]
        command: NotesCommand,
    },
    #[command(about = "Wipe the daily notes folder and start fresh")]
    ResetNotes {
        #[arg(long, help = "Application directory")]
        dir: Option<PathBuf>,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    let default_paths = AppPaths::new(create_application_default_path()?);
    enable_logging(
        CLI_PREFIX,
        &default_paths.logs_dir(),
        logging_level,
        args.log,
    )?;

    match args.commands {
        Commands::Init { port } => {
            respawn_daemon(port)?;
            Ok(())
        }
        Commands::Stop {} => {
            let process_name = env::current_exe().expect("Can't operate without an executable");
            kill_previous_daemons(&process_name);
            Ok(())
        }
        Commands::Serve { dir, port } => {
            start_daemon(resolve_dir(dir)?, port).await?;
            Ok(())
        }
        Commands::Status { dir } => process_status_command(AppPaths::new(resolve_dir(dir)?)).await,
        Commands::Notes { command } => process_notes_command(command).await,
        Commands::ResetNotes { dir } => {
            let paths = AppPaths::new(resolve_dir(dir)?);
            NoteLog::new(paths.daily_notes_dir()).reset().await?;
            println!("Daily notes folder reset");
            Ok(())
        }
    }
}

fn resolve_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    dir.map_or_else(create_application_default_path, Ok)
}
