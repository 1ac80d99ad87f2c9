use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::{
    server,
    state::{
        actor::{DocumentActor, StateCommand, StateHandle},
        character::CharacterChannel,
        notes::NoteLog,
        store::DocumentStore,
    },
    utils::{
        clock::{Clock, DefaultClock},
        dir::AppPaths,
    },
    window_api::{GenericWindowManager, WindowManager},
};

use tracker::{FocusTracker, comfort::LoggingComfortSink};

pub mod args;
pub mod shutdown;
pub mod tracker;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const STATE_CHANNEL_CAPACITY: usize = 32;

/// Represents the starting point for the daemon. Wires the state actor, the focus tracker and
/// the dashboard API together and runs them until a shutdown signal arrives.
pub async fn start_daemon(dir: PathBuf, port: u16) -> Result<()> {
    std::env::set_current_dir("/")?;

    let paths = AppPaths::new(dir);
    let manager = GenericWindowManager::new()?;
    let shutdown_token = CancellationToken::new();

    let (sender, receiver) = mpsc::channel::<StateCommand>(STATE_CHANNEL_CAPACITY);
    let store = DocumentStore::new(paths.document_file());
    let actor = DocumentActor::load(store, receiver, Box::new(DefaultClock)).await?;
    let state = StateHandle::new(sender);

    let tracker = create_tracker(
        state.clone(),
        &paths,
        manager,
        &shutdown_token,
        DefaultClock,
        actor.focus_points(),
    );
    let api = server::run(
        port,
        state,
        CharacterChannel::new(paths.character_state_file()),
        paths.assets_dir(),
        shutdown_token.clone(),
    );

    let (_, actor_result, tracker_result, api_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token.clone()),
        actor.run(),
        tracker.run(),
        api,
    );

    if let Err(actor_result) = actor_result {
        error!("State actor got an error {:?}", actor_result);
    }

    if let Err(tracker_result) = tracker_result {
        error!("Focus tracker got an error {:?}", tracker_result);
    }

    if let Err(api_result) = api_result {
        error!("API server got an error {:?}", api_result);
    }

    Ok(())
}

fn create_tracker(
    state: StateHandle,
    paths: &AppPaths,
    manager: impl WindowManager + 'static,
    shutdown_token: &CancellationToken,
    clock: impl Clock,
    initial_points: i64,
) -> FocusTracker {
    FocusTracker::new(
        state,
        CharacterChannel::new(paths.character_state_file()),
        NoteLog::new(paths.daily_notes_dir()),
        Box::new(LoggingComfortSink),
        Box::new(manager),
        shutdown_token.clone(),
        DEFAULT_POLL_INTERVAL,
        Box::new(clock),
        initial_points,
    )
}
