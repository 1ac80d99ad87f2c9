use ansi_term::Colour;
use anyhow::Result;

use crate::{
    state::{
        character::{CharacterChannel, CharacterState},
        store::DocumentStore,
    },
    utils::dir::AppPaths,
};

/// Prints the last known character state and the document's points, goal and mode. Reads
/// straight from disk, so it works whether or not the daemon is up.
pub async fn process_status_command(paths: AppPaths) -> Result<()> {
    let character = CharacterChannel::new(paths.character_state_file())
        .read()
        .await;
    let document = DocumentStore::new(paths.document_file())
        .load()
        .await?
        .unwrap_or_default();

    let painted = match character {
        CharacterState::Happy => Colour::Green.paint("happy"),
        CharacterState::Sad => Colour::Red.paint("sad"),
        CharacterState::Idle => Colour::Blue.paint("idle"),
    };
    println!("Character:\t{painted}");
    println!("Focus points:\t{}", document.focus_points);
    println!("Mode:\t\t{}", document.current_mode.as_str());
    if !document.daily_goal.is_empty() {
        let progress = if document.daily_goal_completed {
            Colour::Green.paint("done")
        } else {
            Colour::Yellow.paint("open")
        };
        println!("Daily goal:\t{} ({progress})", document.daily_goal);
    }
    Ok(())
}
