use std::path::PathBuf;

use serde::Serialize;
use tokio::fs;

/// The mood signal driving the animated character. The tracker only ever emits these three
/// values; richer renderer moods are derived on the UI side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterState {
    #[default]
    Idle,
    Happy,
    Sad,
}

impl CharacterState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Happy => "happy",
            Self::Sad => "sad",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "idle" => Some(Self::Idle),
            "happy" => Some(Self::Happy),
            "sad" => Some(Self::Sad),
            _ => None,
        }
    }
}

/// One-way channel between the tracker and the character renderer: a single file overwritten
/// wholesale on every tick, polled by the reader on its own cadence. Last write wins; there is
/// deliberately no versioning.
#[derive(Clone)]
pub struct CharacterChannel {
    path: PathBuf,
}

impl CharacterChannel {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Publishes the state through a temp file and rename, so a reader never sees a torn write.
    pub async fn publish(&self, state: CharacterState) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let temp_path = self.path.with_extension("txt.tmp");
        fs::write(&temp_path, state.as_str()).await?;
        fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }

    /// A missing, unreadable or unrecognized state reads as idle. The channel is a last-known
    /// snapshot, not an event log.
    pub async fn read(&self) -> CharacterState {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => CharacterState::parse(raw.trim()).unwrap_or_default(),
            Err(_) => CharacterState::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use super::{CharacterChannel, CharacterState};

    #[tokio::test]
    async fn absent_channel_reads_idle() {
        let dir = tempdir().unwrap();
        let channel = CharacterChannel::new(dir.path().join("character_state.txt"));
        assert_eq!(channel.read().await, CharacterState::Idle);
    }

    #[tokio::test]
    async fn publish_overwrites_previous_state() -> Result<()> {
        let dir = tempdir()?;
        let channel = CharacterChannel::new(dir.path().join("character_state.txt"));

        channel.publish(CharacterState::Happy).await?;
        assert_eq!(channel.read().await, CharacterState::Happy);

        channel.publish(CharacterState::Sad).await?;
        assert_eq!(channel.read().await, CharacterState::Sad);

        let raw = tokio::fs::read_to_string(dir.path().join("character_state.txt")).await?;
        assert_eq!(raw, "sad");
        Ok(())
    }

    #[tokio::test]
    async fn unknown_contents_read_idle() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("character_state.txt");
        tokio::fs::write(&path, "confused").await?;
        let channel = CharacterChannel::new(path);
        assert_eq!(channel.read().await, CharacterState::Idle);
        Ok(())
    }
}
