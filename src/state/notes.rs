use std::{io::ErrorKind, path::PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::{self, File},
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
};
use tracing::debug;

use crate::utils::time::date_to_folder_name;

/// Append-only daily note log. Every day gets its own folder with a `notes.txt` inside, one
/// line per entry. The tracker appends, the CLI and dashboard read, so file access is guarded
/// with advisory locks.
pub struct NoteLog {
    root: PathBuf,
}

impl NoteLog {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn day_file(&self, date: NaiveDate) -> PathBuf {
        self.root.join(date_to_folder_name(date)).join("notes.txt")
    }

    pub async fn append(&self, date: NaiveDate, line: &str) -> Result<()> {
        let path = self.day_file(date);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = File::options()
            .append(true)
            .create(true)
            .open(&path)
            .await?;

        // Semi-safe acquire-release for a file
        file.lock_exclusive()?;
        let result = async {
            file.write_all(format!("{line}\n").as_bytes()).await?;
            file.flush().await?;
            Ok::<_, anyhow::Error>(())
        }
        .await;
        file.unlock_async().await?;
        result
    }

    /// Returns the note lines for a day, oldest first. A day with no notes is an empty list.
    pub async fn read_day(&self, date: NaiveDate) -> Result<Vec<String>> {
        let path = self.day_file(date);
        debug!("Reading notes from {path:?}");
        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };
        file.lock_shared()?;
        let buffer = BufReader::new(file);
        let mut lines = buffer.lines();
        let mut notes = vec![];
        while let Ok(Some(line)) = lines.next_line().await {
            notes.push(line);
        }
        lines.into_inner().into_inner().unlock_async().await?;
        Ok(notes)
    }

    /// Wipes every day's notes and recreates the folder.
    pub async fn reset(&self) -> Result<()> {
        match fs::remove_dir_all(&self.root).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }
}
