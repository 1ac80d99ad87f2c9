use std::path::PathBuf;

use tokio::{fs, io::AsyncWriteExt};
use tracing::{info, warn};

use super::{StateError, document::AppDocument};

/// Disk persistence for [AppDocument].
///
/// Writes go to a sibling temp file followed by a rename, so a concurrent reader can never
/// observe a truncated document.
pub struct DocumentStore {
    path: PathBuf,
}

impl DocumentStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Reads the document if one exists. A missing file yields `None`; a corrupt file is
    /// reported as `None` as well, since the recovery policy is the same.
    pub async fn load(&self) -> Result<Option<AppDocument>, StateError> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice(&raw) {
            Ok(document) => Ok(Some(document)),
            Err(e) => {
                warn!("Document at {:?} is corrupt, resetting: {e}", self.path);
                Ok(None)
            }
        }
    }

    /// Loads the document, repairing a missing or corrupt file by persisting defaults.
    pub async fn load_or_init(&self) -> Result<AppDocument, StateError> {
        if let Some(document) = self.load().await? {
            return Ok(document);
        }
        let document = AppDocument::default();
        self.persist(&document).await?;
        info!("Created fresh document at {:?}", self.path);
        Ok(document)
    }

    pub async fn persist(&self, document: &AppDocument) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let serialized = serde_json::to_vec_pretty(document)?;

        let temp_path = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(&serialized).await?;
        file.flush().await?;
        drop(file);
        fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}
