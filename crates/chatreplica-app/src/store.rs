use anyhow::{Context, Result};
use log::debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Append-only text file of sent messages, one per line
#[derive(Debug)]
pub struct MessageStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl MessageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `message` as one line. Embedded line breaks become spaces.
    pub async fn append(&self, message: &str) -> Result<()> {
        let line = format!("{}\n", message.replace(['\r', '\n'], " "));

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .await
            .context("Failed to save message")?;
        file.flush().await.context("Failed to save message")?;

        debug!("Message saved to {}", self.path.display());
        Ok(())
    }

    /// Every stored message, skipping blank lines. A missing file is empty.
    pub async fn load(&self) -> Result<Vec<String>> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to retrieve messages from {}", self.path.display()))
            }
        };

        Ok(data
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect())
    }
}
