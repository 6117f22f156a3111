//! Append-only file sink for questions the corpus could not answer.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use ansimbot_core::error::Result;
use ansimbot_core::traits::UnansweredSink;

/// Writes one line per unanswered question, timestamped, UTF-8. The file is
/// created on first write.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl UnansweredSink for FileSink {
    async fn record(&self, question: &str) -> Result<()> {
        if question.is_empty() {
            return Ok(());
        }
        let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("[{stamp}] {question}\n");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        // tokio's File buffers internally; without the flush the write may
        // still be in memory when record resolves.
        file.flush().await?;
        Ok(())
    }
}
