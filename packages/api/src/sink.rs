//! Download destinations

use std::io;
use std::path::{Path, PathBuf};

use futures_util::future::BoxFuture;
use tokio::io::AsyncWrite;

/// Writer handed out by a [`DownloadSink`].
pub type SinkWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Creates the destination a download is written into.
pub trait DownloadSink: Send + Sync + 'static {
    /// Open a fresh destination named `filename`.
    fn create<'a>(&'a self, filename: &'a str) -> BoxFuture<'a, io::Result<SinkWriter>>;

    /// Remove a partially written destination. Best effort.
    fn discard<'a>(&'a self, filename: &'a str) -> BoxFuture<'a, ()> {
        let _ = filename;
        Box::pin(async {})
    }
}

/// Writes downloads as files into a directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl DownloadSink for DirectorySink {
    fn create<'a>(&'a self, filename: &'a str) -> BoxFuture<'a, io::Result<SinkWriter>> {
        Box::pin(async move {
            tokio::fs::create_dir_all(&self.dir).await?;
            let file = tokio::fs::File::create(self.path_for(filename)).await?;
            Ok(Box::new(file) as SinkWriter)
        })
    }

    fn discard<'a>(&'a self, filename: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let path = self.path_for(filename);
            if let Err(err) = tokio::fs::remove_file(&path).await {
                tracing::warn!(path = %path.display(), error = %err, "failed to remove partial download");
            }
        })
    }
}
