//! Local artifact streams

use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// A readable byte stream over the packaged artifact
///
/// Consumed by exactly one upload. Every region opens its own stream.
#[derive(Debug)]
pub struct ArtifactStream {
    path: PathBuf,
    file: File,
    len: u64,
}

impl ArtifactStream {
    /// Open the artifact at `path`
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).await?;
        let len = file.metadata().await?.len();
        tracing::debug!("Opened artifact {} ({} bytes)", path.display(), len);
        Ok(Self { path, file, len })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn into_file(self) -> File {
        self.file
    }

    /// Drain the stream into memory
    pub async fn read_all(mut self) -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.len as usize);
        self.file.read_to_end(&mut buf).await?;
        Ok(buf)
    }
}
