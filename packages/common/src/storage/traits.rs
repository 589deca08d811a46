use std::io::Cursor;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Path-addressed file storage.
///
/// All paths are relative to the store root, e.g. `images/7.png`.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Write bytes to `path`, replacing any existing file.
    async fn write(&self, path: &str, data: &[u8]) -> Result<u64, StorageError> {
        let reader: BoxReader = Box::new(Cursor::new(data.to_vec()));
        self.write_stream(path, reader).await
    }

    /// Write data from an async reader to `path`, replacing any existing file.
    ///
    /// Returns the number of bytes written.
    async fn write_stream(&self, path: &str, reader: BoxReader) -> Result<u64, StorageError>;

    /// Read all bytes of the file at `path`.
    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.read_stream(path).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    /// Open the file at `path` as a streaming async reader.
    async fn read_stream(&self, path: &str) -> Result<BoxReader, StorageError>;

    /// Check whether a file exists at `path`.
    async fn exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Delete the file at `path`.
    ///
    /// Returns `true` if the file was deleted, `false` if it did not exist.
    async fn delete(&self, path: &str) -> Result<bool, StorageError>;

    /// Copy the file at `src` to `dst`, replacing any existing file at `dst`.
    async fn copy(&self, src: &str, dst: &str) -> Result<u64, StorageError> {
        let reader = self.read_stream(src).await?;
        self.write_stream(dst, reader).await
    }
}
