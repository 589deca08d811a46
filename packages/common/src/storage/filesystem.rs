use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};

use super::error::StorageError;
use super::path::validate_relative_path;
use super::traits::{BoxReader, FileStore};

/// Spool directory for in-flight writes, inside the store root.
const SPOOL_DIR: &str = ".tmp";
const CHUNK_SIZE: usize = 64 * 1024;

/// File store over a local directory, addressed by relative paths.
///
/// Writes are spooled under `.tmp` and renamed into place, so readers never
/// see a partial file.
pub struct FilesystemFileStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemFileStore {
    /// Open a store rooted at `base_path`, creating the directory if needed.
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(base_path.join(SPOOL_DIR)).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    /// Root directory of the store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a validated relative path to its location on disk.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        Ok(self.base_path.join(validate_relative_path(path)?))
    }

    /// Copy `reader` into a fresh spool file, enforcing the size cap.
    ///
    /// The spool file is removed again on any failure.
    async fn spool(&self, reader: &mut BoxReader) -> Result<(PathBuf, u64), StorageError> {
        let spool_path = self
            .base_path
            .join(SPOOL_DIR)
            .join(uuid::Uuid::new_v4().to_string());

        match self.fill(&spool_path, reader).await {
            Ok(written) => Ok((spool_path, written)),
            Err(e) => {
                let _ = fs::remove_file(&spool_path).await;
                Err(e)
            }
        }
    }

    async fn fill(&self, spool_path: &Path, reader: &mut BoxReader) -> Result<u64, StorageError> {
        let mut file = fs::File::create(spool_path).await?;
        let mut chunk = vec![0u8; CHUNK_SIZE];
        let mut written: u64 = 0;

        loop {
            let n = reader.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            written += n as u64;
            if written > self.max_size {
                return Err(StorageError::SizeLimitExceeded {
                    actual: written,
                    limit: self.max_size,
                });
            }
            file.write_all(&chunk[..n]).await?;
        }

        file.flush().await?;
        Ok(written)
    }
}

#[async_trait]
impl FileStore for FilesystemFileStore {
    async fn write_stream(&self, path: &str, mut reader: BoxReader) -> Result<u64, StorageError> {
        let target = self.resolve(path)?;
        let (spool_path, written) = self.spool(&mut reader).await?;

        let published = async {
            if let Some(dir) = target.parent() {
                fs::create_dir_all(dir).await?;
            }
            fs::rename(&spool_path, &target).await
        }
        .await;

        if let Err(e) = published {
            let _ = fs::remove_file(&spool_path).await;
            return Err(e.into());
        }
        Ok(written)
    }

    async fn read_stream(&self, path: &str) -> Result<BoxReader, StorageError> {
        match fs::File::open(self.resolve(path)?).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(path.into())),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        Ok(fs::try_exists(self.resolve(path)?).await?)
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        match fs::remove_file(self.resolve(path)?).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
