//! Persistence of uploaded images
//!
//! Uploaded bytes are written under `<YYYYMMDD_HHMMSS>_<sanitized name>`.
//! Files are created with `create_new`, so two uploads that land on the same
//! name within one second get a numeric suffix on the timestamp instead of
//! overwriting each other.

use chrono::{Local, NaiveDateTime};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::constants::upload::{FALLBACK_NAME, TIMESTAMP_FORMAT};
use crate::image_loader::is_supported_extension;
use crate::{AnalysisError, Result};

/// Upper bound on suffix attempts for one timestamp
const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// A persisted upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// File name inside the upload directory
    pub name: String,
    pub path: PathBuf,
    /// URL path under which the retrieval endpoint serves the file
    pub url: String,
}

/// Directory-backed store for uploaded images
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it does not exist
    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            AnalysisError::storage(format!("cannot create {}", self.dir.display()), e)
        })
    }

    /// Persist `bytes` under a unique name derived from `original_name`
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredFile> {
        self.save_at(original_name, bytes, Local::now().naive_local())
            .await
    }

    /// Persist `bytes` using `timestamp` for the name prefix
    pub async fn save_at(
        &self,
        original_name: &str,
        bytes: &[u8],
        timestamp: NaiveDateTime,
    ) -> Result<StoredFile> {
        let base = with_image_extension(&sanitize_filename(original_name)?, bytes);
        let prefix = timestamp.format(TIMESTAMP_FORMAT).to_string();

        self.ensure_dir().await?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                format!("{}_{}", prefix, base)
            } else {
                format!("{}-{}_{}", prefix, attempt, base)
            };
            let path = self.dir.join(&name);

            let mut file = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(AnalysisError::storage(
                        format!("cannot create {}", path.display()),
                        e,
                    ))
                }
            };

            if let Err(e) = write_all(&mut file, bytes).await {
                drop(file);
                // Leave no partially written upload behind
                let _ = fs::remove_file(&path).await;
                return Err(AnalysisError::storage(
                    format!("cannot write {}", path.display()),
                    e,
                ));
            }

            tracing::debug!(name = %name, bytes = bytes.len(), "stored upload");
            return Ok(StoredFile {
                url: format!("/uploads/{}", name),
                name,
                path,
            });
        }

        Err(AnalysisError::StorageError {
            message: format!("no free file name for {} at {}", base, prefix),
            source: None,
        })
    }

    /// Read a stored file by name
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::NotFound` for names that are not plain file
    /// names (path separators, leading dots) or that do not exist.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>> {
        let not_found = || AnalysisError::NotFound { name: name.to_string() };

        match sanitize_filename(name) {
            Ok(clean) if clean == name => {}
            _ => return Err(not_found()),
        }

        match fs::read(self.dir.join(name)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(not_found()),
            Err(e) => Err(AnalysisError::storage(format!("cannot read {}", name), e)),
        }
    }
}

async fn write_all(file: &mut fs::File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await
}

/// Reduce a user-supplied file name to a safe single path component
///
/// Keeps only the final component (splitting on `/` and `\`), replaces
/// characters outside `[A-Za-z0-9._-]` with `_`, and strips leading dots.
/// A name made only of replaced characters becomes `upload`.
///
/// # Errors
///
/// Returns `AnalysisError::EmptyFilename` if the final component is empty or
/// consists only of dots.
pub fn sanitize_filename(name: &str) -> Result<String> {
    let last = name.rsplit(['/', '\\']).next().unwrap_or("");

    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        return Err(AnalysisError::EmptyFilename);
    }
    if cleaned.chars().all(|c| c == '_') {
        return Ok(FALLBACK_NAME.to_string());
    }

    Ok(cleaned.to_string())
}

/// Append the sniffed image extension when the name lacks a supported one
fn with_image_extension(name: &str, bytes: &[u8]) -> String {
    let has_extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(is_supported_extension);
    if has_extension {
        return name.to_string();
    }

    match image::guess_format(bytes)
        .ok()
        .and_then(|format| format.extensions_str().first())
    {
        Some(ext) => format!("{}.{}", name, ext),
        None => name.to_string(),
    }
}
