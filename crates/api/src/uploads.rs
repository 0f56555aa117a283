//! Upload folder access.
//!
//! Media bytes live on local disk under [`ServerConfig::upload_dir`]; the
//! store only records each file's name and path.
//!
//! [`ServerConfig::upload_dir`]: crate::config::ServerConfig::upload_dir

use std::io;
use std::path::{Path, PathBuf};

use markup_core::media::is_allowed_file;
use tokio::io::AsyncWriteExt;

/// Path at which an uploaded file with this (already sanitised) name is kept.
pub fn stored_path(upload_dir: &Path, filename: &str) -> PathBuf {
    upload_dir.join(filename)
}

/// Write an uploaded file into the upload folder, creating the folder if needed.
///
/// Never replaces an existing file: a name already on disk fails with
/// [`io::ErrorKind::AlreadyExists`]. A write that fails part way removes
/// what was written.
pub async fn save_upload(upload_dir: &Path, filename: &str, data: &[u8]) -> io::Result<PathBuf> {
    tokio::fs::create_dir_all(upload_dir).await?;
    let path = stored_path(upload_dir, filename);

    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await?;

    let written = async {
        file.write_all(data).await?;
        file.sync_all().await
    }
    .await;

    if let Err(e) = written {
        drop(file);
        discard_upload(&path).await;
        return Err(e);
    }
    Ok(path)
}

/// Remove a file written by [`save_upload`] whose registration did not go
/// through. A file that is already gone is fine; other failures are logged.
pub async fn discard_upload(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove orphaned upload");
        }
    }
}

/// Names of the media files directly inside the upload folder, sorted.
///
/// Hidden entries, directories and files with unsupported extensions are
/// skipped. A missing folder yields an empty list.
pub async fn list_media_files(upload_dir: &Path) -> io::Result<Vec<String>> {
    let mut entries = match tokio::fs::read_dir(upload_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.starts_with('.') || !is_allowed_file(&name) {
            continue;
        }
        if !entry.file_type().await?.is_file() {
            continue;
        }
        names.push(name);
    }

    names.sort();
    Ok(names)
}
