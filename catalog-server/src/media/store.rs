use std::fs;
use std::path::{Component, Path, PathBuf};

use shared::models::MediaKind;
use uuid::Uuid;

use crate::utils::{AppError, AppResult};

/// Video extensions that flag an upload as [`MediaKind::Video`].
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "m4v"];

/// A file lifted out of a multipart request, not yet persisted.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn kind(&self) -> MediaKind {
        let ext = Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext {
            Some(e) if VIDEO_EXTENSIONS.contains(&e.as_str()) => MediaKind::Video,
            _ => MediaKind::Image,
        }
    }
}

/// Filesystem-backed media store.
///
/// Files land under `root` with a generated unique name; their public URL is
/// `{public_prefix}/{stored_name}`.
#[derive(Clone)]
pub struct MediaStore {
    root: PathBuf,
    public_prefix: String,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        let public_prefix = public_prefix.into();
        Self {
            root: root.into(),
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Persist an uploaded file and return its public URL.
    ///
    /// The stored name is `{millis}-{uuid}-{sanitized original name}` so
    /// collisions are impossible and the original name stays recognizable.
    pub fn store(&self, file: &UploadedFile) -> AppResult<String> {
        if file.data.is_empty() {
            return Err(AppError::validation(format!(
                "Empty upload: {}",
                file.filename
            )));
        }

        fs::create_dir_all(&self.root)
            .map_err(|e| AppError::storage(format!("Failed to create media directory: {e}")))?;

        let stored_name = format!(
            "{}-{}-{}",
            shared::util::now_millis(),
            Uuid::new_v4(),
            sanitize_filename(&file.filename)
        );
        let path = self.root.join(&stored_name);

        fs::write(&path, &file.data).map_err(|e| {
            AppError::storage(format!("Failed to write {}: {e}", path.display()))
        })?;

        tracing::debug!(
            original = %file.filename,
            stored = %stored_name,
            size = file.data.len(),
            "Stored media file"
        );

        Ok(format!("{}/{stored_name}", self.public_prefix))
    }

    /// Best-effort removal of the file behind a public URL.
    ///
    /// Never fails the caller: a missing file or an I/O error is logged and
    /// swallowed, since the catalog record is already authoritative.
    pub fn delete(&self, url: &str) {
        let Some(path) = self.resolve(url) else {
            tracing::warn!(url, "Refusing to delete media outside the store root");
            return;
        };
        match fs::remove_file(&path) {
            Ok(()) => tracing::debug!(url, "Deleted media file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(url, "Media file already gone");
            }
            Err(e) => tracing::warn!(url, error = %e, "Failed to delete media file"),
        }
    }

    /// Map a public URL (or bare stored name) back to a path inside the
    /// store root. Returns `None` for foreign URLs or traversal attempts.
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        let name = url
            .strip_prefix(&self.public_prefix)
            .map(|rest| rest.trim_start_matches('/'))
            .unwrap_or(url);
        if name.is_empty() || !is_safe_name(name) {
            return None;
        }
        Some(self.root.join(name))
    }
}

/// Keep only characters safe in a filename; everything else becomes `_`.
fn sanitize_filename(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file");
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// A stored name must be a single normal path component.
fn is_safe_name(name: &str) -> bool {
    let path = Path::new(name);
    let mut components = path.components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
