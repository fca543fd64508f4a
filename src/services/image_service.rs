use actix_multipart::form::tempfile::TempFile;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug)]
pub enum ImageUploadError {
    InvalidImageFormat(String),
    StorageError(String),
}

impl std::fmt::Display for ImageUploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageUploadError::InvalidImageFormat(err) => write!(f, "Invalid image format: {}", err),
            ImageUploadError::StorageError(err) => write!(f, "Image storage error: {}", err),
        }
    }
}

impl std::error::Error for ImageUploadError {}

/// A file written to the store but not yet owned by any database record.
/// Dropping it without `commit` deletes the file, so a failed insert never
/// leaves an orphan on disk.
pub struct StagedImage {
    path: PathBuf,
    file_name: String,
    committed: bool,
}

impl StagedImage {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Keep the file and hand back its stored name.
    pub fn commit(mut self) -> String {
        self.committed = true;
        std::mem::take(&mut self.file_name)
    }
}

impl Drop for StagedImage {
    fn drop(&mut self) {
        if !self.committed {
            if let Err(e) = fs::remove_file(&self.path) {
                eprintln!("Failed to roll back staged image {:?}: {}", self.path, e);
            }
        }
    }
}

/// One local image directory plus the route it is served under.
#[derive(Clone)]
pub struct ImageStore {
    root: PathBuf,
    public_base: String,
    route: String,
}

/// The two stores the application serves: activity gallery images under
/// `/images` and blog images under `/BlogImages`.
#[derive(Clone)]
pub struct ImageStores {
    pub gallery: ImageStore,
    pub blogs: ImageStore,
}

impl ImageStore {
    pub fn new(
        root: impl Into<PathBuf>,
        public_base: impl Into<String>,
        route: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
            route: route.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    /// Copy an uploaded part into the store under a collision-free name.
    /// The caller must `commit` the result after the owning record is saved.
    pub fn stage(&self, file: &TempFile) -> Result<StagedImage, ImageUploadError> {
        let content_type = file.content_type.as_ref().map(|m| m.essence_str());
        let extension = extension_for(content_type, file.file_name.as_deref())?;

        let timestamp = chrono::Utc::now().timestamp_millis();
        let random_id = Uuid::new_v4();
        let file_name = format!("{}-{}.{}", timestamp, random_id, extension);

        let dest = self.root.join(&file_name);
        fs::copy(file.file.path(), &dest)
            .map_err(|e| ImageUploadError::StorageError(format!("Failed to store image: {}", e)))?;

        Ok(StagedImage {
            path: dest,
            file_name,
            committed: false,
        })
    }

    /// Delete a stored file by bare name. Names that resolve outside the
    /// store directory are ignored, as are files already gone.
    pub fn remove(&self, file_name: &str) {
        let bare = Path::new(file_name).file_name().and_then(|n| n.to_str());
        if bare != Some(file_name) || file_name.is_empty() {
            return;
        }
        let path = self.root.join(file_name);
        if let Err(e) = fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                eprintln!("Failed to delete image {:?}: {}", path, e);
            }
        }
    }

    /// Absolute URL for a stored name. Values that are already absolute
    /// URLs pass through untouched, which keeps externally hosted images in
    /// older records working.
    pub fn public_url(&self, file_name: &str) -> String {
        if file_name.starts_with("http://") || file_name.starts_with("https://") {
            return file_name.to_string();
        }
        format!("{}{}/{}", self.public_base, self.route, file_name)
    }
}

fn extension_for(
    content_type: Option<&str>,
    file_name: Option<&str>,
) -> Result<String, ImageUploadError> {
    match content_type {
        Some("image/jpeg") | Some("image/jpg") => return Ok("jpg".to_string()),
        Some("image/png") => return Ok("png".to_string()),
        Some("image/gif") => return Ok("gif".to_string()),
        Some("image/webp") => return Ok("webp".to_string()),
        _ => {}
    }

    let from_name = file_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match from_name.as_deref() {
        Some("jpg") | Some("jpeg") => Ok("jpg".to_string()),
        Some("png") => Ok("png".to_string()),
        Some("gif") => Ok("gif".to_string()),
        Some("webp") => Ok("webp".to_string()),
        _ => Err(ImageUploadError::InvalidImageFormat(format!(
            "Unsupported file type: {}",
            content_type
                .or(file_name)
                .unwrap_or("unknown")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn store(dir: &Path) -> ImageStore {
        ImageStore::new(dir, "http://localhost:8000", "/images")
    }

    fn part(file_name: &str) -> TempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not really a png").unwrap();
        TempFile {
            file,
            content_type: None,
            file_name: Some(file_name.to_string()),
            size: 16,
        }
    }

    #[test]
    fn extension_prefers_content_type_and_falls_back_to_name() {
        assert_eq!(extension_for(Some("image/jpeg"), None).unwrap(), "jpg");
        assert_eq!(extension_for(Some("image/webp"), Some("a.png")).unwrap(), "webp");
        assert_eq!(extension_for(None, Some("photo.PNG")).unwrap(), "png");
        assert_eq!(extension_for(None, Some("scan.jpeg")).unwrap(), "jpg");
        assert!(extension_for(Some("application/pdf"), Some("doc.pdf")).is_err());
        assert!(extension_for(None, None).is_err());
    }

    #[test]
    fn committed_stage_keeps_the_file() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());

        let staged = store.stage(&part("room.png")).unwrap();
        let name = staged.commit();
        assert!(name.ends_with(".png"));
        assert!(dir.path().join(&name).exists());
    }

    #[test]
    fn dropping_an_uncommitted_stage_rolls_the_file_back() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());

        let name = {
            let staged = store.stage(&part("room.png")).unwrap();
            staged.file_name().to_string()
        };
        assert!(!dir.path().join(&name).exists());
    }

    #[test]
    fn staged_names_do_not_collide() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());

        let a = store.stage(&part("a.png")).unwrap().commit();
        let b = store.stage(&part("b.png")).unwrap().commit();
        assert_ne!(a, b);
    }

    #[test]
    fn remove_ignores_path_traversal() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        let outside = dir.path().join("victim.txt");
        fs::write(&outside, "keep me").unwrap();

        store.remove("../victim.txt");
        store.remove("/etc/hosts");
        store.remove("");
        assert!(outside.exists());

        let name = store.stage(&part("gone.png")).unwrap().commit();
        store.remove(&name);
        assert!(!dir.path().join(&name).exists());
        // Deleting a missing file is not an error.
        store.remove(&name);
    }

    #[test]
    fn public_url_joins_names_and_passes_absolute_urls_through() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        assert_eq!(
            store.public_url("17-ab.png"),
            "http://localhost:8000/images/17-ab.png"
        );
        assert_eq!(
            store.public_url("https://images.example.com/x.jpg"),
            "https://images.example.com/x.jpg"
        );
    }
}
