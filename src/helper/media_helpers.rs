use chrono::{DateTime, Local, TimeZone};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File types accepted by the upload field.
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "mp3", "wav", "mp4"];

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported file type for '{0}'. Allowed types: png, jpg, jpeg, mp3, wav, mp4.")]
    UnsupportedType(String),
    #[error("File is too large. Maximum size is {0}MB.")]
    TooLarge(u64),
    #[error("The uploaded file has no usable name.")]
    EmptyFilename,
}

/// An uploaded file held in memory until the submission is accepted.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Local directory receiving uploaded media, named `<YYYYMMDDHHMMSS>_<original name>`.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    /// Creates the upload directory if needed.
    pub fn open(root: &Path) -> Result<Self, MediaError> {
        fs::create_dir_all(root)?;
        Ok(MediaStore {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn save(&self, bytes: &[u8], original_filename: &str) -> Result<PathBuf, MediaError> {
        self.save_at(bytes, original_filename, &Local::now())
    }

    /// Same-second uploads with the same name land on the same path; the later write wins.
    pub fn save_at<Tz: TimeZone>(
        &self,
        bytes: &[u8],
        original_filename: &str,
        when: &DateTime<Tz>,
    ) -> Result<PathBuf, MediaError>
    where
        Tz::Offset: std::fmt::Display,
    {
        let name = validate_filename(original_filename)?;
        let stored_name = format!("{}_{}", when.format("%Y%m%d%H%M%S"), name);
        let path = self.root.join(stored_name);
        fs::write(&path, bytes)?;
        log::debug!("Stored {} bytes of media at '{}'", bytes.len(), path.display());
        Ok(path)
    }
}

/// Reduces a client-supplied name to its final component and checks its extension.
pub fn validate_filename(original_filename: &str) -> Result<String, MediaError> {
    let name = original_filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();
    if name.is_empty() || name == "." || name == ".." {
        return Err(MediaError::EmptyFilename);
    }

    let allowed = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ALLOWED_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext)))
        .unwrap_or(false);
    if !allowed {
        return Err(MediaError::UnsupportedType(name.to_string()));
    }
    Ok(name.to_string())
}

/// Public URL under which a stored media reference is served.
pub fn public_media_url(media_ref: &str) -> String {
    if media_ref.starts_with("http://") || media_ref.starts_with("https://") {
        return media_ref.to_string();
    }
    let file_name = media_ref
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(media_ref);
    format!("/media/{}", file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn names_files_by_second_and_original_name() {
        let dir = TempDir::new().unwrap();
        let store = MediaStore::open(&dir.path().join("uploads")).unwrap();
        let when = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();

        let path = store.save_at(b"abc", "temple.jpg", &when).unwrap();

        assert_eq!(path.file_name().unwrap(), "20240309140507_temple.jpg");
        assert_eq!(fs::read(&path).unwrap(), b"abc");
    }

    #[test]
    fn same_second_uploads_overwrite_each_other() {
        let dir = TempDir::new().unwrap();
        let store = MediaStore::open(dir.path()).unwrap();
        let when = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();

        let first = store.save_at(b"first", "a.png", &when).unwrap();
        let second = store.save_at(b"second", "a.png", &when).unwrap();

        assert_eq!(first, second);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
        assert_eq!(fs::read(&second).unwrap(), b"second");
    }

    #[test]
    fn open_is_idempotent() {
        let dir = TempDir::new().unwrap();
        MediaStore::open(&dir.path().join("uploads")).unwrap();
        MediaStore::open(&dir.path().join("uploads")).unwrap();
    }

    #[rstest]
    #[case("../../etc/cron.d/x.png", "x.png")]
    #[case("C:\\Users\\me\\song.MP3", "song.MP3")]
    #[case("clip.mp4", "clip.mp4")]
    fn keeps_only_the_final_path_component(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(validate_filename(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("notes.txt")]
    #[case("archive")]
    #[case("script.png.sh")]
    fn rejects_disallowed_types(#[case] raw: &str) {
        assert!(matches!(validate_filename(raw), Err(MediaError::UnsupportedType(_))));
    }

    #[test]
    fn rejects_empty_names() {
        assert!(matches!(validate_filename("uploads/"), Err(MediaError::EmptyFilename)));
    }

    #[test]
    fn media_urls_point_at_the_served_directory() {
        assert_eq!(public_media_url("uploads/20240101000000_a.png"), "/media/20240101000000_a.png");
        assert_eq!(public_media_url("https://cdn.example.org/a.png"), "https://cdn.example.org/a.png");
    }
}
