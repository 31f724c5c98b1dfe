//! Validation of a candidate input file.
//!
//! A file is accepted when its MIME type (guessed from the extension) is in
//! the `video/` family. Large files are accepted with a warning.

use crate::error::{CoreError, CoreResult};
use crate::utils::get_filename_safe;
use mime_guess::mime;
use std::path::{Path, PathBuf};

/// Non-blocking concerns about an accepted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileWarning {
    /// The file exceeds the configured size threshold.
    LargeFile { size_bytes: u64, threshold_bytes: u64 },
}

impl std::fmt::Display for FileWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LargeFile { size_bytes, threshold_bytes } => write!(
                f,
                "file is {} which exceeds {}; compression may exhaust memory",
                crate::utils::format_bytes(*size_bytes),
                crate::utils::format_bytes(*threshold_bytes)
            ),
        }
    }
}

/// An input file that passed validation.
#[derive(Debug, Clone)]
pub struct FileSelection {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub warnings: Vec<FileWarning>,
}

/// Checks that `path` is an existing video file.
///
/// Non-video MIME types are rejected with [`CoreError::NotAVideo`]. Files
/// strictly larger than `large_file_threshold` are accepted but carry a
/// [`FileWarning::LargeFile`].
pub fn select_video_file(path: &Path, large_file_threshold: u64) -> CoreResult<FileSelection> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        CoreError::PathError(format!("Failed to access '{}': {}", path.display(), e))
    })?;
    if !metadata.is_file() {
        return Err(CoreError::PathError(format!(
            "'{}' is not a file",
            path.display()
        )));
    }

    let guessed = mime_guess::from_path(path).first_or_octet_stream();
    if guessed.type_() != mime::VIDEO {
        return Err(CoreError::NotAVideo(format!(
            "{} ({})",
            path.display(),
            guessed.essence_str()
        )));
    }

    let size_bytes = metadata.len();
    let mut warnings = Vec::new();
    if size_bytes > large_file_threshold {
        log::warn!(
            "{} is larger than {} bytes; continuing anyway",
            path.display(),
            large_file_threshold
        );
        warnings.push(FileWarning::LargeFile {
            size_bytes,
            threshold_bytes: large_file_threshold,
        });
    }

    Ok(FileSelection {
        path: path.to_path_buf(),
        name: get_filename_safe(path)?,
        size_bytes,
        mime_type: guessed.essence_str().to_string(),
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_accepts_video_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("holiday.mp4");
        std::fs::write(&path, vec![0u8; 64]).unwrap();

        let selection = select_video_file(&path, 1024).unwrap();
        assert_eq!(selection.name, "holiday.mp4");
        assert_eq!(selection.size_bytes, 64);
        assert_eq!(selection.mime_type, "video/mp4");
        assert!(selection.warnings.is_empty());
    }

    #[test]
    fn test_rejects_non_video() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let err = select_video_file(&path, 1024).unwrap_err();
        assert!(matches!(err, CoreError::NotAVideo(_)));
    }

    #[test]
    fn test_large_file_is_warned_not_blocked() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.mkv");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();

        let selection = select_video_file(&path, 1024).unwrap();
        assert_eq!(
            selection.warnings,
            vec![FileWarning::LargeFile { size_bytes: 2048, threshold_bytes: 1024 }]
        );
    }

    #[test]
    fn test_missing_file_is_path_error() {
        let err = select_video_file(Path::new("/no/such/clip.mp4"), 1024).unwrap_err();
        assert!(matches!(err, CoreError::PathError(_)));
    }

    #[test]
    fn test_file_at_threshold_is_not_warned() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("edge.webm");
        std::fs::write(&path, vec![0u8; 1024]).unwrap();

        let selection = select_video_file(&path, 1024).unwrap();
        assert_eq!(selection.mime_type, "video/webm");
        assert!(selection.warnings.is_empty());
    }
}
