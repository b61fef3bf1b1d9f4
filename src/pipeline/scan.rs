//! Directory scanning: enumerate supported input files.
//!
//! Files come back in directory-listing order — deliberately not sorted, so
//! the run visits items in the same order a plain listing shows them.
//! Regular files with an unsupported extension are reported at info level
//! and then ignored entirely: they count as neither processed nor skipped.

use crate::error::BatchError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Image extensions accepted by the image pipeline.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "gif"];

/// Document extension accepted by the document pipeline.
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// Which pipeline a scanned file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Document,
}

/// One candidate input file.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub kind: FileKind,
}

impl ScannedFile {
    /// File name for log lines; lossy is fine, this is display-only.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Classify a path by its (lowercased) extension.
pub fn classify(path: &Path) -> Option<FileKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if ext == DOCUMENT_EXTENSION {
        Some(FileKind::Document)
    } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(FileKind::Image)
    } else {
        None
    }
}

/// Enumerate supported regular files in `dir`.
///
/// Fails fatally when the directory does not exist or cannot be read;
/// everything else degrades to per-entry logging.
pub fn scan_input_dir(dir: &Path) -> Result<Vec<ScannedFile>, BatchError> {
    if !dir.is_dir() {
        return Err(BatchError::InputDirMissing {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| BatchError::InputDirUnreadable {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!("Unreadable directory entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match classify(&path) {
            Some(kind) => files.push(ScannedFile { path, kind }),
            None => info!(
                "Skipping non-supported file: {}",
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            ),
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_recognises_all_supported_extensions() {
        for ext in IMAGE_EXTENSIONS {
            let path = PathBuf::from(format!("photo.{ext}"));
            assert_eq!(classify(&path), Some(FileKind::Image), "ext: {ext}");
        }
        assert_eq!(classify(Path::new("doc.pdf")), Some(FileKind::Document));
        assert_eq!(classify(Path::new("doc.PDF")), Some(FileKind::Document));
        assert_eq!(classify(Path::new("photo.JPeG")), Some(FileKind::Image));
    }

    #[test]
    fn classify_rejects_everything_else() {
        assert_eq!(classify(Path::new("notes.txt")), None);
        assert_eq!(classify(Path::new("archive.tar.gz")), None);
        assert_eq!(classify(Path::new("no_extension")), None);
    }

    #[test]
    fn scan_missing_dir_is_fatal() {
        let err = scan_input_dir(Path::new("/definitely/not/a/real/dir")).unwrap_err();
        assert!(matches!(err, BatchError::InputDirMissing { .. }));
    }

    #[test]
    fn scan_lists_only_supported_regular_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"x").unwrap();
        std::fs::write(dir.path().join("b.pdf"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("sub.png")).unwrap();

        let files = scan_input_dir(dir.path()).unwrap();
        let mut names: Vec<(String, FileKind)> =
            files.iter().map(|f| (f.name(), f.kind)).collect();
        names.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            names,
            vec![
                ("a.png".to_string(), FileKind::Image),
                ("b.pdf".to_string(), FileKind::Document),
            ]
        );
    }
}
