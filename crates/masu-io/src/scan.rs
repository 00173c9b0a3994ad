//! Recursive discovery of candidate source images.
//!
//! Walks a directory tree, keeps regular files whose extension matches
//! the accepted set, and drops files carrying an excluded name suffix
//! (paired masks, and in mask-less runs the outputs of earlier runs, so
//! a re-scan never tiles its own results). The returned list is sorted
//! so a batch always processes files in the same order.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::raster::MASK_SUFFIX;

/// Name suffix marking files already produced by a previous processing
/// run, excluded from mask-less scans.
pub const PROCESSED_SUFFIX: &str = "_result.png";

/// Filtering rules for the directory scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Accepted file extensions, lower-case, without the leading dot.
    /// Matched case-insensitively.
    pub extensions: Vec<String>,

    /// File-name suffixes excluded from the candidate list. Matched
    /// case-sensitively, since paired naming depends on exact suffixes.
    pub excluded_suffixes: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["jpeg".to_owned(), "jpg".to_owned(), "png".to_owned()],
            excluded_suffixes: vec![MASK_SUFFIX.to_owned()],
        }
    }
}

/// Collect candidate source files under `root`, recursively.
///
/// Symlinks are followed; unreadable entries are silently skipped. The
/// result is sorted by path.
#[must_use]
pub fn scan_sources(root: &Path, options: &ScanOptions) -> Vec<PathBuf> {
    let mut sources: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| is_candidate(path, options))
        .collect();
    sources.sort();
    sources
}

fn is_candidate(path: &Path, options: &ScanOptions) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    if options
        .excluded_suffixes
        .iter()
        .any(|suffix| name.ends_with(suffix.as_str()))
    {
        return false;
    }
    let Some(extension) = path.extension().and_then(|extension| extension.to_str()) else {
        return false;
    };
    let extension = extension.to_ascii_lowercase();
    options.extensions.iter().any(|accepted| *accepted == extension)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::write(path, b"").unwrap();
    }

    #[test]
    fn candidate_filtering() {
        let options = ScanOptions::default();
        assert!(is_candidate(Path::new("/in/photo.png"), &options));
        assert!(is_candidate(Path::new("/in/photo.JPG"), &options));
        assert!(is_candidate(Path::new("/in/a.b.jpeg"), &options));
        assert!(!is_candidate(Path::new("/in/photo.tiff"), &options));
        assert!(!is_candidate(Path::new("/in/notes"), &options));
        assert!(!is_candidate(Path::new("/in/photo.png_mask.png"), &options));
    }

    #[test]
    fn processed_suffix_is_excluded_only_when_configured() {
        let default_options = ScanOptions::default();
        assert!(is_candidate(
            Path::new("/in/photo_result.png"),
            &default_options,
        ));

        let mut options = ScanOptions::default();
        options.excluded_suffixes.push(PROCESSED_SUFFIX.to_owned());
        assert!(!is_candidate(Path::new("/in/photo_result.png"), &options));
    }

    #[test]
    fn scans_recursively_and_sorted() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("nested");
        std::fs::create_dir(&nested).unwrap();

        touch(&root.path().join("b.png"));
        touch(&root.path().join("a.jpg"));
        touch(&root.path().join("a.jpg_mask.png"));
        touch(&root.path().join("notes.txt"));
        touch(&nested.join("c.jpeg"));

        let sources = scan_sources(root.path(), &ScanOptions::default());
        assert_eq!(
            sources,
            vec![
                root.path().join("a.jpg"),
                root.path().join("b.png"),
                nested.join("c.jpeg"),
            ],
        );
    }

    #[test]
    fn empty_tree_yields_no_sources() {
        let root = tempfile::tempdir().unwrap();
        assert!(scan_sources(root.path(), &ScanOptions::default()).is_empty());
    }
}
