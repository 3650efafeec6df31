//! File discovery and extension-based classification.

use std::collections::HashSet;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

use crate::config::ScanConfig;
use crate::error::ImportError;
use crate::types::{MediaFile, MediaKind};

/// Finds and classifies media files in a folder.
pub struct FileScanner {
    images: HashSet<String>,
    videos: HashSet<String>,
    unsupported: HashSet<String>,
    follow_links: bool,
}

fn normalize(list: &[String]) -> HashSet<String> {
    list.iter()
        .map(|ext| ext.trim_start_matches('.').to_lowercase())
        .collect()
}

impl FileScanner {
    /// Create a scanner from the configured extension lists.
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            images: normalize(&config.image_extensions),
            videos: normalize(&config.video_extensions),
            unsupported: normalize(&config.unsupported_extensions),
            follow_links: config.follow_links,
        }
    }

    /// Classify a path by its extension (case-insensitive).
    ///
    /// Returns `None` for extensions on none of the lists.
    pub fn classify(&self, path: &Path) -> Option<MediaKind> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        if self.images.contains(&ext) {
            Some(MediaKind::Image)
        } else if self.videos.contains(&ext) {
            Some(MediaKind::Video)
        } else if self.unsupported.contains(&ext) {
            Some(MediaKind::Unsupported)
        } else {
            None
        }
    }

    /// Count eligible files anywhere below `folder`.
    ///
    /// This is the progress maximum. Unreadable subtrees are skipped, but the
    /// root itself must be readable.
    pub fn count_eligible(&self, folder: &Path) -> Result<usize, ImportError> {
        ensure_readable(folder)?;
        let count = self
            .walk(folder, usize::MAX)
            .filter(|e| self.classify(e.path()).is_some())
            .count();
        Ok(count)
    }

    /// List the classified files directly inside `folder`.
    ///
    /// Uses the same walk settings as [`count_eligible`](Self::count_eligible),
    /// so every listed file is also counted. Entries are sorted by path.
    pub fn list_top_level(&self, folder: &Path) -> Result<Vec<MediaFile>, ImportError> {
        ensure_readable(folder)?;
        let mut files: Vec<MediaFile> = self
            .walk(folder, 1)
            .filter_map(|entry| {
                let kind = self.classify(entry.path())?;
                Some(MediaFile {
                    path: entry.into_path(),
                    kind,
                })
            })
            .collect();

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    /// Regular files below `folder`, down to `max_depth`.
    ///
    /// Symlinks count as files only when `follow_links` is set.
    fn walk(&self, folder: &Path, max_depth: usize) -> impl Iterator<Item = DirEntry> {
        let root = folder.to_path_buf();
        WalkDir::new(folder)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(self.follow_links)
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", root, e);
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
    }
}

fn ensure_readable(folder: &Path) -> Result<(), ImportError> {
    std::fs::read_dir(folder)
        .map(|_| ())
        .map_err(|source| ImportError::FolderUnreadable {
            path: folder.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn scanner() -> FileScanner {
        FileScanner::new(&ScanConfig::default())
    }

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_classify() {
        let scanner = scanner();
        assert_eq!(scanner.classify(Path::new("a.jpg")), Some(MediaKind::Image));
        assert_eq!(scanner.classify(Path::new("a.JPEG")), Some(MediaKind::Image));
        assert_eq!(scanner.classify(Path::new("a.Mp4")), Some(MediaKind::Video));
        assert_eq!(scanner.classify(Path::new("a.3gp")), Some(MediaKind::Video));
        assert_eq!(
            scanner.classify(Path::new("a.swf")),
            Some(MediaKind::Unsupported)
        );
        assert_eq!(scanner.classify(Path::new("a.txt")), None);
        assert_eq!(scanner.classify(Path::new("noext")), None);
    }

    #[test]
    fn test_classify_tolerates_dotted_config() {
        let config = ScanConfig {
            image_extensions: vec![".TIF".into()],
            ..ScanConfig::default()
        };
        let scanner = FileScanner::new(&config);
        assert_eq!(scanner.classify(Path::new("scan.tif")), Some(MediaKind::Image));
    }

    #[test]
    fn test_count_is_recursive_and_list_is_not() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.png"));
        touch(&dir.path().join("a.MOV"));
        touch(&dir.path().join("c.swf"));
        touch(&dir.path().join("notes.txt"));
        fs::create_dir(dir.path().join("nested")).unwrap();
        touch(&dir.path().join("nested").join("d.jpg"));
        touch(&dir.path().join("nested").join("e.doc"));

        let scanner = scanner();
        assert_eq!(scanner.count_eligible(dir.path()).unwrap(), 4);

        let files = scanner.list_top_level(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.MOV", "b.png", "c.swf"]);
        assert_eq!(files[0].kind, MediaKind::Video);
        assert_eq!(files[1].kind, MediaKind::Image);
        assert_eq!(files[2].kind, MediaKind::Unsupported);
    }

    #[test]
    fn test_directory_with_media_extension_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("album.jpg")).unwrap();

        let scanner = scanner();
        assert_eq!(scanner.count_eligible(dir.path()).unwrap(), 0);
        assert!(scanner.list_top_level(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_folder_is_unreadable() {
        let scanner = scanner();
        let missing = PathBuf::from("/nonexistent/shoebox/folder");

        assert!(matches!(
            scanner.count_eligible(&missing),
            Err(ImportError::FolderUnreadable { .. })
        ));
        assert!(matches!(
            scanner.list_top_level(&missing),
            Err(ImportError::FolderUnreadable { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_counted_and_listed_alike() {
        let outside = tempfile::tempdir().unwrap();
        let target = outside.path().join("real.png");
        touch(&target);

        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("link.png")).unwrap();
        touch(&dir.path().join("plain.jpg"));

        let scanner = scanner();
        assert_eq!(scanner.count_eligible(dir.path()).unwrap(), 1);
        assert_eq!(scanner.list_top_level(dir.path()).unwrap().len(), 1);

        let following = FileScanner::new(&ScanConfig {
            follow_links: true,
            ..ScanConfig::default()
        });
        assert_eq!(following.count_eligible(dir.path()).unwrap(), 2);
        assert_eq!(following.list_top_level(dir.path()).unwrap().len(), 2);
    }
}
