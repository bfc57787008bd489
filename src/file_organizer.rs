/// File movement into category directories.
///
/// This module provides the [`Mover`], which relocates a single file into its
/// category subdirectory (creating the directory when needed) or, during a dry
/// run, only records the destination in a [`DirectoryTree`].
use crate::tree::DirectoryTree;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A file that has been assigned a destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    /// Current location of the file.
    pub source: PathBuf,
    /// Category subdirectory the file goes into.
    pub category: String,
    /// Name of the file at its destination.
    pub file_name: String,
}

impl PlannedMove {
    /// Directory the file will be moved into.
    pub fn destination_dir(&self, base_path: &Path) -> PathBuf {
        base_path.join(&self.category)
    }

    /// Full destination path of the file.
    pub fn destination(&self, base_path: &Path) -> PathBuf {
        self.destination_dir(base_path).join(&self.file_name)
    }
}

/// Errors that can occur during file organization operations.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The directory to organize could not be listed.
    #[error("Failed to read directory {}: {source}", .path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A single directory entry could not be inspected.
    #[error("Failed to read entry in {}: {source}", .path.display())]
    EntryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Failed to create a category directory.
    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Failed to move a file to its category directory.
    #[error("Failed to move {} to {}: {error}", .from.display(), .to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        error: std::io::Error,
    },
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Moves files into category directories, or simulates doing so.
pub struct Mover;

impl Mover {
    /// Moves `source` to `destination_dir/final_name` and returns the destination.
    ///
    /// In live mode the destination directory is created when missing and the
    /// file is renamed into it. There is no copy fallback, so renames across
    /// filesystems fail. An existing file at the destination is replaced.
    ///
    /// With `dry_run` set nothing on disk is touched; the destination is only
    /// added to `tree`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidydir::{DirectoryTree, Mover};
    /// use std::path::Path;
    ///
    /// let mut tree = DirectoryTree::new("/downloads");
    /// let dest = Mover::move_file(
    ///     Path::new("/downloads/song.mp3"),
    ///     Path::new("/downloads/audio"),
    ///     "song.mp3",
    ///     true,
    ///     &mut tree,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(dest, Path::new("/downloads/audio/song.mp3"));
    /// assert!(tree.find_node("/downloads/audio/song.mp3").is_some());
    /// ```
    pub fn move_file(
        source: &Path,
        destination_dir: &Path,
        final_name: &str,
        dry_run: bool,
        tree: &mut DirectoryTree,
    ) -> OrganizeResult<PathBuf> {
        let destination = destination_dir.join(final_name);

        if dry_run {
            log::debug!(
                "Simulating {} -> {}",
                source.display(),
                destination.display()
            );
            tree.add_file(&destination);
            return Ok(destination);
        }

        fs::create_dir_all(destination_dir).map_err(|e| {
            OrganizeError::DirectoryCreationFailed {
                path: destination_dir.to_path_buf(),
                source: e,
            }
        })?;

        fs::rename(source, &destination).map_err(|e| OrganizeError::FileMoveFailure {
            from: source.to_path_buf(),
            to: destination.clone(),
            error: e,
        })?;

        log::debug!("Moved {} -> {}", source.display(), destination.display());
        Ok(destination)
    }

    /// Executes a [`PlannedMove`] relative to `base_path`.
    pub fn execute(
        planned: &PlannedMove,
        base_path: &Path,
        dry_run: bool,
        tree: &mut DirectoryTree,
    ) -> OrganizeResult<PathBuf> {
        Self::move_file(
            &planned.source,
            &planned.destination_dir(base_path),
            &planned.file_name,
            dry_run,
            tree,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_move_creates_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let mut tree = DirectoryTree::new(base_path);

        let file_path = base_path.join("test.txt");
        fs::write(&file_path, "test content").expect("Failed to write test file");

        let dest = Mover::move_file(
            &file_path,
            &base_path.join("document"),
            "test.txt",
            false,
            &mut tree,
        )
        .expect("Failed to move file");

        assert!(base_path.join("document").is_dir());
        assert!(!file_path.exists());
        assert_eq!(dest, base_path.join("document").join("test.txt"));
        assert_eq!(fs::read_to_string(&dest).unwrap(), "test content");
        assert!(tree.is_empty(), "live moves do not touch the tree");
    }

    #[test]
    fn test_move_uses_existing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let mut tree = DirectoryTree::new(base_path);

        let category_dir = base_path.join("image");
        fs::create_dir(&category_dir).unwrap();
        let file_path = base_path.join("test.png");
        fs::write(&file_path, "png").unwrap();

        Mover::move_file(&file_path, &category_dir, "test.png", false, &mut tree)
            .expect("Failed to move file");

        assert!(!file_path.exists());
        assert!(category_dir.join("test.png").exists());
    }

    #[test]
    fn test_move_renames_file() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();
        let mut tree = DirectoryTree::new(base_path);
        let file_path = base_path.join("report.pdf");
        fs::write(&file_path, "pdf").unwrap();

        let planned = PlannedMove {
            source: file_path.clone(),
            category: "document".to_string(),
            file_name: "2024-03-05_report.pdf".to_string(),
        };
        Mover::execute(&planned, base_path, false, &mut tree).unwrap();

        assert!(base_path.join("document/2024-03-05_report.pdf").exists());
    }

    #[test]
    fn test_move_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();
        let mut tree = DirectoryTree::new(base_path);

        let result = Mover::move_file(
            &base_path.join("ghost.mp3"),
            &base_path.join("audio"),
            "ghost.mp3",
            false,
            &mut tree,
        );

        assert!(matches!(result, Err(OrganizeError::FileMoveFailure { .. })));
    }

    #[test]
    fn test_directory_blocked_by_file() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();
        let mut tree = DirectoryTree::new(base_path);

        fs::write(base_path.join("audio"), "not a directory").unwrap();
        let file_path = base_path.join("song.mp3");
        fs::write(&file_path, "mp3").unwrap();

        let result = Mover::move_file(
            &file_path,
            &base_path.join("audio"),
            "song.mp3",
            false,
            &mut tree,
        );

        assert!(matches!(
            result,
            Err(OrganizeError::DirectoryCreationFailed { .. })
        ));
        assert!(file_path.exists());
    }

    #[test]
    fn test_dry_run_leaves_filesystem_alone() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();
        let mut tree = DirectoryTree::new(base_path);
        let file_path = base_path.join("song.mp3");
        fs::write(&file_path, "mp3").unwrap();

        let dest = Mover::move_file(
            &file_path,
            &base_path.join("audio"),
            "song.mp3",
            true,
            &mut tree,
        )
        .unwrap();

        assert!(file_path.exists());
        assert!(!base_path.join("audio").exists());
        assert!(tree.find_node(&dest).is_some());
    }

    #[test]
    fn test_planned_move_destination() {
        let planned = PlannedMove {
            source: PathBuf::from("/d/song.mp3"),
            category: "audio".to_string(),
            file_name: "song.mp3".to_string(),
        };
        assert_eq!(planned.destination_dir(Path::new("/d")), PathBuf::from("/d/audio"));
        assert_eq!(
            planned.destination(Path::new("/d")),
            PathBuf::from("/d/audio/song.mp3")
        );
    }
}
