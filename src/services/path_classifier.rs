// src/services/path_classifier.rs
//
// Path Classification
//
// CRITICAL RULES:
// - Read-only: never mutates the catalog
// - Check order is fixed: games, then libraries, then exclusions
// - First match wins

use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::{DirEntry, WalkDir};

use crate::domain::PathClassification;
use crate::error::{AppError, AppResult};
use crate::services::catalog_service::GameCatalog;

pub struct PathClassifier {
    catalog: Arc<dyn GameCatalog>,
}

impl PathClassifier {
    pub fn new(catalog: Arc<dyn GameCatalog>) -> Self {
        Self { catalog }
    }

    pub fn classify(&self, path: &Path) -> AppResult<PathClassification> {
        if self.catalog.has_game_for_path(path)? {
            return Ok(PathClassification::AlreadyGame);
        }
        if self.catalog.has_library_for_path(path)? {
            return Ok(PathClassification::AlreadyLibrary);
        }
        if self.catalog.is_path_excluded(path)? {
            return Ok(PathClassification::Excluded);
        }
        Ok(PathClassification::Unclassified)
    }
}

/// An unreadable root is an error; an unreadable child (dangling link, no
/// permission) is logged and left out.
fn readable_entry(entry: walkdir::Result<DirEntry>) -> AppResult<Option<DirEntry>> {
    match entry {
        Ok(entry) => Ok(Some(entry)),
        Err(e) if e.depth() == 0 => Err(AppError::from(e)),
        Err(e) => {
            log::warn!("Skipping unreadable entry: {}", e);
            Ok(None)
        }
    }
}

/// Immediate child directories, sorted by file name
pub fn child_directories(path: &Path) -> AppResult<Vec<PathBuf>> {
    let mut directories = Vec::new();

    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let Some(entry) = readable_entry(entry)? else {
            continue;
        };
        if entry.file_type().is_dir() {
            directories.push(entry.into_path());
        }
    }

    Ok(directories)
}

/// A directory may become a library only if it holds sub-directories and no files
pub fn is_library_candidate(path: &Path) -> AppResult<bool> {
    let mut has_directories = false;

    for entry in WalkDir::new(path).min_depth(1).max_depth(1).follow_links(true) {
        let Some(entry) = readable_entry(entry)? else {
            continue;
        };
        if entry.file_type().is_file() {
            return Ok(false);
        }
        if entry.file_type().is_dir() {
            has_directories = true;
        }
    }

    Ok(has_directories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Game, GamePlatform, Library, UnifiedGameInfo};
    use crate::services::catalog_service::MockGameCatalog;
    use std::fs;

    fn catalog(game: bool, library: bool, excluded: bool) -> MockGameCatalog {
        let mut catalog = MockGameCatalog::new();
        catalog.expect_has_game_for_path().returning(move |_| Ok(game));
        catalog.expect_has_library_for_path().returning(move |_| Ok(library));
        catalog.expect_is_path_excluded().returning(move |_| Ok(excluded));
        catalog
    }

    #[test]
    fn test_classify_known_game() {
        let classifier = PathClassifier::new(Arc::new(catalog(true, false, false)));
        assert_eq!(
            classifier.classify(Path::new("/games/Thief")).unwrap(),
            PathClassification::AlreadyGame
        );
    }

    #[test]
    fn test_classify_known_library() {
        let classifier = PathClassifier::new(Arc::new(catalog(false, true, false)));
        assert_eq!(
            classifier.classify(Path::new("/games/pc")).unwrap(),
            PathClassification::AlreadyLibrary
        );
    }

    #[test]
    fn test_classify_excluded() {
        let classifier = PathClassifier::new(Arc::new(catalog(false, false, true)));
        assert_eq!(
            classifier.classify(Path::new("/games/Patches")).unwrap(),
            PathClassification::Excluded
        );
    }

    #[test]
    fn test_classify_unclassified() {
        let classifier = PathClassifier::new(Arc::new(catalog(false, false, false)));
        assert_eq!(
            classifier.classify(Path::new("/games/New")).unwrap(),
            PathClassification::Unclassified
        );
    }

    #[test]
    fn test_game_check_wins_and_short_circuits() {
        let mut catalog = MockGameCatalog::new();
        catalog.expect_has_game_for_path().times(1).returning(|_| Ok(true));
        catalog.expect_has_library_for_path().never();
        catalog.expect_is_path_excluded().never();

        let classifier = PathClassifier::new(Arc::new(catalog));
        assert_eq!(
            classifier.classify(Path::new("/games/Thief")).unwrap(),
            PathClassification::AlreadyGame
        );
    }

    #[test]
    fn test_classify_against_real_catalog_entries() {
        let mut catalog = MockGameCatalog::new();
        let game = Game::new(
            UnifiedGameInfo { name: "Thief".to_string(), ..Default::default() },
            PathBuf::from("/games/Thief"),
            GamePlatform::Pc,
        );
        let library = Library::new("PC".to_string(), PathBuf::from("/games"), GamePlatform::Pc);
        let game_path = game.path.clone();
        let library_path = library.path.clone();

        catalog.expect_has_game_for_path().returning(move |p| Ok(p == game_path.as_path()));
        catalog.expect_has_library_for_path().returning(move |p| Ok(p == library_path.as_path()));
        catalog.expect_is_path_excluded().returning(|_| Ok(false));

        let classifier = PathClassifier::new(Arc::new(catalog));
        assert_eq!(
            classifier.classify(Path::new("/games/Thief")).unwrap(),
            PathClassification::AlreadyGame
        );
        assert_eq!(
            classifier.classify(Path::new("/games")).unwrap(),
            PathClassification::AlreadyLibrary
        );
    }

    #[test]
    fn test_child_directories_sorted_and_files_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::create_dir_all(dir.path().join("c/nested")).unwrap();
        fs::write(dir.path().join("readme.txt"), "x").unwrap();

        let children = child_directories(dir.path()).unwrap();
        let names: Vec<_> = children
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_link_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("Thief")).unwrap();
        fs::create_dir(dir.path().join("Gothic")).unwrap();
        std::os::unix::fs::symlink("/nonexistent/target", dir.path().join("broken")).unwrap();

        let children = child_directories(dir.path()).unwrap();

        assert_eq!(children, vec![dir.path().join("Gothic"), dir.path().join("Thief")]);
        assert!(is_library_candidate(dir.path()).unwrap());
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(child_directories(&dir.path().join("gone")).is_err());
    }

    #[test]
    fn test_directory_with_subdirs_and_no_files_is_candidate() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("Game A")).unwrap();
        fs::create_dir(dir.path().join("Game B")).unwrap();

        assert!(is_library_candidate(dir.path()).unwrap());
    }

    #[test]
    fn test_directory_with_any_file_is_never_candidate() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..5 {
            fs::create_dir(dir.path().join(format!("sub{}", i))).unwrap();
        }
        fs::write(dir.path().join("setup.exe"), "x").unwrap();

        assert!(!is_library_candidate(dir.path()).unwrap());
    }

    #[test]
    fn test_empty_directory_is_not_candidate() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_library_candidate(dir.path()).unwrap());
    }

    #[test]
    fn test_files_only_directory_is_not_candidate() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("game.iso"), "x").unwrap();
        assert!(!is_library_candidate(dir.path()).unwrap());
    }
}
