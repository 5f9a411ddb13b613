// src/services/catalog_service.rs
//
// Catalog Service - the persistence collaborator of the scan pipeline
//
// CRITICAL RULES:
// - Validates invariants before every write
// - Emits events only after the write returned
// - Repositories stay dumb; cross-repository work happens here

use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    validate_excluded_path, validate_game, validate_library, DomainError, ExcludedPath, Game,
    GamePlatform, Library, UnifiedGameInfo,
};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, GameAdded, GamesDeleted, LibraryCreated, PathExcluded};
use crate::repositories::{ExcludedPathRepository, GameRepository, LibraryRepository};

/// What the pipeline needs from the store
#[cfg_attr(test, mockall::automock)]
pub trait GameCatalog: Send + Sync {
    fn add_game(&self, info: UnifiedGameInfo, path: &Path, platform: GamePlatform)
        -> AppResult<Game>;
    fn delete_games(&self, games: &[Game]) -> AppResult<usize>;
    fn get_all_games(&self) -> AppResult<Vec<Game>>;
    fn has_game_for_path(&self, path: &Path) -> AppResult<bool>;

    fn add_library(&self, name: &str, path: &Path, platform: GamePlatform) -> AppResult<Library>;
    fn get_all_libraries(&self) -> AppResult<Vec<Library>>;
    fn get_library(&self, id: Uuid) -> AppResult<Option<Library>>;
    fn has_library_for_path(&self, path: &Path) -> AppResult<bool>;

    fn add_excluded_path(&self, path: &Path) -> AppResult<ExcludedPath>;
    fn is_path_excluded(&self, path: &Path) -> AppResult<bool>;

    fn associate_game_with_libraries(&self, game: &Game, libraries: &[Library]) -> AppResult<()>;

    /// Store a game and link it to its hierarchy as a single write
    fn add_game_to_libraries(
        &self,
        info: UnifiedGameInfo,
        path: &Path,
        platform: GamePlatform,
        libraries: &[Library],
    ) -> AppResult<Game>;
}

pub struct CatalogService {
    game_repo: Arc<dyn GameRepository>,
    library_repo: Arc<dyn LibraryRepository>,
    excluded_path_repo: Arc<dyn ExcludedPathRepository>,
    event_bus: Arc<EventBus>,
}

impl CatalogService {
    pub fn new(
        game_repo: Arc<dyn GameRepository>,
        library_repo: Arc<dyn LibraryRepository>,
        excluded_path_repo: Arc<dyn ExcludedPathRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            game_repo,
            library_repo,
            excluded_path_repo,
            event_bus,
        }
    }

    fn new_game(
        &self,
        info: UnifiedGameInfo,
        path: &Path,
        platform: GamePlatform,
    ) -> AppResult<Game> {
        if self.game_repo.exists_for_path(path)? {
            return Err(AppError::Domain(DomainError::InvariantViolation(
                format!("A game is already mapped to {}", path.display()),
            )));
        }

        let game = Game::new(info, path.to_path_buf(), platform);
        validate_game(&game)?;
        Ok(game)
    }

    fn emit_game_added(&self, game: &Game, library_ids: Vec<Uuid>) {
        self.event_bus.emit(GameAdded::new(
            game.id,
            game.info.name.clone(),
            game.path.clone(),
            game.platform,
            library_ids,
        ));
    }

    pub fn list_excluded_paths(&self) -> AppResult<Vec<ExcludedPath>> {
        self.excluded_path_repo.list_all()
    }

    /// Make a path processable again
    pub fn remove_excluded_path(&self, path: &Path) -> AppResult<bool> {
        self.excluded_path_repo.delete_for_path(path)
    }

    pub fn get_games_in_library(&self, library_id: Uuid) -> AppResult<Vec<Game>> {
        let mut games = Vec::new();
        for game_id in self.library_repo.list_game_ids(library_id)? {
            if let Some(game) = self.game_repo.get_by_id(game_id)? {
                games.push(game);
            }
        }
        Ok(games)
    }
}

impl GameCatalog for CatalogService {
    fn add_game(
        &self,
        info: UnifiedGameInfo,
        path: &Path,
        platform: GamePlatform,
    ) -> AppResult<Game> {
        let game = self.new_game(info, path, platform)?;

        self.game_repo.save(&game)?;
        log::info!("Added game {} at {}", game, game.path.display());

        Ok(game)
    }

    fn delete_games(&self, games: &[Game]) -> AppResult<usize> {
        if games.is_empty() {
            return Ok(0);
        }

        let ids: Vec<Uuid> = games.iter().map(|g| g.id).collect();
        let deleted = self.game_repo.delete_many(&ids)?;

        self.event_bus.emit(GamesDeleted::new(ids));
        Ok(deleted)
    }

    fn get_all_games(&self) -> AppResult<Vec<Game>> {
        self.game_repo.list_all()
    }

    fn has_game_for_path(&self, path: &Path) -> AppResult<bool> {
        self.game_repo.exists_for_path(path)
    }

    fn add_library(&self, name: &str, path: &Path, platform: GamePlatform) -> AppResult<Library> {
        if self.library_repo.exists_for_path(path)? {
            return Err(AppError::Domain(DomainError::InvariantViolation(
                format!("A library is already mapped to {}", path.display()),
            )));
        }

        let library = Library::new(name.trim().to_string(), path.to_path_buf(), platform);
        validate_library(&library)?;

        self.library_repo.save(&library)?;
        log::info!("New library created: {}", library);

        self.event_bus.emit(LibraryCreated::new(
            library.id,
            library.name.clone(),
            library.path.clone(),
            library.platform,
        ));

        Ok(library)
    }

    fn get_all_libraries(&self) -> AppResult<Vec<Library>> {
        self.library_repo.list_all()
    }

    fn get_library(&self, id: Uuid) -> AppResult<Option<Library>> {
        self.library_repo.get_by_id(id)
    }

    fn has_library_for_path(&self, path: &Path) -> AppResult<bool> {
        self.library_repo.exists_for_path(path)
    }

    fn add_excluded_path(&self, path: &Path) -> AppResult<ExcludedPath> {
        let excluded = ExcludedPath::new(path.to_path_buf());
        validate_excluded_path(&excluded)?;

        self.excluded_path_repo.save(&excluded)?;
        log::info!("Excluded {}", path.display());

        self.event_bus.emit(PathExcluded::new(excluded.path.clone()));
        Ok(excluded)
    }

    fn is_path_excluded(&self, path: &Path) -> AppResult<bool> {
        self.excluded_path_repo.exists_for_path(path)
    }

    fn associate_game_with_libraries(&self, game: &Game, libraries: &[Library]) -> AppResult<()> {
        let library_ids: Vec<Uuid> = libraries.iter().map(|l| l.id).collect();
        self.library_repo.add_game(&library_ids, game.id)?;

        self.emit_game_added(game, library_ids);
        Ok(())
    }

    fn add_game_to_libraries(
        &self,
        info: UnifiedGameInfo,
        path: &Path,
        platform: GamePlatform,
        libraries: &[Library],
    ) -> AppResult<Game> {
        let game = self.new_game(info, path, platform)?;
        let library_ids: Vec<Uuid> = libraries.iter().map(|l| l.id).collect();

        self.game_repo.save_in_libraries(&game, &library_ids)?;
        log::info!("Added game {} at {}", game, game.path.display());

        self.emit_game_added(&game, library_ids);
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_memory_pool, initialize_database};
    use crate::repositories::{
        SqliteExcludedPathRepository, SqliteGameRepository, SqliteLibraryRepository,
    };
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn setup() -> (CatalogService, Arc<EventBus>) {
        let pool = Arc::new(create_memory_pool().unwrap());
        initialize_database(&pool.get().unwrap()).unwrap();
        let bus = Arc::new(EventBus::new());

        let service = CatalogService::new(
            Arc::new(SqliteGameRepository::new(Arc::clone(&pool))),
            Arc::new(SqliteLibraryRepository::new(Arc::clone(&pool))),
            Arc::new(SqliteExcludedPathRepository::new(pool)),
            Arc::clone(&bus),
        );
        (service, bus)
    }

    fn info(name: &str) -> UnifiedGameInfo {
        UnifiedGameInfo { name: name.to_string(), ..Default::default() }
    }

    #[test]
    fn test_add_game_and_associate_with_hierarchy() {
        let (catalog, bus) = setup();
        let added = Arc::new(AtomicUsize::new(0));
        let added_clone = Arc::clone(&added);
        bus.subscribe::<GameAdded, _>(move |event| {
            assert_eq!(event.library_ids.len(), 2);
            added_clone.fetch_add(1, Ordering::SeqCst);
        });

        let root = catalog.add_library("PC", Path::new("/games/pc"), GamePlatform::Pc).unwrap();
        let sub = catalog
            .add_library("RPG", Path::new("/games/pc/rpg"), GamePlatform::Pc)
            .unwrap();

        let game = catalog
            .add_game(info("Gothic"), Path::new("/games/pc/rpg/Gothic"), GamePlatform::Pc)
            .unwrap();
        catalog.associate_game_with_libraries(&game, &[root.clone(), sub.clone()]).unwrap();

        assert!(catalog.has_game_for_path(Path::new("/games/pc/rpg/Gothic")).unwrap());
        assert_eq!(catalog.get_games_in_library(root.id).unwrap(), vec![game.clone()]);
        assert_eq!(catalog.get_games_in_library(sub.id).unwrap(), vec![game]);
        assert_eq!(added.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_add_game_to_libraries_links_in_one_write() {
        let (catalog, bus) = setup();
        let root = catalog.add_library("PC", Path::new("/games/pc"), GamePlatform::Pc).unwrap();
        bus.clear_event_log();

        let game = catalog
            .add_game_to_libraries(info("Thief"), Path::new("/games/pc/Thief"), GamePlatform::Pc, &[root.clone()])
            .unwrap();

        assert_eq!(catalog.get_games_in_library(root.id).unwrap(), vec![game]);
        let log = bus.get_event_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].event_type, "GameAdded");
    }

    #[test]
    fn test_failed_link_leaves_no_orphan_game() {
        let (catalog, bus) = setup();
        let ghost = Library::new("Ghost".to_string(), PathBuf::from("/games/ghost"), GamePlatform::Pc);

        let result = catalog.add_game_to_libraries(
            info("Gothic"),
            Path::new("/games/ghost/Gothic"),
            GamePlatform::Pc,
            &[ghost],
        );

        assert!(result.is_err());
        assert!(!catalog.has_game_for_path(Path::new("/games/ghost/Gothic")).unwrap());
        assert!(bus.get_event_log().is_empty());
    }

    #[test]
    fn test_add_game_rejects_duplicate_path() {
        let (catalog, _) = setup();
        catalog.add_game(info("Thief"), Path::new("/games/Thief"), GamePlatform::Pc).unwrap();

        let result = catalog.add_game(info("Thief"), Path::new("/games/Thief"), GamePlatform::Pc);
        assert!(matches!(result, Err(AppError::Domain(_))));
    }

    #[test]
    fn test_add_game_validates_name() {
        let (catalog, _) = setup();
        let result = catalog.add_game(info("  "), Path::new("/games/Blank"), GamePlatform::Pc);
        assert!(matches!(result, Err(AppError::Domain(_))));
        assert!(catalog.get_all_games().unwrap().is_empty());
    }

    #[test]
    fn test_add_library_emits_event() {
        let (catalog, bus) = setup();
        let library = catalog
            .add_library("Xbox", Path::new("/games/xbox"), GamePlatform::Xbox360)
            .unwrap();

        assert!(catalog.has_library_for_path(Path::new("/games/xbox")).unwrap());
        assert_eq!(catalog.get_library(library.id).unwrap(), Some(library));
        assert_eq!(bus.get_event_log()[0].event_type, "LibraryCreated");
    }

    #[test]
    fn test_excluded_paths_roundtrip() {
        let (catalog, _) = setup();
        catalog.add_excluded_path(Path::new("/games/Patches")).unwrap();

        assert!(catalog.is_path_excluded(Path::new("/games/Patches")).unwrap());
        assert_eq!(catalog.list_excluded_paths().unwrap().len(), 1);

        assert!(catalog.remove_excluded_path(Path::new("/games/Patches")).unwrap());
        assert!(!catalog.is_path_excluded(Path::new("/games/Patches")).unwrap());
    }

    #[test]
    fn test_delete_games_in_one_batch() {
        let (catalog, bus) = setup();
        let a = catalog.add_game(info("A"), Path::new("/games/A"), GamePlatform::Pc).unwrap();
        let b = catalog.add_game(info("B"), Path::new("/games/B"), GamePlatform::Pc).unwrap();
        bus.clear_event_log();

        assert_eq!(catalog.delete_games(&[a, b]).unwrap(), 2);
        assert!(catalog.get_all_games().unwrap().is_empty());

        let log = bus.get_event_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].event_type, "GamesDeleted");
    }

    #[test]
    fn test_delete_nothing_is_a_noop() {
        let (catalog, bus) = setup();
        assert_eq!(catalog.delete_games(&[]).unwrap(), 0);
        assert!(bus.get_event_log().is_empty());
    }

    #[test]
    fn test_relative_game_path_is_rejected() {
        let (catalog, _) = setup();
        let result = catalog.add_game(info("Rel"), &PathBuf::from("games/Rel"), GamePlatform::Pc);
        assert!(result.is_err());
    }
}
