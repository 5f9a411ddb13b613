// src/repositories/library_repository.rs
//
// Library persistence, including the library <-> game association table

use rusqlite::{params, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::{GamePlatform, Library};
use crate::error::AppResult;
use crate::repositories::{conversion_error, parse_timestamp, parse_uuid, path_key};

pub trait LibraryRepository: Send + Sync {
    fn save(&self, library: &Library) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Library>>;
    fn get_by_path(&self, path: &Path) -> AppResult<Option<Library>>;
    fn exists_for_path(&self, path: &Path) -> AppResult<bool>;
    fn list_all(&self) -> AppResult<Vec<Library>>;

    /// Link a game to several libraries atomically
    fn add_game(&self, library_ids: &[Uuid], game_id: Uuid) -> AppResult<()>;
    fn list_game_ids(&self, library_id: Uuid) -> AppResult<Vec<Uuid>>;
    fn list_libraries_for_game(&self, game_id: Uuid) -> AppResult<Vec<Library>>;
}

pub struct SqliteLibraryRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteLibraryRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_library(row: &Row) -> Result<Library, rusqlite::Error> {
        let id = parse_uuid(0, &row.get::<_, String>(0)?)?;
        let path: String = row.get(2)?;

        let platform_str: String = row.get(3)?;
        let platform = platform_str
            .parse::<GamePlatform>()
            .map_err(|e| conversion_error(3, e.to_string()))?;

        let created_at = parse_timestamp(4, &row.get::<_, String>(4)?)?;

        Ok(Library {
            id,
            name: row.get(1)?,
            path: PathBuf::from(path),
            platform,
            created_at,
        })
    }
}

impl LibraryRepository for SqliteLibraryRepository {
    fn save(&self, library: &Library) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO libraries (id, name, path, platform, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                path = excluded.path,
                platform = excluded.platform",
            params![
                library.id.to_string(),
                library.name,
                path_key(&library.path),
                library.platform.key(),
                library.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Library>> {
        let conn = self.pool.get()?;
        let library = conn
            .query_row(
                "SELECT id, name, path, platform, created_at FROM libraries WHERE id = ?1",
                params![id.to_string()],
                Self::row_to_library,
            )
            .optional()?;
        Ok(library)
    }

    fn get_by_path(&self, path: &Path) -> AppResult<Option<Library>> {
        let conn = self.pool.get()?;
        let library = conn
            .query_row(
                "SELECT id, name, path, platform, created_at FROM libraries WHERE path = ?1",
                params![path_key(path)],
                Self::row_to_library,
            )
            .optional()?;
        Ok(library)
    }

    fn exists_for_path(&self, path: &Path) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM libraries WHERE path = ?1)",
            params![path_key(path)],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn list_all(&self) -> AppResult<Vec<Library>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, path, platform, created_at FROM libraries ORDER BY created_at, path",
        )?;
        let libraries = stmt
            .query_map([], Self::row_to_library)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(libraries)
    }

    fn add_game(&self, library_ids: &[Uuid], game_id: Uuid) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO library_games (library_id, game_id) VALUES (?1, ?2)",
            )?;
            for library_id in library_ids {
                stmt.execute(params![library_id.to_string(), game_id.to_string()])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn list_game_ids(&self, library_id: Uuid) -> AppResult<Vec<Uuid>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT game_id FROM library_games WHERE library_id = ?1")?;
        let ids = stmt
            .query_map(params![library_id.to_string()], |row| {
                parse_uuid(0, &row.get::<_, String>(0)?)
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    fn list_libraries_for_game(&self, game_id: Uuid) -> AppResult<Vec<Library>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT l.id, l.name, l.path, l.platform, l.created_at
             FROM libraries l
             INNER JOIN library_games lg ON lg.library_id = l.id
             WHERE lg.game_id = ?1
             ORDER BY l.created_at, l.path",
        )?;
        let libraries = stmt
            .query_map(params![game_id.to_string()], Self::row_to_library)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(libraries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_memory_pool, initialize_database};
    use crate::domain::{Game, UnifiedGameInfo};
    use crate::repositories::{GameRepository, SqliteGameRepository};

    fn setup() -> (SqliteLibraryRepository, SqliteGameRepository) {
        let pool = Arc::new(create_memory_pool().unwrap());
        initialize_database(&pool.get().unwrap()).unwrap();
        (
            SqliteLibraryRepository::new(Arc::clone(&pool)),
            SqliteGameRepository::new(pool),
        )
    }

    fn library(name: &str) -> Library {
        Library::new(name.to_string(), PathBuf::from(format!("/games/{}", name)), GamePlatform::Pc)
    }

    #[test]
    fn test_save_and_find_by_path() {
        let (repo, _) = setup();
        let lib = library("pc");
        repo.save(&lib).unwrap();

        assert!(repo.exists_for_path(Path::new("/games/pc")).unwrap());
        assert_eq!(repo.get_by_path(Path::new("/games/pc")).unwrap(), Some(lib.clone()));
        assert_eq!(repo.get_by_id(lib.id).unwrap(), Some(lib));
        assert!(!repo.exists_for_path(Path::new("/games")).unwrap());
    }

    #[test]
    fn test_duplicate_path_is_rejected() {
        let (repo, _) = setup();
        repo.save(&library("pc")).unwrap();

        assert!(repo.save(&library("pc")).is_err());
    }

    #[test]
    fn test_game_association_spans_hierarchy() {
        let (repo, games) = setup();
        let root = library("pc");
        let sub = library("pc-rpg");
        repo.save(&root).unwrap();
        repo.save(&sub).unwrap();

        let game = Game::new(
            UnifiedGameInfo { name: "Gothic".to_string(), ..Default::default() },
            PathBuf::from("/games/pc-rpg/Gothic"),
            GamePlatform::Pc,
        );
        games.save(&game).unwrap();

        repo.add_game(&[root.id, sub.id], game.id).unwrap();

        assert_eq!(repo.list_game_ids(root.id).unwrap(), vec![game.id]);
        assert_eq!(repo.list_game_ids(sub.id).unwrap(), vec![game.id]);
        assert_eq!(repo.list_libraries_for_game(game.id).unwrap().len(), 2);
    }

    #[test]
    fn test_deleting_game_drops_associations() {
        let (repo, games) = setup();
        let root = library("pc");
        repo.save(&root).unwrap();

        let game = Game::new(
            UnifiedGameInfo { name: "Thief".to_string(), ..Default::default() },
            PathBuf::from("/games/pc/Thief"),
            GamePlatform::Pc,
        );
        games.save(&game).unwrap();
        repo.add_game(&[root.id], game.id).unwrap();

        games.delete_many(&[game.id]).unwrap();

        assert!(repo.list_game_ids(root.id).unwrap().is_empty());
    }
}
