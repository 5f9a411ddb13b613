// src/repositories/game_repository.rs
//
// Game persistence

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::{Game, GamePlatform, UnifiedGameInfo};
use crate::error::AppResult;
use crate::repositories::{conversion_error, parse_timestamp, parse_uuid, path_key};

pub trait GameRepository: Send + Sync {
    fn save(&self, game: &Game) -> AppResult<()>;

    /// Game row plus its library links, in one transaction
    fn save_in_libraries(&self, game: &Game, library_ids: &[Uuid]) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Game>>;
    fn get_by_path(&self, path: &Path) -> AppResult<Option<Game>>;
    fn exists_for_path(&self, path: &Path) -> AppResult<bool>;
    fn list_all(&self) -> AppResult<Vec<Game>>;
    fn delete_many(&self, ids: &[Uuid]) -> AppResult<usize>;
}

pub struct SqliteGameRepository {
    pool: Arc<ConnectionPool>,
}

const SELECT_COLUMNS: &str = "id, path, platform, name, description, release_date, critic_score,
     user_score, genres, secondary_score, secondary_genres, thumbnail, poster, added_at";

impl SqliteGameRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn insert_game(conn: &Connection, game: &Game) -> AppResult<()> {
        let genres_json = serde_json::to_string(&game.info.genres)?;
        let secondary_genres_json = serde_json::to_string(&game.info.secondary_genres)?;

        conn.execute(
            "INSERT OR REPLACE INTO games (
                id, path, platform, name, description, release_date, critic_score,
                user_score, genres, secondary_score, secondary_genres, thumbnail, poster, added_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                game.id.to_string(),
                path_key(&game.path),
                game.platform.key(),
                game.info.name,
                game.info.description,
                game.info.release_date.map(|d| d.to_string()),
                game.info.critic_score,
                game.info.user_score,
                genres_json,
                game.info.secondary_score,
                secondary_genres_json,
                game.info.thumbnail,
                game.info.poster,
                game.added_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// Map database row to Game - returns rusqlite::Error for query_map compatibility
    fn row_to_game(row: &Row) -> Result<Game, rusqlite::Error> {
        let id = parse_uuid(0, &row.get::<_, String>("id")?)?;
        let path: String = row.get("path")?;

        let platform_str: String = row.get("platform")?;
        let platform = platform_str
            .parse::<GamePlatform>()
            .map_err(|e| conversion_error(2, e.to_string()))?;

        let release_date = row
            .get::<_, Option<String>>("release_date")?
            .map(|s| {
                s.parse::<NaiveDate>()
                    .map_err(|e| conversion_error(5, format!("Invalid release date '{}': {}", s, e)))
            })
            .transpose()?;

        let genres_json: String = row.get("genres")?;
        let genres: Vec<String> = serde_json::from_str(&genres_json)
            .map_err(|e| conversion_error(8, format!("Invalid genres '{}': {}", genres_json, e)))?;

        let secondary_genres_json: String = row.get("secondary_genres")?;
        let secondary_genres: Vec<String> = serde_json::from_str(&secondary_genres_json)
            .map_err(|e| {
                conversion_error(10, format!("Invalid genres '{}': {}", secondary_genres_json, e))
            })?;

        let added_at = parse_timestamp(13, &row.get::<_, String>("added_at")?)?;

        Ok(Game {
            id,
            path: PathBuf::from(path),
            platform,
            info: UnifiedGameInfo {
                name: row.get("name")?,
                description: row.get("description")?,
                release_date,
                critic_score: row.get("critic_score")?,
                user_score: row.get("user_score")?,
                genres,
                secondary_score: row.get("secondary_score")?,
                secondary_genres,
                thumbnail: row.get("thumbnail")?,
                poster: row.get("poster")?,
            },
            added_at,
        })
    }
}

impl GameRepository for SqliteGameRepository {
    fn save(&self, game: &Game) -> AppResult<()> {
        let conn = self.pool.get()?;
        Self::insert_game(&conn, game)
    }

    fn save_in_libraries(&self, game: &Game, library_ids: &[Uuid]) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        Self::insert_game(&tx, game)?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO library_games (library_id, game_id) VALUES (?1, ?2)",
            )?;
            for library_id in library_ids {
                stmt.execute(params![library_id.to_string(), game.id.to_string()])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Game>> {
        let conn = self.pool.get()?;
        let game = conn
            .query_row(
                &format!("SELECT {} FROM games WHERE id = ?1", SELECT_COLUMNS),
                params![id.to_string()],
                Self::row_to_game,
            )
            .optional()?;
        Ok(game)
    }

    fn get_by_path(&self, path: &Path) -> AppResult<Option<Game>> {
        let conn = self.pool.get()?;
        let game = conn
            .query_row(
                &format!("SELECT {} FROM games WHERE path = ?1", SELECT_COLUMNS),
                params![path_key(path)],
                Self::row_to_game,
            )
            .optional()?;
        Ok(game)
    }

    fn exists_for_path(&self, path: &Path) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM games WHERE path = ?1)",
            params![path_key(path)],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn list_all(&self) -> AppResult<Vec<Game>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM games ORDER BY name COLLATE NOCASE",
            SELECT_COLUMNS
        ))?;
        let games = stmt
            .query_map([], Self::row_to_game)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(games)
    }

    fn delete_many(&self, ids: &[Uuid]) -> AppResult<usize> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        let mut deleted = 0;
        {
            let mut stmt = tx.prepare("DELETE FROM games WHERE id = ?1")?;
            for id in ids {
                deleted += stmt.execute(params![id.to_string()])?;
            }
        }

        tx.commit()?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_memory_pool, initialize_database};

    fn repository() -> SqliteGameRepository {
        let pool = Arc::new(create_memory_pool().unwrap());
        initialize_database(&pool.get().unwrap()).unwrap();
        SqliteGameRepository::new(pool)
    }

    fn game(name: &str, path: &str) -> Game {
        let info = UnifiedGameInfo {
            name: name.to_string(),
            description: Some("A game".to_string()),
            release_date: NaiveDate::from_ymd_opt(2000, 6, 23),
            critic_score: Some(90.0),
            genres: vec!["RPG".to_string(), "Shooter".to_string()],
            secondary_genres: vec!["Action".to_string()],
            thumbnail: Some(vec![0xFF, 0xD8]),
            ..Default::default()
        };
        Game::new(info, PathBuf::from(path), GamePlatform::Pc)
    }

    #[test]
    fn test_save_and_load_preserves_every_field() {
        let repo = repository();
        let original = game("Deus Ex", "/games/Deus Ex");
        repo.save(&original).unwrap();

        let loaded = repo.get_by_id(original.id).unwrap().unwrap();
        assert_eq!(loaded.info, original.info);
        assert_eq!(loaded.path, original.path);
        assert_eq!(loaded.platform, GamePlatform::Pc);
    }

    #[test]
    fn test_exists_for_path() {
        let repo = repository();
        repo.save(&game("Thief", "/games/Thief")).unwrap();

        assert!(repo.exists_for_path(Path::new("/games/Thief")).unwrap());
        assert!(!repo.exists_for_path(Path::new("/games/Thief II")).unwrap());
        assert!(repo.get_by_path(Path::new("/games/Thief")).unwrap().is_some());
    }

    #[test]
    fn test_delete_many() {
        let repo = repository();
        let a = game("A", "/games/A");
        let b = game("B", "/games/B");
        let c = game("C", "/games/C");
        for g in [&a, &b, &c] {
            repo.save(g).unwrap();
        }

        let deleted = repo.delete_many(&[a.id, c.id]).unwrap();

        assert_eq!(deleted, 2);
        let remaining: Vec<String> = repo.list_all().unwrap().into_iter().map(|g| g.info.name).collect();
        assert_eq!(remaining, vec!["B".to_string()]);
    }

    #[test]
    fn test_save_in_libraries_is_all_or_nothing() {
        let repo = repository();
        let thief = game("Thief", "/games/Thief");

        // No such library: the link violates its foreign key, so the game row goes too
        let result = repo.save_in_libraries(&thief, &[Uuid::new_v4()]);

        assert!(result.is_err());
        assert!(!repo.exists_for_path(Path::new("/games/Thief")).unwrap());
    }
}
