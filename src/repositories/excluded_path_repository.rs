// src/repositories/excluded_path_repository.rs

use rusqlite::{params, Row};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::ExcludedPath;
use crate::error::AppResult;
use crate::repositories::{parse_timestamp, parse_uuid, path_key};

pub trait ExcludedPathRepository: Send + Sync {
    /// Recording the same path twice is a no-op
    fn save(&self, excluded: &ExcludedPath) -> AppResult<()>;
    fn exists_for_path(&self, path: &Path) -> AppResult<bool>;
    fn list_all(&self) -> AppResult<Vec<ExcludedPath>>;
    fn delete_for_path(&self, path: &Path) -> AppResult<bool>;
}

pub struct SqliteExcludedPathRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteExcludedPathRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_excluded_path(row: &Row) -> Result<ExcludedPath, rusqlite::Error> {
        let path: String = row.get(1)?;
        Ok(ExcludedPath {
            id: parse_uuid(0, &row.get::<_, String>(0)?)?,
            path: PathBuf::from(path),
            created_at: parse_timestamp(2, &row.get::<_, String>(2)?)?,
        })
    }
}

impl ExcludedPathRepository for SqliteExcludedPathRepository {
    fn save(&self, excluded: &ExcludedPath) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR IGNORE INTO excluded_paths (id, path, created_at) VALUES (?1, ?2, ?3)",
            params![
                excluded.id.to_string(),
                path_key(&excluded.path),
                excluded.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn exists_for_path(&self, path: &Path) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM excluded_paths WHERE path = ?1)",
            params![path_key(path)],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn list_all(&self) -> AppResult<Vec<ExcludedPath>> {
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare("SELECT id, path, created_at FROM excluded_paths ORDER BY path")?;
        let paths = stmt
            .query_map([], Self::row_to_excluded_path)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(paths)
    }

    fn delete_for_path(&self, path: &Path) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let affected = conn.execute(
            "DELETE FROM excluded_paths WHERE path = ?1",
            params![path_key(path)],
        )?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_memory_pool, initialize_database};

    fn repository() -> SqliteExcludedPathRepository {
        let pool = Arc::new(create_memory_pool().unwrap());
        initialize_database(&pool.get().unwrap()).unwrap();
        SqliteExcludedPathRepository::new(pool)
    }

    #[test]
    fn test_exclusion_is_idempotent() {
        let repo = repository();
        repo.save(&ExcludedPath::new(PathBuf::from("/games/Patches"))).unwrap();
        repo.save(&ExcludedPath::new(PathBuf::from("/games/Patches"))).unwrap();

        assert!(repo.exists_for_path(Path::new("/games/Patches")).unwrap());
        assert_eq!(repo.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_for_path() {
        let repo = repository();
        repo.save(&ExcludedPath::new(PathBuf::from("/games/Patches"))).unwrap();

        assert!(repo.delete_for_path(Path::new("/games/Patches")).unwrap());
        assert!(!repo.delete_for_path(Path::new("/games/Patches")).unwrap());
        assert!(!repo.exists_for_path(Path::new("/games/Patches")).unwrap());
    }
}
