use crate::models::db_operations::contributions_db_operations;
use crate::models::{Contribution, NewContribution};
use crate::setup::db_setup::{self, SetupError};
use crate::DbPool;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("Database setup failed: {0}")]
    Setup(#[from] SetupError),
    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

/// The contributions store. Every call checks out one pooled connection,
/// runs a single statement and hands the connection back.
#[derive(Clone)]
pub struct Storage {
    pool: DbPool,
    path: PathBuf,
}

impl Storage {
    pub fn open(db_path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder().build(manager)?;
        Ok(Storage {
            pool,
            path: db_path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn initialize(&self) -> Result<(), StorageError> {
        let conn = self.pool.get()?;
        db_setup::setup_contributions_db(&conn)?;
        Ok(())
    }

    pub fn insert(&self, contribution: &NewContribution) -> Result<(), StorageError> {
        let conn = self.pool.get()?;
        contributions_db_operations::insert_contribution(&conn, contribution)?;
        Ok(())
    }

    pub fn list_all(&self) -> Result<Vec<Contribution>, StorageError> {
        let conn = self.pool.get()?;
        Ok(contributions_db_operations::read_all_contributions(&conn)?)
    }

    pub fn count(&self) -> Result<i64, StorageError> {
        let conn = self.pool.get()?;
        Ok(contributions_db_operations::count_contributions(&conn)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use tempfile::TempDir;

    fn open_storage(dir: &TempDir) -> Storage {
        let storage = Storage::open(&dir.path().join("db").join("heritage.db")).unwrap();
        storage.initialize().unwrap();
        storage
    }

    fn sample(n: usize) -> NewContribution {
        NewContribution {
            username: if n % 2 == 0 { Some(format!("user{}", n)) } else { None },
            title: format!("Title {}", n),
            description: format!("Description number {}", n),
            category: Category::ALL[n % 4],
            language: "en".to_string(),
            latitude: -89.999999 + n as f64,
            longitude: 179.123456 - n as f64,
            media_url: if n % 3 == 0 { Some(format!("uploads/20240101000000_{}.png", n)) } else { None },
            timestamp: format!("2024-01-01T00:00:{:02}.000000", n),
        }
    }

    #[test]
    fn initialize_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let storage = open_storage(&dir);
        storage.initialize().unwrap();
        assert!(storage.list_all().unwrap().is_empty());
    }

    #[test]
    fn lists_every_inserted_row_unchanged() {
        let dir = TempDir::new().unwrap();
        let storage = open_storage(&dir);
        let inserted: Vec<NewContribution> = (0..7).map(sample).collect();
        for c in &inserted {
            storage.insert(c).unwrap();
        }

        let rows = storage.list_all().unwrap();
        assert_eq!(rows.len(), inserted.len());
        assert_eq!(storage.count().unwrap(), 7);
        for (row, expected) in rows.iter().zip(&inserted) {
            assert_eq!(row.username, expected.username);
            assert_eq!(row.title, expected.title);
            assert_eq!(row.description, expected.description);
            assert_eq!(row.category, expected.category.as_str());
            assert_eq!(row.language, expected.language);
            assert_eq!(row.latitude, expected.latitude);
            assert_eq!(row.longitude, expected.longitude);
            assert_eq!(row.media_url, expected.media_url);
            assert_eq!(row.timestamp, expected.timestamp);
        }
    }

    #[test]
    fn identifiers_increase_with_each_insert() {
        let dir = TempDir::new().unwrap();
        let storage = open_storage(&dir);
        for n in 0..3 {
            storage.insert(&sample(n)).unwrap();
        }
        let ids: Vec<i64> = storage.list_all().unwrap().iter().map(|c| c.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn insert_without_schema_fails() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(&dir.path().join("bare.db")).unwrap();
        assert!(matches!(storage.insert(&sample(1)), Err(StorageError::Rusqlite(_))));
    }
}
