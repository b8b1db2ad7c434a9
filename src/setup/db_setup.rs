use rusqlite::Connection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
}

/// Creates the `contributions` table if it is missing. Safe to call repeatedly.
pub fn setup_contributions_db(conn: &Connection) -> Result<(), SetupError> {
    log::debug!("Ensuring 'contributions' table exists...");
    conn.execute(
        "CREATE TABLE IF NOT EXISTS contributions (
            contrib_id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT,
            title TEXT,
            description TEXT,
            category TEXT,
            language TEXT,
            lat REAL,
            lon REAL,
            media_url TEXT,
            timestamp TEXT
        )",
        [],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        setup_contributions_db(&conn).unwrap();
        setup_contributions_db(&conn).unwrap();

        let columns: Vec<String> = conn
            .prepare("SELECT name FROM pragma_table_info('contributions')")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            columns,
            vec![
                "contrib_id", "username", "title", "description", "category",
                "language", "lat", "lon", "media_url", "timestamp"
            ]
        );
    }
}
