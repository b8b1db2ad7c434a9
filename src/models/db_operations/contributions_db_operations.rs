use crate::models::{Contribution, NewContribution};
use rusqlite::{params, Connection, Error as RusqliteError};

pub fn insert_contribution(
    conn: &Connection,
    contribution: &NewContribution,
) -> Result<(), RusqliteError> {
    conn.execute(
        "INSERT INTO contributions (username, title, description, category, language, lat, lon, media_url, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            contribution.username,
            contribution.title,
            contribution.description,
            contribution.category.as_str(),
            contribution.language,
            contribution.latitude,
            contribution.longitude,
            contribution.media_url,
            contribution.timestamp,
        ],
    )?;
    Ok(())
}

pub fn read_all_contributions(conn: &Connection) -> Result<Vec<Contribution>, RusqliteError> {
    let mut stmt = conn.prepare(
        "SELECT contrib_id, username, title, description, category, language, lat, lon, media_url, timestamp
         FROM contributions ORDER BY contrib_id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Contribution {
            id: row.get(0)?,
            username: row.get(1)?,
            title: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            description: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            category: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            language: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            latitude: row.get(6)?,
            longitude: row.get(7)?,
            media_url: row.get(8)?,
            timestamp: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
        })
    })?;

    rows.collect()
}

pub fn count_contributions(conn: &Connection) -> Result<i64, RusqliteError> {
    conn.query_row("SELECT COUNT(*) FROM contributions", [], |row| row.get(0))
}
