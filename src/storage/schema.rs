//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Living-Wage database.

/// Run bookkeeping; survives every reset
pub const RUNS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL,
    areas_ok INTEGER NOT NULL DEFAULT 0,
    areas_failed INTEGER NOT NULL DEFAULT 0
);
"#;

/// Scraped data; dropped and recreated at the start of every scrape run
pub const AREA_TABLES_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS areas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    state TEXT NOT NULL,
    kind TEXT NOT NULL,
    name TEXT NOT NULL UNIQUE,
    display_name TEXT NOT NULL,
    url TEXT NOT NULL,
    index_key TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_areas_kind ON areas(kind);

CREATE TABLE IF NOT EXISTS wages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    area TEXT NOT NULL REFERENCES areas(name),
    composition TEXT NOT NULL,
    children INTEGER NOT NULL,
    living_wage REAL NOT NULL,
    poverty_wage REAL NOT NULL,
    minimum_wage REAL NOT NULL,
    UNIQUE(area, composition, children)
);

CREATE INDEX IF NOT EXISTS idx_wages_area ON wages(area);

CREATE TABLE IF NOT EXISTS expenses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    area TEXT NOT NULL REFERENCES areas(name),
    composition TEXT NOT NULL,
    children INTEGER NOT NULL,
    required_annual_income REAL NOT NULL,
    UNIQUE(area, composition, children)
);

CREATE INDEX IF NOT EXISTS idx_expenses_area ON expenses(area);
"#;

const DROP_AREA_TABLES_SQL: &str = r#"
DROP TABLE IF EXISTS expenses;
DROP TABLE IF EXISTS wages;
DROP TABLE IF EXISTS areas;
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(RUNS_SQL)?;
    conn.execute_batch(AREA_TABLES_SQL)?;
    Ok(())
}

/// Drops and recreates the area, wage and expense tables
pub fn reset_area_tables(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(DROP_AREA_TABLES_SQL)?;
    conn.execute_batch(AREA_TABLES_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn table_exists(conn: &Connection, table: &str) -> bool {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        count == 1
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize_schema(&conn).unwrap();
        let result = initialize_schema(&conn);

        assert!(result.is_ok());
    }

    #[test]
    fn test_tables_exist_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for table in ["runs", "areas", "wages", "expenses"] {
            assert!(table_exists(&conn, table), "Table {} should exist", table);
        }
    }

    #[test]
    fn test_reset_keeps_runs() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES ('now', 'abc', 'running')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO areas (state, kind, name, display_name, url, index_key)
             VALUES ('MI', 'county', 'kent', 'Kent', 'https://x/1', 'kent')",
            [],
        )
        .unwrap();

        reset_area_tables(&conn).unwrap();

        let runs: i64 = conn
            .query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))
            .unwrap();
        let areas: i64 = conn
            .query_row("SELECT COUNT(*) FROM areas", [], |row| row.get(0))
            .unwrap();
        assert_eq!(runs, 1);
        assert_eq!(areas, 0);
    }
}
