//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::model::{
    AreaExpenseProfile, AreaKind, AreaWageProfile, ChildCount, Currency, ExpenseRecord,
    GridRecord, HouseholdComposition, Profile, ResolvedArea, WageRecord,
};
use crate::storage::schema::{initialize_schema, reset_area_tables};
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{AreaRecord, RunRecord, RunStatus};
use crate::Result;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const RUN_COLUMNS: &str =
    "id, started_at, finished_at, config_hash, status, areas_ok, areas_failed";

const AREA_COLUMNS: &str = "id, state, kind, name, display_name, url, index_key";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(LivingWageError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Running),
        areas_ok: row.get::<_, i64>(5)? as u64,
        areas_failed: row.get::<_, i64>(6)? as u64,
    })
}

/// Raw area row; the kind is validated after the query
struct AreaRow {
    id: i64,
    state: String,
    kind: String,
    name: String,
    display_name: String,
    url: String,
    index_key: String,
}

impl AreaRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            state: row.get(1)?,
            kind: row.get(2)?,
            name: row.get(3)?,
            display_name: row.get(4)?,
            url: row.get(5)?,
            index_key: row.get(6)?,
        })
    }

    fn into_record(self) -> StorageResult<AreaRecord> {
        let kind = AreaKind::from_db_string(&self.kind).ok_or(StorageError::InvalidValue {
            column: "areas.kind",
            value: self.kind.clone(),
        })?;

        Ok(AreaRecord {
            id: self.id,
            state: self.state,
            kind,
            name: self.name,
            display_name: self.display_name,
            url: self.url,
            index_key: self.index_key,
        })
    }
}

fn composition_from_db(value: String) -> StorageResult<HouseholdComposition> {
    HouseholdComposition::from_db_string(&value).ok_or(StorageError::InvalidValue {
        column: "composition",
        value,
    })
}

fn children_from_db(value: i64) -> StorageResult<ChildCount> {
    u8::try_from(value)
        .ok()
        .and_then(ChildCount::new)
        .ok_or(StorageError::InvalidValue {
            column: "children",
            value: value.to_string(),
        })
}

fn currency_from_db(column: &'static str, value: f64) -> StorageResult<Currency> {
    Currency::new(value).map_err(|_| StorageError::InvalidValue {
        column,
        value: value.to_string(),
    })
}

/// Builds a profile from loaded rows, reporting anything short of a full grid
fn complete_profile<R: GridRecord>(
    area: &str,
    table: &'static str,
    records: Vec<R>,
) -> StorageResult<Profile<R>> {
    Profile::from_records(records).map_err(|e| StorageError::Incomplete {
        area: area.to_string(),
        table,
        detail: e.to_string(),
    })
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        let run = self
            .conn
            .query_row(
                &format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS),
                params![run_id],
                run_from_row,
            )
            .optional()?;

        run.ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                &format!("SELECT {} FROM runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS),
                [],
                run_from_row,
            )
            .optional()?;

        Ok(run)
    }

    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        areas_ok: u64,
        areas_failed: u64,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, areas_ok = ?3, areas_failed = ?4
             WHERE id = ?5",
            params![
                status.to_db_string(),
                now,
                areas_ok as i64,
                areas_failed as i64,
                run_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Area Data =====

    fn reset(&mut self) -> StorageResult<()> {
        reset_area_tables(&self.conn)?;
        tracing::debug!("Cleared stored areas, wages and expenses");
        Ok(())
    }

    fn save_area_bundle(
        &mut self,
        state: &str,
        area: &ResolvedArea,
        wages: &AreaWageProfile,
        expenses: &AreaExpenseProfile,
    ) -> StorageResult<()> {
        let name = area.key();
        let tx = self.conn.transaction()?;

        // A second index entry resolving to the same name replaces the first
        tx.execute("DELETE FROM expenses WHERE area = ?1", params![name])?;
        tx.execute("DELETE FROM wages WHERE area = ?1", params![name])?;
        let replaced = tx.execute("DELETE FROM areas WHERE name = ?1", params![name])?;
        if replaced > 0 {
            tracing::warn!("Replacing previously stored area '{}'", area.display_name);
        }

        tx.execute(
            "INSERT INTO areas (state, kind, name, display_name, url, index_key)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                state,
                area.kind.to_db_string(),
                name,
                area.display_name,
                area.url,
                area.index_key
            ],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO wages
                 (area, composition, children, living_wage, poverty_wage, minimum_wage)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for record in wages.iter() {
                stmt.execute(params![
                    name,
                    record.composition.to_db_string(),
                    record.children.get(),
                    record.living_wage.value(),
                    record.poverty_wage.value(),
                    record.minimum_wage.value()
                ])?;
            }
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO expenses (area, composition, children, required_annual_income)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for record in expenses.iter() {
                stmt.execute(params![
                    name,
                    record.composition.to_db_string(),
                    record.children.get(),
                    record.required_annual_income.value()
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn list_areas(&self) -> StorageResult<Vec<AreaRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM areas ORDER BY name", AREA_COLUMNS))?;

        let rows = stmt
            .query_map([], AreaRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(AreaRow::into_record).collect()
    }

    fn get_area(&self, name: &str) -> StorageResult<Option<AreaRecord>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {} FROM areas WHERE name = ?1", AREA_COLUMNS),
                params![name.trim().to_lowercase()],
                AreaRow::from_row,
            )
            .optional()?;

        row.map(AreaRow::into_record).transpose()
    }

    fn load_wages(&self, name: &str) -> StorageResult<AreaWageProfile> {
        let name = name.trim().to_lowercase();
        let mut stmt = self.conn.prepare(
            "SELECT composition, children, living_wage, poverty_wage, minimum_wage
             FROM wages WHERE area = ?1",
        )?;

        let rows = stmt
            .query_map(params![name], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, f64>(4)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let records = rows
            .into_iter()
            .map(|(composition, children, living, poverty, minimum)| {
                Ok(WageRecord {
                    composition: composition_from_db(composition)?,
                    children: children_from_db(children)?,
                    living_wage: currency_from_db("living_wage", living)?,
                    poverty_wage: currency_from_db("poverty_wage", poverty)?,
                    minimum_wage: currency_from_db("minimum_wage", minimum)?,
                })
            })
            .collect::<StorageResult<Vec<_>>>()?;

        complete_profile(&name, "wages", records)
    }

    fn load_expenses(&self, name: &str) -> StorageResult<AreaExpenseProfile> {
        let name = name.trim().to_lowercase();
        let mut stmt = self.conn.prepare(
            "SELECT composition, children, required_annual_income
             FROM expenses WHERE area = ?1",
        )?;

        let rows = stmt
            .query_map(params![name], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let records = rows
            .into_iter()
            .map(|(composition, children, income)| {
                Ok(ExpenseRecord {
                    composition: composition_from_db(composition)?,
                    children: children_from_db(children)?,
                    required_annual_income: currency_from_db("required_annual_income", income)?,
                })
            })
            .collect::<StorageResult<Vec<_>>>()?;

        complete_profile(&name, "expenses", records)
    }

    fn average_living_wage(&self, name: &str) -> StorageResult<Option<f64>> {
        let average: Option<f64> = self.conn.query_row(
            "SELECT AVG(living_wage) FROM wages WHERE area = ?1",
            params![name.trim().to_lowercase()],
            |row| row.get(0),
        )?;
        Ok(average)
    }

    // ===== Statistics =====

    fn count_areas(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM areas", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_areas_by_kind(&self, kind: AreaKind) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM areas WHERE kind = ?1",
            params![kind.to_db_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
