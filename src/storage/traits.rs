//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::model::{AreaExpenseProfile, AreaKind, AreaWageProfile, ResolvedArea};
use crate::storage::{AreaRecord, RunRecord, RunStatus};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Area not found: {0}")]
    AreaNotFound(String),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Incomplete {table} for area '{area}': {detail}")]
    Incomplete {
        area: String,
        table: &'static str,
        detail: String,
    },

    #[error("Invalid value '{value}' in column {column}")]
    InvalidValue { column: &'static str, value: String },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Area names are matched case-insensitively: they are stored lowercased and
/// every lookup lowercases its argument.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new scrape run
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration file
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Records the outcome of a run with a finish timestamp
    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        areas_ok: u64,
        areas_failed: u64,
    ) -> StorageResult<()>;

    // ===== Area Data =====

    /// Drops every stored area, wage and expense row
    fn reset(&mut self) -> StorageResult<()>;

    /// Stores one area with its complete wage and expense profiles
    ///
    /// All rows are written in one transaction; on error nothing is stored.
    ///
    /// # Arguments
    ///
    /// * `state` - Postal code of the state the area belongs to
    /// * `area` - The resolved area; its lowercased display name keys all rows
    /// * `wages` - The area's 12 wage records
    /// * `expenses` - The area's 12 expense records
    fn save_area_bundle(
        &mut self,
        state: &str,
        area: &ResolvedArea,
        wages: &AreaWageProfile,
        expenses: &AreaExpenseProfile,
    ) -> StorageResult<()>;

    /// Lists every stored area ordered by name
    fn list_areas(&self) -> StorageResult<Vec<AreaRecord>>;

    /// Gets one area by name
    fn get_area(&self, name: &str) -> StorageResult<Option<AreaRecord>>;

    /// Rebuilds the wage profile of an area
    ///
    /// Fails with `StorageError::Incomplete` unless exactly 12 valid rows exist.
    fn load_wages(&self, name: &str) -> StorageResult<AreaWageProfile>;

    /// Rebuilds the expense profile of an area
    ///
    /// Fails with `StorageError::Incomplete` unless exactly 12 valid rows exist.
    fn load_expenses(&self, name: &str) -> StorageResult<AreaExpenseProfile>;

    /// Mean living wage over an area's wage rows, `None` if it has none
    fn average_living_wage(&self, name: &str) -> StorageResult<Option<f64>>;

    // ===== Statistics =====

    /// Counts every stored area
    fn count_areas(&self) -> StorageResult<u64>;

    /// Counts stored areas of one kind
    fn count_areas_by_kind(&self, kind: AreaKind) -> StorageResult<u64>;
}
