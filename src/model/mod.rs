//! Canonical data model for scraped areas
//!
//! # Components
//!
//! - `HouseholdComposition` / `ChildCount`: the two closed axes of every table
//! - `Currency`: a non-negative dollar amount parsed from `$1,234.56` strings
//! - `Profile<R>`: a complete 12-cell household grid of wage or expense records
//! - `AreaKind` / `ResolvedArea`: classification of a detail page

mod area;
mod currency;
mod household;
mod profile;

pub use area::{AreaKind, ResolvedArea};
pub use currency::{Currency, CurrencyError};
pub use household::{
    grid_index, grid_slots, normalize_header_label, ChildCount, HouseholdComposition, GRID_SIZE,
};
pub use profile::{
    AreaExpenseProfile, AreaWageProfile, ExpenseRecord, GridRecord, Profile, ProfileError,
    WageRecord,
};
