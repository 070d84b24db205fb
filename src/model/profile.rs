//! Complete per-area household grids
//!
//! A profile holds exactly one record for every (composition, child count)
//! pair. It can only be built from a complete set, so consumers never have to
//! handle missing cells.

use crate::model::household::{grid_index, grid_slots, ChildCount, HouseholdComposition, GRID_SIZE};
use crate::model::Currency;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when records do not form a complete grid
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("expected 12 records, got {0}")]
    WrongCount(usize),

    #[error("duplicate record for {composition} with {children}")]
    Duplicate {
        composition: HouseholdComposition,
        children: ChildCount,
    },
}

/// A record that occupies one cell of a household grid
pub trait GridRecord {
    fn composition(&self) -> HouseholdComposition;
    fn children(&self) -> ChildCount;
}

/// Hourly wage figures for one household type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WageRecord {
    pub composition: HouseholdComposition,
    pub children: ChildCount,
    pub living_wage: Currency,
    pub poverty_wage: Currency,
    pub minimum_wage: Currency,
}

/// Required annual income before taxes for one household type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub composition: HouseholdComposition,
    pub children: ChildCount,
    pub required_annual_income: Currency,
}

impl GridRecord for WageRecord {
    fn composition(&self) -> HouseholdComposition {
        self.composition
    }

    fn children(&self) -> ChildCount {
        self.children
    }
}

impl GridRecord for ExpenseRecord {
    fn composition(&self) -> HouseholdComposition {
        self.composition
    }

    fn children(&self) -> ChildCount {
        self.children
    }
}

/// Exactly twelve records, stored composition-major in table order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile<R> {
    records: Vec<R>,
}

pub type AreaWageProfile = Profile<WageRecord>;
pub type AreaExpenseProfile = Profile<ExpenseRecord>;

impl<R: GridRecord> Profile<R> {
    /// Builds a profile from records in any order
    ///
    /// Fails unless every (composition, child count) pair appears exactly once.
    pub fn from_records(records: Vec<R>) -> Result<Self, ProfileError> {
        if records.len() != GRID_SIZE {
            return Err(ProfileError::WrongCount(records.len()));
        }

        let mut slots: Vec<Option<R>> = (0..GRID_SIZE).map(|_| None).collect();
        for record in records {
            let index = grid_index(record.composition(), record.children());
            if slots[index].is_some() {
                return Err(ProfileError::Duplicate {
                    composition: record.composition(),
                    children: record.children(),
                });
            }
            slots[index] = Some(record);
        }

        // Twelve records with no duplicates fill every slot
        Ok(Self {
            records: slots.into_iter().flatten().collect(),
        })
    }

    /// Builds a profile by computing each cell in grid order
    pub fn try_from_fn<E>(
        mut cell: impl FnMut(HouseholdComposition, ChildCount) -> Result<R, E>,
    ) -> Result<Self, E> {
        let records = grid_slots()
            .map(|(composition, children)| cell(composition, children))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Self { records })
    }

    pub fn get(&self, composition: HouseholdComposition, children: ChildCount) -> &R {
        &self.records[grid_index(composition, children)]
    }

    /// The four records of one composition block, ordered by child count
    pub fn block(&self, composition: HouseholdComposition) -> &[R] {
        let start = grid_index(composition, ChildCount::ALL[0]);
        &self.records[start..start + ChildCount::ALL.len()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl AreaWageProfile {
    /// Mean living wage over all twelve household types
    pub fn average_living_wage(&self) -> f64 {
        let total: f64 = self.records.iter().map(|r| r.living_wage.value()).sum();
        total / self.records.len() as f64
    }

    /// The minimum wage shown for households without children
    pub fn minimum_wage(&self) -> Currency {
        self.get(HouseholdComposition::OneAdult, ChildCount::ALL[0])
            .minimum_wage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(composition: HouseholdComposition, children: ChildCount, v: f64) -> ExpenseRecord {
        ExpenseRecord {
            composition,
            children,
            required_annual_income: Currency::new(v).unwrap(),
        }
    }

    fn all_expenses() -> Vec<ExpenseRecord> {
        grid_slots()
            .enumerate()
            .map(|(i, (c, k))| expense(c, k, 1000.0 * i as f64))
            .collect()
    }

    #[test]
    fn test_from_records_orders_by_grid() {
        let mut records = all_expenses();
        records.reverse();

        let profile = Profile::from_records(records).unwrap();
        assert_eq!(profile.len(), 12);
        for (i, record) in profile.iter().enumerate() {
            assert_eq!(grid_index(record.composition, record.children), i);
        }
    }

    #[test]
    fn test_from_records_rejects_short_set() {
        let mut records = all_expenses();
        records.pop();
        assert_eq!(
            Profile::from_records(records).unwrap_err(),
            ProfileError::WrongCount(11)
        );
    }

    #[test]
    fn test_from_records_rejects_duplicates() {
        let mut records = all_expenses();
        records[11] = records[0];
        assert!(matches!(
            Profile::from_records(records),
            Err(ProfileError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_get_and_block() {
        let profile = Profile::from_records(all_expenses()).unwrap();
        let cell = profile.get(HouseholdComposition::TwoAdultsOneWorking, ChildCount::ALL[2]);
        assert_eq!(cell.required_annual_income.value(), 6000.0);

        let block = profile.block(HouseholdComposition::TwoAdultsBothWorking);
        assert_eq!(block.len(), 4);
        assert_eq!(block[0].required_annual_income.value(), 8000.0);
        assert_eq!(block[3].required_annual_income.value(), 11000.0);
    }

    #[test]
    fn test_average_living_wage() {
        let profile = AreaWageProfile::try_from_fn(|composition, children| {
            Ok::<_, ProfileError>(WageRecord {
                composition,
                children,
                living_wage: Currency::new(10.0 + children.get() as f64).unwrap(),
                poverty_wage: Currency::new(5.0).unwrap(),
                minimum_wage: Currency::new(9.45).unwrap(),
            })
        })
        .unwrap();

        assert!((profile.average_living_wage() - 11.5).abs() < 1e-9);
        assert_eq!(profile.minimum_wage().value(), 9.45);
    }
}
