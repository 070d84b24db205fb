//! Household axes shared by the wage and expense tables
//!
//! Both tables lay out their values as three consecutive blocks of four cells:
//! one block per household composition, one cell per child count.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of cells in a complete household grid (3 compositions x 4 child counts)
pub const GRID_SIZE: usize = HouseholdComposition::ALL.len() * ChildCount::ALL.len();

/// Adult count and working arrangement of a household
///
/// Variant order matches the column grouping order of the source tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HouseholdComposition {
    OneAdult,
    TwoAdultsOneWorking,
    TwoAdultsBothWorking,
}

impl HouseholdComposition {
    /// All compositions in table order
    pub const ALL: [Self; 3] = [
        Self::OneAdult,
        Self::TwoAdultsOneWorking,
        Self::TwoAdultsBothWorking,
    ];

    /// Position of this composition's block within a table row
    pub fn index(&self) -> usize {
        match self {
            Self::OneAdult => 0,
            Self::TwoAdultsOneWorking => 1,
            Self::TwoAdultsBothWorking => 2,
        }
    }

    /// The normalized header label the source page uses for this composition
    pub fn header_label(&self) -> &'static str {
        match self {
            Self::OneAdult => "1 adult",
            Self::TwoAdultsOneWorking => "2 adults (1 working)",
            Self::TwoAdultsBothWorking => "2 adults (both working)",
        }
    }

    /// Matches a normalized header label (see `normalize_header_label`)
    pub fn from_header_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.header_label() == label)
    }

    /// Converts the composition to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::OneAdult => "one adult",
            Self::TwoAdultsOneWorking => "two adults (one working)",
            Self::TwoAdultsBothWorking => "two adults (both working)",
        }
    }

    /// Parses a composition from its database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "one adult" => Some(Self::OneAdult),
            "two adults (one working)" => Some(Self::TwoAdultsOneWorking),
            "two adults (both working)" => Some(Self::TwoAdultsBothWorking),
            _ => None,
        }
    }
}

impl fmt::Display for HouseholdComposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::OneAdult => "1 Adult",
            Self::TwoAdultsOneWorking => "2 Adults (1 Working)",
            Self::TwoAdultsBothWorking => "2 Adults (Both Working)",
        };
        f.write_str(label)
    }
}

/// Normalizes a scraped header cell into a lookup key
///
/// Lowercases, collapses runs of whitespace, and guarantees exactly one space
/// before every opening parenthesis, so `"2 Adults(1 Working)"` and
/// `"2 adults\n  (1 working)"` both become `"2 adults (1 working)"`.
pub fn normalize_header_label(raw: &str) -> String {
    let collapsed = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut out = String::with_capacity(collapsed.len() + 2);
    for ch in collapsed.chars() {
        if ch == '(' && !out.is_empty() && !out.ends_with(' ') {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// Number of children in a household, 0 through 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ChildCount(u8);

impl ChildCount {
    /// All child counts in table order
    pub const ALL: [Self; 4] = [Self(0), Self(1), Self(2), Self(3)];

    /// Creates a child count, returning None outside 0..=3
    pub fn new(count: u8) -> Option<Self> {
        (count <= 3).then_some(Self(count))
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    /// Position of this child count within a composition block
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for ChildCount {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("child count must be 0..=3, got {}", value))
    }
}

impl From<ChildCount> for u8 {
    fn from(value: ChildCount) -> Self {
        value.0
    }
}

impl fmt::Display for ChildCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => f.write_str("0 children"),
            1 => f.write_str("1 child"),
            n => write!(f, "{} children", n),
        }
    }
}

/// Flattened grid position of a (composition, child count) pair
///
/// This is the index the value occupies in a 12-cell table row once the
/// leading label cell has been dropped.
pub fn grid_index(composition: HouseholdComposition, children: ChildCount) -> usize {
    composition.index() * ChildCount::ALL.len() + children.index()
}

/// Iterates every (composition, child count) pair in grid order
pub fn grid_slots() -> impl Iterator<Item = (HouseholdComposition, ChildCount)> {
    HouseholdComposition::ALL
        .into_iter()
        .flat_map(|c| ChildCount::ALL.into_iter().map(move |k| (c, k)))
}
