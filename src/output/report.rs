//! Fixed-width text reports for one area

use crate::model::{AreaExpenseProfile, AreaWageProfile, ChildCount, HouseholdComposition};

/// Average living wage of an area compared with its minimum wage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LivingWageGap {
    pub average_living_wage: f64,
    pub minimum_wage: f64,
}

impl LivingWageGap {
    pub fn new(average_living_wage: f64, minimum_wage: f64) -> Self {
        Self {
            average_living_wage,
            minimum_wage,
        }
    }

    /// Computes the gap from a complete wage profile
    pub fn from_profile(wages: &AreaWageProfile) -> Self {
        Self::new(wages.average_living_wage(), wages.minimum_wage().value())
    }

    /// Hourly amount by which the average living wage exceeds the minimum wage
    pub fn gap(&self) -> f64 {
        self.average_living_wage - self.minimum_wage
    }

    /// Average living wage as a multiple of the minimum wage
    pub fn ratio(&self) -> Option<f64> {
        (self.minimum_wage > 0.0).then(|| self.average_living_wage / self.minimum_wage)
    }
}

/// Formats a whole-dollar amount with thousands separators, e.g. `$27,284`
pub fn format_dollars(value: f64) -> String {
    let rounded = value.round() as u64;
    let digits = rounded.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${}", grouped)
}

/// Formats the hourly wage grid of an area
///
/// One line per household type with its living, poverty and minimum wage.
pub fn format_wage_table(area: &str, wages: &AreaWageProfile) -> String {
    let mut out = format!("{} - hourly wages\n", area);
    out.push_str(&format!(
        "{:<25} {:<11} {:>12} {:>12} {:>12}\n",
        "Household", "Children", "Living", "Poverty", "Minimum"
    ));
    out.push_str(&format!("{}\n", "-".repeat(76)));

    for record in wages.iter() {
        out.push_str(&format!(
            "{:<25} {:<11} {:>12} {:>12} {:>12}\n",
            record.composition.to_string(),
            record.children.to_string(),
            record.living_wage.to_string(),
            record.poverty_wage.to_string(),
            record.minimum_wage.to_string()
        ));
    }

    out
}

/// Formats the required annual income grid of an area
///
/// One line per household composition, one column per child count.
pub fn format_expense_table(area: &str, expenses: &AreaExpenseProfile) -> String {
    let mut out = format!("{} - required annual income before taxes\n", area);

    out.push_str(&format!("{:<25}", "Household"));
    for children in ChildCount::ALL {
        out.push_str(&format!(" {:>11}", children.to_string()));
    }
    out.push('\n');
    out.push_str(&format!("{}\n", "-".repeat(25 + 12 * ChildCount::ALL.len())));

    for composition in HouseholdComposition::ALL {
        out.push_str(&format!("{:<25}", composition.to_string()));
        for record in expenses.block(composition) {
            out.push_str(&format!(
                " {:>11}",
                format_dollars(record.required_annual_income.value())
            ));
        }
        out.push('\n');
    }

    out
}

/// Formats the living-wage gap as a one-line sentence
pub fn format_gap(area: &str, gap: &LivingWageGap) -> String {
    let mut line = format!(
        "{}: average living wage ${:.2}/h vs minimum wage ${:.2}/h, gap ${:.2}/h",
        area,
        gap.average_living_wage,
        gap.minimum_wage,
        gap.gap()
    );
    if let Some(ratio) = gap.ratio() {
        line.push_str(&format!(" ({:.2}x)", ratio));
    }
    line
}
