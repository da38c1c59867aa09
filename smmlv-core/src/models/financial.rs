use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::AdditionList;

/// User-editable financial values of an experience record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialInputs {
    /// Base contract value.
    pub initial_value: Decimal,

    /// Share of the contract held by the company, 0 to 100.
    /// `None` means the field is blank and counts as zero.
    pub participation_percent: Option<Decimal>,

    /// Contract end date. `None` while blank or unparseable.
    pub termination_date: Option<NaiveDate>,

    /// Contract additions, in the order they were entered.
    pub additions: AdditionList,
}

/// Values computed from [`FinancialInputs`] and a wage table.
///
/// Never edited directly; see [`crate::calculations::DerivationChain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialDerived {
    pub termination_year: i32,

    /// Initial value plus every addition.
    pub final_affected_value: Decimal,

    /// Final affected value expressed in minimum wages of the termination year.
    pub wage_unit_value: Decimal,

    /// Wage units scaled by the participation percentage.
    pub participation_wage_unit_value: Decimal,

    /// Participation wage units converted back to money at the latest wage.
    pub current_value: Decimal,
}

impl FinancialDerived {
    /// All-zero values for the given termination year.
    pub fn zeroed(termination_year: i32) -> Self {
        Self {
            termination_year,
            final_affected_value: Decimal::ZERO,
            wage_unit_value: Decimal::ZERO,
            participation_wage_unit_value: Decimal::ZERO,
            current_value: Decimal::ZERO,
        }
    }
}
