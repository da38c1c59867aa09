//! Derivation chain for experience financial values.
//!
//! # Chain Structure
//!
//! Every field is computed in this fixed order and may only read the root
//! inputs and the fields above it:
//!
//! | Step | Field | Formula |
//! |------|-------|---------|
//! | 1    | termination year | year of the termination date |
//! | 2    | final affected value | initial value + Σ additions |
//! | 3    | SMMLV value | step 2 ÷ minimum wage of the step 1 year (0 if unknown) |
//! | 4    | SMMLV × participation | step 3 × participation ÷ 100 |
//! | 5    | current value | step 4 × minimum wage of the latest year |
//!
//! The chain never fails. Unknown wage years, an empty table and decimal
//! overflow all produce zero for the affected field.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use smmlv_core::calculations::{AdditionList, DerivationChain, WageTable};
//! use smmlv_core::{FinancialInputs, WageEntry};
//!
//! let table = WageTable::new(vec![
//!     WageEntry::new(2023, dec!(1000000)),
//!     WageEntry::new(2024, dec!(1300000)),
//! ]);
//!
//! let inputs = FinancialInputs {
//!     initial_value: dec!(5000000),
//!     participation_percent: Some(dec!(50)),
//!     termination_date: NaiveDate::from_ymd_opt(2023, 12, 31),
//!     additions: vec![dec!(2500000)].into_iter().collect::<AdditionList>(),
//! };
//!
//! let derived = DerivationChain::new(&table).compute(&inputs);
//!
//! assert_eq!(derived.termination_year, 2023);
//! assert_eq!(derived.final_affected_value, dec!(7500000));
//! assert_eq!(derived.wage_unit_value, dec!(7.5));
//! assert_eq!(derived.participation_wage_unit_value, dec!(3.75));
//! assert_eq!(derived.current_value, dec!(4875000));
//! ```

use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::or_zero;
use crate::calculations::{AdditionList, WageTable};
use crate::{FinancialDerived, FinancialInputs};

/// Computes the derived values with the current calendar year as the
/// fallback termination year.
pub fn compute(
    inputs: &FinancialInputs,
    table: &WageTable,
) -> FinancialDerived {
    DerivationChain::new(table).compute(inputs)
}

/// Current calendar year in local time.
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Calculator bound to one wage table snapshot.
#[derive(Debug, Clone, Copy)]
pub struct DerivationChain<'a> {
    table: &'a WageTable,
}

impl<'a> DerivationChain<'a> {
    pub fn new(table: &'a WageTable) -> Self {
        Self { table }
    }

    /// Runs the chain, using the current calendar year when the termination
    /// date is unset.
    pub fn compute(
        &self,
        inputs: &FinancialInputs,
    ) -> FinancialDerived {
        self.compute_with_fallback_year(inputs, current_year())
    }

    /// Runs the chain. `fallback_year` is used as the termination year when
    /// the termination date is unset; the form session passes the last
    /// known good year here.
    pub fn compute_with_fallback_year(
        &self,
        inputs: &FinancialInputs,
        fallback_year: i32,
    ) -> FinancialDerived {
        let termination_year = self.termination_year(inputs.termination_date, fallback_year);

        let final_affected_value =
            self.final_affected_value(inputs.initial_value, &inputs.additions);

        let wage_unit_value = self.wage_unit_value(final_affected_value, termination_year);

        let participation_wage_unit_value =
            self.participation_wage_unit_value(wage_unit_value, inputs.participation_percent);

        let current_value = self.current_value(participation_wage_unit_value);

        debug!(
            termination_year,
            %final_affected_value,
            %wage_unit_value,
            %participation_wage_unit_value,
            %current_value,
            "derived values recomputed"
        );

        // Trailing zeros from the arithmetic are dropped so stored values
        // are canonical ("7.5", not "7.50").
        FinancialDerived {
            termination_year,
            final_affected_value: final_affected_value.normalize(),
            wage_unit_value: wage_unit_value.normalize(),
            participation_wage_unit_value: participation_wage_unit_value.normalize(),
            current_value: current_value.normalize(),
        }
    }

    /// Step 1.
    fn termination_year(
        &self,
        termination_date: Option<NaiveDate>,
        fallback_year: i32,
    ) -> i32 {
        termination_date.map_or(fallback_year, |date| date.year())
    }

    /// Step 2.
    fn final_affected_value(
        &self,
        initial_value: Decimal,
        additions: &AdditionList,
    ) -> Decimal {
        or_zero(
            initial_value.checked_add(additions.total()),
            "final_affected_value",
        )
    }

    /// Step 3. Zero when the year has no wage entry or the entry is zero.
    fn wage_unit_value(
        &self,
        final_affected_value: Decimal,
        termination_year: i32,
    ) -> Decimal {
        match self.table.amount_for_year(termination_year) {
            Some(wage) if !wage.is_zero() => {
                or_zero(final_affected_value.checked_div(wage), "wage_unit_value")
            }
            _ => Decimal::ZERO,
        }
    }

    /// Step 4. A blank participation counts as zero.
    fn participation_wage_unit_value(
        &self,
        wage_unit_value: Decimal,
        participation_percent: Option<Decimal>,
    ) -> Decimal {
        let percent = participation_percent.unwrap_or(Decimal::ZERO);
        let share = or_zero(
            percent.checked_div(Decimal::ONE_HUNDRED),
            "participation_share",
        );
        or_zero(
            wage_unit_value.checked_mul(share),
            "participation_wage_unit_value",
        )
    }

    /// Step 5.
    fn current_value(
        &self,
        participation_wage_unit_value: Decimal,
    ) -> Decimal {
        or_zero(
            participation_wage_unit_value.checked_mul(self.table.latest_amount()),
            "current_value",
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::WageEntry;

    fn test_table() -> WageTable {
        WageTable::new(vec![
            WageEntry::new(2022, dec!(1000000)),
            WageEntry::new(2023, dec!(1000000)),
            WageEntry::new(2024, dec!(1300000)),
        ])
    }

    fn test_inputs() -> FinancialInputs {
        FinancialInputs {
            initial_value: dec!(5000000),
            participation_percent: Some(dec!(50)),
            termination_date: NaiveDate::from_ymd_opt(2023, 12, 31),
            additions: vec![dec!(2500000)].into_iter().collect(),
        }
    }

    // =========================================================================
    // step tests
    // =========================================================================

    #[test]
    fn termination_year_extracted_from_date() {
        let table = test_table();
        let chain = DerivationChain::new(&table);

        let year = chain.termination_year(NaiveDate::from_ymd_opt(2023, 12, 31), 1999);

        assert_eq!(year, 2023);
    }

    #[test]
    fn termination_year_uses_fallback_when_unset() {
        let table = test_table();
        let chain = DerivationChain::new(&table);

        assert_eq!(chain.termination_year(None, 2021), 2021);
    }

    #[test]
    fn final_affected_value_without_additions_is_initial_value() {
        let table = test_table();
        let chain = DerivationChain::new(&table);

        let result = chain.final_affected_value(dec!(5000000), &AdditionList::new());

        assert_eq!(result, dec!(5000000));
    }

    #[test]
    fn wage_unit_value_divides_by_termination_year_wage() {
        let table = test_table();
        let chain = DerivationChain::new(&table);

        assert_eq!(chain.wage_unit_value(dec!(7500000), 2023), dec!(7.5));
    }

    #[test]
    fn wage_unit_value_zero_for_zero_wage_entry() {
        let table = WageTable::new(vec![WageEntry::new(2023, Decimal::ZERO)]);
        let chain = DerivationChain::new(&table);

        assert_eq!(chain.wage_unit_value(dec!(7500000), 2023), Decimal::ZERO);
    }

    #[test]
    fn participation_blank_counts_as_zero() {
        let table = test_table();
        let chain = DerivationChain::new(&table);

        assert_eq!(
            chain.participation_wage_unit_value(dec!(7.5), None),
            Decimal::ZERO
        );
    }

    #[test]
    fn current_value_uses_latest_wage() {
        let table = test_table();
        let chain = DerivationChain::new(&table);

        assert_eq!(chain.current_value(dec!(3.75)), dec!(4875000));
    }

    #[test]
    fn overflowing_values_collapse_to_zero() {
        let table = test_table();
        let chain = DerivationChain::new(&table);

        let result = chain.final_affected_value(
            Decimal::MAX,
            &vec![Decimal::MAX].into_iter().collect::<AdditionList>(),
        );

        assert_eq!(result, Decimal::ZERO);
    }

    // =========================================================================
    // compute (integration) tests
    // =========================================================================

    #[test]
    fn compute_full_chain() {
        let table = test_table();

        let derived = DerivationChain::new(&table).compute_with_fallback_year(&test_inputs(), 2000);

        assert_eq!(
            derived,
            FinancialDerived {
                termination_year: 2023,
                final_affected_value: dec!(7500000),
                wage_unit_value: dec!(7.5),
                participation_wage_unit_value: dec!(3.75),
                current_value: dec!(4875000),
            }
        );
    }

    #[test]
    fn compute_is_idempotent() {
        let table = test_table();
        let inputs = test_inputs();
        let chain = DerivationChain::new(&table);

        let first = chain.compute_with_fallback_year(&inputs, 2000);
        let second = chain.compute_with_fallback_year(&inputs, 2000);

        assert_eq!(first, second);
        // Bit-identical, including the decimal scale.
        assert_eq!(first.wage_unit_value.serialize(), second.wage_unit_value.serialize());
        assert_eq!(first.current_value.serialize(), second.current_value.serialize());
    }

    #[test]
    fn compute_drops_trailing_zeros() {
        let table = test_table();

        let derived = DerivationChain::new(&table).compute_with_fallback_year(&test_inputs(), 2000);

        assert_eq!(derived.wage_unit_value.to_string(), "7.5");
        assert_eq!(derived.current_value.to_string(), "4875000");
        assert_eq!(derived.current_value.scale(), 0);
    }

    #[test]
    fn compute_addition_sum_matches_final_affected_value() {
        let table = test_table();
        let amounts = [dec!(1), dec!(-250000.75), dec!(3300000), dec!(0.25)];
        let mut inputs = test_inputs();
        inputs.additions = amounts.iter().copied().collect();

        let derived = compute(&inputs, &table);

        let sum: Decimal = amounts.iter().sum();
        assert_eq!(derived.final_affected_value - inputs.initial_value, sum);
    }

    #[test]
    fn compute_with_empty_table_yields_zero_current_value() {
        let table = WageTable::empty();

        let derived = compute(&test_inputs(), &table);

        assert_eq!(derived.final_affected_value, dec!(7500000));
        assert_eq!(derived.wage_unit_value, Decimal::ZERO);
        assert_eq!(derived.current_value, Decimal::ZERO);
    }

    #[test]
    fn compute_all_zero_inputs() {
        let table = test_table();

        for percent in [None, Some(dec!(0)), Some(dec!(50)), Some(dec!(100))] {
            let inputs = FinancialInputs {
                initial_value: Decimal::ZERO,
                participation_percent: percent,
                termination_date: NaiveDate::from_ymd_opt(2023, 6, 1),
                additions: AdditionList::new(),
            };

            let derived = compute(&inputs, &table);

            assert_eq!(derived.final_affected_value, Decimal::ZERO);
            assert_eq!(derived.wage_unit_value, Decimal::ZERO);
            assert_eq!(derived.current_value, Decimal::ZERO);
        }
    }

    #[test]
    fn compute_missing_wage_year_gives_zero_wage_units() {
        let table = test_table();
        let mut inputs = test_inputs();
        inputs.termination_date = NaiveDate::from_ymd_opt(2015, 3, 1);

        let derived = compute(&inputs, &table);

        assert_eq!(derived.termination_year, 2015);
        assert_eq!(derived.final_affected_value, dec!(7500000));
        assert_eq!(derived.wage_unit_value, Decimal::ZERO);
        assert_eq!(derived.participation_wage_unit_value, Decimal::ZERO);
        assert_eq!(derived.current_value, Decimal::ZERO);
    }

    #[test]
    fn compute_participation_is_monotonic() {
        let table = test_table();
        let mut inputs = test_inputs();
        let mut previous = Decimal::MIN;

        for step in 0..=40 {
            inputs.participation_percent = Some(Decimal::new(step * 25, 1));

            let derived = compute(&inputs, &table);

            assert!(derived.wage_unit_value > Decimal::ZERO);
            assert!(derived.participation_wage_unit_value >= previous);
            previous = derived.participation_wage_unit_value;
        }
    }
}
