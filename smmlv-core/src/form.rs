//! Form session for creating and editing experience records.
//!
//! The session owns the wage table snapshot, the contract details, the
//! financial inputs and the derived values. Every mutation of a financial
//! input reruns the derivation chain, so [`ExperienceForm::derived`] is
//! always current.
//!
//! When the termination date is cleared or becomes unparseable, the last
//! termination year that came from a valid date is kept. A session that has
//! never seen a valid date falls back to the current calendar year. Both the
//! create and the edit flow follow this rule.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

use crate::calculations::common::{coerce_decimal, parse_date, parse_optional_decimal};
use crate::calculations::derivation::current_year;
use crate::calculations::{DerivationChain, WageTable};
use crate::db::{ExperienceRepository, RepositoryError};
use crate::models::{
    AdditionId, ExperienceDetails, ExperienceRecord, FinancialDerived, FinancialInputs,
    NewExperienceRecord,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("required field '{0}' is empty")]
    MissingField(&'static str),

    #[error(transparent)]
    Store(#[from] RepositoryError),
}

/// Which flow opened the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { record_id: i64 },
}

#[derive(Debug, Clone)]
pub struct ExperienceForm {
    mode: FormMode,
    table: WageTable,
    details: ExperienceDetails,
    inputs: FinancialInputs,
    derived: FinancialDerived,
    /// Year from the last valid termination date, if any.
    last_known_year: Option<i32>,
}

impl ExperienceForm {
    /// Opens an empty form. `table` may still be empty if reference data has
    /// not arrived yet; see [`ExperienceForm::apply_wage_table`].
    pub fn open_create(table: WageTable) -> Self {
        let mut form = Self {
            mode: FormMode::Create,
            table,
            details: ExperienceDetails::default(),
            inputs: FinancialInputs::default(),
            derived: FinancialDerived::zeroed(current_year()),
            last_known_year: None,
        };
        form.recompute();
        form
    }

    /// Opens a form populated from a stored record. The stored derived
    /// values are discarded and recomputed against `table`.
    pub fn open_edit(
        record: &ExperienceRecord,
        table: WageTable,
    ) -> Self {
        let mut form = Self {
            mode: FormMode::Edit {
                record_id: record.id,
            },
            table,
            details: record.details.clone(),
            inputs: record.inputs.clone(),
            derived: record.derived,
            last_known_year: Some(record.derived.termination_year),
        };
        form.recompute();
        form
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn inputs(&self) -> &FinancialInputs {
        &self.inputs
    }

    pub fn derived(&self) -> &FinancialDerived {
        &self.derived
    }

    pub fn details(&self) -> &ExperienceDetails {
        &self.details
    }

    pub fn wage_table(&self) -> &WageTable {
        &self.table
    }

    // ── financial inputs ─────────────────────────────────────────────────

    pub fn set_initial_value(
        &mut self,
        raw: &str,
    ) {
        self.inputs.initial_value = coerce_decimal(raw);
        self.recompute();
    }

    /// Blank or unparseable text leaves the participation unset (zero).
    pub fn set_participation_percent(
        &mut self,
        raw: &str,
    ) {
        self.inputs.participation_percent = parse_optional_decimal(raw);
        self.recompute();
    }

    pub fn set_termination_date(
        &mut self,
        raw: &str,
    ) {
        self.inputs.termination_date = parse_date(raw);
        self.recompute();
    }

    pub fn add_addition(&mut self) -> AdditionId {
        let id = self.inputs.additions.add();
        self.recompute();
        id
    }

    pub fn remove_addition(
        &mut self,
        id: AdditionId,
    ) {
        self.inputs.additions.remove(id);
        self.recompute();
    }

    pub fn update_addition(
        &mut self,
        id: AdditionId,
        raw: &str,
    ) {
        self.update_addition_amount(id, coerce_decimal(raw));
    }

    pub fn update_addition_amount(
        &mut self,
        id: AdditionId,
        amount: Decimal,
    ) {
        self.inputs.additions.update(id, amount);
        self.recompute();
    }

    // ── contract details ─────────────────────────────────────────────────

    pub fn set_contract_number(
        &mut self,
        value: &str,
    ) {
        self.details.contract_number = value.trim().to_string();
    }

    pub fn set_contracting_entity(
        &mut self,
        value: &str,
    ) {
        self.details.contracting_entity = value.trim().to_string();
    }

    pub fn set_contract_object(
        &mut self,
        value: &str,
    ) {
        self.details.contract_object = value.trim().to_string();
    }

    pub fn set_start_date(
        &mut self,
        raw: &str,
    ) {
        self.details.start_date = parse_date(raw);
    }

    // ── lifecycle ────────────────────────────────────────────────────────

    /// Installs reference data that arrived after the form opened.
    pub fn apply_wage_table(
        &mut self,
        table: WageTable,
    ) {
        debug!(entries = table.len(), "wage table applied to form");
        self.table = table;
        self.recompute();
    }

    /// Closes the form: inputs, details and derived values return to their
    /// defaults and the session becomes a fresh create form. The wage table
    /// is kept.
    pub fn reset(&mut self) {
        self.mode = FormMode::Create;
        self.details = ExperienceDetails::default();
        self.inputs = FinancialInputs::default();
        self.last_known_year = None;
        self.recompute();
    }

    /// The record as it would be submitted, without touching any store.
    pub fn to_new_record(&self) -> NewExperienceRecord {
        NewExperienceRecord {
            details: self.details.clone(),
            inputs: self.inputs.clone(),
            derived: self.derived,
        }
    }

    /// Submits the form to `store` and resets it on success.
    ///
    /// # Errors
    /// * [`FormError::MissingField`] when the contract number is blank.
    /// * [`FormError::Store`] for any store failure; the form is left intact.
    pub async fn save<S: ExperienceRepository + ?Sized>(
        &mut self,
        store: &S,
    ) -> Result<ExperienceRecord, FormError> {
        if self.details.contract_number.is_empty() {
            return Err(FormError::MissingField("contract_number"));
        }

        let record = self.to_new_record();
        let saved = match self.mode {
            FormMode::Create => store.create_experience(record).await?,
            FormMode::Edit { record_id } => {
                let mut existing = store.get_experience(record_id).await?;
                existing.details = record.details;
                existing.inputs = record.inputs;
                existing.derived = record.derived;
                store.update_experience(&existing).await?
            }
        };

        info!(
            id = saved.id,
            contract = %saved.details.contract_number,
            current_value = %saved.derived.current_value,
            "experience saved"
        );
        self.reset();
        Ok(saved)
    }

    fn recompute(&mut self) {
        let fallback = self.last_known_year.unwrap_or_else(current_year);
        self.derived =
            DerivationChain::new(&self.table).compute_with_fallback_year(&self.inputs, fallback);
        if self.inputs.termination_date.is_some() {
            self.last_known_year = Some(self.derived.termination_year);
        }
    }
}
