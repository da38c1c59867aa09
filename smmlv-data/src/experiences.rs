//! CSV loader for experience record drafts.
//!
//! ## CSV Format
//!
//! Headers are matched by name; column order does not matter.
//!
//! | Column                 | Required | Notes |
//! |------------------------|----------|-------|
//! | `contract_number`      | yes      | |
//! | `contracting_entity`   | no       | |
//! | `contract_object`      | no       | |
//! | `start_date`           | no       | `YYYY-MM-DD` or `DD/MM/YYYY` |
//! | `termination_date`     | no       | `YYYY-MM-DD` or `DD/MM/YYYY` |
//! | `initial_value`        | no       | e.g. `5000000` or `5.000.000`; `,` is the decimal separator |
//! | `participation_percent`| no       | 0 to 100 |
//! | `additions`            | no       | `;`-separated amounts, e.g. `2500000;150000` |
//!
//! Numeric and date cells are kept as text. [`ExperienceDraft::apply_to`]
//! feeds them through the form setters, so a malformed number in a file is
//! coerced exactly like one typed by hand.
//!
//! ### Example
//!
//! ```csv
//! contract_number,contracting_entity,termination_date,initial_value,participation_percent,additions
//! OBRA-017,Gobernación,2023-12-31,5000000,50,2500000
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use smmlv_core::calculations::WageTable;
use smmlv_core::form::ExperienceForm;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExperienceLoadError {
    /// Bad structure, missing required column, etc.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    contract_number: String,
    #[serde(default)]
    contracting_entity: String,
    #[serde(default)]
    contract_object: String,
    #[serde(default)]
    start_date: String,
    #[serde(default)]
    termination_date: String,
    #[serde(default)]
    initial_value: String,
    #[serde(default)]
    participation_percent: String,
    #[serde(default)]
    additions: String,
}

/// One row of the experience CSV, still as raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperienceDraft {
    pub contract_number: String,
    pub contracting_entity: String,
    pub contract_object: String,
    pub start_date: String,
    pub termination_date: String,
    pub initial_value: String,
    pub participation_percent: String,
    pub additions: Vec<String>,
}

impl From<CsvRow> for ExperienceDraft {
    fn from(row: CsvRow) -> Self {
        let additions = row
            .additions
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            contract_number: row.contract_number,
            contracting_entity: row.contracting_entity,
            contract_object: row.contract_object,
            start_date: row.start_date,
            termination_date: row.termination_date,
            initial_value: row.initial_value,
            participation_percent: row.participation_percent,
            additions,
        }
    }
}

impl ExperienceDraft {
    /// Replays the draft onto a form, one setter per cell.
    pub fn apply_to(
        &self,
        form: &mut ExperienceForm,
    ) {
        form.set_contract_number(&self.contract_number);
        form.set_contracting_entity(&self.contracting_entity);
        form.set_contract_object(&self.contract_object);
        form.set_start_date(&self.start_date);
        form.set_termination_date(&self.termination_date);
        form.set_initial_value(&self.initial_value);
        form.set_participation_percent(&self.participation_percent);
        for amount in &self.additions {
            let id = form.add_addition();
            form.update_addition(id, amount);
        }
    }

    /// Opens a create form against `table` and applies the draft to it.
    pub fn into_form(
        &self,
        table: WageTable,
    ) -> ExperienceForm {
        let mut form = ExperienceForm::open_create(table);
        self.apply_to(&mut form);
        form
    }
}

/// Parse CSV text and return the drafts in file order.
pub fn load_from_str(input: &str) -> Result<Vec<ExperienceDraft>, ExperienceLoadError> {
    load_from_reader(input.as_bytes())
}

/// Parse CSV from any reader, e.g. stdin.
pub fn load_from_reader<R: Read>(input: R) -> Result<Vec<ExperienceDraft>, ExperienceLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input);

    reader
        .deserialize::<CsvRow>()
        .map(|result| {
            result
                .map(ExperienceDraft::from)
                .map_err(ExperienceLoadError::from)
        })
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<ExperienceDraft>, ExperienceLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ExperienceLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}
