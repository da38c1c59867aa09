//! Command implementations behind the `smmlv` binary.

use std::fmt::{self, Display};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use smmlv_core::calculations::{
    ExpirationMonitor, ExpirationNotice, ExpirationStatus, FolderExpirationSummary, WageTable,
};
use smmlv_core::db::{StoreConfig, StoreRegistry, load_wage_table};
use smmlv_core::form::{ExperienceForm, FormError};
use smmlv_core::{ExperienceRecord, ExperienceStore, FinancialDerived, FinancialInputs};
use smmlv_data::{ExperienceDraft, WageTableLoader, documents};
use tracing::{info, warn};

use crate::utils::{format_currency, format_grouped, format_optional_wage, format_wage_units};

pub async fn open_store(config: &StoreConfig) -> Result<Box<dyn ExperienceStore>> {
    StoreRegistry::builtin()
        .open(config)
        .await
        .with_context(|| format!("cannot open '{}' store", config.backend))
}

/// Loads the wage CSV into the store and returns the resulting snapshot.
/// Without a path the store's current contents are used as-is.
pub async fn load_reference_data(
    store: &dyn ExperienceStore,
    wages_csv: Option<&Path>,
) -> Result<WageTable> {
    if let Some(path) = wages_csv {
        let entries = WageTableLoader::parse_file(path)
            .with_context(|| format!("failed to parse wage table: {}", path.display()))?;
        WageTableLoader::load(store, &entries)
            .await
            .context("failed to store wage table")?;
    }
    let table = load_wage_table(store)
        .await
        .context("failed to read wage table")?;
    if table.is_empty() {
        warn!("minimum wage table is empty; SMMLV values will be zero");
    }
    Ok(table)
}

// ─── compute ────────────────────────────────────────────────────────────────

/// Raw values for a one-off computation, exactly as typed.
#[derive(Debug, Clone, Default)]
pub struct ComputeRequest {
    pub initial_value: String,
    pub additions: Vec<String>,
    pub participation_percent: String,
    pub termination_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComputeOutput {
    pub inputs: FinancialInputs,
    pub derived: FinancialDerived,
}

pub fn compute(
    request: &ComputeRequest,
    table: WageTable,
) -> ComputeOutput {
    let draft = ExperienceDraft {
        initial_value: request.initial_value.clone(),
        additions: request.additions.clone(),
        participation_percent: request.participation_percent.clone(),
        termination_date: request.termination_date.clone(),
        ..Default::default()
    };
    let form = draft.into_form(table);
    ComputeOutput {
        inputs: form.inputs().clone(),
        derived: *form.derived(),
    }
}

/// Human-readable breakdown of one computation.
pub struct DerivedReport<'a> {
    pub inputs: &'a FinancialInputs,
    pub derived: &'a FinancialDerived,
    pub table: &'a WageTable,
}

impl Display for DerivedReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let d = self.derived;
        let participation = self.inputs.participation_percent.unwrap_or_default();
        writeln!(f, "{:<28} {}", "Valor inicial", format_currency(self.inputs.initial_value))?;
        writeln!(
            f,
            "{:<28} {} ({} ítems)",
            "Adiciones",
            format_currency(self.inputs.additions.total()),
            self.inputs.additions.len()
        )?;
        writeln!(f, "{:<28} {}", "Año de terminación", d.termination_year)?;
        writeln!(
            f,
            "{:<28} {}",
            "SMMLV año de terminación",
            format_optional_wage(self.table.amount_for_year(d.termination_year))
        )?;
        writeln!(f, "{:<28} {}", "Valor final afectado", format_currency(d.final_affected_value))?;
        writeln!(f, "{:<28} {}", "Valor en SMMLV", format_wage_units(d.wage_unit_value))?;
        writeln!(
            f,
            "{:<28} {} ({}%)",
            "SMMLV × participación",
            format_wage_units(d.participation_wage_unit_value),
            format_grouped(participation, 2)
        )?;
        writeln!(
            f,
            "{:<28} {}",
            "SMMLV vigente",
            format_optional_wage(Some(self.table.latest_amount()))
        )?;
        write!(f, "{:<28} {}", "Valor actual", format_currency(d.current_value))
    }
}

// ─── wages ──────────────────────────────────────────────────────────────────

pub struct WageTableReport<'a>(pub &'a WageTable);

impl Display for WageTableReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let mut entries = self.0.entries().to_vec();
        entries.sort_by_key(|e| e.year);
        for entry in &entries {
            writeln!(f, "{}  {}", entry.year, format_currency(entry.amount))?;
        }
        match self.0.latest_entry() {
            Some(latest) => write!(
                f,
                "latest: {} ({})",
                latest.year,
                format_currency(latest.amount)
            ),
            None => write!(f, "latest: —"),
        }
    }
}

// ─── batch ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub saved: Vec<ExperienceRecord>,
    /// `(contract number, reason)` for every draft that was not saved.
    pub rejected: Vec<(String, String)>,
}

/// Runs each draft through a fresh form session and saves it.
///
/// Drafts failing form validation are reported and skipped; store failures
/// abort the batch.
pub async fn run_batch(
    store: &dyn ExperienceStore,
    table: &WageTable,
    drafts: &[ExperienceDraft],
) -> Result<BatchReport> {
    let mut report = BatchReport::default();

    for (idx, draft) in drafts.iter().enumerate() {
        let mut form: ExperienceForm = draft.into_form(table.clone());
        match form.save(store).await {
            Ok(record) => report.saved.push(record),
            Err(err @ FormError::MissingField(_)) => {
                warn!(row = idx + 1, %err, "experience skipped");
                report
                    .rejected
                    .push((draft.contract_number.clone(), err.to_string()));
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to save row {}", idx + 1));
            }
        }
    }

    info!(
        saved = report.saved.len(),
        rejected = report.rejected.len(),
        "batch finished"
    );
    Ok(report)
}

impl Display for BatchReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "{:>4}  {:<16} {:>6} {:>12} {:>22}",
            "id", "contrato", "año", "SMMLV", "valor actual"
        )?;
        for record in &self.saved {
            writeln!(
                f,
                "{:>4}  {:<16} {:>6} {:>12} {:>22}",
                record.id,
                record.details.contract_number,
                record.derived.termination_year,
                format_wage_units(record.derived.wage_unit_value),
                format_currency(record.derived.current_value)
            )?;
        }
        for (contract, reason) in &self.rejected {
            writeln!(f, "rejected {contract:?}: {reason}")?;
        }
        write!(f, "{} saved, {} rejected", self.saved.len(), self.rejected.len())
    }
}

// ─── expirations ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ExpirationReport {
    pub today: NaiveDate,
    pub window_days: i64,
    pub notices: Vec<ExpirationNotice>,
    pub folders: Vec<FolderExpirationSummary>,
}

pub fn expirations(
    documents_csv: &Path,
    today: NaiveDate,
    window_days: i64,
) -> Result<ExpirationReport> {
    let set = documents::load_from_file(documents_csv)
        .with_context(|| format!("failed to load documents: {}", documents_csv.display()))?;
    let monitor = ExpirationMonitor::new(window_days);

    Ok(ExpirationReport {
        today,
        window_days: monitor.window_days(),
        notices: monitor.notices(&set.documents, &set.folders, today),
        folders: monitor.folder_summaries(&set.documents, &set.folders, today),
    })
}

impl Display for ExpirationReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "{} document(s) need attention as of {} (window {} days)",
            self.notices.len(),
            self.today,
            self.window_days
        )?;
        for notice in &self.notices {
            let status = match notice.status {
                ExpirationStatus::Expired { days_overdue } => {
                    format!("vencido hace {days_overdue} día(s)")
                }
                ExpirationStatus::ExpiringSoon { days_remaining } => {
                    format!("vence en {days_remaining} día(s)")
                }
                ExpirationStatus::Valid { .. } | ExpirationStatus::NoExpiry => String::new(),
            };
            writeln!(
                f,
                "  {}  {:<40} {:<16} {}",
                notice.expiration_date,
                notice.document_name,
                notice.folder_name.as_deref().unwrap_or("—"),
                status
            )?;
        }
        for summary in &self.folders {
            writeln!(
                f,
                "  [{}] {} vencido(s), {} por vencer",
                summary.folder_name.as_deref().unwrap_or("sin carpeta"),
                summary.expired,
                summary.expiring_soon
            )?;
        }
        Ok(())
    }
}
