//! End-to-end flow through the library API used by the `smmlv` binary:
//! config file → store → wage table → batch of experiences.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use smmlv_cli::app;
use smmlv_cli::config::AppConfig;
use smmlv_core::ExperienceRepository;
use smmlv_data::experiences;

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

#[test]
fn fixture_config_is_read() {
    let config = AppConfig::load(Some(fixtures().join("smmlv.toml").as_path())).expect("config");

    assert_eq!(config.store.backend, "memory");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.expirations.window_days, 45);
    assert_eq!(config.reference.wages_csv, Some(PathBuf::from("wages.csv")));
}

#[tokio::test]
async fn batch_from_fixture_files() {
    let config = AppConfig::load(Some(fixtures().join("smmlv.toml").as_path())).expect("config");
    let wages = config
        .reference
        .wages_csv
        .as_ref()
        .map(|relative| fixtures().join(relative));

    let store = app::open_store(&config.store).await.expect("store");
    let table = app::load_reference_data(&*store, wages.as_deref())
        .await
        .expect("wages");
    let drafts = experiences::load_from_file(&fixtures().join("experiences.csv")).expect("drafts");

    let report = app::run_batch(&*store, &table, &drafts).await.expect("batch");

    assert_eq!(report.saved.len(), 2);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.saved[0].details.contract_number, "OBRA-017");
    assert_eq!(report.saved[0].derived.current_value, dec!(5338125));
    assert_eq!(report.saved[1].derived.termination_year, 2020);
    assert_eq!(report.saved[1].derived.wage_unit_value, dec!(100));

    let stored = store.list_experiences().await.expect("list");
    assert_eq!(stored.len(), 2);
    assert_eq!(stored, report.saved);
}

#[tokio::test]
async fn compute_with_empty_store_yields_zero_current_value() {
    let store = app::open_store(&Default::default()).await.expect("store");
    let table = app::load_reference_data(&*store, None).await.expect("table");

    let output = app::compute(
        &app::ComputeRequest {
            initial_value: "5000000".to_string(),
            additions: vec!["2500000".to_string()],
            participation_percent: "50".to_string(),
            termination_date: "2023-12-31".to_string(),
        },
        table,
    );

    assert_eq!(output.derived.final_affected_value, dec!(7500000));
    assert_eq!(output.derived.wage_unit_value, dec!(0));
    assert_eq!(output.derived.current_value, dec!(0));
}
