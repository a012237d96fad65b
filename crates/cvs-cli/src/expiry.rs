//! # Expiry Subcommand
//!
//! Runs the expiry orchestrator over a submission read from disk.
//!
//! ```text
//! cvs expiry --payload submission.json [--history history.json] [--today 2020-05-01]
//! ```
//!
//! The history file is a JSON array of previously submitted test results.
//! Without `--history` the vehicle is treated as having no history; without
//! `--today` the current UTC date is used.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use cvs_core::{DateProvider, FixedDateProvider, SystemDateProvider};
use cvs_expiry::{
    ExpiryOrchestrator, ExpiryOutcome, HistoricalTestResult, HistoryLookup, InMemoryHistory,
    TestResult,
};

/// Arguments for the `cvs expiry` subcommand.
#[derive(Args, Debug)]
pub struct ExpiryArgs {
    /// Path to the submitted test result (JSON).
    #[arg(long, value_name = "FILE")]
    pub payload: PathBuf,

    /// Path to the vehicle's test history (JSON array).
    #[arg(long, value_name = "FILE")]
    pub history: Option<PathBuf>,

    /// Test date, `YYYY-MM-DD` or RFC 3339. Defaults to today (UTC).
    #[arg(long)]
    pub today: Option<String>,

    /// Write the result to this file instead of stdout.
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Print the list of issued dates instead of the full payload.
    #[arg(long)]
    pub issued_only: bool,
}

/// Execute the expiry subcommand.
///
/// Returns exit code 0 on success.
pub fn run_expiry(args: &ExpiryArgs) -> Result<u8> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let outcome = runtime.block_on(compute(args))?;

    let rendered = if args.issued_only {
        serde_json::to_string_pretty(&outcome.issued)?
    } else {
        serde_json::to_string_pretty(&outcome.payload)?
    };

    match &args.out {
        Some(path) => {
            std::fs::write(path, rendered + "\n")
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), issued = outcome.issued.len(), "result written");
        }
        None => println!("{rendered}"),
    }

    Ok(0)
}

/// Load the inputs named by `args` and run the orchestrator.
pub async fn compute(args: &ExpiryArgs) -> Result<ExpiryOutcome> {
    let payload: TestResult = read_json(&args.payload)?;
    let records: Vec<HistoricalTestResult> = match &args.history {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };
    let dates = date_provider(args.today.as_deref())?;

    tracing::debug!(records = records.len(), today = %dates.today(), "inputs loaded");

    let orchestrator = ExpiryOrchestrator::new(
        HistoryLookup::new(Arc::new(InMemoryHistory::with_records(records))),
        dates,
    );
    orchestrator
        .evaluate(&payload)
        .await
        .context("expiry computation failed")
}

fn date_provider(today: Option<&str>) -> Result<Arc<dyn DateProvider>> {
    Ok(match today {
        Some(raw) => Arc::new(
            FixedDateProvider::parse(raw).with_context(|| format!("invalid --today {raw:?}"))?,
        ),
        None => Arc::new(SystemDateProvider),
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(dir: &Path, name: &str, value: serde_json::Value) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, value.to_string()).unwrap();
        path
    }

    fn args(payload: PathBuf) -> ExpiryArgs {
        ExpiryArgs {
            payload,
            history: None,
            today: Some("2019-11-04".to_string()),
            out: None,
            issued_only: false,
        }
    }

    fn coif_submission() -> serde_json::Value {
        json!({
            "systemNumber": "10000001",
            "testStatus": "submitted",
            "vehicleType": "psv",
            "testTypes": [{
                "testTypeId": "142",
                "testTypeClassification": "Annual With Certificate",
                "testResult": "pass"
            }]
        })
    }

    #[tokio::test]
    async fn computes_with_fixed_date() {
        let dir = tempfile::tempdir().unwrap();
        let a = args(write(dir.path(), "payload.json", coif_submission()));
        let outcome = compute(&a).await.unwrap();
        assert_eq!(
            outcome.payload.test_types[0].test_expiry_date.as_deref(),
            Some("2020-11-03T00:00:00.000Z")
        );
    }

    #[tokio::test]
    async fn history_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let mut payload = coif_submission();
        payload["testTypes"][0]["testTypeId"] = json!("1");
        let mut a = args(write(dir.path(), "payload.json", payload));
        a.today = Some("2020-05-28".to_string());
        a.history = Some(write(
            dir.path(),
            "history.json",
            json!([{
                "systemNumber": "10000001",
                "testStatus": "submitted",
                "testTypes": [{ "testCode": "aas", "testExpiryDate": "2020-06-15" }]
            }]),
        ));
        let outcome = compute(&a).await.unwrap();
        assert_eq!(outcome.issued[0].test_expiry_date, "2021-06-15T00:00:00.000Z");
    }

    #[test]
    fn invalid_today_is_rejected() {
        assert!(date_provider(Some("next tuesday")).is_err());
    }

    #[tokio::test]
    async fn missing_payload_file_reports_path() {
        let a = args(PathBuf::from("/nonexistent/payload.json"));
        let err = compute(&a).await.unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/payload.json"));
    }

    #[test]
    fn run_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(write(dir.path(), "payload.json", coif_submission()));
        let out = dir.path().join("out.json");
        a.out = Some(out.clone());
        a.issued_only = true;

        assert_eq!(run_expiry(&a).unwrap(), 0);
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(written[0]["strategy"], "psv_default");
        assert_eq!(written[0]["testExpiryDate"], "2020-11-03T00:00:00.000Z");
    }
}
