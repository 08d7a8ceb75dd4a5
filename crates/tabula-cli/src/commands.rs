use std::fs;

use anyhow::{Context, Result};
use tabula_cli::script::{ScriptReport, load_operations, load_options, run_script};
use tabula_ingest::{IngestOptions, read_csv_table, write_csv_string, write_csv_table};
use tabula_report::column_stats;
use tabula_rules::{apply_rule_set_to_dataset, parse_rule_set, validate_rule_set};
use tabula_transform::{NUMERIC_TRANSFORM_TYPES, OPERATION_TYPES};
use tracing::{info, info_span};

use crate::cli::{ApplyArgs, RulesArgs, StatsArgs};
use crate::summary::{render_operations, render_rules, render_script_summary, render_stats};

/// Applies the script and writes the result.
///
/// Returns the report so the caller can pick an exit code.
pub fn run_apply(args: &ApplyArgs) -> Result<ScriptReport> {
    let span = info_span!("apply", csv = %args.csv.display());
    let _guard = span.enter();

    let options = load_options(args.config.as_deref())?;
    let table = read_csv_table(&args.csv, &IngestOptions::from(&options))
        .with_context(|| format!("load {}", args.csv.display()))?;
    info!(rows = table.len(), columns = table.columns().len(), "loaded dataset");
    let operations = load_operations(&args.ops)?;
    info!(operations = operations.len(), "loaded script");

    let report = run_script(table, operations, &options, args.undo)?;
    let summary = render_script_summary(&report);
    match &args.output {
        Some(path) => {
            write_csv_table(&report.table, path)
                .with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), "wrote result");
            println!("{summary}");
        }
        None => {
            print!("{}", write_csv_string(&report.table)?);
            eprintln!("{summary}");
        }
    }
    Ok(report)
}

pub fn run_stats(args: &StatsArgs) -> Result<()> {
    let options = IngestOptions::new().with_keep_text(args.keep_text);
    let table = read_csv_table(&args.csv, &options)
        .with_context(|| format!("load {}", args.csv.display()))?;
    let stats = column_stats(&table).context("compute column statistics")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Dataset: {} ({} rows)", table.id(), table.len());
        println!("{}", render_stats(&stats));
    }
    Ok(())
}

pub fn run_operations() -> Result<()> {
    println!("{}", render_operations(OPERATION_TYPES, NUMERIC_TRANSFORM_TYPES));
    Ok(())
}

/// Result of checking a rule set against a dataset.
#[derive(Debug, Clone)]
pub struct RulesOutcome {
    pub name: String,
    pub target: String,
    pub violations: Vec<String>,
    /// Output value and row count, in first-seen order.
    pub tally: Vec<(String, usize)>,
    pub failures: Vec<String>,
}

impl RulesOutcome {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

pub fn run_rules(args: &RulesArgs) -> Result<RulesOutcome> {
    let text = fs::read_to_string(&args.rule_set)
        .with_context(|| format!("read rule set: {}", args.rule_set.display()))?;
    let rule_set = parse_rule_set(&text)?;
    let table = read_csv_table(&args.csv, &IngestOptions::default())
        .with_context(|| format!("load {}", args.csv.display()))?;
    let target = args.target.clone().unwrap_or_else(|| rule_set.name.clone());

    let mut outcome = RulesOutcome {
        name: rule_set.name.clone(),
        target,
        violations: validate_rule_set(&rule_set, table.columns()),
        tally: Vec::new(),
        failures: Vec::new(),
    };
    if outcome.is_valid() {
        let application = apply_rule_set_to_dataset(&table, &rule_set, &outcome.target)?;
        for value in application.table.values(&outcome.target) {
            let label = if value.is_null() {
                "<null>".to_string()
            } else {
                value.to_text()
            };
            match outcome.tally.iter_mut().find(|(seen, _)| *seen == label) {
                Some((_, count)) => *count += 1,
                None => outcome.tally.push((label, 1)),
            }
        }
        outcome.failures = application
            .failed_rows
            .iter()
            .map(|failure| format!("row {}: {}", failure.index + 1, failure.error))
            .collect();
    }
    println!("{}", render_rules(&outcome));
    Ok(outcome)
}
