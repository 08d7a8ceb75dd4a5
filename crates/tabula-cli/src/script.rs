//! Operation scripts: load, apply, undo.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tabula_core::{EditorSession, TableProvider, TableStore};
use tabula_model::{EditorOptions, Operation, Table};
use tracing::info;

#[derive(Deserialize)]
#[serde(untagged)]
enum ScriptFile {
    List(Vec<Operation>),
    Wrapped { operations: Vec<Operation> },
}

/// Parses a script: a JSON array of operations or `{"operations": [...]}`.
pub fn parse_operations(text: &str) -> Result<Vec<Operation>> {
    let script: ScriptFile = serde_json::from_str(text).context("parse operation script")?;
    Ok(match script {
        ScriptFile::List(operations) | ScriptFile::Wrapped { operations } => operations,
    })
}

pub fn load_operations(path: &Path) -> Result<Vec<Operation>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read operation script: {}", path.display()))?;
    parse_operations(&text).with_context(|| format!("load operation script: {}", path.display()))
}

/// Reads editor options from a JSON file, or the defaults when no file is given.
pub fn load_options(path: Option<&Path>) -> Result<EditorOptions> {
    let Some(path) = path else {
        return Ok(EditorOptions::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse config: {}", path.display()))
}

/// Outcome of one script step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub label: String,
    pub success: bool,
    pub error: Option<String>,
    pub new_columns: Vec<String>,
    pub removed_columns: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ScriptReport {
    pub steps: Vec<StepReport>,
    /// Labels of undone operations, most recent first.
    pub undone: Vec<String>,
    /// The active table after applying and undoing.
    pub table: Table,
}

impl ScriptReport {
    pub fn failed(&self) -> bool {
        self.steps.iter().any(|step| !step.success)
    }
}

/// Applies `operations` to `table` in order, stopping at the first failure,
/// then undoes the last `undo` operations.
pub fn run_script(
    table: Table,
    operations: Vec<Operation>,
    options: &EditorOptions,
    undo: usize,
) -> Result<ScriptReport> {
    let labels: Vec<String> = operations.iter().map(Operation::label).collect();
    let mut session = EditorSession::new(TableStore::with_table(table), options);
    let results = session.apply_all(operations);
    let steps = labels
        .into_iter()
        .zip(results)
        .map(|(label, result)| StepReport {
            label,
            success: result.success,
            error: result.error,
            new_columns: result.new_columns,
            removed_columns: result.removed_columns,
        })
        .collect::<Vec<_>>();
    info!(
        applied = steps.iter().filter(|step| step.success).count(),
        "script applied"
    );

    let mut undone = Vec::new();
    for _ in 0..undo {
        match session.undo().context("undo")? {
            Some(operation) => undone.push(operation.label()),
            None => break,
        }
    }
    if undone.len() < undo {
        info!(requested = undo, undone = undone.len(), "history exhausted");
    }

    let Some(table) = session.provider().active_table() else {
        bail!("no active dataset after running the script");
    };
    Ok(ScriptReport {
        steps,
        undone,
        table,
    })
}
