//! Options for reading CSV into a table.

use serde::{Deserialize, Serialize};
use tabula_model::EditorOptions;

/// Dataset id used when neither the options nor a file name supply one.
pub const DEFAULT_DATASET_ID: &str = "dataset";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IngestOptions {
    /// Identity of the loaded table. Defaults to the file stem.
    pub dataset_id: Option<String>,
    /// Keep every cell as text instead of sniffing numbers.
    pub keep_text: bool,
    pub delimiter: char,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            dataset_id: None,
            keep_text: false,
            delimiter: ',',
        }
    }
}

impl IngestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset_id(mut self, id: impl Into<String>) -> Self {
        self.dataset_id = Some(id.into());
        self
    }

    pub fn with_keep_text(mut self, enable: bool) -> Self {
        self.keep_text = enable;
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl From<&EditorOptions> for IngestOptions {
    fn from(options: &EditorOptions) -> Self {
        Self {
            dataset_id: None,
            keep_text: options.keep_text,
            delimiter: options.delimiter,
        }
    }
}
