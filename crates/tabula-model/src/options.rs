//! Configuration options for an editing session.

use serde::{Deserialize, Serialize};

/// Default bound on recorded history entries.
pub const DEFAULT_MAX_HISTORY_SIZE: usize = 50;

/// Options controlling an editing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorOptions {
    /// Maximum number of recorded operations. The oldest entries are evicted
    /// once the bound is exceeded and can no longer be undone.
    pub max_history_size: usize,

    /// Keep every CSV cell as text instead of sniffing numbers.
    pub keep_text: bool,

    /// CSV field delimiter.
    pub delimiter: char,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            max_history_size: DEFAULT_MAX_HISTORY_SIZE,
            keep_text: false,
            delimiter: ',',
        }
    }
}

impl EditorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_history_size(mut self, size: usize) -> Self {
        self.max_history_size = size;
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
