//! Column statistics for Tabula tables.
//!
//! Counts, cardinality, type detection and numeric summaries, with the
//! aggregations computed through polars.

pub mod error;
pub mod stats;

pub use error::{ReportError, Result};
pub use stats::{ColumnKind, ColumnStats, NumericSummary, TopValue, column_stats, column_summary};
