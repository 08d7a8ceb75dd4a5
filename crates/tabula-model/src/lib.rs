//! Core data model for the Tabula dataset editor.
//!
//! - **value**: dynamically typed cell values and their coercion rules
//! - **table**: rows, tables, and Arc-shared column/row storage
//! - **ids**: dataset and row identifiers
//! - **operation**: operation descriptors and transform results
//! - **options**: editor configuration
//! - **temporal**: date/time parsing and rendering shared by rules and transforms

pub mod error;
pub mod ids;
pub mod operation;
pub mod options;
pub mod table;
pub mod temporal;
pub mod value;

pub use error::{ModelError, Result};
pub use ids::{DatasetId, RowId};
pub use operation::{Operation, TransformResult};
pub use options::{DEFAULT_MAX_HISTORY_SIZE, EditorOptions};
pub use table::{Row, Table};
pub use temporal::{DateFormat, ParsedDateTime, parse_datetime, parse_time};
pub use value::{Value, format_number, parse_f64};
