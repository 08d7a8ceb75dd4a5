//! Column transforms for Tabula tables.
//!
//! Every transform takes a table, a source column, and typed parameters, and
//! either returns a complete replacement table or an error. Input tables are
//! never modified, so a failed transform leaves the caller's data as it was.
//!
//! # Overview
//!
//! - **numeric**: rounding, arithmetic, math functions, normalization, binning
//! - **text**: whitespace, case, find/replace, splitting, padding
//! - **categorical**: relabelling, grouping, and encoding categories
//! - **boolean**: 0/1 conversion, inversion, and filling of boolean-like columns
//! - **datetime**: formatting, extraction, shifting, truncation, time zones
//! - **mapping**: rule-set driven value mapping
//! - **dispatch**: parses string-typed [`Operation`](tabula_model::Operation)s
//!   into [`Transform`]s and runs them
//!
//! # Example
//!
//! ```ignore
//! use tabula_model::Operation;
//! use tabula_transform::dispatch;
//!
//! let op = Operation::new("numeric_transform", "price")
//!     .with_parameters(serde_json::json!({"transformType": "round", "decimals": 2}));
//! let result = dispatch(&table, &op);
//! assert!(result.success);
//! ```

pub mod boolean;
pub mod categorical;
pub mod columns;
pub mod datetime;
pub mod dispatch;
mod error;
mod frame;
pub mod mapping;
pub mod missing;
pub mod numeric;
pub mod operation;
pub mod text;

pub use dispatch::{
    NUMERIC_TRANSFORM_TYPES, OPERATION_TYPES, dispatch, execute, parse_transform, try_dispatch,
};
pub use error::{Result, TransformError};
pub use frame::TransformOutput;
pub use operation::{NumericTransform, Transform};
