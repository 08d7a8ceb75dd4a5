//! Library components of the `tabula` command-line tool.

pub mod logging;
pub mod script;
