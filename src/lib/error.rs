//! Error types for parameter validation and program output.

use std::io;
use thiserror::Error;

use crate::params::{Field, FieldReport};

/// The entered parameters cannot be turned into a toolpath.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A field is blank or not a number of the right kind. Nothing else is checked.
    #[error("fields cannot be blank or invalid: {field} = {value:?}")]
    Unparseable { field: Field, value: String },

    /// Every field parsed, but at least one is out of range.
    #[error("invalid input fields: {}", failed_fields(.report))]
    Rejected { report: FieldReport },
}

fn failed_fields(report: &FieldReport) -> String {
    report
        .failed()
        .map(|f: Field| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors from creating a drilling program.
#[derive(Error, Debug)]
pub enum ToolpathError {
    #[error("there are errors in input fields: {0}")]
    Validation(#[from] ValidationError),

    /// The destination could not be opened or written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
