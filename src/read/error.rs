use thiserror::Error;

use crate::time::MiriadTimeError;

/// Errors from reading any MIRIAD report. Every error that stems from a
/// particular line carries its (1-based) number and contents.
#[derive(Error, Debug, PartialEq)]
pub enum ReportParseError {
    #[error("{report} line {line_num}: Couldn't parse '{string}' as {expected}\n    {text}")]
    BadField {
        report: &'static str,
        line_num: usize,
        string: String,
        expected: &'static str,
        text: String,
    },

    #[error("{report} line {line_num}: Field {field} is missing\n    {text}")]
    MissingField {
        report: &'static str,
        line_num: usize,
        field: usize,
        text: String,
    },

    #[error("{report} line {line_num}: {err}\n    {text}")]
    BadTime {
        report: &'static str,
        line_num: usize,
        err: MiriadTimeError,
        text: String,
    },

    #[error("{report} line {line_num}: A source catalog line needs 5 or 6 fields, found {num_fields}\n    {text}")]
    IncompleteSource {
        report: &'static str,
        line_num: usize,
        num_fields: usize,
        text: String,
    },

    #[error("The array report doesn't contain the array's {0}")]
    MissingArrayField(&'static str),
}
