//! Parsers for the text that MIRIAD tasks print about a dataset.
//!
//! These are pure functions over the complete text of a report; running the
//! tasks that produce the text is the job of [`crate::toolkit`].

mod error;
pub mod uvindex;
pub mod uvlist;
pub mod varlog;

pub use error::ReportParseError;
pub use uvindex::parse_index_report;
pub use uvlist::parse_array_report;
pub use varlog::parse_variable_log;

use std::str::FromStr;

/// The separator MIRIAD puts between the sections of its reports.
pub(crate) const SEPARATOR: &str = "------------------------------------------------";

/// A line of a report, split on whitespace, that knows where it came from so
/// that any parsing error can point at it.
pub(crate) struct ReportLine<'a> {
    pub(crate) report: &'static str,

    /// 1-based.
    pub(crate) line_num: usize,

    pub(crate) text: &'a str,

    pub(crate) tokens: Vec<&'a str>,
}

impl<'a> ReportLine<'a> {
    pub(crate) fn new(report: &'static str, line_index: usize, text: &'a str) -> ReportLine<'a> {
        ReportLine {
            report,
            line_num: line_index + 1,
            text,
            tokens: text.split_whitespace().collect(),
        }
    }

    /// Is this line the section separator?
    pub(crate) fn is_separator(&self) -> bool {
        self.text.trim() == SEPARATOR
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Does the token at `index` exist and equal `s`?
    pub(crate) fn token_is(&self, index: usize, s: &str) -> bool {
        self.tokens.get(index) == Some(&s)
    }

    pub(crate) fn token(&self, index: usize) -> Result<&'a str, ReportParseError> {
        self.tokens
            .get(index)
            .copied()
            .ok_or_else(|| ReportParseError::MissingField {
                report: self.report,
                line_num: self.line_num,
                field: index,
                text: self.text.to_string(),
            })
    }

    /// Parse the token at `index`. `expected` describes the type for the error
    /// message.
    pub(crate) fn parse<T: FromStr>(
        &self,
        index: usize,
        expected: &'static str,
    ) -> Result<T, ReportParseError> {
        let token = self.token(index)?;
        token.parse().map_err(|_| ReportParseError::BadField {
            report: self.report,
            line_num: self.line_num,
            string: token.to_string(),
            expected,
            text: self.text.to_string(),
        })
    }
}
