//! Parsing of the log written by `uvlist options=variables`.

use super::{ReportLine, ReportParseError};

const REPORT: &str = "variable log";

/// The uv variable holding the integration (cycle) time \[seconds\].
pub const CYCLE_TIME_VARIABLE: &str = "inttime";

/// Find the value of `variable` in a variables log. Lines of interest look
/// like `inttime :   9.9999`. If the variable is listed more than once, the
/// last value wins. `None` means the variable was never listed; it's up to the
/// caller to decide whether that's fatal.
pub fn parse_variable_log(text: &str, variable: &str) -> Result<Option<f64>, ReportParseError> {
    let mut value = None;
    for (i, text) in text.lines().enumerate() {
        let line = ReportLine::new(REPORT, i, text);
        if line.token_is(0, variable) && line.token_is(1, ":") {
            value = Some(line.parse(2, "a float")?);
        }
    }
    Ok(value)
}
