//! Parsing of `uvlist options=array,full` reports.

use log::debug;

use super::{ReportLine, ReportParseError};
use crate::{Antenna, TelescopeArray};

const REPORT: &str = "uvlist";

/// Is this the line of dashes underlining the antenna coordinate table?
fn is_table_rule(line: &ReportLine) -> bool {
    line.tokens
        .get(1)
        .map(|t| t.len() > 1 && t.chars().all(|c| c == '-'))
        .unwrap_or(false)
}

/// Parse the complete text of an array report.
pub fn parse_array_report(text: &str) -> Result<TelescopeArray, ReportParseError> {
    let mut telescope = None;
    let mut latitude = None;
    let mut longitude = None;
    let mut antennas = vec![];
    let mut in_table = false;

    for (i, text) in text.lines().enumerate() {
        let line = ReportLine::new(REPORT, i, text);

        if in_table {
            if line.tokens.len() == 4 {
                antennas.push(Antenna {
                    number: line.parse(0, "an integer")?,
                    x: line.parse(1, "a float")?,
                    y: line.parse(2, "a float")?,
                    z: line.parse(3, "a float")?,
                });
            }
            continue;
        }

        match line.tokens.first().copied() {
            Some("Telescope:") => telescope = Some(line.token(1)?.to_string()),
            Some("Latitude:") => latitude = Some(line.token(1)?.to_string()),
            Some("Longitude:") => longitude = Some(line.token(1)?.to_string()),
            _ if is_table_rule(&line) => in_table = true,
            _ => (),
        }
    }

    let array = TelescopeArray {
        telescope: telescope.ok_or(ReportParseError::MissingArrayField("telescope name"))?,
        latitude: latitude.ok_or(ReportParseError::MissingArrayField("latitude"))?,
        longitude: longitude.ok_or(ReportParseError::MissingArrayField("longitude"))?,
        antennas,
    };
    debug!(
        "uvlist: telescope {} at ({}, {}) with {} antennas",
        array.telescope,
        array.latitude,
        array.longitude,
        array.antennas.len()
    );
    Ok(array)
}
