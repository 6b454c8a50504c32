//! Parsing of `uvindex` reports.
//!
//! A report has five sections, read in order: the scan table, the total
//! observing time, the frequency configurations, the polarisations and the
//! pointings (source catalog). A section ends on a sentinel line, and no
//! section is ever revisited.


use hifitime::Duration;
use log::debug;

use super::{ReportLine, ReportParseError};
use crate::{
    time::parse_miriad_time, FrequencyConfig, ObservationIndex, ScanRecord, SourceCatalogEntry,
    SpectralWindow,
};

const REPORT: &str = "uvindex";

/// Scan-table lines shorter than this are titles, column headings or blank.
const MIN_SCAN_LINE_WIDTH: usize = 74;

/// The width of the timestamp at the start of each scan-table line.
const SCAN_TIME_WIDTH: usize = 18;

/// The column of a scan-table line holding the calibrator code.
const CALCODE_COLUMN: usize = 36;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Scans,
    TotalTime,
    FreqConfigs,
    Polarisations,
    Sources,
}

/// Where we are within a frequency-configuration block.
#[derive(Debug, Clone, Copy, PartialEq)]
enum FreqBlock {
    /// Not inside a block.
    Outside,
    /// Just read the "Frequency Configuration N" header; the next line is a
    /// description.
    Header,
    /// Reading spectral-window lines until a blank line.
    Windows,
}

/// The calibrator code of a scan-table line and the number of fields the
/// following whitespace-delimited fields are shifted left by.
///
/// The calibrator code column may be blank. When it is, splitting the line on
/// whitespace loses a field, so all later fields move one place to the left.
/// Blankness can only be detected by position, not by counting fields.
pub(crate) fn calcode_field_offset(line: &str) -> (Option<char>, usize) {
    match line.chars().nth(CALCODE_COLUMN) {
        Some(c) if !c.is_whitespace() => (Some(c), 0),
        _ => (None, 1),
    }
}

/// Parse the complete text of a `uvindex` report.
pub fn parse_index_report(text: &str) -> Result<ObservationIndex, ReportParseError> {
    let mut records = vec![];
    let mut total_time = Duration::default();
    let mut freq_configs = vec![];
    let mut polarisations = vec![];
    let mut sources = vec![];

    let mut section = Section::Scans;
    let mut freq_block = FreqBlock::Outside;
    let mut freq_config: Option<FrequencyConfig> = None;
    let mut in_source_table = false;

    for (i, text) in text.lines().enumerate() {
        let line = ReportLine::new(REPORT, i, text);

        match section {
            Section::Scans => {
                // Anything narrower than a scan line is preamble, even if it
                // looks like the footer.
                if text.len() >= MIN_SCAN_LINE_WIDTH {
                    if line.token_is(1, "Total") || line.token_is(2, "number") {
                        section = Section::TotalTime;
                    } else {
                        records.push(parse_scan_line(&line)?);
                    }
                }
            }

            Section::TotalTime => {
                if line.token_is(0, "Total") && line.token_is(1, "observing") {
                    let amount: f64 = line.parse(4, "a float")?;
                    total_time = match line.tokens.get(5).copied() {
                        Some("hours") => Duration::from_seconds(amount * 3600.0),
                        Some("minutes") => Duration::from_seconds(amount * 60.0),
                        _ => Duration::from_seconds(amount),
                    };
                    section = Section::FreqConfigs;
                }
            }

            Section::FreqConfigs => {
                if line.token_is(0, "Frequency") && line.token_is(1, "Configuration") {
                    freq_configs.extend(freq_config.take());
                    freq_config = Some(FrequencyConfig {
                        id: line.parse(2, "an integer")?,
                        windows: vec![],
                    });
                    freq_block = FreqBlock::Header;
                } else if freq_block == FreqBlock::Header {
                    freq_block = FreqBlock::Windows;
                } else if freq_block == FreqBlock::Windows {
                    if line.is_blank() {
                        freq_block = FreqBlock::Outside;
                    } else if let Some(fc) = freq_config.as_mut() {
                        fc.windows.push(SpectralWindow {
                            num_channels: line.parse(0, "an integer")?,
                            first_freq: line.parse(1, "a float")?,
                            freq_increment: line.parse(2, "a float")?,
                            rest_freq: line.parse(3, "a float")?,
                            // Field 4 is the frequency unit.
                            if_chain: line.parse(5, "an integer")?,
                        });
                    }
                } else if line.is_separator() {
                    freq_configs.extend(freq_config.take());
                    section = Section::Polarisations;
                }
            }

            Section::Polarisations => {
                if line.token_is(0, "There")
                    && line.token_is(3, "records")
                    && line.token_is(5, "polarization")
                {
                    polarisations.push(line.token(6)?.to_string());
                } else if line.is_separator() {
                    section = Section::Sources;
                }
            }

            Section::Sources => {
                if line.token_is(0, "Source") {
                    in_source_table = true;
                } else if in_source_table && line.tokens.len() > 2 {
                    sources.push(parse_source_line(&line)?);
                }
            }
        }
    }
    // A report may end without a closing separator.
    freq_configs.extend(freq_config.take());

    debug!(
        "uvindex: {} records, {} frequency configurations, {} polarisations, {} sources",
        records.len(),
        freq_configs.len(),
        polarisations.len(),
        sources.len()
    );

    Ok(ObservationIndex {
        records,
        total_time,
        freq_configs,
        polarisations,
        sources,
    })
}

fn parse_scan_line(line: &ReportLine) -> Result<ScanRecord, ReportParseError> {
    let time_str = line.text.get(..SCAN_TIME_WIDTH).unwrap_or(line.text);
    let time = parse_miriad_time(time_str).map_err(|err| ReportParseError::BadTime {
        report: REPORT,
        line_num: line.line_num,
        err,
        text: line.text.to_string(),
    })?;
    let (calcode, offset) = calcode_field_offset(line.text);

    Ok(ScanRecord {
        time,
        source: line.token(1)?.to_string(),
        calcode,
        num_antennas: line.parse(3 - offset, "an integer")?,
        num_spectral_channels: line.parse(4 - offset, "an integer")?,
        num_wideband_channels: line.parse(5 - offset, "an integer")?,
        freq_config: line.parse(6 - offset, "an integer")?,
        record_number: line.parse(7 - offset, "an integer")?,
    })
}

fn parse_source_line(line: &ReportLine) -> Result<SourceCatalogEntry, ReportParseError> {
    // Like the scan table, a blank calibrator code removes a field.
    let (calcode, offset) = match line.tokens.len() {
        5 => (None, 1),
        n if n >= 6 => (Some(line.tokens[1].to_string()), 0),
        n => {
            return Err(ReportParseError::IncompleteSource {
                report: REPORT,
                line_num: line.line_num,
                num_fields: n,
                text: line.text.to_string(),
            })
        }
    };

    Ok(SourceCatalogEntry {
        name: line.tokens[0].to_string(),
        calcode,
        ra: line.token(2 - offset)?.to_string(),
        dec: line.token(3 - offset)?.to_string(),
        dra: line.parse(4 - offset, "a float")?,
        ddec: line.parse(5 - offset, "a float")?,
    })
}
