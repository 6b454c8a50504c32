//! Add synthetic sources to MIRIAD visibility datasets.
//!
//! The metadata of the real observation is taken from MIRIAD's own reports,
//! then one `uvgen` simulation is made per pointing, trimmed to the times that
//! pointing was actually observed, concatenated, and added to the original
//! visibilities.

pub mod cli;
pub mod concat;
mod error;
pub mod offsets;
pub mod pipeline;
pub mod read;
pub mod segments;
pub mod sexagesimal;
pub mod time;
pub mod toolkit;
pub mod transit;
pub mod write;

pub use error::SourceAdderError;

use hifitime::{Duration, Epoch};
use marlu::{LatLngHeight, RADec};

use sexagesimal::{sexagesimal_dms_to_degrees, sexagesimal_hms_to_degrees, SexagesimalError};

/// One line of the `uvindex` scan table.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRecord {
    pub time: Epoch,

    pub source: String,

    /// The calibrator code. MIRIAD leaves this column blank for targets.
    pub calcode: Option<char>,

    pub num_antennas: u32,

    pub num_spectral_channels: u32,

    pub num_wideband_channels: u32,

    /// The frequency configuration in use for this record.
    pub freq_config: u32,

    pub record_number: u64,
}

/// A single spectral window of a frequency configuration. All frequencies are
/// in \[GHz\], as `uvindex` reports them.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralWindow {
    pub num_channels: u32,

    /// The frequency of the first channel \[GHz\].
    pub first_freq: f64,

    /// The frequency difference between adjacent channels \[GHz\]. This can be
    /// negative.
    pub freq_increment: f64,

    pub rest_freq: f64,

    pub if_chain: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyConfig {
    /// The configuration number, as labelled by `uvindex`.
    pub id: u32,

    pub windows: Vec<SpectralWindow>,
}

/// A pointing listed at the end of a `uvindex` report.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceCatalogEntry {
    pub name: String,

    pub calcode: Option<String>,

    /// The right ascension, as printed (`HH:MM:SS.S`).
    pub ra: String,

    /// The declination, as printed (`±DD:MM:SS.S`).
    pub dec: String,

    /// Offset of the pointing from the source position in RA \[arcsec\].
    pub dra: f64,

    /// Offset of the pointing from the source position in Dec \[arcsec\].
    pub ddec: f64,
}

impl SourceCatalogEntry {
    /// The pointing centre as a [`RADec`].
    pub fn radec(&self) -> Result<RADec, SexagesimalError> {
        Ok(RADec::from_degrees(
            sexagesimal_hms_to_degrees(&self.ra)?,
            sexagesimal_dms_to_degrees(&self.dec)?,
        ))
    }
}

/// Everything we learn about an observation from `uvindex`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationIndex {
    /// All scan records, in the order they were listed (chronological).
    pub records: Vec<ScanRecord>,

    pub total_time: Duration,

    pub freq_configs: Vec<FrequencyConfig>,

    /// The polarisation labels, e.g. `XX`, as MIRIAD writes them.
    pub polarisations: Vec<String>,

    pub sources: Vec<SourceCatalogEntry>,
}

impl ObservationIndex {
    /// Find the catalog entry of a named source.
    pub fn source(&self, name: &str) -> Option<&SourceCatalogEntry> {
        self.sources.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Antenna {
    pub number: u32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// The array as described by `uvlist options=array,full`.
#[derive(Debug, Clone, PartialEq)]
pub struct TelescopeArray {
    pub telescope: String,

    /// The array latitude, as printed (`±DD:MM:SS.S`).
    pub latitude: String,

    /// The array longitude, as printed (`±DDD:MM:SS.S`).
    pub longitude: String,

    /// The antenna positions, in the units `uvlist` uses. We never interpret
    /// these; they're written back out for `uvgen`.
    pub antennas: Vec<Antenna>,
}

impl TelescopeArray {
    /// The Earth position of the array. MIRIAD doesn't report a height, and
    /// nothing here needs one.
    pub fn location(&self) -> Result<LatLngHeight, SexagesimalError> {
        Ok(LatLngHeight {
            longitude_rad: sexagesimal_dms_to_degrees(&self.longitude)?.to_radians(),
            latitude_rad: sexagesimal_dms_to_degrees(&self.latitude)?.to_radians(),
            height_metres: 0.0,
        })
    }
}
