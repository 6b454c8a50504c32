//! Everything that is done by MIRIAD tasks rather than by us.
//!
//! The pipeline only talks to MIRIAD through [`Toolkit`], so that tests can
//! swap the real tasks for something that just records what was asked of it.

#[cfg(test)]
pub(crate) mod fake;
mod miriad;

pub use miriad::MiriadToolkit;

use std::path::{Path, PathBuf};

use hifitime::Epoch;
use thiserror::Error;

use crate::{time::format_miriad_time, transit::HourAngleRange, write::WriteError};

/// `uvgen` wants antenna positions in nanoseconds; this is its conversion
/// factor from the units `uvlist` reports them in.
pub const BASEUNIT: f64 = 3.33564;

#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("Couldn't run {task}: {err}")]
    Spawn {
        task: &'static str,
        #[source]
        err: std::io::Error,
    },

    #[error("{task} failed ({status}):\n{stderr}")]
    Failed {
        task: &'static str,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("{task} finished, but didn't produce {}", .path.display())]
    MissingOutput { task: &'static str, path: PathBuf },

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// The MIRIAD operations the pipeline needs.
pub trait Toolkit {
    /// The text of `uvindex` run on `dataset` with the given scan `interval`
    /// \[minutes\].
    fn index_report(&mut self, dataset: &Path, interval: f64) -> Result<String, ToolkitError>;

    /// The text of `uvlist options=array,full` run on `dataset`.
    fn array_report(&mut self, dataset: &Path) -> Result<String, ToolkitError>;

    /// Dump the uv variables of `dataset` into the file `log`.
    fn dump_variables(&mut self, dataset: &Path, log: &Path) -> Result<(), ToolkitError>;

    /// Simulate a dataset with `uvgen`.
    fn simulate(&mut self, params: &SimulationParams) -> Result<(), ToolkitError>;

    /// Copy the visibilities of `input` between `from` and `to` into `output`.
    fn filter_time(
        &mut self,
        input: &Path,
        from: Epoch,
        to: Epoch,
        output: &Path,
    ) -> Result<(), ToolkitError>;

    /// Concatenate `inputs`, in order, into `output`.
    fn concatenate(&mut self, inputs: &[PathBuf], output: &Path) -> Result<(), ToolkitError>;

    /// Add the visibilities of `model` to those of `base` (ignoring
    /// autocorrelations) and write the sum to `output`.
    fn add_model(&mut self, base: &Path, model: &Path, output: &Path) -> Result<(), ToolkitError>;
}

/// The keywords of a `uvgen` run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    /// The `uvgen` source file.
    pub source: PathBuf,

    /// The antenna position file.
    pub antenna_file: PathBuf,

    pub baseunit: f64,

    /// Lower case, e.g. `atca`.
    pub telescope: String,

    /// `nchan,1,offset,width` with the offset and width in \[MHz\].
    pub corr: String,

    /// The time of zero hour angle.
    pub time: Epoch,

    /// `freq,0.0` with the frequency in \[GHz\].
    pub freq: String,

    /// `ra,dec` of the pointing centre, as MIRIAD printed them.
    pub radec: String,

    pub harange: HourAngleRange,

    /// Lower case and comma separated, e.g. `xx,yy`.
    pub stokes: String,

    /// The array latitude \[degrees\].
    pub lat: String,

    pub out: PathBuf,
}

impl SimulationParams {
    /// The `keyword=value` arguments of `uvgen`, in the order MIRIAD lists
    /// them.
    pub fn keywords(&self) -> Vec<(&'static str, String)> {
        vec![
            ("source", self.source.display().to_string()),
            ("ant", self.antenna_file.display().to_string()),
            ("baseunit", self.baseunit.to_string()),
            ("telescop", self.telescope.clone()),
            ("corr", self.corr.clone()),
            ("time", format_miriad_time(self.time)),
            ("freq", self.freq.clone()),
            ("radec", self.radec.clone()),
            ("harange", self.harange.to_string()),
            ("stokes", self.stokes.clone()),
            ("lat", self.lat.clone()),
            ("out", self.out.display().to_string()),
        ]
    }
}

/// The `select` keyword restricting data to a time range.
pub fn time_selection(from: Epoch, to: Epoch) -> String {
    format!(
        "time({},{})",
        format_miriad_time(from),
        format_miriad_time(to)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_keywords() {
        let params = SimulationParams {
            source: PathBuf::from("work/c1234.seg000.sources"),
            antenna_file: PathBuf::from("work/antpos"),
            baseunit: BASEUNIT,
            telescope: "atca".to_string(),
            corr: "2048,1,1024,2048.000".to_string(),
            time: Epoch::from_gregorian_utc_hms(2013, 7, 21, 3, 59, 55),
            freq: "2.100,0.0".to_string(),
            radec: "19:39:25.03,-63:42:45.6".to_string(),
            harange: HourAngleRange {
                start: -1,
                end: 2,
                step: 10.0 * 1.00273790935 / 3600.0,
            },
            stokes: "xx,yy".to_string(),
            lat: "-30.312889".to_string(),
            out: PathBuf::from("work/c1234.seg000.uvgen"),
        };
        let args: Vec<String> = params
            .keywords()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        assert_eq!(
            args,
            [
                "source=work/c1234.seg000.sources",
                "ant=work/antpos",
                "baseunit=3.33564",
                "telescop=atca",
                "corr=2048,1,1024,2048.000",
                "time=13jul21:03:59:55",
                "freq=2.100,0.0",
                "radec=19:39:25.03,-63:42:45.6",
                "harange=-1,2,0.0027853830815278",
                "stokes=xx,yy",
                "lat=-30.312889",
                "out=work/c1234.seg000.uvgen",
            ]
        );
    }

    #[test]
    fn test_time_selection() {
        let from = Epoch::from_gregorian_utc_hms(2013, 7, 21, 23, 59, 55);
        let to = Epoch::from_gregorian_utc_hms(2013, 7, 22, 0, 10, 5);
        assert_eq!(
            time_selection(from, to),
            "time(13jul21:23:59:55,13jul22:00:10:05)"
        );
    }
}
