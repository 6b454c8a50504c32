use std::path::PathBuf;

use thiserror::Error;

use crate::{
    concat::ConcatError, read::ReportParseError, sexagesimal::SexagesimalError,
    toolkit::ToolkitError, write::WriteError,
};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("The dataset has no frequency configurations with any spectral windows")]
    NoFrequencyConfig,

    #[error("Couldn't find the cycle time ('{0}') in the variable log")]
    MissingCycleTime(&'static str),

    #[error("The dataset has no scans")]
    NoScans,

    #[error("Scans of '{0}' were found, but it isn't in the list of pointings")]
    UnknownSource(String),

    #[error("The position of '{name}' couldn't be read: {err}")]
    BadPointing {
        name: String,
        #[source]
        err: SexagesimalError,
    },

    #[error("The array position couldn't be read: {0}")]
    BadArrayLocation(#[source] SexagesimalError),

    #[error("Couldn't read {}: {err}", .path.display())]
    ReadLog {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    #[error(transparent)]
    Report(#[from] ReportParseError),

    #[error(transparent)]
    Toolkit(#[from] ToolkitError),

    #[error(transparent)]
    Concat(#[from] ConcatError),

    #[error(transparent)]
    Write(#[from] WriteError),
}
