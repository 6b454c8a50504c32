use std::path::PathBuf;

use thiserror::Error;

use crate::offsets::InputSpecError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("No valid dataset found at {}", .0.display())]
    NoDataset(PathBuf),

    #[error("Argument file {} doesn't have a recognised file extension! Valid extensions are: {valid}", .path.display())]
    ArgFileType { path: PathBuf, valid: String },

    #[error("Couldn't decode {kind} structure from {}:\n{err}", .path.display())]
    ArgFileDecode {
        path: PathBuf,
        kind: &'static str,
        err: String,
    },

    #[error("Not enough information found to create a new source; --ra, --dec, --flux, --size and --alpha are all needed")]
    NotEnoughSourceInfo,

    #[error("A pre-made source file was specified, but so were new source parameters")]
    SourceFileAndParams,

    #[error("Specified source file {} cannot be found", .0.display())]
    SourceFileMissing(PathBuf),

    #[error(transparent)]
    InputSpec(#[from] InputSpecError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
