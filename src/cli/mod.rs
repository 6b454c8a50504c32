//! Command-line arguments, optionally backed by an arguments file.

mod error;
#[cfg(test)]
mod tests;

pub use error::CliError;

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    str::FromStr,
};

use clap::{AppSettings, Parser};
use itertools::Itertools;
use log::debug;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    offsets::InjectedSourceSpec,
    pipeline::{PipelineParams, SourceSelection},
};

lazy_static::lazy_static! {
    static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    static ref ARG_FILE_HELP: String =
        format!("All arguments except the dataset may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);
}

#[derive(Debug, Display, EnumIter, EnumString)]
enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

/// Add sources to a MIRIAD dataset. New sources are simulated with uvgen for
/// every pointing, and the simulation is added to the data with uvmodel.
#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
#[clap(name = "source_adder", version)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
#[clap(disable_help_subcommand = true)]
#[clap(infer_long_args = true)]
pub struct Args {
    /// The MIRIAD dataset to add sources to.
    #[clap(name = "DATASET", parse(from_os_str))]
    #[serde(skip)]
    pub dataset: PathBuf,

    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    #[serde(skip)]
    pub args_file: Option<PathBuf>,

    /// A uvgen source file to simulate at every pointing. The positions in it
    /// are offsets from the pointing centre [arcsec].
    #[clap(short, long, parse(from_os_str), help_heading = "SOURCES")]
    pub source_file: Option<PathBuf>,

    /// The right ascension of a new source (HH:MM:SS.S). Give once per source.
    #[clap(long, multiple_occurrences(true), help_heading = "SOURCES")]
    pub ra: Option<Vec<String>>,

    /// The declination of a new source (DD:MM:SS.S). Give once per source.
    #[clap(
        long,
        multiple_occurrences(true),
        allow_hyphen_values = true,
        help_heading = "SOURCES"
    )]
    pub dec: Option<Vec<String>>,

    /// The flux density of a new source [Jy]. Give once per source.
    #[clap(long, multiple_occurrences(true), help_heading = "SOURCES")]
    pub flux: Option<Vec<f64>>,

    /// The size of a new source, as bmaj,bmin,bpa [arcsec, arcsec, degrees].
    /// Give once per source.
    #[clap(long, multiple_occurrences(true), help_heading = "SOURCES")]
    pub size: Option<Vec<String>>,

    /// The spectral index of a new source. Give once per source.
    #[clap(
        long,
        multiple_occurrences(true),
        allow_hyphen_values = true,
        help_heading = "SOURCES"
    )]
    pub alpha: Option<Vec<f64>>,

    /// The dataset to write. The default is the input dataset's name with
    /// ".sourceadd" appended.
    #[clap(short, long, parse(from_os_str), help_heading = "OUTPUT")]
    pub out: Option<PathBuf>,

    /// Where to put the intermediate files and simulations. The default is the
    /// directory containing the dataset.
    #[clap(long, parse(from_os_str), help_heading = "OUTPUT")]
    pub work_dir: Option<PathBuf>,

    /// Only simulate the first pointing, and don't write the output dataset.
    #[clap(short, long)]
    #[serde(default)]
    pub test: bool,

    /// Round uvgen's transit times to a whole second ending in 5, rather than
    /// to the middle of an integration cycle.
    #[clap(long)]
    #[serde(default)]
    pub five_second_rounding: bool,

    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv). The default is to print only high-level information.
    #[clap(short, long, parse(from_occurrences))]
    #[serde(skip)]
    pub verbosity: u8,

    /// Disable progress bars.
    #[clap(long)]
    #[serde(skip)]
    pub no_progress_bars: bool,
}

/// Read the arguments in a toml or json file.
fn unpack_arg_file<T: DeserializeOwned>(arg_file: &Path) -> Result<T, CliError> {
    debug!("Attempting to parse argument file {}", arg_file.display());

    let arg_file_type = arg_file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .and_then(|e| ArgFileTypes::from_str(&e).ok());

    let decode_err = |kind, err: String| CliError::ArgFileDecode {
        path: arg_file.to_path_buf(),
        kind,
        err,
    };
    match arg_file_type {
        Some(ArgFileTypes::Toml) => {
            debug!("Parsing toml file...");
            let contents = std::fs::read_to_string(arg_file)?;
            toml::from_str(&contents).map_err(|e| decode_err("toml", e.to_string()))
        }
        Some(ArgFileTypes::Json) => {
            debug!("Parsing json file...");
            let contents = std::fs::read_to_string(arg_file)?;
            serde_json::from_str(&contents).map_err(|e| decode_err("json", e.to_string()))
        }
        None => Err(CliError::ArgFileType {
            path: arg_file.to_path_buf(),
            valid: (*ARG_FILE_TYPES_COMMA_SEPARATED).clone(),
        }),
    }
}

impl Args {
    /// Consolidate the command-line arguments with those of the arguments
    /// file, if there is one, preferring the command line.
    ///
    /// This should only ever merge arguments, and not try to make sense of
    /// them.
    pub fn merge(self) -> Result<Args, CliError> {
        let cli_args = self;
        let arg_file = match &cli_args.args_file {
            None => return Ok(cli_args),
            Some(f) => f,
        };
        debug!("Merging command-line arguments with the argument file");

        // Ensure all of the file args are accounted for by pattern matching.
        let Args {
            dataset: _,
            args_file: _,
            source_file,
            ra,
            dec,
            flux,
            size,
            alpha,
            out,
            work_dir,
            test,
            five_second_rounding,
            verbosity: _,
            no_progress_bars: _,
        } = unpack_arg_file(arg_file)?;

        Ok(Args {
            dataset: cli_args.dataset,
            args_file: None,
            source_file: cli_args.source_file.or(source_file),
            ra: cli_args.ra.or(ra),
            dec: cli_args.dec.or(dec),
            flux: cli_args.flux.or(flux),
            size: cli_args.size.or(size),
            alpha: cli_args.alpha.or(alpha),
            out: cli_args.out.or(out),
            work_dir: cli_args.work_dir.or(work_dir),
            test: cli_args.test || test,
            five_second_rounding: cli_args.five_second_rounding || five_second_rounding,
            verbosity: cli_args.verbosity,
            no_progress_bars: cli_args.no_progress_bars,
        })
    }

    /// Check that the arguments make sense and turn them into the parameters
    /// of a run.
    pub fn into_params(self) -> Result<PipelineParams, CliError> {
        let Args {
            dataset,
            args_file: _,
            source_file,
            ra,
            dec,
            flux,
            size,
            alpha,
            out,
            work_dir,
            test,
            five_second_rounding,
            verbosity: _,
            no_progress_bars,
        } = self;

        if !dataset.is_dir() {
            return Err(CliError::NoDataset(dataset));
        }

        let output = out.unwrap_or_else(|| {
            let mut s = OsString::from(dataset.as_os_str());
            s.push(".sourceadd");
            PathBuf::from(s)
        });

        let sources = match (source_file, ra, dec, flux, size, alpha) {
            (Some(file), None, None, None, None, None) => {
                if !file.is_file() {
                    return Err(CliError::SourceFileMissing(file));
                }
                SourceSelection::File(file)
            }
            (Some(_), ..) => return Err(CliError::SourceFileAndParams),
            (None, Some(ra), Some(dec), Some(flux), Some(size), Some(alpha)) => {
                SourceSelection::Injected(InjectedSourceSpec::from_args(
                    &ra, &dec, &flux, &size, &alpha,
                )?)
            }
            (None, ..) => return Err(CliError::NotEnoughSourceInfo),
        };

        let work_dir = work_dir
            .or_else(|| dataset.parent().map(Path::to_path_buf))
            .unwrap_or_default();

        Ok(PipelineParams {
            dataset,
            output,
            work_dir,
            sources,
            five_second_rounding,
            test_mode: test,
            progress_bars: !no_progress_bars,
        })
    }
}
