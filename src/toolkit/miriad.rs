//! Running the real MIRIAD tasks.

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use hifitime::Epoch;
use itertools::Itertools;
use log::{debug, trace};

use super::{time_selection, SimulationParams, Toolkit, ToolkitError};
use crate::write::remove_if_present;

/// Runs MIRIAD tasks found on `PATH`.
#[derive(Debug, Default)]
pub struct MiriadToolkit;

impl MiriadToolkit {
    /// Run `task` with `keyword=value` arguments, returning what it printed.
    fn run(&self, task: &'static str, keywords: &[(&str, String)]) -> Result<String, ToolkitError> {
        let args = keywords
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>();
        debug!("Running: {task} {}", args.iter().join(" "));

        let output = Command::new(task)
            .args(&args)
            .output()
            .map_err(|err| ToolkitError::Spawn { task, err })?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        trace!("{task} output:\n{stdout}");
        if !output.status.success() {
            return Err(ToolkitError::Failed {
                task,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(stdout)
    }

    /// Run a task that writes `output`, which MIRIAD refuses to do if it
    /// already exists. The output must exist afterwards.
    fn run_to(
        &self,
        task: &'static str,
        keywords: &[(&str, String)],
        output: &Path,
    ) -> Result<(), ToolkitError> {
        remove_if_present(output)?;
        self.run(task, keywords)?;
        if output.exists() {
            Ok(())
        } else {
            Err(ToolkitError::MissingOutput {
                task,
                path: output.to_path_buf(),
            })
        }
    }
}

fn path_str(path: &Path) -> String {
    path.display().to_string()
}

impl Toolkit for MiriadToolkit {
    fn index_report(&mut self, dataset: &Path, interval: f64) -> Result<String, ToolkitError> {
        self.run(
            "uvindex",
            &[("vis", path_str(dataset)), ("interval", interval.to_string())],
        )
    }

    fn array_report(&mut self, dataset: &Path) -> Result<String, ToolkitError> {
        self.run(
            "uvlist",
            &[
                ("vis", path_str(dataset)),
                ("options", "array,full".to_string()),
            ],
        )
    }

    fn dump_variables(&mut self, dataset: &Path, log: &Path) -> Result<(), ToolkitError> {
        self.run_to(
            "uvlist",
            &[
                ("vis", path_str(dataset)),
                ("options", "variables".to_string()),
                ("log", path_str(log)),
            ],
            log,
        )
    }

    fn simulate(&mut self, params: &SimulationParams) -> Result<(), ToolkitError> {
        self.run_to("uvgen", &params.keywords(), &params.out)
    }

    fn filter_time(
        &mut self,
        input: &Path,
        from: Epoch,
        to: Epoch,
        output: &Path,
    ) -> Result<(), ToolkitError> {
        self.run_to(
            "uvcat",
            &[
                ("vis", path_str(input)),
                ("select", time_selection(from, to)),
                ("out", path_str(output)),
            ],
            output,
        )
    }

    fn concatenate(&mut self, inputs: &[PathBuf], output: &Path) -> Result<(), ToolkitError> {
        self.run_to(
            "uvcat",
            &[
                ("vis", inputs.iter().map(|p| p.display()).join(",")),
                ("out", path_str(output)),
            ],
            output,
        )
    }

    fn add_model(&mut self, base: &Path, model: &Path, output: &Path) -> Result<(), ToolkitError> {
        self.run_to(
            "uvmodel",
            &[
                ("vis", path_str(base)),
                ("model", path_str(model)),
                ("select", "-auto".to_string()),
                ("options", "add".to_string()),
                ("out", path_str(output)),
            ],
            output,
        )
    }
}
