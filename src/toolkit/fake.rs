//! A [`Toolkit`] that hands out canned reports and records every other
//! request.

use std::path::{Path, PathBuf};

use hifitime::Epoch;

use super::{SimulationParams, Toolkit, ToolkitError};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    IndexReport(PathBuf),
    ArrayReport(PathBuf),
    DumpVariables(PathBuf),
    Simulate(SimulationParams),
    FilterTime {
        input: PathBuf,
        from: Epoch,
        to: Epoch,
        output: PathBuf,
    },
    Concatenate {
        inputs: Vec<PathBuf>,
        output: PathBuf,
    },
    AddModel {
        base: PathBuf,
        model: PathBuf,
        output: PathBuf,
    },
}

#[derive(Debug, Default)]
pub(crate) struct RecordingToolkit {
    pub(crate) index_report: String,
    pub(crate) array_report: String,
    pub(crate) variable_log: String,
    pub(crate) calls: Vec<Call>,
}

impl RecordingToolkit {
    pub(crate) fn simulations(&self) -> Vec<&SimulationParams> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Simulate(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn concatenations(&self) -> Vec<(&[PathBuf], &Path)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Concatenate { inputs, output } => Some((inputs.as_slice(), output.as_path())),
                _ => None,
            })
            .collect()
    }
}

impl Toolkit for RecordingToolkit {
    fn index_report(&mut self, dataset: &Path, _interval: f64) -> Result<String, ToolkitError> {
        self.calls.push(Call::IndexReport(dataset.to_path_buf()));
        Ok(self.index_report.clone())
    }

    fn array_report(&mut self, dataset: &Path) -> Result<String, ToolkitError> {
        self.calls.push(Call::ArrayReport(dataset.to_path_buf()));
        Ok(self.array_report.clone())
    }

    fn dump_variables(&mut self, dataset: &Path, log: &Path) -> Result<(), ToolkitError> {
        self.calls.push(Call::DumpVariables(dataset.to_path_buf()));
        std::fs::write(log, &self.variable_log).map_err(|err| ToolkitError::Spawn {
            task: "uvlist",
            err,
        })
    }

    fn simulate(&mut self, params: &SimulationParams) -> Result<(), ToolkitError> {
        self.calls.push(Call::Simulate(params.clone()));
        Ok(())
    }

    fn filter_time(
        &mut self,
        input: &Path,
        from: Epoch,
        to: Epoch,
        output: &Path,
    ) -> Result<(), ToolkitError> {
        self.calls.push(Call::FilterTime {
            input: input.to_path_buf(),
            from,
            to,
            output: output.to_path_buf(),
        });
        Ok(())
    }

    fn concatenate(&mut self, inputs: &[PathBuf], output: &Path) -> Result<(), ToolkitError> {
        self.calls.push(Call::Concatenate {
            inputs: inputs.to_vec(),
            output: output.to_path_buf(),
        });
        Ok(())
    }

    fn add_model(&mut self, base: &Path, model: &Path, output: &Path) -> Result<(), ToolkitError> {
        self.calls.push(Call::AddModel {
            base: base.to_path_buf(),
            model: model.to_path_buf(),
            output: output.to_path_buf(),
        });
        Ok(())
    }
}
