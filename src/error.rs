//! All of the errors that can stop a run.

use thiserror::Error;

use crate::{cli::CliError, pipeline::PipelineError};

#[derive(Error, Debug)]
pub enum SourceAdderError {
    #[error(transparent)]
    Cli(#[from] CliError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_messages_pass_through() {
        let e = SourceAdderError::from(CliError::NoDataset(PathBuf::from("c1234.uv")));
        assert_eq!(e.to_string(), "No valid dataset found at c1234.uv");

        let inner = PipelineError::NoScans;
        let expected = inner.to_string();
        let e = SourceAdderError::from(inner);
        assert!(matches!(e, SourceAdderError::Pipeline(PipelineError::NoScans)));
        assert_eq!(e.to_string(), expected);
    }
}
