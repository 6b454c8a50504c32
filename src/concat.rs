//! Batched concatenation of many datasets.
//!
//! MIRIAD truncates long keyword values, so the comma-separated list given to
//! `uvcat vis=` must stay under [`MAX_CONCAT_LENGTH`] characters. When the next
//! dataset wouldn't fit, everything accumulated so far is merged into an
//! intermediate dataset, which then stands in for all of them.

use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::toolkit::{Toolkit, ToolkitError};

/// The joined list of datasets is always shorter than this.
pub const MAX_CONCAT_LENGTH: usize = 950;

#[derive(Error, Debug)]
pub enum ConcatError {
    #[error("The dataset name '{id}' is too long to be concatenated with anything ({max} characters at most)")]
    IdentifierTooLong { id: String, max: usize },

    #[error("There are no datasets to concatenate")]
    Empty,

    #[error(transparent)]
    Toolkit(#[from] ToolkitError),
}

fn id_len(id: &Path) -> usize {
    id.display().to_string().len()
}

/// The name of the `n`th intermediate dataset, next to and named after `first`.
fn intermediate_name(first: &Path, n: usize) -> PathBuf {
    let stem = first
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    first.with_file_name(format!("{stem}.cat{n}"))
}

#[derive(Debug)]
pub struct ConcatAccumulator {
    ids: Vec<PathBuf>,

    /// The length of `ids` joined with commas.
    joined_len: usize,

    max_len: usize,

    /// How many intermediate datasets have been made.
    num_merges: usize,
}

impl Default for ConcatAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConcatAccumulator {
    pub fn new() -> ConcatAccumulator {
        ConcatAccumulator::with_max_length(MAX_CONCAT_LENGTH)
    }

    pub fn with_max_length(max_len: usize) -> ConcatAccumulator {
        ConcatAccumulator {
            ids: vec![],
            joined_len: 0,
            max_len,
            num_merges: 0,
        }
    }

    pub fn ids(&self) -> &[PathBuf] {
        &self.ids
    }

    pub fn joined_len(&self) -> usize {
        self.joined_len
    }

    pub fn num_merges(&self) -> usize {
        self.num_merges
    }

    /// Queue `id` for concatenation, merging what has already been queued if
    /// `id` won't fit alongside it.
    pub fn add(&mut self, id: PathBuf, toolkit: &mut dyn Toolkit) -> Result<(), ConcatError> {
        let len = id_len(&id);
        loop {
            let new_len = if self.ids.is_empty() {
                len
            } else {
                self.joined_len + 1 + len
            };
            if new_len < self.max_len {
                self.ids.push(id);
                self.joined_len = new_len;
                return Ok(());
            }

            // Merging a lone dataset into another can't make room.
            if self.ids.len() < 2 {
                return Err(ConcatError::IdentifierTooLong {
                    id: id.display().to_string(),
                    max: self.max_len,
                });
            }
            self.merge(toolkit)?;
        }
    }

    /// Merge everything queued into an intermediate dataset, which becomes the
    /// only thing queued.
    fn merge(&mut self, toolkit: &mut dyn Toolkit) -> Result<(), ConcatError> {
        let output = intermediate_name(&self.ids[0], self.num_merges + 1);
        debug!(
            "Merging {} datasets into {}",
            self.ids.len(),
            output.display()
        );
        toolkit.concatenate(&self.ids, &output)?;
        self.num_merges += 1;
        self.joined_len = id_len(&output);
        self.ids = vec![output];
        Ok(())
    }

    /// Concatenate everything queued into `output`.
    pub fn finish(self, output: &Path, toolkit: &mut dyn Toolkit) -> Result<(), ConcatError> {
        if self.ids.is_empty() {
            return Err(ConcatError::Empty);
        }
        debug!(
            "Concatenating {} datasets into {}",
            self.ids.len(),
            output.display()
        );
        toolkit.concatenate(&self.ids, output)?;
        Ok(())
    }
}
