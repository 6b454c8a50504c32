//! The small text files that `uvgen` reads, and the housekeeping of the
//! transient files and datasets a run leaves behind.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::trace;
use thiserror::Error;

use crate::{offsets::SourceOffset, Antenna};

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Couldn't write to {}: {err}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    #[error("Couldn't remove {}: {err}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },
}

/// Remove a file or a MIRIAD dataset (which is a directory) if it exists.
/// Nothing happens if it doesn't.
pub fn remove_if_present(path: &Path) -> Result<(), WriteError> {
    let result = if path.is_dir() {
        std::fs::remove_dir_all(path)
    } else if path.exists() {
        std::fs::remove_file(path)
    } else {
        return Ok(());
    };
    trace!("Removing {}", path.display());
    result.map_err(|err| WriteError::Remove {
        path: path.to_path_buf(),
        err,
    })
}

/// Write `lines` to a fresh file at `path`, one per line.
fn write_lines<I, T>(path: &Path, lines: I) -> Result<(), WriteError>
where
    I: IntoIterator<Item = T>,
    T: std::fmt::Display,
{
    remove_if_present(path)?;
    let io_err = |err| WriteError::Io {
        path: path.to_path_buf(),
        err,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    for line in lines {
        writeln!(writer, "{line}").map_err(io_err)?;
    }
    writer.flush().map_err(io_err)
}

/// Write the antenna positions in the fixed-width format `uvgen` expects. The
/// coordinates are written back in whatever units they were read in.
pub fn write_antenna_file(path: &Path, antennas: &[Antenna]) -> Result<(), WriteError> {
    write_lines(
        path,
        antennas
            .iter()
            .map(|a| format!("{:12.4} {:12.4} {:12.4}", a.x, a.y, a.z)),
    )
}

/// Write a `uvgen` source file, one line per source.
pub fn write_source_catalog(path: &Path, sources: &[SourceOffset]) -> Result<(), WriteError> {
    write_lines(path, sources)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_antenna_file_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("antpos");
        let antennas = [
            Antenna {
                number: 1,
                x: 2.0,
                y: 3.0,
                z: 4.0,
            },
            Antenna {
                number: 2,
                x: -1234.56789,
                y: 0.0,
                z: 98765.4321,
            },
        ];
        write_antenna_file(&path, &antennas).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "      2.0000       3.0000       4.0000\n  -1234.5679       0.0000   98765.4321\n"
        );
    }

    #[test]
    fn test_existing_file_is_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("antpos");
        std::fs::write(&path, "stale contents that are much longer than the new ones\n").unwrap();
        let antennas = [Antenna {
            number: 1,
            x: 2.0,
            y: 3.0,
            z: 4.0,
        }];
        write_antenna_file(&path, &antennas).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "      2.0000       3.0000       4.0000\n");
    }

    #[test]
    fn test_source_catalog() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seg000.sources");
        let sources = [
            SourceOffset {
                flux: 1.5,
                dra: -12.3456789,
                ddec: 36.0,
                bmaj: 10.0,
                bmin: 5.0,
                bpa: 45.0,
                alpha: -0.7,
            },
            SourceOffset {
                flux: 0.25,
                dra: 0.0,
                ddec: -0.5,
                bmaj: 0.0,
                bmin: 0.0,
                bpa: 0.0,
                alpha: 0.0,
            },
        ];
        write_source_catalog(&path, &sources).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines,
            [
                "1.5,-12.3457,36.0000,10,5,45,0,0,0,-0.7",
                "0.25,0.0000,-0.5000,0,0,0,0,0,0,0",
            ]
        );
    }

    #[test]
    fn test_remove_dataset_directory() {
        let dir = tempdir().unwrap();
        let dataset = dir.path().join("seg000.uvgen");
        std::fs::create_dir(&dataset).unwrap();
        std::fs::write(dataset.join("visdata"), "data").unwrap();
        remove_if_present(&dataset).unwrap();
        assert!(!dataset.exists());

        // Removing something that isn't there is fine.
        remove_if_present(&dataset).unwrap();
    }
}
