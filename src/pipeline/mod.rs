//! The whole job: learn about the dataset, simulate each pointing, trim and
//! join the simulations, and add them to the real visibilities.

mod error;

pub use error::PipelineError;

use std::path::{Path, PathBuf};

use hifitime::Duration;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use itertools::Itertools;
use log::{debug, info, warn};
use marlu::LatLngHeight;
use vec1::Vec1;

use crate::{
    concat::ConcatAccumulator,
    offsets::{plan_offsets, InjectedSourceSpec},
    read::{parse_array_report, parse_index_report, parse_variable_log, varlog::CYCLE_TIME_VARIABLE},
    segments::{segment_observation, Segment},
    sexagesimal::sexagesimal_dms_to_degrees,
    time::{format_miriad_time, RoundingPolicy},
    toolkit::{SimulationParams, Toolkit, BASEUNIT},
    transit::{hour_angle_range, lst_hours, transit_time},
    write::{write_antenna_file, write_source_catalog},
    ObservationIndex, SpectralWindow, TelescopeArray,
};

/// The scan interval given to `uvindex` \[minutes\]. It's short so that every
/// change of pointing gets its own line.
pub const INDEX_INTERVAL: f64 = 0.1;

/// Where the sources to add come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceSelection {
    /// A ready-made `uvgen` source file, used unchanged for every pointing.
    File(PathBuf),

    /// Sources at absolute positions, re-expressed relative to each pointing.
    Injected(Vec<InjectedSourceSpec>),
}

#[derive(Debug, Clone)]
pub struct PipelineParams {
    /// The real data.
    pub dataset: PathBuf,

    /// Where the real data with the new sources goes.
    pub output: PathBuf,

    /// Where transient files and datasets are written.
    pub work_dir: PathBuf,

    pub sources: SourceSelection,

    /// Round transit times to a second ending in 5, rather than to the centre
    /// of an integration cycle.
    pub five_second_rounding: bool,

    /// Only simulate the first segment, and don't make any output.
    pub test_mode: bool,

    pub progress_bars: bool,
}

/// What we need to know about the real data.
#[derive(Debug, Clone)]
pub struct ObservationMetadata {
    pub index: ObservationIndex,

    pub array: TelescopeArray,

    pub location: LatLngHeight,

    /// The array latitude \[degrees\].
    pub latitude_deg: f64,

    pub cycle_time: Duration,

    pub segments: Vec1<Segment>,
}

/// The names of everything a run writes, apart from the final output.
struct WorkPaths {
    /// The work directory joined with the dataset's name.
    prefix: PathBuf,
}

impl WorkPaths {
    fn new(work_dir: &Path, dataset: &Path) -> WorkPaths {
        let name = dataset
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string());
        WorkPaths {
            prefix: work_dir.join(name),
        }
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut s = self.prefix.clone().into_os_string();
        s.push(suffix);
        PathBuf::from(s)
    }

    fn variable_log(&self) -> PathBuf {
        self.with_suffix(".varlog")
    }

    fn antenna_file(&self) -> PathBuf {
        self.with_suffix(".antpos")
    }

    fn source_catalog(&self, i_segment: usize) -> PathBuf {
        self.with_suffix(&format!(".seg{i_segment:03}.sources"))
    }

    fn simulated(&self, i_segment: usize) -> PathBuf {
        self.with_suffix(&format!(".seg{i_segment:03}.uvgen"))
    }

    fn filtered(&self, i_segment: usize) -> PathBuf {
        self.with_suffix(&format!(".seg{i_segment:03}.uvcat"))
    }

    fn merged(&self) -> PathBuf {
        self.with_suffix(".uvgen")
    }
}

/// The `corr` keyword of `uvgen`: the number of channels, one spectral window,
/// the offset of the band centre and the bandwidth \[MHz\]. The offset is
/// truncated to a whole number of MHz.
pub fn correlator_setup(window: &SpectralWindow) -> String {
    let spacing_mhz = window.freq_increment * 1000.0;
    let offset_mhz = f64::from(window.num_channels / 2) * spacing_mhz;
    let width_mhz = spacing_mhz * f64::from(window.num_channels);
    format!(
        "{},1,{},{width_mhz:.3}",
        window.num_channels,
        offset_mhz.trunc() as i64
    )
}

/// The `freq` keyword of `uvgen`: the first channel's frequency \[GHz\] and no
/// frequency dependence.
pub fn frequency_setup(window: &SpectralWindow) -> String {
    format!("{:.3},0.0", window.first_freq)
}

/// The `stokes` keyword of `uvgen`.
pub fn stokes_setup(polarisations: &[String]) -> String {
    polarisations.iter().map(|p| p.to_lowercase()).join(",")
}

impl PipelineParams {
    /// Run the MIRIAD tasks that describe the dataset, and check that it has
    /// everything needed to simulate it.
    pub fn gather_metadata(
        &self,
        toolkit: &mut dyn Toolkit,
    ) -> Result<ObservationMetadata, PipelineError> {
        let paths = WorkPaths::new(&self.work_dir, &self.dataset);
        gather_metadata(&self.dataset, &paths, toolkit)
    }

    pub fn run(&self, toolkit: &mut dyn Toolkit) -> Result<(), PipelineError> {
        let paths = WorkPaths::new(&self.work_dir, &self.dataset);
        let meta = gather_metadata(&self.dataset, &paths, toolkit)?;

        if let SourceSelection::File(file) = &self.sources {
            if meta.index.sources.len() > 1 {
                warn!(
                    "There are {} pointings, but the source file {} will be used for all of them",
                    meta.index.sources.len(),
                    file.display()
                );
                warn!("This is probably not what you wanted, but continuing in case it is");
            }
        }

        let rounding = if self.five_second_rounding {
            RoundingPolicy::FiveSecond
        } else {
            RoundingPolicy::CycleCentre(meta.cycle_time)
        };
        let half_cycle = meta.cycle_time / 2.0;
        // Only the first frequency configuration and its first window are
        // simulated.
        let window = &meta.index.freq_configs[0].windows[0];
        let corr = correlator_setup(window);
        let freq = frequency_setup(window);
        let stokes = stokes_setup(&meta.index.polarisations);
        let telescope = meta.array.telescope.to_lowercase();
        let lat = format!("{:.6}", meta.latitude_deg);
        debug!("uvgen corr={corr} freq={freq} stokes={stokes} telescop={telescope} lat={lat}");

        let num_segments = if self.test_mode {
            info!("Test mode: only the first segment will be simulated");
            1
        } else {
            meta.segments.len()
        };

        let multi_progress = MultiProgress::with_draw_target(if self.progress_bars {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        });
        let pb = multi_progress.add(
            ProgressBar::new(num_segments as _)
                .with_style(
                    ProgressStyle::default_bar()
                        .template("{msg:17}: [{wide_bar:.blue}] {pos:2}/{len:2} segments ({elapsed_precise}<{eta_precise})").unwrap()
                        .progress_chars("=> "),
                )
                .with_position(0)
                .with_message("Simulating"),
        );
        pb.tick();

        let antenna_file = paths.antenna_file();
        let mut accumulator = ConcatAccumulator::new();
        for (i_segment, segment) in meta.segments.iter().enumerate().take(num_segments) {
            info!(
                "Segment {}/{}: {} from {} to {} ({} records)",
                i_segment + 1,
                meta.segments.len(),
                segment.source,
                format_miriad_time(segment.start),
                format_miriad_time(segment.end),
                segment.records.len()
            );
            let entry = meta
                .index
                .source(&segment.source)
                .ok_or_else(|| PipelineError::UnknownSource(segment.source.clone()))?;
            let pointing = entry.radec().map_err(|err| PipelineError::BadPointing {
                name: entry.name.clone(),
                err,
            })?;

            let transit = transit_time(segment, pointing, meta.location);
            let rounded_transit = rounding.apply(transit.time);
            debug!(
                "Hour angles {:.6} to {:.6}; transit at {}, rounded to {}",
                transit.start_hour_angle, transit.end_hour_angle, transit.time, rounded_transit
            );
            debug!(
                "LST at transit (check): {:.6} hours",
                lst_hours(transit.time, meta.location)
            );
            let harange = hour_angle_range(segment, rounded_transit, meta.cycle_time);
            debug!("uvgen harange={harange}");

            let source = match &self.sources {
                SourceSelection::File(file) => file.clone(),
                SourceSelection::Injected(specs) => {
                    let catalog = paths.source_catalog(i_segment);
                    write_source_catalog(&catalog, &plan_offsets(pointing, specs))?;
                    catalog
                }
            };
            write_antenna_file(&antenna_file, &meta.array.antennas)?;

            let params = SimulationParams {
                source,
                antenna_file: antenna_file.clone(),
                baseunit: BASEUNIT,
                telescope: telescope.clone(),
                corr: corr.clone(),
                time: rounded_transit,
                freq: freq.clone(),
                radec: format!("{},{}", entry.ra, entry.dec),
                harange,
                stokes: stokes.clone(),
                lat: lat.clone(),
                out: paths.simulated(i_segment),
            };
            toolkit.simulate(&params)?;

            let filtered = paths.filtered(i_segment);
            toolkit.filter_time(
                &params.out,
                segment.start - half_cycle,
                segment.end + half_cycle,
                &filtered,
            )?;
            accumulator.add(filtered, toolkit)?;
            pb.inc(1);
        }
        pb.finish_with_message("Simulated");

        if self.test_mode {
            info!("Test mode: not combining the simulation with the data");
            return Ok(());
        }

        let merged = paths.merged();
        info!("Concatenating simulations into {}", merged.display());
        accumulator.finish(&merged, toolkit)?;
        info!(
            "Adding the simulation to {}, writing {}",
            self.dataset.display(),
            self.output.display()
        );
        toolkit.add_model(&self.dataset, &merged, &self.output)?;
        info!("Wrote {}", self.output.display());
        Ok(())
    }
}

fn gather_metadata(
    dataset: &Path,
    paths: &WorkPaths,
    toolkit: &mut dyn Toolkit,
) -> Result<ObservationMetadata, PipelineError> {
    info!("Reading the metadata of {}", dataset.display());
    let index = parse_index_report(&toolkit.index_report(dataset, INDEX_INTERVAL)?)?;
    let array = parse_array_report(&toolkit.array_report(dataset)?)?;

    let log = paths.variable_log();
    toolkit.dump_variables(dataset, &log)?;
    let log_text = std::fs::read_to_string(&log).map_err(|err| PipelineError::ReadLog {
        path: log.clone(),
        err,
    })?;
    let cycle_time = parse_variable_log(&log_text, CYCLE_TIME_VARIABLE)?
        .map(Duration::from_seconds)
        .ok_or(PipelineError::MissingCycleTime(CYCLE_TIME_VARIABLE))?;

    if index
        .freq_configs
        .first()
        .map(|fc| fc.windows.is_empty())
        .unwrap_or(true)
    {
        return Err(PipelineError::NoFrequencyConfig);
    }
    let segments =
        Vec1::try_from_vec(segment_observation(&index.records)).map_err(|_| PipelineError::NoScans)?;

    let location = array.location().map_err(PipelineError::BadArrayLocation)?;
    let latitude_deg =
        sexagesimal_dms_to_degrees(&array.latitude).map_err(PipelineError::BadArrayLocation)?;

    info!(
        "{} records in {} segments over {} pointings; cycle time {}",
        index.records.len(),
        segments.len(),
        index.sources.len(),
        cycle_time
    );
    debug!(
        "{} at latitude {:.6} with {} antennas",
        array.telescope,
        latitude_deg,
        array.antennas.len()
    );

    Ok(ObservationMetadata {
        index,
        array,
        location,
        latitude_deg,
        cycle_time,
        segments,
    })
}
