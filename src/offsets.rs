//! The sources to inject, and their offsets from each pointing centre.
//!
//! `uvgen` wants source positions as offsets \[arcsec\] from the phase centre,
//! so every injected source must be re-expressed for every pointing.

use std::fmt;

use marlu::RADec;
use thiserror::Error;

use crate::sexagesimal::{sexagesimal_dms_to_degrees, sexagesimal_hms_to_degrees, SexagesimalError};

#[derive(Error, Debug, PartialEq)]
pub enum InputSpecError {
    #[error("Not every new source is properly specified: got {ra} RAs, {dec} Decs, {flux} flux densities, {size} sizes and {alpha} spectral indices")]
    MismatchedCounts {
        ra: usize,
        dec: usize,
        flux: usize,
        size: usize,
        alpha: usize,
    },

    #[error("Source {index}: size '{size}' must be three comma-separated numbers (bmaj,bmin,bpa)")]
    BadSize { index: usize, size: String },

    #[error("Source {index}: {err}")]
    BadPosition {
        index: usize,
        err: SexagesimalError,
    },
}

/// A source to add to the data, as requested by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct InjectedSourceSpec {
    pub radec: RADec,

    /// \[Jy\]
    pub flux: f64,

    /// Major axis \[arcsec\].
    pub bmaj: f64,

    /// Minor axis \[arcsec\].
    pub bmin: f64,

    /// Position angle \[degrees\].
    pub bpa: f64,

    pub alpha: f64,
}

/// Parse a `bmaj,bmin,bpa` size. `index` is only used for the error.
pub fn parse_size(size: &str, index: usize) -> Result<(f64, f64, f64), InputSpecError> {
    let bad_size = || InputSpecError::BadSize {
        index,
        size: size.to_string(),
    };
    let fields = size
        .split(',')
        .map(|f| f.trim().parse::<f64>().map_err(|_| bad_size()))
        .collect::<Result<Vec<_>, _>>()?;
    match fields.as_slice() {
        [bmaj, bmin, bpa] => Ok((*bmaj, *bmin, *bpa)),
        _ => Err(bad_size()),
    }
}

impl InjectedSourceSpec {
    /// Assemble source specifications from per-source argument lists. Each list
    /// must have one entry per source.
    pub fn from_args(
        ra: &[String],
        dec: &[String],
        flux: &[f64],
        size: &[String],
        alpha: &[f64],
    ) -> Result<Vec<InjectedSourceSpec>, InputSpecError> {
        let n = ra.len();
        if [dec.len(), flux.len(), size.len(), alpha.len()]
            .iter()
            .any(|&len| len != n)
        {
            return Err(InputSpecError::MismatchedCounts {
                ra: ra.len(),
                dec: dec.len(),
                flux: flux.len(),
                size: size.len(),
                alpha: alpha.len(),
            });
        }

        (0..n)
            .map(|i| {
                let bad_position = |err| InputSpecError::BadPosition { index: i, err };
                let ra_deg = sexagesimal_hms_to_degrees(&ra[i]).map_err(bad_position)?;
                let dec_deg = sexagesimal_dms_to_degrees(&dec[i]).map_err(bad_position)?;
                let (bmaj, bmin, bpa) = parse_size(&size[i], i)?;
                Ok(InjectedSourceSpec {
                    radec: RADec::from_degrees(ra_deg, dec_deg),
                    flux: flux[i],
                    bmaj,
                    bmin,
                    bpa,
                    alpha: alpha[i],
                })
            })
            .collect()
    }
}

/// One line of a `uvgen` source file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOffset {
    pub flux: f64,

    /// RA offset from the pointing centre, scaled by cos(dec) \[arcsec\].
    pub dra: f64,

    /// Dec offset from the pointing centre \[arcsec\].
    pub ddec: f64,

    pub bmaj: f64,
    pub bmin: f64,
    pub bpa: f64,
    pub alpha: f64,
}

impl fmt::Display for SourceOffset {
    /// The ten `uvgen` source fields; polarisation fraction, position angle of
    /// polarisation and Stokes V are all zero.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{:.4},{:.4},{},{},{},0,0,0,{}",
            self.flux, self.dra, self.ddec, self.bmaj, self.bmin, self.bpa, self.alpha
        )
    }
}

/// The offset of `source` from `pointing` \[arcsec, arcsec\]. The RA offset is
/// corrected by the cosine of the mean of the two declinations, and goes the
/// short way around the sky.
pub fn offset_arcsec(pointing: RADec, source: RADec) -> (f64, f64) {
    let mut dra_deg = source.ra.to_degrees() - pointing.ra.to_degrees();
    if dra_deg > 180.0 {
        dra_deg -= 360.0;
    } else if dra_deg <= -180.0 {
        dra_deg += 360.0;
    }
    let mean_dec = (source.dec + pointing.dec) / 2.0;
    let dra = dra_deg * 3600.0 * mean_dec.cos();
    let ddec = (source.dec.to_degrees() - pointing.dec.to_degrees()) * 3600.0;
    (dra, ddec)
}

/// Express every injected source relative to `pointing`.
pub fn plan_offsets(pointing: RADec, specs: &[InjectedSourceSpec]) -> Vec<SourceOffset> {
    specs
        .iter()
        .map(|spec| {
            let (dra, ddec) = offset_arcsec(pointing, spec.radec);
            SourceOffset {
                flux: spec.flux,
                dra,
                ddec,
                bmaj: spec.bmaj,
                bmin: spec.bmin,
                bpa: spec.bpa,
                alpha: spec.alpha,
            }
        })
        .collect()
}
