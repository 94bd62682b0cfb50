use crate::ephemeris::types::{EphemerisError, PositionSource};
use crate::zodiac::{normalize_degrees, CelestialBody};
use std::path::{Path, PathBuf};
use swisseph::swe::{calc_ut, set_ephe_path};

/// FLG_SWIEPH: compute from Swiss Ephemeris data files.
const FLG_SWIEPH: i32 = 2;

/// Apparent geocentric ecliptic longitudes from the Swiss Ephemeris.
pub struct SwissEphemeris {
    ephemeris_path: PathBuf,
    flags: i32,
}

impl SwissEphemeris {
    /// Open the ephemeris at `ephemeris_path`, or the configured default location.
    pub fn new(ephemeris_path: Option<PathBuf>) -> Result<Self, EphemerisError> {
        let path = ephemeris_path.unwrap_or_else(urania_config::default_ephemeris_path);

        if !path.exists() {
            return Err(EphemerisError::FileNotFound {
                path: path.display().to_string(),
                message: "Ephemeris path does not exist. Please ensure Swiss Ephemeris data files are installed.".to_string(),
            });
        }

        set_ephe_path(&ephe_path_arg(&path)?);
        log::debug!("Swiss Ephemeris data path set to {}", path.display());

        Ok(Self {
            ephemeris_path: path,
            flags: FLG_SWIEPH,
        })
    }

    pub fn ephemeris_path(&self) -> &Path {
        &self.ephemeris_path
    }
}

impl PositionSource for SwissEphemeris {
    fn name(&self) -> &'static str {
        "swisseph"
    }

    fn health_check(&self) -> Result<(), EphemerisError> {
        if self.ephemeris_path.exists() {
            Ok(())
        } else {
            Err(EphemerisError::Unavailable {
                message: format!(
                    "ephemeris data at {} is no longer readable",
                    self.ephemeris_path.display()
                ),
            })
        }
    }

    fn compute_position(
        &self,
        body: CelestialBody,
        julian_day: f64,
    ) -> Result<f64, EphemerisError> {
        let result = calc_ut(julian_day, body.swisseph_id() as u32, self.flags as u32).map_err(
            |e| EphemerisError::CalculationFailed {
                body,
                julian_day,
                message: format!("Swiss Ephemeris error: {}", e),
            },
        )?;

        check_return_flags(body, julian_day, self.flags, result.code)?;

        let longitude = result.out[0];
        if !longitude.is_finite() {
            return Err(EphemerisError::CalculationFailed {
                body,
                julian_day,
                message: format!("non-finite longitude {}", longitude),
            });
        }
        Ok(normalize_degrees(longitude))
    }
}

/// The data path as passed to the C library, which cannot take an interior NUL.
fn ephe_path_arg(path: &Path) -> Result<String, EphemerisError> {
    let arg = path.to_string_lossy().into_owned();
    if arg.contains('\0') {
        return Err(EphemerisError::FileNotFound {
            path: arg.replace('\0', "\\0"),
            message: "Ephemeris path contains a NUL byte".to_string(),
        });
    }
    Ok(arg)
}

/// `calc_ut` answers with the flags it actually used. Without data files it silently
/// switches to its built-in Moshier theory and drops `FLG_SWIEPH`.
fn check_return_flags(
    body: CelestialBody,
    julian_day: f64,
    requested: i32,
    returned: i32,
) -> Result<(), EphemerisError> {
    if requested & FLG_SWIEPH != 0 && returned & FLG_SWIEPH == 0 {
        return Err(EphemerisError::CalculationFailed {
            body,
            julian_day,
            message: format!(
                "Swiss Ephemeris data files not found, library fell back (flags {:#x})",
                returned
            ),
        });
    }
    Ok(())
}
