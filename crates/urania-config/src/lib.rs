use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Relative locations tried for `configs/urania.toml`, nearest first.
pub const SETTINGS_PATHS: &[&str] = &["configs/urania.toml", "../../configs/urania.toml"];

const DEFAULT_EPHEMERIS_PATH: &str = "/usr/local/share/swisseph";

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Directory holding `planets.txt`, `houses.txt`, `signs.txt` and `aspects.txt`.
    pub data_dir: PathBuf,
    /// Swiss Ephemeris data directory.
    pub ephemeris_path: PathBuf,
    /// `false` forces the analytic approximation even when ephemeris data is present.
    pub use_precise: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    /// Time of day used for daily transit moments.
    pub default_time: String,
    /// Number of consecutive days in a transit series.
    pub forecast_days: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UraniaSettings {
    pub engine: EngineSettings,
    pub report: ReportSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EngineToml {
    #[serde(default)]
    data_dir: Option<PathBuf>,
    #[serde(default)]
    ephemeris_path: Option<PathBuf>,
    #[serde(default = "default_use_precise")]
    use_precise: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ReportToml {
    #[serde(default)]
    default_time: Option<String>,
    #[serde(default)]
    forecast_days: Option<u32>,
}

fn default_use_precise() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    engine: Option<EngineToml>,
    #[serde(default)]
    report: Option<ReportToml>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            ephemeris_path: default_ephemeris_path(),
            use_precise: true,
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            default_time: "12:00".to_string(),
            forecast_days: 7,
        }
    }
}

impl Default for UraniaSettings {
    fn default() -> Self {
        Self {
            engine: EngineSettings::default(),
            report: ReportSettings::default(),
        }
    }
}

/// `SWISS_EPHEMERIS_PATH` if set, otherwise the conventional install location.
pub fn default_ephemeris_path() -> PathBuf {
    env::var("SWISS_EPHEMERIS_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_EPHEMERIS_PATH))
}

/// Try the common relative paths for `configs/urania.toml`.
pub fn read_settings_toml_text() -> anyhow::Result<String> {
    for p in SETTINGS_PATHS {
        if let Ok(c) = fs::read_to_string(p) {
            return Ok(c);
        }
    }
    anyhow::bail!("Could not load urania.toml from {:?}", SETTINGS_PATHS);
}

pub fn parse_settings(text: &str) -> anyhow::Result<UraniaSettings> {
    let root: RootConfigToml = toml::from_str(text)
        .map_err(|e| anyhow::anyhow!("Failed to parse urania.toml: {e}"))?;
    let defaults = UraniaSettings::default();

    let engine = match root.engine {
        Some(EngineToml {
            data_dir,
            ephemeris_path,
            use_precise,
        }) => EngineSettings {
            data_dir: data_dir.unwrap_or(defaults.engine.data_dir),
            ephemeris_path: ephemeris_path.unwrap_or(defaults.engine.ephemeris_path),
            use_precise,
        },
        None => defaults.engine,
    };

    let report = match root.report {
        Some(ReportToml {
            default_time,
            forecast_days,
        }) => ReportSettings {
            default_time: default_time.unwrap_or(defaults.report.default_time),
            forecast_days: forecast_days.unwrap_or(defaults.report.forecast_days),
        },
        None => defaults.report,
    };

    if report.forecast_days == 0 {
        anyhow::bail!("report.forecast_days must be at least 1");
    }

    Ok(UraniaSettings { engine, report })
}

pub fn load_settings_from(path: &Path) -> anyhow::Result<UraniaSettings> {
    let text = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    parse_settings(&text)
}

pub fn load_settings() -> anyhow::Result<UraniaSettings> {
    let text = read_settings_toml_text()?;
    parse_settings(&text)
}

/// Settings from `path` (or the default search paths); a missing file falls back to the
/// defaults with a warning. A file that exists but does not parse is still an error.
pub fn load_settings_or_default(path: Option<&Path>) -> anyhow::Result<UraniaSettings> {
    match path {
        Some(p) if p.exists() => load_settings_from(p),
        Some(p) => {
            log::warn!("Settings file {} not found, using defaults", p.display());
            Ok(UraniaSettings::default())
        }
        None => match read_settings_toml_text() {
            Ok(text) => parse_settings(&text),
            Err(e) => {
                log::warn!("{e}; using defaults");
                Ok(UraniaSettings::default())
            }
        },
    }
}
