//! Analysis configuration via TOML files.
//!
//! The configuration is an explicit immutable value passed by reference into
//! matchers and catalogs; nothing in the crate reads process-wide state.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Version of the event-record format.
///
/// `V2` recordings carry end-orientation vectors and cumulative
/// growth/shrink increment counters; `V1` recordings do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaVersion {
    V1,
    V2,
}

impl SchemaVersion {
    pub fn from_number(n: u32) -> Result<Self, ConfigError> {
        match n {
            1 => Ok(SchemaVersion::V1),
            2 => Ok(SchemaVersion::V2),
            other => Err(ConfigError::Parse(format!(
                "schema_version must be 1 or 2, got {}",
                other
            ))),
        }
    }

    /// Whether end-orientation vectors are recorded.
    pub fn has_orientation(self) -> bool {
        matches!(self, SchemaVersion::V2)
    }

    /// Whether cumulative growth/shrink counters are recorded.
    pub fn has_counters(self) -> bool {
        matches!(self, SchemaVersion::V2)
    }
}

/// A named cell sub-compartment: a half-open interval `[rad_min, rad_max)`
/// on the distance from the cell center in the xy plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub rad_min: f32,
    pub rad_max: f32,
}

impl Region {
    pub fn new(name: impl Into<String>, rad_min: f32, rad_max: f32) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigError::Parse("region name must not be empty".into()));
        }
        if !rad_min.is_finite() || rad_min < 0.0 {
            return Err(ConfigError::Parse(format!(
                "region '{}': rad_min must be finite and non-negative",
                name
            )));
        }
        if rad_max.is_nan() || rad_max <= rad_min {
            return Err(ConfigError::Parse(format!(
                "region '{}': rad_max must exceed rad_min",
                name
            )));
        }
        Ok(Self {
            name,
            rad_min,
            rad_max,
        })
    }

    /// The whole cell: `[0, +inf)`.
    pub fn full() -> Self {
        Self {
            name: "cell".to_string(),
            rad_min: 0.0,
            rad_max: f32::INFINITY,
        }
    }

    /// Half-open membership test on distance to the cell center.
    pub fn contains(&self, dist0: f32) -> bool {
        dist0 >= self.rad_min && dist0 < self.rad_max
    }
}

/// Run-wide analysis parameters.
///
/// Set once per run and shared read-only by every matcher and catalog.
///
/// # Examples
///
/// ```
/// use cytoskeleton_dynamics_core::AnalysisConfig;
///
/// let toml = r#"
///     [analysis]
///     schema_version = 2
///     edge_len = 0.008
///     end = 1
///
///     [[region]]
///     name = "interior"
///     rad_min = 0.0
///     rad_max = 5.0
/// "#;
/// let config = AnalysisConfig::from_toml_str(toml).unwrap();
/// assert_eq!(config.regions.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisConfig {
    /// Record-format version of the input recordings.
    pub schema: SchemaVersion,
    /// Physical length (μm) of one polymerization unit.
    pub edge_len: f32,
    /// Filament end the recordings describe: 0 or 1.
    pub end: u8,
    /// Named spatial regions for stratified statistics.
    pub regions: Vec<Region>,
    /// Destination directory for the JSON-line summary log.
    pub out_dir: PathBuf,
}

impl AnalysisConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            toml::from_str(toml_str).map_err(|err| ConfigError::Parse(err.to_string()))?;

        let schema = SchemaVersion::from_number(raw.analysis.schema_version)?;
        if !raw.analysis.edge_len.is_finite() || raw.analysis.edge_len <= 0.0 {
            return Err(ConfigError::Parse("edge_len must be positive".into()));
        }
        if raw.analysis.end > 1 {
            return Err(ConfigError::Parse("end must be 0 or 1".into()));
        }

        let regions = if raw.region.is_empty() {
            vec![Region::full()]
        } else {
            raw.region
                .into_iter()
                .map(|r| Region::new(r.name, r.rad_min, r.rad_max))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Self {
            schema,
            edge_len: raw.analysis.edge_len,
            end: raw.analysis.end,
            regions,
            out_dir: PathBuf::from(raw.analysis.out_dir),
        })
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            schema: SchemaVersion::V2,
            edge_len: 0.008,
            end: 1,
            regions: vec![Region::full()],
            out_dir: PathBuf::from("out"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    analysis: RawAnalysis,
    #[serde(default)]
    region: Vec<RawRegion>,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default = "default_schema_version")]
    schema_version: u32,
    #[serde(default = "default_edge_len")]
    edge_len: f32,
    #[serde(default = "default_end")]
    end: u8,
    #[serde(default = "default_out_dir")]
    out_dir: String,
}

impl Default for RawAnalysis {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            edge_len: default_edge_len(),
            end: default_end(),
            out_dir: default_out_dir(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawRegion {
    name: String,
    #[serde(default)]
    rad_min: f32,
    rad_max: f32,
}

fn default_schema_version() -> u32 {
    2
}

fn default_edge_len() -> f32 {
    0.008
}

fn default_end() -> u8 {
    1
}

fn default_out_dir() -> String {
    "out".to_string()
}

/// Configuration loading failures.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "IO error: {}", err),
            ConfigError::Parse(err) => write!(f, "Parse error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}
