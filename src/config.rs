//! Dataset configuration
//!
//! The configuration is a JSON document listing where products and masks
//! live, which bands make up a feature vector and which ground-truth
//! algorithms feed training and validation. The order of every band list is
//! preserved: it is the order rasters appear in each emitted pair.

use crate::types::{FloodError, FloodResult, Level};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Dataset generation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Training,
    Validation,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Training => "training",
            Mode::Validation => "validation",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = FloodError;

    fn from_str(s: &str) -> FloodResult<Self> {
        match s.to_lowercase().as_str() {
            "training" => Ok(Mode::Training),
            "validation" => Ok(Mode::Validation),
            other => Err(FloodError::Config(format!(
                "Mode needs to be 'training' or 'validation': {}",
                other
            ))),
        }
    }
}

/// Filesystem locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathConfig {
    /// Working directory synthetic bands are written to
    #[serde(default)]
    pub wdir: PathBuf,
    #[serde(default)]
    pub training: Option<PathBuf>,
    #[serde(default)]
    pub validation: Option<PathBuf>,
    /// DEM (MNT) directory
    #[serde(default)]
    pub mnt: Option<PathBuf>,
    /// Mask root per ground-truth algorithm
    #[serde(default)]
    pub masks: BTreeMap<String, PathBuf>,
}

/// An extra raster looked up per tile (e.g. HAND)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalBand {
    pub band: String,
    pub path: PathBuf,
}

/// Raster inputs, in feature-vector order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub bands_used: Vec<String>,
    #[serde(default)]
    pub synthetic_bands: Vec<String>,
    #[serde(default)]
    pub mnt_used: Vec<String>,
    #[serde(default)]
    pub additional_bands: Vec<AdditionalBand>,
}

/// Ground-truth algorithms used per mode
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroundTruthConfig {
    #[serde(default)]
    pub train: Vec<String>,
    #[serde(default)]
    pub val: Vec<String>,
}

fn default_levels() -> Vec<String> {
    vec!["l1c".to_string(), "l2a".to_string()]
}

fn default_tolerance_minutes() -> i64 {
    60
}

/// Complete dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default)]
    pub path: PathConfig,
    #[serde(default)]
    pub inputs: InputConfig,
    #[serde(default)]
    pub ground_truth: GroundTruthConfig,
    #[serde(default)]
    pub tiles_excluded: Vec<String>,
    #[serde(default = "default_levels")]
    pub levels: Vec<String>,
    /// Maximum distance between a mask date and an acquisition
    #[serde(default = "default_tolerance_minutes")]
    pub max_timedelta_minutes: i64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathConfig::default(),
            inputs: InputConfig::default(),
            ground_truth: GroundTruthConfig::default(),
            tiles_excluded: Vec::new(),
            levels: default_levels(),
            max_timedelta_minutes: default_tolerance_minutes(),
        }
    }
}

/// A `<shortName>_<bandCode>` declaration, e.g. `s2_B03`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandDeclaration {
    pub short_name: String,
    pub code: String,
}

impl BandDeclaration {
    pub fn parse(declaration: &str) -> FloodResult<Self> {
        match declaration.split_once('_') {
            Some((short_name, code)) if !short_name.is_empty() && !code.is_empty() => Ok(Self {
                short_name: short_name.to_string(),
                code: code.to_string(),
            }),
            _ => Err(FloodError::Config(format!(
                "Band declaration must look like <platform>_<band>: '{}'",
                declaration
            ))),
        }
    }

    pub fn applies_to(&self, short_name: &str) -> bool {
        self.short_name == short_name
    }
}

/// Ground-truth algorithm and the directory its masks live in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskSource {
    pub algorithm: String,
    pub root: PathBuf,
}

impl DatasetConfig {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> FloodResult<Self> {
        log::info!("Reading dataset configuration: {}", path.as_ref().display());
        let content = fs::read_to_string(&path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> FloodResult<Self> {
        let config: DatasetConfig = serde_json::from_str(content)?;
        config.levels()?;
        config.real_bands()?;
        config.synthetic_bands()?;
        Ok(config)
    }

    pub fn real_bands(&self) -> FloodResult<Vec<BandDeclaration>> {
        self.inputs
            .bands_used
            .iter()
            .map(|b| BandDeclaration::parse(b))
            .collect()
    }

    pub fn synthetic_bands(&self) -> FloodResult<Vec<BandDeclaration>> {
        self.inputs
            .synthetic_bands
            .iter()
            .map(|b| BandDeclaration::parse(b))
            .collect()
    }

    pub fn levels(&self) -> FloodResult<Vec<Level>> {
        self.levels
            .iter()
            .map(|l| {
                Level::parse(l)
                    .ok_or_else(|| FloodError::Config(format!("Unknown product level: {}", l)))
            })
            .collect()
    }

    pub fn tolerance(&self) -> Duration {
        Duration::minutes(self.max_timedelta_minutes)
    }

    /// Short names of every platform a band is declared for, first-seen order
    pub fn platforms(&self) -> FloodResult<Vec<String>> {
        let mut platforms: Vec<String> = Vec::new();
        for decl in self.real_bands()?.into_iter().chain(self.synthetic_bands()?) {
            if !platforms.contains(&decl.short_name) {
                platforms.push(decl.short_name);
            }
        }
        Ok(platforms)
    }

    /// Product root for the given mode
    pub fn root(&self, mode: Mode) -> FloodResult<&Path> {
        let root = match mode {
            Mode::Training => self.path.training.as_deref(),
            Mode::Validation => self.path.validation.as_deref(),
        };
        root.ok_or_else(|| {
            FloodError::Config(format!("No product path configured for {}", mode.as_str()))
        })
    }

    /// Mask sources for the given mode, in configuration order
    pub fn mask_sources(&self, mode: Mode) -> FloodResult<Vec<MaskSource>> {
        let algorithms = match mode {
            Mode::Training => &self.ground_truth.train,
            Mode::Validation => &self.ground_truth.val,
        };
        algorithms
            .iter()
            .map(|algo| {
                let algorithm = algo.to_lowercase();
                let root = self.path.masks.get(&algorithm).cloned().ok_or_else(|| {
                    FloodError::Config(format!("No mask path configured for algorithm {}", algorithm))
                })?;
                Ok(MaskSource { algorithm, root })
            })
            .collect()
    }
}
