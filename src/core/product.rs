//! Product abstraction
//!
//! A [`Product`] is one acquisition discovered on disk. The variant
//! constructors (one per [`ProductClass`], see the platform modules) fill in
//! every attribute once; afterwards the value is immutable.

use crate::core::patterns::{classify, Classification, ProductClass, PREFIXED_TILE};
use crate::core::{landsat, pleiades, sentinel1, sentinel2, spot, terrasar, venus};
use crate::io::filesystem::{find, find_single, SearchOptions};
use crate::io::xml::{read_document, JobProcessingInformation};
use crate::types::{FloodError, FloodResult, Level, Platform, Resolution, Variant};
use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// How declared real bands are located for a product
#[derive(Debug, Clone, PartialEq)]
pub enum BandLookup {
    /// Pattern search `*<code>*.(tif|jp2)$` below the root
    Search { depth: usize },
    /// Sibling of the VV file with the polarisation token swapped
    PolarisationSibling,
}

/// Where a generated synthetic band is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticNaming {
    /// `<wdir>/<stem>_<CODE>.tif`
    StemSuffix,
    /// `<wdir>/<base>/<base with _vv_ replaced by _<code>_>.tif`
    PolarisationSubdir,
}

/// Synthetic bands a variant knows how to derive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticSupport {
    pub codes: &'static [&'static str],
    pub naming: SyntheticNaming,
}

impl SyntheticSupport {
    pub const NONE: SyntheticSupport = SyntheticSupport {
        codes: &[],
        naming: SyntheticNaming::StemSuffix,
    };
}

/// One discoverable acquisition
#[derive(Debug, Clone)]
pub struct Product {
    pub(crate) class: ProductClass,
    pub(crate) base: String,
    pub(crate) root: PathBuf,
    pub(crate) level: Level,
    pub(crate) tile: String,
    pub(crate) acquisition_time: NaiveDateTime,
    pub(crate) nodata: i32,
    pub(crate) base_resolution: Resolution,
    pub(crate) coarse_resolution: Resolution,
    pub(crate) metadata_path: Option<PathBuf>,
    pub(crate) valid: bool,
    pub(crate) relative_orbit: Option<u32>,
    pub(crate) bands: BandLookup,
    pub(crate) synthetic: SyntheticSupport,
    /// Files the product is made of when they are not simply below `root`
    pub(crate) components: Vec<PathBuf>,
}

impl Product {
    /// Classify `path` by its name and build the matching variant.
    ///
    /// Returns `Ok(None)` for names no pattern recognizes and for known but
    /// unsupported formats. A recognized product whose mandatory companion
    /// files are missing is an error.
    pub fn try_construct<P: AsRef<Path>>(path: P) -> FloodResult<Option<Product>> {
        let path = path.as_ref();
        let name = entry_name(path);
        match classify(&name) {
            Classification::Unrecognized => Ok(None),
            Classification::UnsupportedRecognized { platform, format } => {
                log::warn!("{} {} products are currently not supported: {}", platform, format, name);
                Ok(None)
            }
            Classification::Recognized(class) => Self::construct(class, path).map(Some),
        }
    }

    /// Build a product of a known class
    pub fn construct(class: ProductClass, path: &Path) -> FloodResult<Product> {
        let path = canonical(path);
        match class {
            ProductClass::Sentinel2Natif => sentinel2::natif(&path),
            ProductClass::Sentinel2Muscate => sentinel2::muscate(&path),
            ProductClass::Sentinel2Ssc => sentinel2::ssc(&path),
            ProductClass::Landsat8Natif | ProductClass::Landsat9Natif => landsat::natif(class, &path),
            ProductClass::Landsat8Muscate | ProductClass::Landsat9Muscate => {
                landsat::muscate(class, &path)
            }
            ProductClass::Landsat8Lc1 | ProductClass::Landsat9Lc1 => landsat::lc1(class, &path),
            ProductClass::Landsat8Lc2 | ProductClass::Landsat9Lc2 => landsat::lc2(class, &path),
            ProductClass::VenusMuscate => venus::muscate(&path),
            ProductClass::VenusNatif => venus::natif(&path),
            ProductClass::Spot5Muscate | ProductClass::Spot4Muscate => spot::muscate(class, &path),
            ProductClass::PleiadesTheia => pleiades::theia(&path),
            ProductClass::PleiadesPreprojected => pleiades::preprojected(&path),
            ProductClass::Sentinel1Tiled => sentinel1::tiled(&path),
            ProductClass::TerraSarX => terrasar::enhanced(&path),
        }
    }

    pub fn class(&self) -> ProductClass {
        self.class
    }

    pub fn platform(&self) -> Platform {
        self.class.platform()
    }

    pub fn short_name(&self) -> &'static str {
        self.platform().short_name()
    }

    pub fn variant(&self) -> Variant {
        self.class.variant()
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Tile or site identifier
    pub fn tile(&self) -> &str {
        &self.tile
    }

    pub fn acquisition_time(&self) -> NaiveDateTime {
        self.acquisition_time
    }

    pub fn nodata(&self) -> i32 {
        self.nodata
    }

    pub fn base_resolution(&self) -> Resolution {
        self.base_resolution
    }

    pub fn coarse_resolution(&self) -> Resolution {
        self.coarse_resolution
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Product name the attributes were parsed from
    pub fn base_name(&self) -> &str {
        &self.base
    }

    pub fn metadata_path(&self) -> Option<&Path> {
        self.metadata_path.as_deref()
    }

    /// True when the metadata/companion files required by the variant exist
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn relative_orbit(&self) -> Option<u32> {
        self.relative_orbit
    }

    pub fn components(&self) -> &[PathBuf] {
        &self.components
    }

    pub fn band_lookup(&self) -> &BandLookup {
        &self.bands
    }

    pub fn synthetic_support(&self) -> SyntheticSupport {
        self.synthetic
    }

    /// Search for files below the product root
    pub fn find_file(&self, pattern: &str, depth: usize) -> FloodResult<Vec<PathBuf>> {
        find(pattern, &self.root, SearchOptions::with_depth(depth))
    }

    /// Locate the raster of a declared real band
    pub fn find_band(&self, code: &str) -> FloodResult<PathBuf> {
        let missing = || FloodError::MissingDeclaredBand {
            band: code.to_string(),
            product: self.base.clone(),
        };

        match &self.bands {
            BandLookup::PolarisationSibling => {
                let name = format!("{}.tif", self.base.replace("_vv_", &format!("_{}_", code.to_lowercase())));
                let candidate = self.root.join(name);
                if candidate.is_file() {
                    Ok(candidate)
                } else {
                    Err(missing())
                }
            }
            BandLookup::Search { depth } => {
                let pattern = format!("*{}*.(tif|jp2)$", code);
                let matches = self.find_file(&pattern, *depth).map_err(|_| missing())?;
                if matches.len() > 1 {
                    log::debug!(
                        "{} files match band {} in {}, using {}",
                        matches.len(),
                        code,
                        self.base,
                        matches[0].display()
                    );
                }
                matches.into_iter().next().ok_or_else(missing)
            }
        }
    }

    /// Output location of a synthetic band below `wdir`
    pub fn synthetic_band_path(&self, wdir: &Path, code: &str) -> FloodResult<PathBuf> {
        let lower = code.to_lowercase();
        if !self.synthetic.codes.contains(&lower.as_str()) {
            return Err(FloodError::SyntheticBand {
                band: code.to_string(),
                product: self.base.clone(),
                reason: format!("unknown synthetic band for {}", self.platform()),
            });
        }

        match self.synthetic.naming {
            SyntheticNaming::StemSuffix => {
                Ok(wdir.join(format!("{}_{}.tif", stem(&self.base), code.to_uppercase())))
            }
            SyntheticNaming::PolarisationSubdir => {
                // The sum is symmetric; both spellings share one file
                let canonical_code = if lower == "vhplusvv" { "vvplusvh" } else { lower.as_str() };
                let name = self.base.replace("_vv_", &format!("_{}_", canonical_code));
                Ok(wdir.join(&self.base).join(format!("{}.tif", name)))
            }
        }
    }

    fn identity(&self) -> (NaiveDateTime, Level, Option<&Path>, &str, Platform) {
        (
            self.acquisition_time,
            self.level,
            self.metadata_path.as_deref(),
            self.tile.as_str(),
            self.platform(),
        )
    }

    /// Order by acquisition time (earliest first)
    pub fn cmp_acquisition(&self, other: &Product) -> Ordering {
        self.acquisition_time.cmp(&other.acquisition_time)
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Product {}

impl Hash for Product {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Product:   {}", self.base)?;
        writeln!(f, "Acq-Date:  {}", self.acquisition_time.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "Platform:  {}", self.platform())?;
        writeln!(f, "Level:     {}", self.level)?;
        writeln!(f, "Tile/Site: {}", self.tile)
    }
}

/// File or directory name of `path`
pub(crate) fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// `_`-separated token of a product name; negative indices count from the end
pub(crate) fn token(name: &str, index: isize) -> FloodResult<&str> {
    let parts: Vec<&str> = name.split('_').collect();
    let idx = if index < 0 {
        parts.len() as isize + index
    } else {
        index
    };
    usize::try_from(idx)
        .ok()
        .and_then(|i| parts.get(i).copied())
        .ok_or_else(|| FloodError::InvalidName {
            name: name.to_string(),
            reason: format!("no token at position {}", index),
        })
}

/// Name without everything from the first `.`
pub(crate) fn stem(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// Tile code of a site token, falling back to the raw token
pub(crate) fn tile_or_raw(site: &str) -> String {
    match PREFIXED_TILE.find(site) {
        Some(m) => m.as_str()[1..].to_string(),
        None => site.to_string(),
    }
}

/// Level encoded as `_L1C_` / `_L2A_` in MUSCATE names
pub(crate) fn muscate_level(name: &str) -> FloodResult<Level> {
    if name.contains("_L1C_") {
        Ok(Level::L1c)
    } else if name.contains("_L2A_") {
        Ok(Level::L2a)
    } else {
        Err(FloodError::InvalidName {
            name: name.to_string(),
            reason: "unknown product level".to_string(),
        })
    }
}

/// Level encoded as `L1VALD` / `L2VALD` in natif names
pub(crate) fn natif_level(name: &str) -> FloodResult<Level> {
    if name.contains("_L1VALD_") {
        Ok(Level::L1c)
    } else if name.contains("_L2VALD_") {
        Ok(Level::L2a)
    } else {
        Err(FloodError::InvalidName {
            name: name.to_string(),
            reason: "unknown product level".to_string(),
        })
    }
}

/// First match of `pattern` directly inside `dir`, if any
pub(crate) fn optional_file(dir: &Path, pattern: &str) -> Option<PathBuf> {
    find_single(pattern, dir, SearchOptions::with_depth(1)).ok()
}

/// `<stem>.HDR` header stored next to a natif `.DBL.DIR` folder
pub(crate) fn natif_header(path: &Path, name: &str) -> Option<PathBuf> {
    let parent = path.parent()?;
    let pattern = format!("^{}\\.HDR$", regex::escape(stem(name)));
    optional_file(parent, &pattern)
}

/// MUSCATE validity: L1C needs its metadata, L2A needs the `L2VALD` flag
pub(crate) fn muscate_validity(root: &Path, level: Level, metadata: Option<&Path>) -> bool {
    match level {
        Level::L1c => metadata.map_or(false, |m| m.exists()),
        Level::L2a => {
            let jpi = match find_single("*JPI_ALL.xml", root, SearchOptions::default()) {
                Ok(jpi) => jpi,
                Err(_) => return false,
            };
            match read_document::<JobProcessingInformation, _>(&jpi) {
                Ok(doc) => doc.is_l2_valid(),
                Err(e) => {
                    log::warn!("Cannot read {}: {}", jpi.display(), e);
                    false
                }
            }
        }
    }
}
