//! Product naming patterns and classification
//!
//! The table is evaluated top to bottom and the first match wins. Several
//! conventions overlap (the Pleiades theia volume name is a plain `FCGC`
//! search that would also hit a preprojected dataset carrying that token),
//! so the order below is part of the behaviour and must not be sorted.

use crate::types::{Platform, Variant};
use regex::Regex;
use std::sync::LazyLock;

/// Tile code with the MGRS `T` prefix, e.g. `T31TCJ`
pub static PREFIXED_TILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"T\d{2}[a-zA-Z]{3}").expect("valid tile regex"));

/// Bare tile code, e.g. `31TCJ`
pub static TILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}[a-zA-Z]{3}").expect("valid tile regex"));

/// Every supported (platform, format) combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductClass {
    Sentinel2Natif,
    Sentinel2Muscate,
    Sentinel2Ssc,
    Landsat8Natif,
    Landsat8Muscate,
    Landsat8Lc1,
    Landsat8Lc2,
    Landsat9Natif,
    Landsat9Muscate,
    Landsat9Lc1,
    Landsat9Lc2,
    VenusMuscate,
    VenusNatif,
    Spot5Muscate,
    Spot4Muscate,
    PleiadesTheia,
    PleiadesPreprojected,
    Sentinel1Tiled,
    TerraSarX,
}

impl ProductClass {
    pub fn platform(&self) -> Platform {
        use ProductClass::*;
        match self {
            Sentinel2Natif | Sentinel2Muscate | Sentinel2Ssc => Platform::Sentinel2,
            Landsat8Natif | Landsat8Muscate | Landsat8Lc1 | Landsat8Lc2 => Platform::Landsat8,
            Landsat9Natif | Landsat9Muscate | Landsat9Lc1 | Landsat9Lc2 => Platform::Landsat9,
            VenusMuscate | VenusNatif => Platform::Venus,
            Spot5Muscate => Platform::Spot5,
            Spot4Muscate => Platform::Spot4,
            PleiadesTheia | PleiadesPreprojected => Platform::Pleiades,
            Sentinel1Tiled => Platform::Sentinel1,
            TerraSarX => Platform::TerraSar,
        }
    }

    pub fn variant(&self) -> Variant {
        use ProductClass::*;
        match self {
            Sentinel2Natif | Landsat8Natif | Landsat9Natif | VenusNatif => Variant::Natif,
            Sentinel2Muscate | Landsat8Muscate | Landsat9Muscate | VenusMuscate | Spot5Muscate
            | Spot4Muscate => Variant::Muscate,
            Sentinel2Ssc => Variant::Ssc,
            Landsat8Lc1 | Landsat9Lc1 => Variant::Lc1,
            Landsat8Lc2 | Landsat9Lc2 => Variant::Lc2,
            PleiadesTheia => Variant::Theia,
            PleiadesPreprojected => Variant::Preprojected,
            Sentinel1Tiled => Variant::Tiled,
            TerraSarX => Variant::Eec,
        }
    }
}

/// What a pattern resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternTarget {
    Supported(ProductClass),
    /// Known format that cannot be turned into a product
    Unsupported {
        platform: Platform,
        format: &'static str,
    },
}

/// Outcome of classifying an entry name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Recognized(ProductClass),
    UnsupportedRecognized {
        platform: Platform,
        format: &'static str,
    },
    Unrecognized,
}

impl Classification {
    pub fn product_class(&self) -> Option<ProductClass> {
        match self {
            Classification::Recognized(class) => Some(*class),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct PatternEntry {
    pub regex: Regex,
    pub target: PatternTarget,
}

/// Ordered naming-pattern table
#[derive(Debug)]
pub struct PatternTable {
    entries: Vec<PatternEntry>,
}

const STANDARD_PATTERNS: &[(&str, PatternTarget)] = {
    use PatternTarget::Supported as S;
    use ProductClass::*;
    &[
        // Sentinel-2
        (r"^S2[AB]_MSIL(1C|2A)_\d+T\d+_N\d+_R\d+_T\d{2}[a-zA-Z]{3}_\d+T\d+.SAFE$", S(Sentinel2Natif)),
        (r"^SENTINEL2[ABX]_[-\d]+_L(1C|2A|3A)_T\d{2}[a-zA-Z]{3}_\w_V[\d-]+$", S(Sentinel2Muscate)),
        (r"^S2[AB]_OPER_SSC_L[12]VALD_\d{2}[a-zA-Z]{3}_\w+.DBL.DIR", S(Sentinel2Ssc)),
        (
            r"^S2[AB]_OPER_PRD_MSIL1C_PDMC_\w+_R\d+_V\w+.SAFE$",
            PatternTarget::Unsupported { platform: Platform::Sentinel2, format: "PRD" },
        ),
        // Landsat-8
        (r"^L8_\w{4}_L8C_L[12]VALD_[\d_]+.DBL.DIR$", S(Landsat8Natif)),
        (
            r"^LANDSAT8(-OLITIRS|-OLI-TIRS|-OLITIRS-XSTHPAN)?_(\d{8})-\d{6}-\d{3}_L(1C|2A)_T?\w+_[DC]_V\d*-\d*$",
            S(Landsat8Muscate),
        ),
        (r"^LC8\w+$", S(Landsat8Lc1)),
        (r"^LC08_L\w+$", S(Landsat8Lc2)),
        // Landsat-9
        (r"^L9_\w{4}_L9C_L[12]VALD_[\d_]+.DBL.DIR$", S(Landsat9Natif)),
        (
            r"^LANDSAT9(-OLITIRS|-OLI-TIRS|-OLITIRS-XSTHPAN)?_(\d{8})-\d{6}-\d{3}_L(1C|2A)_T?\w+_[DC]_V\d*-\d*$",
            S(Landsat9Muscate),
        ),
        (r"^LC9\w+$", S(Landsat9Lc1)),
        (r"^LC09_L\w+$", S(Landsat9Lc2)),
        // Venus
        (r"^VENUS(-XS)?_\d{8}-\d{6}-\d{3}_L(1C|2A|3A)_\w+_[DC]_V\d*-\d*$", S(VenusMuscate)),
        (r"^VE_\w{4}_VSC_L[12]VALD_\w+.DBL.DIR$", S(VenusNatif)),
        // Spot
        (r"^SPOT5-HR\w+-XS_(\d{8})-\d{6}-\d{3}_L(1C|2A)_[\w-]+_[DC]_V\d*-\d*$", S(Spot5Muscate)),
        (r"^SPOT4-HR\w+-XS_(\d{8})-\d{6}-\d{3}_L(1C|2A)_[\w-]+_[DC]_V\d*-\d*$", S(Spot4Muscate)),
        // Pleiades
        (r"FCGC\d*(-\d)?", S(PleiadesTheia)),
        (r"DS_PHR\d[A-Z]_\d{15}_\w+_[WE]\d{3}[NS]\d{2}_\d{4}_\d{4}", S(PleiadesPreprojected)),
        // Sentinel-1
        (r"^s1(a|b)_\d{2}[A-Z]{3}_vv_[A-Z]{3}_\d{3}_\d{8}t\w{6}.tif$", S(Sentinel1Tiled)),
        // TerraSAR-X
        (r"^T[DS]X\d_SAR__EEC_RE_\w+_\d{8}T\d{6}_\d{8}T\d{6}$", S(TerraSarX)),
    ]
};

static STANDARD_TABLE: LazyLock<PatternTable> = LazyLock::new(|| {
    let entries = STANDARD_PATTERNS
        .iter()
        .map(|(pattern, target)| PatternEntry {
            regex: Regex::new(pattern).expect("valid product pattern"),
            target: *target,
        })
        .collect();
    PatternTable { entries }
});

impl PatternTable {
    /// The built-in table covering every supported platform
    pub fn standard() -> &'static PatternTable {
        &STANDARD_TABLE
    }

    pub fn entries(&self) -> &[PatternEntry] {
        &self.entries
    }

    /// Classify an entry name (basename, no directory part).
    ///
    /// Pure function of the name; no filesystem access happens here.
    pub fn classify(&self, name: &str) -> Classification {
        let hit = self.entries.iter().find(|entry| entry.regex.is_match(name));
        match hit.map(|entry| entry.target) {
            Some(PatternTarget::Supported(class)) => Classification::Recognized(class),
            Some(PatternTarget::Unsupported { platform, format }) => {
                Classification::UnsupportedRecognized { platform, format }
            }
            None => Classification::Unrecognized,
        }
    }
}

/// Classify a name against the standard table
pub fn classify(name: &str) -> Classification {
    PatternTable::standard().classify(name)
}
