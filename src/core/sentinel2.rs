//! Sentinel-2 products: ESA SAFE, MUSCATE and MAJA SSC folders

use crate::core::dates::{parse_compact_datetime, parse_day_at_noon, parse_muscate_stamp};
use crate::core::patterns::{ProductClass, PREFIXED_TILE};
use crate::core::product::{
    entry_name, muscate_level, muscate_validity, natif_header, natif_level, optional_file, stem,
    token, BandLookup, Product, SyntheticNaming, SyntheticSupport,
};
use crate::types::{FloodError, FloodResult, Level, Resolution};
use std::path::Path;

const BASE_RESOLUTION: Resolution = Resolution::square(10.0);
const COARSE_RESOLUTION: Resolution = Resolution::square(240.0);

/// SAFE granules keep their bands under `GRANULE/<id>/IMG_DATA[/R10m]`
const SAFE_BAND_DEPTH: usize = 5;

const OPTICAL_SYNTHETIC: SyntheticSupport = SyntheticSupport {
    codes: &["ndvi", "mndwi"],
    naming: SyntheticNaming::StemSuffix,
};

/// `S2A_MSIL1C_20170412T110621_N0204_R137_T29RPQ_20170412T111708.SAFE`
pub(crate) fn natif(path: &Path) -> FloodResult<Product> {
    let base = entry_name(path);
    let level = match token(&base, 1)? {
        "MSIL1C" => Level::L1c,
        "MSIL2A" => Level::L2a,
        other => {
            return Err(FloodError::InvalidName {
                name: base.clone(),
                reason: format!("unknown processing level {}", other),
            })
        }
    };
    let tile = PREFIXED_TILE
        .find(&base)
        .map(|m| m.as_str()[1..].to_string())
        .ok_or_else(|| FloodError::InvalidName {
            name: base.clone(),
            reason: "no tile code".to_string(),
        })?;
    let acquisition_time = parse_compact_datetime(token(&base, 2)?)?;
    let relative_orbit = token(&base, 4)?.trim_start_matches('R').parse::<u32>().ok();
    let metadata_path = optional_file(path, "^MTD_MSIL(1C|2A).xml$");

    Ok(Product {
        class: ProductClass::Sentinel2Natif,
        root: path.to_path_buf(),
        level,
        tile,
        acquisition_time,
        nodata: 0,
        base_resolution: BASE_RESOLUTION,
        coarse_resolution: COARSE_RESOLUTION,
        valid: metadata_path.is_some(),
        metadata_path,
        relative_orbit,
        bands: BandLookup::Search { depth: SAFE_BAND_DEPTH },
        synthetic: OPTICAL_SYNTHETIC,
        components: Vec::new(),
        base,
    })
}

/// `SENTINEL2B_20171008-105012-463_L2A_T31TCH_C_V1-4`
pub(crate) fn muscate(path: &Path) -> FloodResult<Product> {
    let base = entry_name(path);
    let level = muscate_level(&base)?;
    let tile = match PREFIXED_TILE.find(&base) {
        Some(m) => m.as_str()[1..].to_string(),
        None => token(&base, 3)?.to_string(),
    };
    let acquisition_time = parse_muscate_stamp(token(&base, 1)?)?;
    let metadata_path = optional_file(path, "*MTD_ALL.xml");
    let valid = muscate_validity(path, level, metadata_path.as_deref());

    Ok(Product {
        class: ProductClass::Sentinel2Muscate,
        root: path.to_path_buf(),
        level,
        tile,
        acquisition_time,
        nodata: -10000,
        base_resolution: BASE_RESOLUTION,
        coarse_resolution: COARSE_RESOLUTION,
        metadata_path,
        valid,
        relative_orbit: None,
        bands: BandLookup::Search { depth: 1 },
        synthetic: OPTICAL_SYNTHETIC,
        components: Vec::new(),
        base,
    })
}

/// `S2A_OPER_SSC_L2VALD_36JTT____20160914.DBL.DIR`, header `<stem>.HDR` next to it
pub(crate) fn ssc(path: &Path) -> FloodResult<Product> {
    let base = entry_name(path);
    let level = natif_level(&base)?;
    let tile = token(&base, 4)?.to_string();
    let acquisition_time = parse_day_at_noon(token(stem(&base), -1)?)?;
    let metadata_path = natif_header(path, &base);

    Ok(Product {
        class: ProductClass::Sentinel2Ssc,
        root: path.to_path_buf(),
        level,
        tile,
        acquisition_time,
        nodata: 0,
        base_resolution: BASE_RESOLUTION,
        coarse_resolution: COARSE_RESOLUTION,
        valid: metadata_path.is_some(),
        metadata_path,
        relative_orbit: None,
        bands: BandLookup::Search { depth: 1 },
        synthetic: OPTICAL_SYNTHETIC,
        components: Vec::new(),
        base,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Platform;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_safe_attributes() {
        let dir = TempDir::new().unwrap();
        let root = dir
            .path()
            .join("S2A_MSIL1C_20170412T110621_N0204_R137_T29RPQ_20170412T111708.SAFE");
        fs::create_dir_all(&root).unwrap();

        let product = Product::try_construct(&root).unwrap().unwrap();
        assert_eq!(product.platform(), Platform::Sentinel2);
        assert_eq!(product.tile(), "29RPQ");
        assert_eq!(product.level(), Level::L1c);
        assert_eq!(product.relative_orbit(), Some(137));
        assert_eq!(
            product.acquisition_time(),
            NaiveDate::from_ymd_opt(2017, 4, 12).unwrap().and_hms_opt(11, 6, 21).unwrap()
        );
        assert!(!product.is_valid());

        fs::write(root.join("MTD_MSIL1C.xml"), b"<n/>").unwrap();
        let product = Product::try_construct(&root).unwrap().unwrap();
        assert!(product.is_valid());
    }

    #[test]
    fn test_ssc_header_next_to_folder() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("S2A_OPER_SSC_L2VALD_36JTT____20160914.DBL.DIR");
        fs::create_dir_all(&root).unwrap();

        let product = Product::try_construct(&root).unwrap().unwrap();
        assert_eq!(product.tile(), "36JTT");
        assert_eq!(product.level(), Level::L2a);
        assert_eq!(
            product.acquisition_time(),
            NaiveDate::from_ymd_opt(2016, 9, 14).unwrap().and_hms_opt(12, 0, 0).unwrap()
        );
        assert!(!product.is_valid());

        fs::write(dir.path().join("S2A_OPER_SSC_L2VALD_36JTT____20160914.HDR"), b"").unwrap();
        let product = Product::try_construct(&root).unwrap().unwrap();
        assert!(product.is_valid());
    }
}
