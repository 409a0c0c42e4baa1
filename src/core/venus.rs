//! VENµS products (MUSCATE and MAJA natif)

use crate::core::dates::{parse_day_at_noon, parse_muscate_stamp};
use crate::core::patterns::ProductClass;
use crate::core::product::{
    entry_name, muscate_level, muscate_validity, natif_header, natif_level, optional_file, stem,
    token, BandLookup, Product, SyntheticNaming, SyntheticSupport,
};
use crate::types::{FloodResult, Resolution};
use std::path::Path;

const BASE_RESOLUTION: Resolution = Resolution::square(5.0);
const COARSE_RESOLUTION: Resolution = Resolution::square(100.0);

const OPTICAL_SYNTHETIC: SyntheticSupport = SyntheticSupport {
    codes: &["ndvi"],
    naming: SyntheticNaming::StemSuffix,
};

/// `VENUS-XS_20180201-051359-000_L2A_ISRAW906_D_V1-0`; the site is the third token from the end
pub(crate) fn muscate(path: &Path) -> FloodResult<Product> {
    let base = entry_name(path);
    let level = muscate_level(&base)?;
    let tile = token(&base, -3)?.to_string();
    let acquisition_time = parse_muscate_stamp(token(&base, 1)?)?;
    let metadata_path = optional_file(path, "*MTD_ALL.xml");
    let valid = muscate_validity(path, level, metadata_path.as_deref());

    Ok(Product {
        class: ProductClass::VenusMuscate,
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

/// `VE_VM01_VSC_L2VALD_ISRAW906_20180317.DBL.DIR`
pub(crate) fn natif(path: &Path) -> FloodResult<Product> {
    let base = entry_name(path);
    let level = natif_level(&base)?;
    let tile = token(&base, 4)?.to_string();
    let acquisition_time = parse_day_at_noon(token(stem(&base), -1)?)?;
    let metadata_path = natif_header(path, &base);

    Ok(Product {
        class: ProductClass::VenusNatif,
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
    use crate::types::{Level, Platform};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_muscate_site_and_resolution() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("VENUS-XS_20180201-051359-000_L1C_ISRAW906_D_V1-0");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("VENUS-XS_20180201-051359-000_L1C_ISRAW906_D_V1-0_MTD_ALL.xml"), b"").unwrap();

        let product = Product::try_construct(&root).unwrap().unwrap();
        assert_eq!(product.platform(), Platform::Venus);
        assert_eq!(product.short_name(), "vns");
        assert_eq!(product.tile(), "ISRAW906");
        assert_eq!(product.level(), Level::L1c);
        assert_eq!(product.nodata(), -10000);
        assert_eq!(product.base_resolution(), Resolution::new(5.0, -5.0));
        assert!(product.is_valid());
    }

    #[test]
    fn test_natif_site() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("VE_VM01_VSC_L2VALD_ISRAW906_20180317.DBL.DIR");
        fs::create_dir_all(&root).unwrap();

        let product = Product::try_construct(&root).unwrap().unwrap();
        assert_eq!(product.tile(), "ISRAW906");
        assert_eq!(product.level(), Level::L2a);
        assert!(!product.is_valid());
    }
}
