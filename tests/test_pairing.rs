use chrono::{NaiveDate, NaiveDateTime};
use floodml::config::{AdditionalBand, BandDeclaration};
use floodml::core::bands::{AuxiliaryBands, PrecomputedBands};
use floodml::core::pairing::{PairingEngine, PairingParams};
use floodml::core::product::Product;
use floodml::types::{FloodError, Mask, MaskDate};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn may(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 5, day)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

fn declarations(bands: &[&str]) -> Vec<BandDeclaration> {
    bands
        .iter()
        .map(|b| BandDeclaration::parse(b).expect("Failed to parse band declaration"))
        .collect()
}

/// Tiled Sentinel-1 VV/VH pair, e.g. stamp `20200501t100000`
fn s1_product(dir: &Path, tile: &str, stamp: &str) -> Product {
    let vv = dir.join(format!("s1a_{}_vv_DES_110_{}.tif", tile, stamp));
    fs::write(&vv, b"").unwrap();
    fs::write(dir.join(format!("s1a_{}_vh_DES_110_{}.tif", tile, stamp)), b"").unwrap();
    Product::try_construct(&vv)
        .expect("Failed to build Sentinel-1 product")
        .expect("Sentinel-1 name not recognized")
}

/// Sentinel-2 MUSCATE L1C folder holding the given band files
fn s2_product(dir: &Path, stamp: &str, tile: &str, bands: &[&str]) -> Product {
    let name = format!("SENTINEL2A_{}_L1C_T{}_D_V1-4", stamp, tile);
    let root = dir.join(&name);
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join(format!("{}_MTD_ALL.xml", name)), b"<Muscate_Metadata_Document/>").unwrap();
    for band in bands {
        fs::write(root.join(format!("{}_FRE_{}.tif", name, band)), b"").unwrap();
    }
    Product::try_construct(&root)
        .expect("Failed to build Sentinel-2 product")
        .expect("Sentinel-2 name not recognized")
}

fn ems_mask(tile: &str, date: NaiveDateTime) -> Mask {
    Mask {
        algorithm: "ems".to_string(),
        tile: tile.to_string(),
        date: MaskDate::At(date),
        path: PathBuf::from(format!(
            "/masks/ems/{}_{}.tif",
            tile,
            date.format("%Y%m%dT%H%M%S")
        )),
    }
}

fn gsw_mask(tile: &str) -> Mask {
    Mask {
        algorithm: "gsw".to_string(),
        tile: tile.to_string(),
        date: MaskDate::All,
        path: PathBuf::from(format!("/masks/gsw/{}.tif", tile)),
    }
}

fn s1_params() -> PairingParams {
    PairingParams {
        real_bands: declarations(&["s1_VV", "s1_VH"]),
        ..PairingParams::default()
    }
}

#[test]
fn test_single_candidate_within_tolerance() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let products = vec![
        s1_product(dir.path(), "31TCJ", "20200501t100000"),
        s1_product(dir.path(), "31TCJ", "20200501t113000"),
    ];
    let masks = vec![ems_mask("31TCJ", may(1, 10, 20, 0))];

    let engine = PairingEngine::new(s1_params(), &PrecomputedBands);
    let report = engine.join_with_report(&products, &masks, &[]);

    assert_eq!(report.pairs.len(), 1);
    assert!(report.failures.is_empty());
    let pair = &report.pairs[0];
    assert_eq!(pair.tile, "31TCJ");
    assert_eq!(pair.date, "20200501T100000");
    assert_eq!(pair.algorithm, "ems");
    assert_eq!(pair.mask_path, masks[0].path);
    let kinds: Vec<&str> = pair.rasters.iter().map(|r| r.kind.as_str()).collect();
    assert_eq!(kinds, vec!["VV", "VH"]);
    assert!(pair.rasters[1]
        .path
        .ends_with("s1a_31TCJ_vh_DES_110_20200501t100000.tif"));
}

#[test]
fn test_ambiguous_single_date_keeps_earliest() {
    init_logging();
    let dir = TempDir::new().unwrap();
    // Listed latest first: the choice must not depend on input order
    let products = vec![
        s1_product(dir.path(), "31TCJ", "20200501t110000"),
        s1_product(dir.path(), "31TCJ", "20200501t100000"),
    ];
    let masks = vec![ems_mask("31TCJ", may(1, 10, 20, 0))];

    let engine = PairingEngine::new(s1_params(), &PrecomputedBands);
    let pairs = engine.join(&products, &masks, &[]);

    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].date, "20200501T100000");
}

#[test]
fn test_all_date_mask_pairs_every_product_of_tile() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let products = vec![
        s1_product(dir.path(), "30TXM", "20200501t180000"),
        s1_product(dir.path(), "31TCJ", "20200507t180000"),
        s1_product(dir.path(), "30TXM", "20200513t180000"),
        s1_product(dir.path(), "30TXM", "20200525t180000"),
    ];
    let masks = vec![gsw_mask("30TXM")];

    let engine = PairingEngine::new(s1_params(), &PrecomputedBands);
    let pairs = engine.join(&products, &masks, &[]);

    assert_eq!(pairs.len(), 3);
    let dates: Vec<&str> = pairs.iter().map(|p| p.date.as_str()).collect();
    assert_eq!(dates, vec!["20200501T180000", "20200513T180000", "20200525T180000"]);
    for pair in &pairs {
        assert_eq!(pair.algorithm, "gsw");
        assert_eq!(pair.tile, "30TXM");
        assert_eq!(pair.mask_path, PathBuf::from("/masks/gsw/30TXM.tif"));
    }
}

#[test]
fn test_tolerance_boundary_is_inclusive() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let engine = PairingEngine::new(s1_params(), &PrecomputedBands);
    let masks = vec![ems_mask("31TCJ", may(1, 10, 20, 0))];

    let later = s1_product(dir.path(), "31TCJ", "20200501t112000");
    let earlier = s1_product(dir.path(), "31TCJ", "20200501t092000");
    let past = s1_product(dir.path(), "31TCJ", "20200501t112001");

    assert!(engine.matches(&later, &masks[0]));
    assert!(engine.matches(&earlier, &masks[0]));
    assert!(!engine.matches(&past, &masks[0]));

    assert_eq!(engine.join(&[past], &masks, &[]).len(), 0);
    assert_eq!(engine.join(&[later], &masks, &[]).len(), 1);
}

#[test]
fn test_product_without_hour_matches_same_day() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let product = s1_product(dir.path(), "31TCJ", "20200501txxxxxx");
    let engine = PairingEngine::new(s1_params(), &PrecomputedBands);

    assert!(engine.matches(&product, &ems_mask("31TCJ", may(1, 15, 0, 0))));
    assert!(!engine.matches(&product, &ems_mask("31TCJ", may(2, 0, 30, 0))));
    assert!(!engine.matches(&product, &ems_mask("30TXM", may(1, 15, 0, 0))));
}

#[test]
fn test_excluded_tiles_and_empty_inputs() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let products = vec![s1_product(dir.path(), "31TCJ", "20200501t100000")];
    let masks = vec![gsw_mask("31TCJ")];
    let engine = PairingEngine::new(s1_params(), &PrecomputedBands);

    assert_eq!(engine.join(&products, &masks, &[]).len(), 1);
    assert!(engine.join(&products, &masks, &["31TCJ".to_string()]).is_empty());
    assert!(engine.join(&[], &masks, &[]).is_empty());
    assert!(engine.join(&products, &[], &[]).is_empty());
}

#[test]
fn test_missing_band_fails_only_that_product() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let complete = s2_product(dir.path(), "20200501-103000-000", "31TCJ", &["B03", "B08"]);
    let partial = s2_product(dir.path(), "20200511-103000-000", "31TCJ", &["B03"]);
    let masks = vec![gsw_mask("31TCJ")];

    let params = PairingParams {
        real_bands: declarations(&["s2_B08", "s2_B03"]),
        ..PairingParams::default()
    };
    let engine = PairingEngine::new(params, &PrecomputedBands);
    let report = engine.join_with_report(&[complete, partial], &masks, &[]);

    assert_eq!(report.pairs.len(), 1);
    assert_eq!(report.pairs[0].date, "20200501T103000");
    assert_eq!(report.pairs[0].nodata, -10000);
    // Declaration order, not file order
    let kinds: Vec<&str> = report.pairs[0].rasters.iter().map(|r| r.kind.as_str()).collect();
    assert_eq!(kinds, vec!["B08", "B03"]);

    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].product.starts_with("SENTINEL2A_20200511"));
    assert!(matches!(
        report.failures[0].error,
        FloodError::MissingDeclaredBand { ref band, .. } if band == "B08"
    ));
}

#[test]
fn test_undeclared_platform_is_discarded_silently() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let products = vec![s1_product(dir.path(), "31TCJ", "20200501t100000")];
    let params = PairingParams {
        real_bands: declarations(&["s2_B03"]),
        ..PairingParams::default()
    };
    let engine = PairingEngine::new(params, &PrecomputedBands);
    let report = engine.join_with_report(&products, &[gsw_mask("31TCJ")], &[]);

    assert!(report.pairs.is_empty());
    assert!(report.failures.is_empty());
}

#[test]
fn test_synthetic_and_auxiliary_bands_follow_real_bands() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    let wdir = dir.path().join("wdir");
    let hand = dir.path().join("hand");
    fs::create_dir_all(&data).unwrap();
    fs::create_dir_all(&wdir).unwrap();
    fs::create_dir_all(&hand).unwrap();
    fs::write(hand.join("31TCJ.tif"), b"").unwrap();

    let product = s2_product(&data, "20200501-103000-000", "31TCJ", &["B03"]);
    let auxiliary = AuxiliaryBands::new(
        None,
        &[],
        &[AdditionalBand {
            band: "HAND".to_string(),
            path: hand.clone(),
        }],
    )
    .expect("Failed to configure auxiliary bands");
    let params = PairingParams {
        real_bands: declarations(&["s2_B03"]),
        synthetic_bands: declarations(&["s2_NDVI"]),
        auxiliary,
        wdir: wdir.clone(),
        ..PairingParams::default()
    };
    let engine = PairingEngine::new(params, &PrecomputedBands);
    let masks = vec![gsw_mask("31TCJ")];

    // NDVI not generated yet
    let report = engine.join_with_report(std::slice::from_ref(&product), &masks, &[]);
    assert!(report.pairs.is_empty());
    assert!(matches!(report.failures[0].error, FloodError::SyntheticBand { .. }));

    let ndvi = wdir.join(format!("{}_NDVI.tif", product.base_name()));
    fs::write(&ndvi, b"").unwrap();
    let pairs = engine.join(std::slice::from_ref(&product), &masks, &[]);
    assert_eq!(pairs.len(), 1);
    let kinds: Vec<&str> = pairs[0].rasters.iter().map(|r| r.kind.as_str()).collect();
    assert_eq!(kinds, vec!["B03", "NDVI", "HAND"]);
    assert_eq!(pairs[0].rasters[1].path, ndvi);
    assert!(pairs[0].rasters[2].path.ends_with("31TCJ.tif"));
}
