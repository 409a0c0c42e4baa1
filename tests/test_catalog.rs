use floodml::core::patterns::{classify, Classification, PatternTable, ProductClass};
use floodml::core::product::Product;
use floodml::io::catalog::{CatalogScanner, ScanOptions};
use floodml::types::{FloodError, Level, Platform, Variant};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn s1_pair(dir: &Path, tile: &str, stamp: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let vv = dir.join(format!("s1a_{}_vv_DES_110_{}.tif", tile, stamp));
    fs::write(&vv, b"").unwrap();
    fs::write(dir.join(format!("s1a_{}_vh_DES_110_{}.tif", tile, stamp)), b"").unwrap();
    vv
}

fn s2_muscate(dir: &Path, stamp: &str, level: &str, tile: &str) -> PathBuf {
    let name = format!("SENTINEL2B_{}_{}_T{}_C_V1-4", stamp, level, tile);
    let root = dir.join(&name);
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join(format!("{}_MTD_ALL.xml", name)), b"<Muscate_Metadata_Document/>").unwrap();
    root
}

#[test]
fn test_classification_of_known_families() {
    let lc2 = classify("LC08_L1TP_199029_20170527_20170615_01_T1");
    assert_eq!(lc2, Classification::Recognized(ProductClass::Landsat8Lc2));
    let class = lc2.product_class().unwrap();
    assert_eq!(class.platform(), Platform::Landsat8);
    assert_eq!(class.variant(), Variant::Lc2);

    let theia = classify("FCGC12345");
    assert_eq!(theia.product_class().unwrap().platform(), Platform::Pleiades);
    assert_eq!(theia.product_class().unwrap().variant(), Variant::Theia);

    let legacy = "S2A_OPER_PRD_MSIL1C_PDMC_20160701T000000_R051_V20160630T105032_20160630T105032.SAFE";
    assert!(matches!(
        classify(legacy),
        Classification::UnsupportedRecognized { platform: Platform::Sentinel2, .. }
    ));
    assert!(Product::try_construct(Path::new("/data").join(legacy)).unwrap().is_none());

    // Same answer every time
    let table = PatternTable::standard();
    for name in ["FCGC12345", "LC08_L1TP_199029_20170527_20170615_01_T1", "GRANULE"] {
        assert_eq!(table.classify(name), table.classify(name));
    }
    assert_eq!(classify("GRANULE"), Classification::Unrecognized);
}

#[test]
fn test_scan_mixed_tree_in_time_order() {
    init_logging();
    let dir = TempDir::new().unwrap();
    s1_pair(&dir.path().join("s1/31TCJ"), "31TCJ", "20200503t060000");
    s2_muscate(&dir.path().join("s2"), "20200502-103000-000", "L1C", "31TCJ");
    s1_pair(&dir.path().join("s1/30TXM"), "30TXM", "20200501t180000");
    fs::create_dir_all(dir.path().join("s2/unrelated/GRANULE")).unwrap();

    let products = CatalogScanner::default()
        .scan(dir.path())
        .expect("Failed to scan catalog");
    println!("Found {} products", products.len());
    for product in &products {
        println!("{}", product);
    }

    let summary: Vec<(&str, &str)> = products.iter().map(|p| (p.short_name(), p.tile())).collect();
    assert_eq!(summary, vec![("s1", "30TXM"), ("s2", "31TCJ"), ("s1", "31TCJ")]);
}

#[test]
fn test_scan_filters() {
    init_logging();
    let dir = TempDir::new().unwrap();
    s1_pair(dir.path(), "31TCJ", "20200501t100000");
    s1_pair(dir.path(), "30TXM", "20200501t100000");
    s2_muscate(dir.path(), "20200502-103000-000", "L1C", "31TCJ");

    let only_s2 = CatalogScanner::new(ScanOptions {
        platforms: vec!["s2".to_string()],
        ..ScanOptions::default()
    })
    .scan(dir.path())
    .unwrap();
    assert_eq!(only_s2.len(), 1);
    assert_eq!(only_s2[0].platform(), Platform::Sentinel2);

    let without_30txm = CatalogScanner::new(ScanOptions {
        tiles_excluded: vec!["30TXM".to_string()],
        ..ScanOptions::default()
    })
    .scan(dir.path())
    .unwrap();
    assert_eq!(without_30txm.len(), 2);
    assert!(without_30txm.iter().all(|p| p.tile() == "31TCJ"));

    let only_l2a = CatalogScanner::new(ScanOptions {
        levels: vec![Level::L2a],
        ..ScanOptions::default()
    })
    .scan(dir.path())
    .unwrap();
    assert!(only_l2a.is_empty());
}

#[test]
fn test_invalid_products_are_dropped() {
    init_logging();
    let dir = TempDir::new().unwrap();
    // L2A without a JPI validity flag
    s2_muscate(dir.path(), "20200502-103000-000", "L2A", "31TCJ");
    // L1C without metadata
    fs::create_dir_all(dir.path().join("SENTINEL2B_20200512-103000-000_L1C_T31TCJ_C_V1-4")).unwrap();
    // VV without VH
    fs::write(dir.path().join("s1b_31TCJ_vv_ASC_030_20200502t180000.tif"), b"").unwrap();

    let products = CatalogScanner::default().scan(dir.path()).unwrap();
    assert!(products.is_empty());

    let direct = Product::try_construct(dir.path().join("s1b_31TCJ_vv_ASC_030_20200502t180000.tif"));
    assert!(matches!(direct, Err(FloodError::MissingCompanionFile { .. })));
}

#[test]
fn test_product_equality_and_duplicates() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let root = s2_muscate(dir.path(), "20200502-103000-000", "L1C", "31TCJ");

    let a = Product::try_construct(&root).unwrap().unwrap();
    let b = Product::try_construct(&root).unwrap().unwrap();
    let c = Product::try_construct(&root).unwrap().unwrap();
    assert_eq!(a, a);
    assert_eq!(a, b);
    assert_eq!(b, a);
    assert_eq!(b, c);
    assert_eq!(a, c);

    let other = Product::try_construct(s2_muscate(dir.path(), "20200512-103000-000", "L1C", "31TCJ"))
        .unwrap()
        .unwrap();
    assert_ne!(a, other);

    // A symlink to the same product folder yields a single catalog entry
    #[cfg(unix)]
    {
        let links = dir.path().join("links");
        fs::create_dir_all(&links).unwrap();
        std::os::unix::fs::symlink(&root, links.join(root.file_name().unwrap())).unwrap();
        let products = CatalogScanner::default().scan(dir.path()).unwrap();
        assert_eq!(products.len(), 2);
    }
}
