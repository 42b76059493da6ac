use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use celestial_stars::cache::{read_cache, read_header, write_cache};
use celestial_stars::color::{spectral_bucket, unpack_rgb, SPECTRAL_COLORS};
use celestial_stars::{
    CacheHeader, CacheLookup, CatalogSet, CatalogType, MissReason, StarLoader, StarRecord,
    VertexTable, CACHE_VERSION,
};
use tempfile::TempDir;

/// Pipe-delimited Hipparcos/Tycho line: V=34, B=32, Plx=11, RA=8, Dec=9, HIP=31.
fn hip_line(v: f32, b: f32, plx: f32, ra: f32, dec: f32, hip: Option<u32>) -> String {
    let mut items: Vec<String> = vec![String::new(); 40];
    items[0] = "H".to_string();
    items[34] = format!("{:5.2}", v);
    items[32] = format!("{:6.3}", b);
    items[11] = format!("{:7.2}", plx);
    items[8] = format!("{:12.8}", ra);
    items[9] = format!("{:+12.8}", dec);
    items[31] = hip.map(|h| format!("{:6}", h)).unwrap_or_default();
    items.join("|")
}

/// Pipe-delimited Tycho-2 line: V=19, B=17, RA=2, Dec=3, HIP=23.
fn tycho2_line(v: f32, b: f32, ra: f32, dec: f32, hip: Option<u32>) -> String {
    let mut items: Vec<String> = vec![String::new(); 32];
    items[19] = format!("{:6.3}", v);
    items[17] = format!("{:6.3}", b);
    items[2] = format!("{:12.8}", ra);
    items[3] = format!("{:+12.8}", dec);
    items[23] = hip.map(|h| format!("{:6}", h)).unwrap_or_default();
    items.join("|")
}

fn write_file(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, lines.join("\n")).unwrap();
    path
}

fn loader(dir: &TempDir, catalogs: &[(CatalogType, PathBuf)]) -> StarLoader {
    let map: BTreeMap<CatalogType, PathBuf> = catalogs.iter().cloned().collect();
    StarLoader::new(map, dir.path().join("star_cache.dat"))
}

#[test]
fn end_to_end_single_hipparcos_star() {
    let dir = TempDir::new().unwrap();
    let hip = write_file(
        dir.path(),
        "hip_main.dat",
        &[hip_line(5.0, 5.65, 100.0, 90.0, 0.0, Some(1))],
    );
    let loader = loader(&dir, &[(CatalogType::Hipparcos, hip)]);
    assert!(!loader.cache_path().exists());

    let catalog = loader.load();
    assert_eq!(catalog.len(), 1);

    let header = read_header(loader.cache_path()).unwrap();
    assert_eq!(
        header,
        CacheHeader {
            version: CACHE_VERSION,
            catalogs: CatalogType::Hipparcos.bit(),
            count: 1
        }
    );

    let table = VertexTable::build(catalog.records());
    assert_eq!(table.len(), 1);
    let v = table.vertices()[0];
    assert_relative_eq!(v.distance, 10.0, epsilon = 1e-4);
    assert_relative_eq!(v.magnitude, 5.0, epsilon = 1e-4);
    assert_relative_eq!(v.ascension, 2.0 * std::f32::consts::PI, epsilon = 1e-5);
    assert_relative_eq!(v.declination, 0.0);

    let mid = spectral_bucket(0.65);
    assert!(mid > 0 && mid < SPECTRAL_COLORS.len() - 1);
    assert_eq!(v.color, unpack_rgb(SPECTRAL_COLORS[mid]));
    assert_eq!(table.magnitude_range(), Some((5.0, 5.0)));
}

#[test]
fn second_load_uses_cache() {
    let dir = TempDir::new().unwrap();
    let hip = write_file(
        dir.path(),
        "hip_main.dat",
        &[
            hip_line(1.0, 1.2, 50.0, 10.0, 20.0, Some(1)),
            hip_line(2.0, 2.9, 0.0, 200.0, -45.0, Some(2)),
        ],
    );
    let loader = loader(&dir, &[(CatalogType::Hipparcos, hip.clone())]);
    let first = loader.load();

    fs::remove_file(&hip).unwrap();
    let second = loader.load();
    assert_eq!(first.records(), second.records());
}

#[test]
fn hipparcos_and_tycho_deduplicate() {
    let dir = TempDir::new().unwrap();
    let hip = write_file(
        dir.path(),
        "hip_main.dat",
        &[hip_line(3.0, 3.5, 20.0, 15.0, 15.0, Some(4242))],
    );
    let tycho = write_file(
        dir.path(),
        "tyc_main.dat",
        &[
            hip_line(3.01, 3.52, 20.1, 15.0, 15.0, Some(4242)),
            hip_line(10.5, 11.0, 0.0, 100.0, 5.0, None),
        ],
    );
    let catalog = loader(
        &dir,
        &[(CatalogType::Hipparcos, hip), (CatalogType::Tycho, tycho)],
    )
    .load();

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.records()[0].v_mag, 3.0);
    assert_eq!(catalog.records()[1].v_mag, 10.5);
}

#[test]
fn tycho2_without_hipparcos_keeps_cross_referenced_stars() {
    let dir = TempDir::new().unwrap();
    let tycho2 = write_file(
        dir.path(),
        "tyc2.dat",
        &[
            tycho2_line(7.5, 8.0, 45.0, 12.0, Some(77)),
            tycho2_line(11.2, 12.1, 46.0, 13.0, None),
        ],
    );
    let catalog = loader(&dir, &[(CatalogType::Tycho2, tycho2)]).load();
    assert_eq!(catalog.len(), 2);
    assert!(catalog.iter().all(|s| s.parallax == 0.0));
}

#[test]
fn hipparcos_and_tycho2_skip_component_cross_references() {
    let dir = TempDir::new().unwrap();
    let hip = write_file(
        dir.path(),
        "hip_main.dat",
        &[hip_line(4.0, 4.4, 12.0, 30.0, -10.0, Some(1234))],
    );

    // Tycho-2 writes the CCDM components right after the HIP number
    let mut items: Vec<String> = tycho2_line(4.02, 4.41, 30.0, -10.0, None)
        .split('|')
        .map(str::to_string)
        .collect();
    items[23] = "  1234AB ".to_string();
    let component = items.join("|");

    let tycho2 = write_file(
        dir.path(),
        "tyc2.dat",
        &[component, tycho2_line(11.2, 12.1, 46.0, 13.0, None)],
    );
    let catalog = loader(
        &dir,
        &[(CatalogType::Hipparcos, hip), (CatalogType::Tycho2, tycho2)],
    )
    .load();

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.records()[0].v_mag, 4.0);
    assert_eq!(catalog.records()[1].v_mag, 11.2);
}

#[test]
fn tycho_and_tycho2_loads_only_tycho() {
    let dir = TempDir::new().unwrap();
    let tycho = write_file(
        dir.path(),
        "tyc_main.dat",
        &[hip_line(9.0, 9.5, 0.0, 1.0, 1.0, None)],
    );
    let tycho2 = write_file(
        dir.path(),
        "tyc2.dat",
        &[tycho2_line(7.5, 8.0, 45.0, 12.0, None)],
    );
    let catalog = loader(
        &dir,
        &[(CatalogType::Tycho, tycho), (CatalogType::Tycho2, tycho2)],
    )
    .load();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.records()[0].v_mag, 9.0);
    assert_eq!(catalog.catalogs().bitmask(), 0b110);
}

#[test]
fn gaia_combined_with_others_is_ignored() {
    let dir = TempDir::new().unwrap();
    let hip = write_file(
        dir.path(),
        "hip_main.dat",
        &[hip_line(3.0, 3.5, 20.0, 15.0, 15.0, Some(1))],
    );
    let gaia = write_file(
        dir.path(),
        "gaia.csv",
        &["1,10.0,20.0,0.1,2.5,0,0,12.0,12.4,11.5,0.9,1.0,".to_string()],
    );

    let both = loader(
        &dir,
        &[(CatalogType::Hipparcos, hip), (CatalogType::Gaia, gaia.clone())],
    )
    .load();
    assert_eq!(both.len(), 1);
    assert_eq!(both.records()[0].v_mag, 3.0);

    let dir2 = TempDir::new().unwrap();
    let alone = loader(&dir2, &[(CatalogType::Gaia, gaia)]).load();
    assert_eq!(alone.len(), 1);
    assert_eq!(alone.records()[0].v_mag, 12.0);
    assert_eq!(alone.records()[0].parallax, 2.5);
}

#[test]
fn stale_cache_is_replaced_after_catalog_change() {
    let dir = TempDir::new().unwrap();
    let cache = dir.path().join("star_cache.dat");
    let stale = StarRecord {
        v_mag: 99.0,
        b_mag: 99.0,
        ascension: 0.0,
        declination: 0.0,
        parallax: 0.0,
    };
    let tycho_only: CatalogSet = [CatalogType::Tycho].into_iter().collect();
    write_cache(&cache, &tycho_only, &[stale]).unwrap();

    let hip = write_file(
        dir.path(),
        "hip_main.dat",
        &[hip_line(4.0, 4.4, 10.0, 30.0, 30.0, Some(9))],
    );
    let catalog = loader(&dir, &[(CatalogType::Hipparcos, hip)]).load();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.records()[0].v_mag, 4.0);

    let hip_only: CatalogSet = [CatalogType::Hipparcos].into_iter().collect();
    assert!(matches!(
        read_cache(&cache, &hip_only).unwrap(),
        CacheLookup::Hit(ref r) if r.len() == 1
    ));
    assert_eq!(
        read_cache(&cache, &tycho_only).unwrap(),
        CacheLookup::Miss(MissReason::CatalogMismatch {
            found: 0b1,
            expected: 0b10
        })
    );
}

#[test]
fn empty_catalog_writes_no_cache() {
    let dir = TempDir::new().unwrap();
    let hip = write_file(dir.path(), "hip_main.dat", &["not a catalog".to_string()]);
    let loader = loader(&dir, &[(CatalogType::Hipparcos, hip)]);
    let catalog = loader.load();
    assert!(catalog.is_empty());
    assert!(!loader.cache_path().exists());
}
