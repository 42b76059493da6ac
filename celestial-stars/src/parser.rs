//! Line-oriented catalog parser.
//!
//! Catalog files are read line by line and split on the catalog's delimiter.
//! There is no header handling: anything that is not a data row simply fails
//! the minimum-token check or one of the field parses and is skipped without
//! being reported.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::catalog::{CatalogColumn, CatalogType, StarRecord};
use crate::error::{Result, StarsError};

/// Lines with fewer tokens than this are not data rows.
pub const MIN_TOKENS: usize = 13;

const PROGRESS_INTERVAL: usize = 10_000;

/// Parses the catalog file at `path`.
///
/// `hipparcos_loaded` enables de-duplication: when set, lines of a secondary
/// catalog that carry a Hipparcos number are skipped because the star is
/// already provided by the Hipparcos catalog.
///
/// # Errors
/// Returns [`StarsError::CatalogOpen`] if the file cannot be opened and
/// [`StarsError::Io`] if reading fails part-way. Malformed lines are never
/// an error.
pub fn parse_catalog(
    catalog: CatalogType,
    path: impl AsRef<Path>,
    hipparcos_loaded: bool,
) -> Result<Vec<StarRecord>> {
    let path = path.as_ref();
    info!("Reading star catalog {:?} ({})", path, catalog);
    let file = File::open(path).map_err(|source| StarsError::CatalogOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let stars = parse_reader(catalog, BufReader::new(file), hipparcos_loaded)?;
    info!("Read a total of {} stars from {:?}", stars.len(), path);
    Ok(stars)
}

/// Parses catalog lines from any buffered reader.
///
/// Lines are decoded lossily so stray non-UTF-8 bytes in free-text columns
/// do not abort the whole file.
pub fn parse_reader<R: BufRead>(
    catalog: CatalogType,
    mut reader: R,
    hipparcos_loaded: bool,
) -> Result<Vec<StarRecord>> {
    let mut stars = Vec::new();
    let mut buf = Vec::with_capacity(512);
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        if let Some(star) = parse_line(catalog, &line, hipparcos_loaded) {
            stars.push(star);
            if stars.len() % PROGRESS_INTERVAL == 0 {
                debug!("Read {} stars so far...", stars.len());
            }
        }
    }
    Ok(stars)
}

/// Parses a single catalog line into a record.
///
/// Returns `None` for short lines, lines skipped by de-duplication, and lines
/// where any of the magnitudes, ascension or declination fail to parse.
pub fn parse_line(catalog: CatalogType, line: &str, hipparcos_loaded: bool) -> Option<StarRecord> {
    let line = line.trim_end_matches(['\r', '\n']);
    let items: Vec<&str> = line.split(catalog.delimiter()).collect();
    if items.len() < MIN_TOKENS {
        return None;
    }

    let secondary = catalog != CatalogType::Hipparcos;
    if secondary && hipparcos_loaded && has_hipparcos_id(catalog, &items) {
        return None;
    }

    let v_mag = field(catalog, &items, CatalogColumn::VisualMagnitude)?;
    let b_mag = field(catalog, &items, CatalogColumn::BlueMagnitude)?;
    let ascension = field(catalog, &items, CatalogColumn::Ascension)?;
    let declination = field(catalog, &items, CatalogColumn::Declination)?;
    let parallax = field(catalog, &items, CatalogColumn::Parallax).unwrap_or(0.0);

    Some(StarRecord {
        v_mag,
        b_mag,
        ascension: normalize_ascension(ascension),
        declination: declination.to_radians(),
        parallax,
    })
}

/// Maps a catalog right ascension in degrees into the renderer's convention.
pub fn normalize_ascension(ra_deg: f32) -> f32 {
    (360.0 + 90.0 - ra_deg).to_radians()
}

/// Tycho-2 appends the CCDM component letters to the HIP number
/// (`  1234AB`), so only the leading integer counts.
fn has_hipparcos_id(catalog: CatalogType, items: &[&str]) -> bool {
    catalog
        .column(CatalogColumn::HipparcosId)
        .and_then(|idx| items.get(idx))
        .is_some_and(|s| leading_integer(s).is_some())
}

fn field(catalog: CatalogType, items: &[&str], column: CatalogColumn) -> Option<f32> {
    let idx = catalog.column(column)?;
    leading_float(items.get(idx)?)
}

/// Signed integer at the start of `token`, ignoring leading whitespace and
/// anything after the digits.
pub fn leading_integer(token: &str) -> Option<i64> {
    let token = token.trim_start();
    let sign = usize::from(token.starts_with(['+', '-']));
    let digits = token[sign..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    token[..sign + digits].parse().ok()
}

/// Longest number at the start of `token`, ignoring leading whitespace and
/// trailing flags or units.
pub fn leading_float(token: &str) -> Option<f32> {
    let token = token.trim_start();
    let end = token
        .bytes()
        .take_while(|&b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
        .count();
    (1..=end).rev().find_map(|len| token[..len].parse().ok())
}
