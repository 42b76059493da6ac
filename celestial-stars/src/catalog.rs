//! Normalized star records and the static catalog column layout.
//!
//! Every supported catalog is a flat text file with one star per line. The
//! position of each logical column inside a tokenized line is fixed per
//! catalog and recorded in [`COLUMN_MAPPING`]. Parsing (see
//! [`crate::parser`]) turns those lines into [`StarRecord`]s; the rest of the
//! pipeline only ever sees records.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StarsError;

/// A single star as loaded from a catalog or the binary cache.
///
/// Ascension and declination are stored already normalized into the
/// renderer's spherical convention, in radians. The cache persists exactly
/// these five values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarRecord {
    /// Visual (V-band) magnitude.
    pub v_mag: f32,
    /// Blue (B-band) magnitude.
    pub b_mag: f32,
    /// Normalized right ascension, `(450° - ra)` in radians.
    pub ascension: f32,
    /// Declination, in radians.
    pub declination: f32,
    /// Trigonometric parallax in milliarcseconds. Zero when unknown.
    pub parallax: f32,
}

/// The supported source catalogs.
///
/// The discriminant doubles as the bit position in the cache bitmask, so the
/// order must never change without bumping [`crate::cache::CACHE_VERSION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogType {
    /// Hipparcos main catalog (I/239). Authoritative for de-duplication.
    Hipparcos = 0,
    /// Tycho-1 catalog (I/239).
    Tycho = 1,
    /// Tycho-2 catalog (I/259). Disabled when Tycho is configured.
    Tycho2 = 2,
    /// Dense Gaia CSV export. Only usable on its own.
    Gaia = 3,
}

impl CatalogType {
    pub const ALL: [CatalogType; 4] = [
        CatalogType::Hipparcos,
        CatalogType::Tycho,
        CatalogType::Tycho2,
        CatalogType::Gaia,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CatalogType::Hipparcos => "hipparcos",
            CatalogType::Tycho => "tycho",
            CatalogType::Tycho2 => "tycho2",
            CatalogType::Gaia => "gaia",
        }
    }

    /// Field separator used by this catalog's text format.
    pub fn delimiter(self) -> char {
        match self {
            CatalogType::Gaia => ',',
            _ => '|',
        }
    }

    pub fn bit(self) -> u32 {
        1 << (self as u32)
    }

    /// Token index of `column` in this catalog, or `None` if the catalog
    /// does not carry it.
    pub fn column(self, column: CatalogColumn) -> Option<usize> {
        COLUMN_MAPPING[self as usize][column as usize]
    }
}

impl fmt::Display for CatalogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CatalogType {
    type Err = StarsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        CatalogType::ALL
            .into_iter()
            .find(|c| c.name() == lower)
            .ok_or_else(|| StarsError::UnknownCatalog(s.to_string()))
    }
}

/// Logical columns read from every catalog line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogColumn {
    VisualMagnitude = 0,
    BlueMagnitude,
    Parallax,
    Ascension,
    Declination,
    /// Hipparcos cross-reference number, used for de-duplication.
    HipparcosId,
}

pub const NUM_COLUMNS: usize = 6;
pub const NUM_CATALOGS: usize = 4;

/// Token index of each [`CatalogColumn`] per [`CatalogType`]; `None` marks a
/// column the catalog does not provide.
///
/// Row order follows the `CatalogType` discriminants, column order the
/// `CatalogColumn` discriminants.
pub const COLUMN_MAPPING: [[Option<usize>; NUM_COLUMNS]; NUM_CATALOGS] = [
    // V        B         Plx       RA       Dec      HIP
    [Some(34), Some(32), Some(11), Some(8), Some(9), Some(31)], // Hipparcos
    [Some(34), Some(32), Some(11), Some(8), Some(9), Some(31)], // Tycho
    [Some(19), Some(17), None, Some(2), Some(3), Some(23)],     // Tycho2
    [Some(7), Some(8), Some(4), Some(1), Some(2), None],        // Gaia
];

/// The set of catalogs configured for a load.
///
/// Its [`bitmask`](Self::bitmask) tags the cache file so a cache built from a
/// different combination is never reused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSet(BTreeSet<CatalogType>);

impl CatalogSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, catalog: CatalogType) -> bool {
        self.0.insert(catalog)
    }

    pub fn contains(&self, catalog: CatalogType) -> bool {
        self.0.contains(&catalog)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CatalogType> + '_ {
        self.0.iter().copied()
    }

    pub fn bitmask(&self) -> u32 {
        self.0.iter().fold(0, |mask, c| mask | c.bit())
    }

    /// Reconstructs the set encoded in a cache bitmask. Unknown bits are dropped.
    pub fn from_bitmask(mask: u32) -> Self {
        CatalogType::ALL
            .into_iter()
            .filter(|c| mask & c.bit() != 0)
            .collect()
    }
}

impl FromIterator<CatalogType> for CatalogSet {
    fn from_iter<I: IntoIterator<Item = CatalogType>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for CatalogSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(none)");
        }
        let names: Vec<&str> = self.0.iter().map(|c| c.name()).collect();
        f.write_str(&names.join(", "))
    }
}

/// The in-memory record set, together with the catalogs it was built from.
#[derive(Debug, Clone, Default)]
pub struct StarCatalog {
    records: Vec<StarRecord>,
    catalogs: CatalogSet,
}

impl StarCatalog {
    pub fn new(records: Vec<StarRecord>, catalogs: CatalogSet) -> Self {
        Self { records, catalogs }
    }

    pub fn records(&self) -> &[StarRecord] {
        &self.records
    }

    pub fn catalogs(&self) -> &CatalogSet {
        &self.catalogs
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StarRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<StarRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_columns_present_for_every_catalog() {
        for catalog in CatalogType::ALL {
            for column in [
                CatalogColumn::VisualMagnitude,
                CatalogColumn::BlueMagnitude,
                CatalogColumn::Ascension,
                CatalogColumn::Declination,
            ] {
                assert!(
                    catalog.column(column).is_some(),
                    "{} lacks {:?}",
                    catalog,
                    column
                );
            }
        }
    }

    #[test]
    fn test_absent_columns() {
        assert_eq!(CatalogType::Tycho2.column(CatalogColumn::Parallax), None);
        assert_eq!(CatalogType::Gaia.column(CatalogColumn::HipparcosId), None);
        assert_eq!(
            CatalogType::Hipparcos.column(CatalogColumn::HipparcosId),
            Some(31)
        );
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(CatalogType::Hipparcos.delimiter(), '|');
        assert_eq!(CatalogType::Tycho2.delimiter(), '|');
        assert_eq!(CatalogType::Gaia.delimiter(), ',');
    }

    #[test]
    fn test_bitmask() {
        let set: CatalogSet = [CatalogType::Hipparcos, CatalogType::Tycho2]
            .into_iter()
            .collect();
        assert_eq!(set.bitmask(), 0b101);
        assert_eq!(CatalogSet::new().bitmask(), 0);
        assert_eq!(CatalogSet::from_bitmask(0b101), set);
        assert_eq!(CatalogSet::from_bitmask(0xFFFF_FFF0), CatalogSet::new());
    }

    #[test]
    fn test_parse_catalog_type() {
        assert_eq!(
            "Hipparcos".parse::<CatalogType>().unwrap(),
            CatalogType::Hipparcos
        );
        assert_eq!(" tycho2 ".parse::<CatalogType>().unwrap(), CatalogType::Tycho2);
        let err = "sao".parse::<CatalogType>().unwrap_err();
        assert!(err.to_string().contains("sao"));
    }

    #[test]
    fn test_catalog_set_display() {
        let set: CatalogSet = [CatalogType::Tycho, CatalogType::Hipparcos]
            .into_iter()
            .collect();
        assert_eq!(set.to_string(), "hipparcos, tycho");
        assert_eq!(CatalogSet::new().to_string(), "(none)");
    }
}
