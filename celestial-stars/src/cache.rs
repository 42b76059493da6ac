//! Binary star cache.
//!
//! Parsing the text catalogs takes seconds for the larger ones, so the
//! normalized record set is written to a small binary file after a successful
//! load and read back on the next start.
//!
//! # Format
//!
//! All values little-endian:
//!
//! | Offset | Type | Field |
//! |--------|------|-------|
//! | 0 | `i32` | format version, must equal [`CACHE_VERSION`] |
//! | 4 | `u32` | bitmask of contributing [`CatalogType`](crate::catalog::CatalogType)s |
//! | 8 | `i32` | record count |
//! | 12 | `count × 5 × f32` | `v_mag, b_mag, ascension, declination, parallax` |
//!
//! A version or catalog mismatch is an ordinary cache miss, detected before
//! any record is read.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::{debug, info, warn};

use crate::catalog::{CatalogSet, StarRecord};
use crate::error::Result;

/// Bump whenever the layout changes; older files are then reparsed.
pub const CACHE_VERSION: i32 = 3;

pub const HEADER_SIZE: usize = 12;
pub const RECORD_SIZE: usize = 20;

pub const DEFAULT_CACHE_FILE: &str = "star_cache.dat";

const PROGRESS_INTERVAL: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheHeader {
    pub version: i32,
    pub catalogs: u32,
    pub count: i32,
}

impl fmt::Display for CacheHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Format version: {}", self.version)?;
        writeln!(
            f,
            "Catalogs: {} (mask {:#06b})",
            CatalogSet::from_bitmask(self.catalogs),
            self.catalogs
        )?;
        write!(f, "Stars: {}", self.count)
    }
}

/// Why a cache read did not produce records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissReason {
    NotFound,
    VersionMismatch { found: i32 },
    CatalogMismatch { found: u32, expected: u32 },
    /// The file ended before the header or all records were read, or the
    /// header announced a negative count.
    Truncated,
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissReason::NotFound => f.write_str("no cache file"),
            MissReason::VersionMismatch { found } => write!(
                f,
                "cache version {} does not match {}",
                found, CACHE_VERSION
            ),
            MissReason::CatalogMismatch { found, expected } => write!(
                f,
                "cache built from catalogs {:#b}, configured {:#b}",
                found, expected
            ),
            MissReason::Truncated => f.write_str("cache file truncated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Hit(Vec<StarRecord>),
    Miss(MissReason),
}

/// Writes `records` to `path`, tagged with the configured `catalogs`.
pub fn write_cache(
    path: impl AsRef<Path>,
    catalogs: &CatalogSet,
    records: &[StarRecord],
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    let header = CacheHeader {
        version: CACHE_VERSION,
        catalogs: catalogs.bitmask(),
        count: i32::try_from(records.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many stars for cache"))?,
    };
    write_to(&mut w, &header, records)?;
    w.flush()?;
    info!(
        "Wrote {} stars ({} bytes) into {:?}",
        records.len(),
        HEADER_SIZE + records.len() * RECORD_SIZE,
        path
    );
    Ok(())
}

/// Reads the cache at `path` if it was built for exactly `catalogs`.
///
/// # Errors
/// Only I/O failures other than a missing file or an early end of file are
/// errors; every validation failure is reported as [`CacheLookup::Miss`].
pub fn read_cache(path: impl AsRef<Path>, catalogs: &CatalogSet) -> Result<CacheLookup> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(CacheLookup::Miss(MissReason::NotFound))
        }
        Err(e) => return Err(e.into()),
    };
    let lookup = read_from(&mut BufReader::new(file), catalogs)?;
    match &lookup {
        CacheLookup::Hit(records) => {
            info!("Read a total of {} stars from cache {:?}", records.len(), path)
        }
        CacheLookup::Miss(MissReason::Truncated) => {
            warn!("Ignoring star cache {:?}: file is truncated", path)
        }
        CacheLookup::Miss(reason) => info!("Ignoring star cache {:?}: {}", path, reason),
    }
    Ok(lookup)
}

/// Reads only the header, for inspection.
pub fn read_header(path: impl AsRef<Path>) -> Result<CacheHeader> {
    let mut r = BufReader::new(File::open(path.as_ref())?);
    Ok(read_header_from(&mut r)?)
}

pub fn write_to<W: Write>(
    w: &mut W,
    header: &CacheHeader,
    records: &[StarRecord],
) -> io::Result<()> {
    w.write_i32::<LittleEndian>(header.version)?;
    w.write_u32::<LittleEndian>(header.catalogs)?;
    w.write_i32::<LittleEndian>(header.count)?;
    for star in records {
        w.write_f32::<LittleEndian>(star.v_mag)?;
        w.write_f32::<LittleEndian>(star.b_mag)?;
        w.write_f32::<LittleEndian>(star.ascension)?;
        w.write_f32::<LittleEndian>(star.declination)?;
        w.write_f32::<LittleEndian>(star.parallax)?;
    }
    Ok(())
}

pub fn read_from<R: Read>(r: &mut R, catalogs: &CatalogSet) -> io::Result<CacheLookup> {
    let header = match read_header_from(r) {
        Ok(h) => h,
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            return Ok(CacheLookup::Miss(MissReason::Truncated))
        }
        Err(e) => return Err(e),
    };

    if header.version != CACHE_VERSION {
        return Ok(CacheLookup::Miss(MissReason::VersionMismatch {
            found: header.version,
        }));
    }
    let expected = catalogs.bitmask();
    if header.catalogs != expected {
        return Ok(CacheLookup::Miss(MissReason::CatalogMismatch {
            found: header.catalogs,
            expected,
        }));
    }
    let Ok(count) = usize::try_from(header.count) else {
        return Ok(CacheLookup::Miss(MissReason::Truncated));
    };

    let mut records = Vec::new();
    for _ in 0..count {
        match read_record(r) {
            Ok(star) => records.push(star),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Ok(CacheLookup::Miss(MissReason::Truncated))
            }
            Err(e) => return Err(e),
        }
        if records.len() % PROGRESS_INTERVAL == 0 {
            debug!("Read {} stars so far...", records.len());
        }
    }
    Ok(CacheLookup::Hit(records))
}

fn read_header_from<R: Read>(r: &mut R) -> io::Result<CacheHeader> {
    Ok(CacheHeader {
        version: r.read_i32::<LittleEndian>()?,
        catalogs: r.read_u32::<LittleEndian>()?,
        count: r.read_i32::<LittleEndian>()?,
    })
}

fn read_record<R: Read>(r: &mut R) -> io::Result<StarRecord> {
    Ok(StarRecord {
        v_mag: r.read_f32::<LittleEndian>()?,
        b_mag: r.read_f32::<LittleEndian>()?,
        ascension: r.read_f32::<LittleEndian>()?,
        declination: r.read_f32::<LittleEndian>()?,
        parallax: r.read_f32::<LittleEndian>()?,
    })
}
