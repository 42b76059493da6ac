//! Cache-first ingestion of the configured catalogs.
//!
//! [`StarLoader::load`] never fails: unreadable catalogs, cache problems and
//! conflicting catalog combinations are logged and degrade to fewer (or no)
//! stars.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::cache::{read_cache, write_cache, CacheLookup};
use crate::catalog::{CatalogSet, CatalogType, StarCatalog, StarRecord};
use crate::parser::parse_catalog;
use crate::settings::StarsSettings;

/// Loads stars for a fixed catalog configuration.
#[derive(Debug, Clone)]
pub struct StarLoader {
    catalogs: BTreeMap<CatalogType, PathBuf>,
    cache_path: PathBuf,
}

impl StarLoader {
    pub fn new(catalogs: BTreeMap<CatalogType, PathBuf>, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            catalogs,
            cache_path: cache_path.into(),
        }
    }

    pub fn from_settings(settings: &StarsSettings) -> Self {
        Self::new(settings.catalogs(), settings.cache_path())
    }

    /// The configured catalogs. This set tags the cache, including catalogs
    /// that end up skipped because of a conflict.
    pub fn catalog_set(&self) -> CatalogSet {
        self.catalogs.keys().copied().collect()
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Returns the cached record set, or parses the catalogs and refreshes
    /// the cache.
    pub fn load(&self) -> StarCatalog {
        let catalogs = self.catalog_set();

        match read_cache(&self.cache_path, &catalogs) {
            Ok(CacheLookup::Hit(records)) => return StarCatalog::new(records, catalogs),
            Ok(CacheLookup::Miss(_)) => {}
            Err(e) => warn!("Failed to read star cache {:?}: {}", self.cache_path, e),
        }

        let records = self.parse_all();

        if records.is_empty() {
            warn!("Loaded no stars! Stars will not work properly.");
        } else if let Err(e) = write_cache(&self.cache_path, &catalogs, &records) {
            error!(
                "Failed to write star cache: cannot write {:?}: {}",
                self.cache_path, e
            );
        }

        StarCatalog::new(records, catalogs)
    }

    /// Catalogs that will actually be parsed, in load order.
    pub fn active_catalogs(&self) -> Vec<CatalogType> {
        let has = |c: CatalogType| self.catalogs.contains_key(&c);
        let mut active = Vec::new();

        for catalog in [CatalogType::Hipparcos, CatalogType::Tycho] {
            if has(catalog) {
                active.push(catalog);
            }
        }

        if has(CatalogType::Tycho2) {
            if has(CatalogType::Tycho) {
                warn!("Failed to load Tycho2 catalog: Tycho already loaded!");
            } else {
                active.push(CatalogType::Tycho2);
            }
        }

        if has(CatalogType::Gaia) {
            if self.catalogs.len() == 1 {
                active.push(CatalogType::Gaia);
            } else {
                warn!("Failed to load Gaia catalog: it cannot be combined with other catalogs!");
            }
        }

        active
    }

    fn parse_all(&self) -> Vec<StarRecord> {
        let hipparcos_loaded = self.catalogs.contains_key(&CatalogType::Hipparcos);
        let mut records = Vec::new();

        for catalog in self.active_catalogs() {
            let path = &self.catalogs[&catalog];
            match parse_catalog(catalog, path, hipparcos_loaded) {
                Ok(stars) => records.extend(stars),
                Err(e) => error!("Failed to load stars: {}", e),
            }
        }

        info!("Loaded {} stars from {} catalog(s)", records.len(), self.catalogs.len());
        records
    }
}

/// Loads the stars configured in `settings`.
pub fn load_stars(settings: &StarsSettings) -> StarCatalog {
    StarLoader::from_settings(settings).load()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader(catalogs: &[CatalogType]) -> StarLoader {
        let map = catalogs
            .iter()
            .map(|c| (*c, PathBuf::from(format!("/nonexistent/{}.dat", c))))
            .collect();
        StarLoader::new(map, "/nonexistent/cache.dat")
    }

    #[test]
    fn test_tycho_disables_tycho2() {
        let l = loader(&[CatalogType::Hipparcos, CatalogType::Tycho, CatalogType::Tycho2]);
        assert_eq!(
            l.active_catalogs(),
            vec![CatalogType::Hipparcos, CatalogType::Tycho]
        );
    }

    #[test]
    fn test_tycho2_with_hipparcos_allowed() {
        let l = loader(&[CatalogType::Tycho2, CatalogType::Hipparcos]);
        assert_eq!(
            l.active_catalogs(),
            vec![CatalogType::Hipparcos, CatalogType::Tycho2]
        );
    }

    #[test]
    fn test_gaia_only_alone() {
        assert_eq!(
            loader(&[CatalogType::Gaia]).active_catalogs(),
            vec![CatalogType::Gaia]
        );
        assert_eq!(
            loader(&[CatalogType::Gaia, CatalogType::Hipparcos]).active_catalogs(),
            vec![CatalogType::Hipparcos]
        );
    }

    #[test]
    fn test_catalog_set_includes_skipped() {
        let l = loader(&[CatalogType::Tycho, CatalogType::Tycho2]);
        assert_eq!(l.catalog_set().bitmask(), 0b110);
    }

    #[test]
    fn test_unreadable_everything_yields_empty() {
        let catalog = loader(&[CatalogType::Hipparcos]).load();
        assert!(catalog.is_empty());
        assert_eq!(catalog.catalogs().bitmask(), 1);
    }

    #[test]
    fn test_from_settings() {
        let settings = StarsSettings {
            tycho_catalog: Some(PathBuf::from("tyc.dat")),
            ..Default::default()
        };
        let l = StarLoader::from_settings(&settings);
        assert_eq!(l.cache_path(), Path::new("star_cache.dat"));
        assert_eq!(l.active_catalogs(), vec![CatalogType::Tycho]);
    }
}
