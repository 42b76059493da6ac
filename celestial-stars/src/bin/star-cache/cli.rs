//! CLI argument definitions for star-cache

use anyhow::Context;
use celestial_stars::{CatalogType, StarLoader, StarsSettings};
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "star-cache")]
#[command(about = "Build and inspect binary star caches")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse the configured catalogs (or reuse a valid cache) and write the cache
    Build(CatalogArgs),

    /// Print the header of a cache file
    Info(InfoArgs),

    /// Load stars and print vertex table statistics
    Stats(CatalogArgs),
}

#[derive(Args)]
pub struct CatalogArgs {
    /// Settings JSON with catalog paths; catalog flags override its entries
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Hipparcos catalog (hip_main.dat)
    #[arg(long)]
    pub hipparcos: Option<PathBuf>,

    /// Tycho catalog (tyc_main.dat)
    #[arg(long)]
    pub tycho: Option<PathBuf>,

    /// Tycho-2 catalog (tyc2.dat)
    #[arg(long)]
    pub tycho2: Option<PathBuf>,

    /// Gaia CSV export
    #[arg(long)]
    pub gaia: Option<PathBuf>,

    /// Cache file location
    #[arg(long)]
    pub cache: Option<PathBuf>,
}

#[derive(Args)]
pub struct InfoArgs {
    /// Cache file location
    #[arg(long, default_value = "star_cache.dat")]
    pub cache: PathBuf,
}

impl CatalogArgs {
    pub fn loader(&self) -> anyhow::Result<StarLoader> {
        let settings = match &self.config {
            Some(path) => StarsSettings::from_json_file(path)
                .with_context(|| format!("Failed to read settings {:?}", path))?,
            None => StarsSettings::default(),
        };

        let mut catalogs: BTreeMap<CatalogType, PathBuf> = settings.catalogs();
        for (catalog, path) in [
            (CatalogType::Hipparcos, &self.hipparcos),
            (CatalogType::Tycho, &self.tycho),
            (CatalogType::Tycho2, &self.tycho2),
            (CatalogType::Gaia, &self.gaia),
        ] {
            if let Some(path) = path {
                catalogs.insert(catalog, path.clone());
            }
        }

        let cache = self.cache.clone().unwrap_or_else(|| settings.cache_path());
        Ok(StarLoader::new(catalogs, cache))
    }
}
