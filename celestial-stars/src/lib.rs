//! Star catalog ingestion for real-time star-field rendering.
//!
//! Turns flat-text astronomical catalogs (Hipparcos, Tycho, Tycho-2 and a
//! dense Gaia export) into a compact, render-ready vertex table. Parsed
//! records are cached in a small versioned binary file so multi-hundred-
//! thousand-line catalogs are only parsed once.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | [`StarRecord`], [`CatalogType`], column mapping, [`CatalogSet`] |
//! | [`parser`] | Line-oriented catalog parsing with de-duplication against Hipparcos |
//! | [`cache`] | Binary cache read/write with version and catalog-set validation |
//! | [`color`] | Spectral color lookup from B−V, parallax distances |
//! | [`vertex`] | [`VertexTable`] of packed [`RenderVertex`] values |
//! | [`loader`] | [`StarLoader`]: cache first, parse on miss, refresh cache |
//! | [`settings`] | [`StarsSettings`] deserialized from the host's JSON, [`DrawMode`] |
//!
//! # Quick Start
//!
//! ```no_run
//! use celestial_stars::{StarsSettings, VertexTable, load_stars};
//!
//! let settings = StarsSettings::from_json_file("stars.json")?;
//! let catalog = load_stars(&settings);
//! let table = VertexTable::build(catalog.records());
//! println!("{} stars, magnitudes {:?}", table.len(), table.magnitude_range());
//! # Ok::<(), celestial_stars::StarsError>(())
//! ```
//!
//! # Features
//!
//! - **`cli`** — Enables the `star-cache` binary for building and inspecting
//!   star caches from the command line.

pub mod cache;
pub mod catalog;
pub mod color;
pub mod error;
pub mod loader;
pub mod parser;
pub mod settings;
pub mod vertex;

pub use cache::{CacheHeader, CacheLookup, MissReason, CACHE_VERSION};
pub use catalog::{CatalogColumn, CatalogSet, CatalogType, StarCatalog, StarRecord};
pub use error::{Result, StarsError};
pub use loader::{load_stars, StarLoader};
pub use settings::{DrawMode, StarsSettings};
pub use vertex::{RenderVertex, VertexTable};
