//! Star-field configuration as supplied by the host application.
//!
//! The host stores these settings as a JSON section with camelCase keys.
//! Only the catalog paths and the cache file feed the ingestion pipeline;
//! the remaining fields are renderer tunables passed through to
//! `celestial-stars-render`.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_CACHE_FILE;
use crate::catalog::CatalogType;
use crate::error::{Result, StarsError};

/// How each star is rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DrawMode {
    /// One pixel per star, luminance from the pixel's solid angle.
    Point,
    /// Like `Point`, with alpha-blended point smoothing.
    SmoothPoint,
    /// Screen-aligned quad with a hard-edged disc.
    Disc,
    /// Quad with a cone-shaped falloff.
    #[default]
    SmoothDisc,
    /// Quad textured with the star sprite, scaled by luminance.
    Sprite,
}

impl DrawMode {
    pub const ALL: [DrawMode; 5] = [
        DrawMode::Point,
        DrawMode::SmoothPoint,
        DrawMode::Disc,
        DrawMode::SmoothDisc,
        DrawMode::Sprite,
    ];

    /// Point modes draw without a geometry stage.
    pub fn is_point(self) -> bool {
        matches!(self, DrawMode::Point | DrawMode::SmoothPoint)
    }

    /// Preprocessor symbol selecting this mode in the shader sources.
    pub fn define(self) -> &'static str {
        match self {
            DrawMode::Point => "DRAWMODE_POINT",
            DrawMode::SmoothPoint => "DRAWMODE_SMOOTH_POINT",
            DrawMode::Disc => "DRAWMODE_DISC",
            DrawMode::SmoothDisc => "DRAWMODE_SMOOTH_DISC",
            DrawMode::Sprite => "DRAWMODE_SPRITE",
        }
    }

    fn key(self) -> &'static str {
        match self {
            DrawMode::Point => "point",
            DrawMode::SmoothPoint => "smoothpoint",
            DrawMode::Disc => "disc",
            DrawMode::SmoothDisc => "smoothdisc",
            DrawMode::Sprite => "sprite",
        }
    }
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DrawMode::Point => "point",
            DrawMode::SmoothPoint => "smooth-point",
            DrawMode::Disc => "disc",
            DrawMode::SmoothDisc => "smooth-disc",
            DrawMode::Sprite => "sprite",
        };
        f.write_str(name)
    }
}

impl FromStr for DrawMode {
    type Err = StarsError;

    /// Accepts `smooth-disc`, `smooth_disc` and `smoothDisc` alike.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        DrawMode::ALL
            .into_iter()
            .find(|m| m.key() == key)
            .ok_or_else(|| StarsError::UnknownDrawMode(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StarsSettings {
    pub hipparcos_catalog: Option<PathBuf>,
    pub tycho_catalog: Option<PathBuf>,
    pub tycho2_catalog: Option<PathBuf>,
    pub gaia_catalog: Option<PathBuf>,
    pub cache_file: Option<PathBuf>,
    pub star_texture: Option<PathBuf>,
    pub background_texture1: Option<PathBuf>,
    pub background_texture2: Option<PathBuf>,
    pub background_color1: [f32; 4],
    pub background_color2: [f32; 4],
    /// Stars brighter than this (apparent) magnitude are not drawn.
    pub min_magnitude: f32,
    /// Stars fainter than this (apparent) magnitude are not drawn.
    pub max_magnitude: f32,
    /// Size of the faintest loaded stars, in percent of the screen width.
    pub min_size: f32,
    /// Size of the brightest loaded stars, in percent of the screen width.
    pub max_size: f32,
    pub min_opacity: f32,
    pub max_opacity: f32,
    /// Exponent of the magnitude-to-appearance mapping; 1 is linear.
    pub scaling_exponent: f32,
    /// Solid angle covered by a disc or sprite star, in steradians.
    pub solid_angle: f32,
    pub enable_hdr: bool,
    pub draw_mode: DrawMode,
    pub luminance_multiplicator: f32,
}

impl Default for StarsSettings {
    fn default() -> Self {
        Self {
            hipparcos_catalog: None,
            tycho_catalog: None,
            tycho2_catalog: None,
            gaia_catalog: None,
            cache_file: None,
            star_texture: None,
            background_texture1: None,
            background_texture2: None,
            background_color1: [0.5, 0.8, 1.0, 0.0],
            background_color2: [0.5, 1.0, 0.8, 0.0],
            min_magnitude: -15.0,
            max_magnitude: 15.0,
            min_size: 0.1,
            max_size: 3.0,
            min_opacity: 0.7,
            max_opacity: 1.0,
            scaling_exponent: 4.0,
            solid_angle: 0.000_01,
            enable_hdr: false,
            draw_mode: DrawMode::default(),
            luminance_multiplicator: 1.0,
        }
    }
}

impl StarsSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Configured catalogs and their file paths.
    pub fn catalogs(&self) -> BTreeMap<CatalogType, PathBuf> {
        [
            (CatalogType::Hipparcos, &self.hipparcos_catalog),
            (CatalogType::Tycho, &self.tycho_catalog),
            (CatalogType::Tycho2, &self.tycho2_catalog),
            (CatalogType::Gaia, &self.gaia_catalog),
        ]
        .into_iter()
        .filter_map(|(catalog, path)| path.clone().map(|p| (catalog, p)))
        .collect()
    }

    pub fn cache_path(&self) -> PathBuf {
        self.cache_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let settings = StarsSettings::from_json_str("{}").unwrap();
        assert_eq!(settings, StarsSettings::default());
        assert!(settings.catalogs().is_empty());
        assert_eq!(settings.cache_path(), PathBuf::from("star_cache.dat"));
    }

    #[test]
    fn test_host_section() {
        let json = r#"{
            "starTexture": "../share/resources/textures/star.png",
            "cacheFile": "../share/resources/stars/cache.dat",
            "hipparcosCatalog": "../share/resources/stars/hip_main.dat",
            "tycho2Catalog": "../share/resources/stars/tyc2_main.dat",
            "backgroundColor1": [0.0, 0.5, 1.0, 0.3],
            "maxMagnitude": 8.5,
            "drawMode": "sprite",
            "enableHdr": true
        }"#;
        let settings = StarsSettings::from_json_str(json).unwrap();
        let catalogs = settings.catalogs();
        assert_eq!(catalogs.len(), 2);
        assert_eq!(
            catalogs[&CatalogType::Tycho2],
            PathBuf::from("../share/resources/stars/tyc2_main.dat")
        );
        assert_eq!(settings.max_magnitude, 8.5);
        assert_eq!(settings.min_magnitude, -15.0);
        assert_eq!(settings.draw_mode, DrawMode::Sprite);
        assert!(settings.enable_hdr);
        assert_eq!(settings.background_color1, [0.0, 0.5, 1.0, 0.3]);
        assert_eq!(
            settings.cache_path(),
            PathBuf::from("../share/resources/stars/cache.dat")
        );
    }

    #[test]
    fn test_bad_json_is_settings_error() {
        let err = StarsSettings::from_json_str(r#"{"drawMode": "laser"}"#).unwrap_err();
        assert!(matches!(err, StarsError::Settings(_)));
    }

    #[test]
    fn test_draw_mode_from_str() {
        assert_eq!("smooth-disc".parse::<DrawMode>().unwrap(), DrawMode::SmoothDisc);
        assert_eq!("SmoothPoint".parse::<DrawMode>().unwrap(), DrawMode::SmoothPoint);
        assert_eq!("smooth_point".parse::<DrawMode>().unwrap(), DrawMode::SmoothPoint);
        assert!("laser".parse::<DrawMode>().is_err());
        for mode in DrawMode::ALL {
            assert_eq!(mode.to_string().parse::<DrawMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_point_modes() {
        assert!(DrawMode::Point.is_point());
        assert!(DrawMode::SmoothPoint.is_point());
        assert!(!DrawMode::Disc.is_point());
        assert!(!DrawMode::Sprite.is_point());
    }
}
