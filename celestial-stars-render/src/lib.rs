//! Per-frame drawing of a catalog star field.
//!
//! Builds on the vertex tables from `celestial-stars`. This crate chooses
//! and compiles the shader variant for the current draw mode and HDR flag.
//! It also derives the per-frame uniforms and drives a [`RenderBackend`]
//! that owns the actual graphics API calls.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`shaders`] | GLSL sources for the star and background programs |
//! | [`variant`] | [`VariantKey`], [`ShaderSet`], lazy [`ShaderVariantSelector`] |
//! | [`photometry`] | Magnitude/luminance conversions, [`AppearanceScale`] |
//! | [`uniforms`] | [`FrameContext`], star and background uniform blocks |
//! | [`field`] | [`StarField`], [`RenderBackend`] |
//!
//! # Quick Start
//!
//! ```ignore
//! use celestial_stars::{load_stars, StarsSettings};
//! use celestial_stars_render::{FrameContext, StarField};
//!
//! let settings = StarsSettings::from_json_file("stars.json")?;
//! let mut field = StarField::new(&load_stars(&settings), &settings);
//!
//! // each frame
//! field.update_scene(brightness, hdr, grid, figures, boost);
//! let result = field.draw(&mut backend, &FrameContext::new(mv, p, viewport))?;
//! ```

pub mod error;
pub mod field;
pub mod photometry;
pub mod shaders;
pub mod uniforms;
pub mod variant;

pub use error::{RenderError, Result};
pub use field::{BackgroundLayer, Bounds, DrawResult, RenderBackend, StarField};
pub use photometry::{apparent_magnitude, magnitude_to_luminance, AppearanceScale};
pub use uniforms::{BackgroundUniforms, BlendMode, FrameContext, StarDrawState, StarUniforms};
pub use variant::{
    SelectorState, ShaderCompiler, ShaderSet, ShaderSource, ShaderStage, ShaderVariantSelector,
    VariantKey,
};
