//! The drawable star field.
//!
//! [`StarField`] owns the vertex table and every renderer tunable. The host
//! calls [`StarField::update_scene`] once per frame with its scene state and
//! then [`StarField::draw`] with a [`RenderBackend`]. Raw graphics calls
//! live entirely in the backend.

use celestial_stars::{DrawMode, StarCatalog, StarsSettings, VertexTable};
use glam::Vec3;
use tracing::{debug, warn};

use crate::error::{RenderError, Result};
use crate::photometry::AppearanceScale;
use crate::uniforms::{
    background_intensity, BackgroundUniforms, FrameContext, StarDrawState, StarParams,
    StarUniforms,
};
use crate::variant::{ShaderCompiler, ShaderVariantSelector, VariantKey};

/// Grid layer color at full intensity.
pub const GRID_COLOR: [f32; 3] = [0.5, 0.8, 1.0];
/// Star figure layer color at full intensity.
pub const FIGURES_COLOR: [f32; 3] = [0.5, 1.0, 0.8];
/// Opacity of an enabled background layer at full intensity.
pub const BACKGROUND_OPACITY: f32 = 0.3;

/// Graphics API glue. Every method maps to a handful of raw calls; state
/// not described by the arguments is the backend's to save and restore.
pub trait RenderBackend: ShaderCompiler {
    type Texture;

    /// Uploads the interleaved vertex buffer. Called once, before the first
    /// star draw.
    fn upload_stars(&mut self, table: &VertexTable) -> std::result::Result<(), Self::Error>;

    /// Draws the background quad (four vertices, triangle strip) with
    /// additive blending.
    fn draw_background(
        &mut self,
        program: &Self::Program,
        uniforms: &BackgroundUniforms,
        texture: &Self::Texture,
    ) -> std::result::Result<(), Self::Error>;

    /// Draws `count` stars as points with the uploaded vertex buffer.
    ///
    /// The shaders do not read `uniforms.appearance`. Backends that size
    /// points on the host (`state.point_size`) apply it per star through
    /// [`AppearanceScale::size`] and [`AppearanceScale::opacity`].
    fn draw_stars(
        &mut self,
        program: &Self::Program,
        uniforms: &StarUniforms,
        state: &StarDrawState,
        texture: Option<&Self::Texture>,
        count: usize,
    ) -> std::result::Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackgroundLayer {
    /// Celestial grid.
    Grid,
    /// Star figures.
    Figures,
}

impl BackgroundLayer {
    pub const ALL: [BackgroundLayer; 2] = [BackgroundLayer::Grid, BackgroundLayer::Figures];

    fn index(self) -> usize {
        match self {
            BackgroundLayer::Grid => 0,
            BackgroundLayer::Figures => 1,
        }
    }
}

#[derive(Debug, Clone)]
struct Background<T> {
    color: [f32; 4],
    texture: Option<T>,
}

impl<T> Background<T> {
    fn is_visible(&self) -> bool {
        self.texture.is_some() && self.color[3] != 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawResult {
    pub recompiled: bool,
    pub stars_drawn: usize,
    pub background_layers_drawn: usize,
}

/// Axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// Covers all representable space.
    pub fn unbounded() -> Self {
        Self {
            min: Vec3::splat(f32::MIN),
            max: Vec3::splat(f32::MAX),
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

pub struct StarField<B: RenderBackend> {
    table: VertexTable,
    selector: ShaderVariantSelector<B::Program>,
    params: StarParams,
    appearance: AppearanceScale,
    backgrounds: [Background<B::Texture>; 2],
    star_texture: Option<B::Texture>,
    uploaded: bool,
}

impl<B: RenderBackend> StarField<B> {
    pub fn new(catalog: &StarCatalog, settings: &StarsSettings) -> Self {
        Self::from_table(VertexTable::build(catalog.records()), settings)
    }

    pub fn from_table(table: VertexTable, settings: &StarsSettings) -> Self {
        if table.is_empty() {
            warn!("Star field has no stars to draw");
        }
        let appearance = AppearanceScale::from_settings(settings, table.magnitude_range());
        Self {
            selector: ShaderVariantSelector::new(VariantKey::new(
                settings.draw_mode,
                settings.enable_hdr,
            )),
            params: StarParams {
                min_magnitude: settings.min_magnitude,
                max_magnitude: settings.max_magnitude,
                solid_angle: settings.solid_angle,
                luminance_multiplicator: settings.luminance_multiplicator,
            },
            appearance,
            backgrounds: [
                Background {
                    color: settings.background_color1,
                    texture: None,
                },
                Background {
                    color: settings.background_color2,
                    texture: None,
                },
            ],
            star_texture: None,
            uploaded: false,
            table,
        }
    }

    pub fn table(&self) -> &VertexTable {
        &self.table
    }

    pub fn selector(&self) -> &ShaderVariantSelector<B::Program> {
        &self.selector
    }

    pub fn appearance(&self) -> &AppearanceScale {
        &self.appearance
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.selector.key().draw_mode
    }

    pub fn set_draw_mode(&mut self, mode: DrawMode) {
        self.selector.set_draw_mode(mode);
    }

    pub fn hdr(&self) -> bool {
        self.selector.key().hdr
    }

    pub fn set_hdr(&mut self, hdr: bool) {
        self.selector.set_hdr(hdr);
    }

    pub fn min_magnitude(&self) -> f32 {
        self.params.min_magnitude
    }

    pub fn set_min_magnitude(&mut self, magnitude: f32) {
        self.params.min_magnitude = magnitude;
    }

    pub fn max_magnitude(&self) -> f32 {
        self.params.max_magnitude
    }

    pub fn set_max_magnitude(&mut self, magnitude: f32) {
        self.params.max_magnitude = magnitude;
    }

    pub fn solid_angle(&self) -> f32 {
        self.params.solid_angle
    }

    pub fn set_solid_angle(&mut self, solid_angle: f32) {
        self.params.solid_angle = solid_angle;
    }

    pub fn luminance_multiplicator(&self) -> f32 {
        self.params.luminance_multiplicator
    }

    pub fn set_luminance_multiplicator(&mut self, value: f32) {
        self.params.luminance_multiplicator = value;
    }

    pub fn background_color(&self, layer: BackgroundLayer) -> [f32; 4] {
        self.backgrounds[layer.index()].color
    }

    pub fn set_background_color(&mut self, layer: BackgroundLayer, color: [f32; 4]) {
        self.backgrounds[layer.index()].color = color;
    }

    /// Replaces the layer texture and returns the previous one.
    pub fn set_background_texture(
        &mut self,
        layer: BackgroundLayer,
        texture: Option<B::Texture>,
    ) -> Option<B::Texture> {
        std::mem::replace(&mut self.backgrounds[layer.index()].texture, texture)
    }

    /// Sprite texture, bound for every star draw.
    pub fn set_star_texture(&mut self, texture: Option<B::Texture>) -> Option<B::Texture> {
        std::mem::replace(&mut self.star_texture, texture)
    }

    /// Per-frame host update.
    ///
    /// Without HDR the star and background brightness follow the scene
    /// brightness; with HDR the intensity stays at 1 and exposure is left
    /// to the tone mapper.
    pub fn update_scene(
        &mut self,
        scene_brightness: f32,
        hdr: bool,
        grid_enabled: bool,
        figures_enabled: bool,
        luminance_boost: f32,
    ) {
        let intensity = if hdr { 1.0 } else { scene_brightness };
        let layer = |rgb: [f32; 3], enabled: bool| {
            let alpha = if enabled {
                BACKGROUND_OPACITY * intensity
            } else {
                0.0
            };
            [rgb[0], rgb[1], rgb[2], alpha]
        };

        self.set_hdr(hdr);
        self.params.luminance_multiplicator = intensity * luminance_boost;
        self.backgrounds[BackgroundLayer::Grid.index()].color = layer(GRID_COLOR, grid_enabled);
        self.backgrounds[BackgroundLayer::Figures.index()].color =
            layer(FIGURES_COLOR, figures_enabled);
    }

    pub fn star_uniforms(&self, frame: &FrameContext) -> StarUniforms {
        StarUniforms::new(frame, &self.params, self.appearance)
    }

    pub fn background_uniforms(
        &self,
        frame: &FrameContext,
        layer: BackgroundLayer,
    ) -> BackgroundUniforms {
        let intensity = background_intensity(self.hdr(), self.params.luminance_multiplicator);
        BackgroundUniforms::new(frame, self.backgrounds[layer.index()].color, intensity)
    }

    /// Draws the visible background layers, then the stars.
    pub fn draw(&mut self, backend: &mut B, frame: &FrameContext) -> Result<DrawResult, B::Error> {
        if !self.uploaded {
            backend.upload_stars(&self.table).map_err(RenderError::Upload)?;
            debug!("Uploaded {} star vertices", self.table.len());
            self.uploaded = true;
        }

        let stars = self.star_uniforms(frame);
        let layers: Vec<(BackgroundLayer, BackgroundUniforms)> = BackgroundLayer::ALL
            .into_iter()
            .filter(|layer| self.backgrounds[layer.index()].is_visible())
            .map(|layer| (layer, self.background_uniforms(frame, layer)))
            .collect();
        let state = StarDrawState::for_mode(self.draw_mode());

        let (recompiled, programs) = self.selector.ensure_compiled(backend)?;

        let mut result = DrawResult {
            recompiled,
            ..DrawResult::default()
        };

        for (layer, uniforms) in &layers {
            if let Some(texture) = &self.backgrounds[layer.index()].texture {
                backend
                    .draw_background(&programs.background, uniforms, texture)
                    .map_err(RenderError::Draw)?;
                result.background_layers_drawn += 1;
            }
        }

        if !self.table.is_empty() {
            backend
                .draw_stars(
                    &programs.stars,
                    &stars,
                    &state,
                    self.star_texture.as_ref(),
                    self.table.len(),
                )
                .map_err(RenderError::Draw)?;
            result.stars_drawn = self.table.len();
        }

        Ok(result)
    }

    /// Stars sit at effectively infinite distance, so the field is never
    /// culled.
    pub fn bounding_volume(&self) -> Bounds {
        Bounds::unbounded()
    }
}
