//! Per-frame uniform values and fixed-function state.
//!
//! Field docs name the GLSL uniform each value feeds.

use celestial_stars::DrawMode;
use glam::{Mat4, Vec2, Vec4};

use crate::photometry::AppearanceScale;

/// Point size used by the point draw modes, in pixels.
pub const POINT_SIZE: f32 = 0.5;

/// Background brightness per unit of luminance multiplier when HDR is on.
pub const HDR_BACKGROUND_SCALE: f32 = 0.001;

/// Host camera state for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub model_view: Mat4,
    pub projection: Mat4,
    /// Viewport width and height in pixels.
    pub viewport: Vec2,
}

impl FrameContext {
    pub fn new(model_view: Mat4, projection: Mat4, viewport: Vec2) -> Self {
        Self {
            model_view,
            projection,
            viewport,
        }
    }
}

/// Renderer tunables that feed the star program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarParams {
    pub min_magnitude: f32,
    pub max_magnitude: f32,
    pub solid_angle: f32,
    pub luminance_multiplicator: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarUniforms {
    /// `uMatMV`
    pub model_view: Mat4,
    /// `uMatP`
    pub projection: Mat4,
    /// `uInvMV`
    pub inverse_model_view: Mat4,
    /// `uInvP`
    pub inverse_projection: Mat4,
    /// `uResolution`
    pub resolution: Vec2,
    /// `uMinMagnitude`
    pub min_magnitude: f32,
    /// `uMaxMagnitude`
    pub max_magnitude: f32,
    /// `uSolidAngle`
    pub solid_angle: f32,
    /// `uLuminanceMultiplicator`
    pub luminance_multiplicator: f32,
    /// Host-side size and opacity mapping for backends that draw with a
    /// fixed-function point size. Not uploaded to any shader; see
    /// [`crate::RenderBackend::draw_stars`].
    pub appearance: AppearanceScale,
}

impl StarUniforms {
    pub fn new(frame: &FrameContext, params: &StarParams, appearance: AppearanceScale) -> Self {
        Self {
            model_view: frame.model_view,
            projection: frame.projection,
            inverse_model_view: frame.model_view.inverse(),
            inverse_projection: frame.projection.inverse(),
            resolution: frame.viewport,
            min_magnitude: params.min_magnitude,
            max_magnitude: params.max_magnitude,
            solid_angle: params.solid_angle,
            luminance_multiplicator: params.luminance_multiplicator,
            appearance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundUniforms {
    /// `uInvMVP`
    pub inverse_model_view_projection: Mat4,
    /// `uInvMV`
    pub inverse_model_view: Mat4,
    /// `uColor`; alpha already scaled by the background intensity.
    pub color: Vec4,
}

impl BackgroundUniforms {
    /// The sky dome ignores the observer's translation, only rotation
    /// affects it.
    pub fn new(frame: &FrameContext, color: [f32; 4], intensity: f32) -> Self {
        let rotation_only = strip_translation(frame.model_view);
        Self {
            inverse_model_view_projection: (frame.projection * rotation_only).inverse(),
            inverse_model_view: rotation_only.inverse(),
            color: Vec4::new(color[0], color[1], color[2], color[3] * intensity),
        }
    }
}

pub fn strip_translation(mut model_view: Mat4) -> Mat4 {
    model_view.w_axis = Vec4::W;
    model_view
}

/// 1 without HDR, otherwise a thousandth of the luminance multiplier.
pub fn background_intensity(hdr: bool, luminance_multiplicator: f32) -> f32 {
    if hdr {
        HDR_BACKGROUND_SCALE * luminance_multiplicator
    } else {
        1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// `ONE, ONE`
    Additive,
    /// `SRC_ALPHA, ONE_MINUS_SRC_ALPHA`
    Alpha,
}

/// Fixed-function state for the star draw call. The whole pass runs with
/// depth test on and depth writes off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarDrawState {
    pub point_size: Option<f32>,
    pub smooth_points: bool,
    pub blend: BlendMode,
}

impl StarDrawState {
    pub fn for_mode(mode: DrawMode) -> Self {
        let smooth = mode == DrawMode::SmoothPoint;
        Self {
            point_size: mode.is_point().then_some(POINT_SIZE),
            smooth_points: smooth,
            blend: if smooth {
                BlendMode::Alpha
            } else {
                BlendMode::Additive
            },
        }
    }
}
