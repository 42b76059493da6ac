//! CPU-side copies of the shader photometry plus the appearance scaling
//! derived from the loaded magnitude range.

use celestial_stars::StarsSettings;

/// Square arc-seconds per steradian, rounded.
pub const STERADIAN_TO_SQUARE_ARCSEC: f32 = 4.25e10;

/// Luminance, in cd/m², of a surface with a brightness of 0 mag/arcsec².
pub const ZERO_MAGNITUDE_LUMINANCE: f32 = 10.8e4;

/// Apparent magnitude of a star with absolute magnitude `absolute` seen
/// from `distance_pc` parsecs.
pub fn apparent_magnitude(absolute: f32, distance_pc: f32) -> f32 {
    absolute + 5.0 * (distance_pc / 10.0).log10()
}

/// Luminance of a star with the given apparent magnitude spread evenly
/// over `solid_angle` steradians.
pub fn magnitude_to_luminance(apparent: f32, solid_angle: f32) -> f32 {
    let surface_brightness = apparent + 2.5 * (solid_angle * STERADIAN_TO_SQUARE_ARCSEC).log10();
    ZERO_MAGNITUDE_LUMINANCE * 10f32.powf(-0.4 * surface_brightness)
}

/// Maps a magnitude to a size and an opacity.
///
/// The faintest loaded star gets `min_size`/`min_opacity`, the brightest
/// `max_size`/`max_opacity`. In between, the normalized brightness is
/// raised to `exponent`, so exponents above one single out the brightest
/// stars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppearanceScale {
    pub magnitude_range: (f32, f32),
    pub size: (f32, f32),
    pub opacity: (f32, f32),
    pub exponent: f32,
}

impl AppearanceScale {
    /// `magnitude_range` is the (min, max) visual magnitude of the loaded
    /// stars; an empty star set falls back to the settings' drawable range.
    pub fn from_settings(settings: &StarsSettings, magnitude_range: Option<(f32, f32)>) -> Self {
        Self {
            magnitude_range: magnitude_range
                .unwrap_or((settings.min_magnitude, settings.max_magnitude)),
            size: (settings.min_size, settings.max_size),
            opacity: (settings.min_opacity, settings.max_opacity),
            exponent: settings.scaling_exponent,
        }
    }

    /// 0 for the faintest loaded magnitude, 1 for the brightest, clamped
    /// outside the range.
    pub fn factor(&self, magnitude: f32) -> f32 {
        let (brightest, faintest) = self.magnitude_range;
        let span = faintest - brightest;
        if span <= f32::EPSILON {
            return 1.0;
        }
        ((faintest - magnitude) / span).clamp(0.0, 1.0).powf(self.exponent)
    }

    pub fn size(&self, magnitude: f32) -> f32 {
        lerp(self.size, self.factor(magnitude))
    }

    pub fn opacity(&self, magnitude: f32) -> f32 {
        lerp(self.opacity, self.factor(magnitude))
    }
}

fn lerp((lo, hi): (f32, f32), t: f32) -> f32 {
    lo + (hi - lo) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_apparent_magnitude_at_ten_parsecs() {
        assert_relative_eq!(apparent_magnitude(4.83, 10.0), 4.83);
        assert_relative_eq!(apparent_magnitude(0.0, 100.0), 5.0, epsilon = 1e-5);
    }

    #[test]
    fn test_luminance_drops_five_magnitudes_per_hundredfold() {
        let bright = magnitude_to_luminance(0.0, 1e-5);
        let faint = magnitude_to_luminance(5.0, 1e-5);
        assert_relative_eq!(bright / faint, 100.0, max_relative = 1e-4);
    }

    #[test]
    fn test_luminance_scales_inversely_with_solid_angle() {
        let small = magnitude_to_luminance(2.0, 1e-6);
        let large = magnitude_to_luminance(2.0, 1e-5);
        assert_relative_eq!(small / large, 10.0, max_relative = 1e-4);
    }

    #[test]
    fn test_appearance_extremes() {
        let scale = AppearanceScale {
            magnitude_range: (-1.5, 8.5),
            size: (0.1, 3.0),
            opacity: (0.7, 1.0),
            exponent: 4.0,
        };
        assert_relative_eq!(scale.size(-1.5), 3.0, epsilon = 1e-6);
        assert_relative_eq!(scale.size(8.5), 0.1);
        assert_relative_eq!(scale.opacity(20.0), 0.7);
        assert_relative_eq!(scale.factor(3.5), 0.0625);
    }

    #[test]
    fn test_appearance_from_settings() {
        let settings = StarsSettings::default();
        let scale = AppearanceScale::from_settings(&settings, None);
        assert_eq!(scale.magnitude_range, (-15.0, 15.0));
        assert_eq!(scale.exponent, 4.0);

        let single = AppearanceScale::from_settings(&settings, Some((2.0, 2.0)));
        assert_relative_eq!(single.size(2.0), settings.max_size, epsilon = 1e-6);
    }
}
