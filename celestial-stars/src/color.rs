//! Spectral color and distance derived from catalog photometry.
//!
//! Star colors come from the B−V color index through a fixed lookup table of
//! blackbody-like display colors, from blue-white (B−V = −0.4) to deep orange
//! (B−V = 2.0). Distances come from the trigonometric parallax.

use crate::catalog::StarRecord;

pub const MIN_COLOR_INDEX: f32 = -0.4;
pub const MAX_COLOR_INDEX: f32 = 2.0;

/// Distance assigned to stars without a usable parallax, in parsecs.
pub const FALLBACK_DISTANCE_PC: f32 = 100_000.0;

/// Display colors for B−V from −0.4 to 2.0, as `0xRRGGBB`.
///
/// Values from Mitchell Charity's "What color are the stars?" table.
pub const SPECTRAL_COLORS: [u32; 47] = [
    0x9bb2ff, 0x9eb5ff, 0xa3b9ff, 0xaabfff, 0xb2c5ff, 0xbbccff, 0xc4d2ff, 0xccd8ff, 0xd3ddff,
    0xdae2ff, 0xdfe5ff, 0xe4e9ff, 0xe9ecff, 0xeeefff, 0xf3f2ff, 0xf8f6ff, 0xfef9ff, 0xfff9fb,
    0xfff7f5, 0xfff5ef, 0xfff3ea, 0xfff1e5, 0xffefe0, 0xffeddb, 0xffebd6, 0xffe8ce, 0xffe6ca,
    0xffe5c6, 0xffe3c3, 0xffe2bf, 0xffe0bb, 0xffdfb8, 0xffddb4, 0xffdbb0, 0xffdaad, 0xffd8a9,
    0xffd6a5, 0xffd29c, 0xffd096, 0xffcc8f, 0xffc885, 0xffc178, 0xffb765, 0xffa94b, 0xff9523,
    0xff7b00, 0xff5200,
];

/// B−V color index, clamped to the range covered by [`SPECTRAL_COLORS`].
pub fn color_index(star: &StarRecord) -> f32 {
    (star.b_mag - star.v_mag).clamp(MIN_COLOR_INDEX, MAX_COLOR_INDEX)
}

/// Index into [`SPECTRAL_COLORS`] for a color index.
///
/// The index is normalized over the full table so the clamp boundaries land
/// on the first and last entries. NaN maps to the first entry.
pub fn spectral_bucket(color_index: f32) -> usize {
    let clamped = color_index.clamp(MIN_COLOR_INDEX, MAX_COLOR_INDEX);
    let normalized = (clamped - MIN_COLOR_INDEX) / (MAX_COLOR_INDEX - MIN_COLOR_INDEX);
    let last = SPECTRAL_COLORS.len() - 1;
    let bucket = (normalized * last as f32 + 0.5).floor();
    // `as` saturates, so NaN becomes 0.
    (bucket as usize).min(last)
}

/// Linear RGB in `0.0..=1.0` for a packed `0xRRGGBB` value.
pub fn unpack_rgb(rgb: u32) -> [f32; 3] {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
    ]
}

pub fn spectral_color(star: &StarRecord) -> [f32; 3] {
    unpack_rgb(SPECTRAL_COLORS[spectral_bucket(color_index(star))])
}

/// Distance in parsecs from the parallax, or [`FALLBACK_DISTANCE_PC`].
pub fn distance_parsec(star: &StarRecord) -> f32 {
    if star.parallax > 0.0 {
        1000.0 / star.parallax
    } else {
        FALLBACK_DISTANCE_PC
    }
}

/// Absolute magnitude of a star with visual magnitude `v_mag` at `distance_pc`.
pub fn absolute_magnitude(v_mag: f32, distance_pc: f32) -> f32 {
    v_mag - 5.0 * (distance_pc / 10.0).log10()
}
