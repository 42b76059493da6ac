//! Render-ready vertex table.
//!
//! One [`RenderVertex`] per star, packed as seven `f32`s for a single
//! interleaved vertex buffer. The magnitude slot holds the *absolute*
//! magnitude; the vertex shaders turn it back into an apparent magnitude
//! from the current observer position every frame.

use bytemuck::{Pod, Zeroable};

use crate::catalog::StarRecord;
use crate::color::{absolute_magnitude, distance_parsec, spectral_color};

pub const FLOATS_PER_VERTEX: usize = 7;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct RenderVertex {
    pub declination: f32,
    pub ascension: f32,
    /// Distance in parsecs.
    pub distance: f32,
    pub color: [f32; 3],
    /// Absolute magnitude.
    pub magnitude: f32,
}

const _: () = assert!(std::mem::size_of::<RenderVertex>() == FLOATS_PER_VERTEX * 4);

impl RenderVertex {
    pub fn from_record(star: &StarRecord) -> Self {
        let distance = distance_parsec(star);
        Self {
            declination: star.declination,
            ascension: star.ascension,
            distance,
            color: spectral_color(star),
            magnitude: absolute_magnitude(star.v_mag, distance),
        }
    }
}

/// One interleaved vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader input location.
    pub location: u32,
    /// Number of `f32` components.
    pub components: u32,
    /// Byte offset inside a vertex.
    pub offset: usize,
}

/// Attribute layout matching the `in` declarations of the star vertex shaders:
/// direction (vec2), distance, color (vec3), magnitude.
pub const ATTRIBUTES: [VertexAttribute; 4] = [
    VertexAttribute {
        location: 0,
        components: 2,
        offset: 0,
    },
    VertexAttribute {
        location: 1,
        components: 1,
        offset: 2 * 4,
    },
    VertexAttribute {
        location: 2,
        components: 3,
        offset: 3 * 4,
    },
    VertexAttribute {
        location: 3,
        components: 1,
        offset: 6 * 4,
    },
];

pub const STRIDE: usize = std::mem::size_of::<RenderVertex>();

/// The vertex table built from a record set, plus the magnitude range
/// actually present in it.
#[derive(Debug, Clone, Default)]
pub struct VertexTable {
    vertices: Vec<RenderVertex>,
    magnitude_range: Option<(f32, f32)>,
}

impl VertexTable {
    /// Builds one vertex per record, in record order.
    pub fn build(records: &[StarRecord]) -> Self {
        let mut vertices = Vec::with_capacity(records.len());
        let mut magnitude_range: Option<(f32, f32)> = None;
        for star in records {
            vertices.push(RenderVertex::from_record(star));
            magnitude_range = Some(match magnitude_range {
                None => (star.v_mag, star.v_mag),
                Some((lo, hi)) => (lo.min(star.v_mag), hi.max(star.v_mag)),
            });
        }
        Self {
            vertices,
            magnitude_range,
        }
    }

    pub fn vertices(&self) -> &[RenderVertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Minimum and maximum visual magnitude of the loaded stars, or `None`
    /// for an empty table.
    pub fn magnitude_range(&self) -> Option<(f32, f32)> {
        self.magnitude_range
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
