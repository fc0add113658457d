//! Tube mesh swept around the capsule centerline.

use tracing::warn;

use crate::anchor::Anchor;
use crate::capsule;
use crate::float::Float;
use crate::vec::Vec3;

/// Geometry inputs for one mesh build: both anchors plus the radii and
/// resolutions already adjusted for the current stretch.
///
/// Indices are `u32`, so a mesh holds at most `u32::MAX + 1` vertices;
/// see [`MeshParams::fits_u32_indices`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshParams<F: Float> {
    pub start: Anchor<F>,
    pub end: Anchor<F>,
    pub rope_radius: F,
    pub capsule_radius: F,
    /// Vertices per tube ring.
    pub rope_resolution: usize,
    /// Centerline points per capsule cap.
    pub spherical_resolution: usize,
    /// Centerline points per straight run.
    pub linear_resolution: usize,
    /// Lowest height a centerline point may sit at.
    pub min_height: F,
}

impl<F: Float> MeshParams<F> {
    /// Number of rings in the tube.
    pub fn ring_count(&self) -> usize {
        capsule::point_count(self.spherical_resolution, self.linear_resolution)
    }

    pub fn vertex_count(&self) -> usize {
        self.ring_count() * self.rope_resolution
    }

    pub fn index_count(&self) -> usize {
        self.vertex_count() * 6
    }

    /// Whether every vertex of this mesh can be addressed by a `u32` index.
    pub fn fits_u32_indices(&self) -> bool {
        self.spherical_resolution
            .checked_add(self.linear_resolution)
            .and_then(|points| points.checked_mul(2))
            .and_then(|rings| rings.checked_mul(self.rope_resolution))
            .is_some_and(|vertices| u32::try_from(vertices.saturating_sub(1)).is_ok())
    }
}

/// Vertex positions and triangle indices of one rope mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers<F: Float> {
    pub vertices: Vec<Vec3<F>>,
    /// Three indices per triangle, two triangles per quad.
    pub indices: Vec<u32>,
}

impl<F: Float> MeshBuffers<F> {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Positions as consecutive `x, y, z` triples.
    pub fn flat_positions(&self) -> Vec<F> {
        self.vertices.iter().flat_map(|v| [v.x, v.y, v.z]).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Build the closed tube for `params`, bent by `offsets`.
///
/// Params past the `u32` index range produce empty buffers.
pub fn generate<F: Float>(params: &MeshParams<F>, offsets: &[Vec3<F>]) -> MeshBuffers<F> {
    if !params.fits_u32_indices() {
        warn!(
            spherical = params.spherical_resolution,
            linear = params.linear_resolution,
            rope = params.rope_resolution,
            "rope mesh exceeds u32 index range, skipping build"
        );
        return MeshBuffers::default();
    }
    let centerline = capsule::centerline(params, offsets);
    MeshBuffers {
        vertices: extrude(&centerline, params),
        indices: triangulate(centerline.len(), params.rope_resolution),
    }
}

/// One ring of `rope_resolution` vertices per centerline point, each ring
/// perpendicular to the direction of the next point.
///
/// The ring starts from `forward × end.up`, so rings stay untwisted while
/// the loop lies in the plane the end anchor's up axis is normal to.
pub fn extrude<F: Float>(centerline: &[Vec3<F>], params: &MeshParams<F>) -> Vec<Vec3<F>> {
    let n = centerline.len();
    let r = params.rope_resolution;
    let mut vertices = Vec::with_capacity(n * r);
    if r == 0 {
        return vertices;
    }
    let step = F::from_f32(360.0) / F::from_usize(r);
    for (i, &center) in centerline.iter().enumerate() {
        let forward = (centerline[(i + 1) % n] - center).normalize();
        let right = forward.cross(params.end.up).normalize();
        for k in 0..r {
            let spoke = right.rotate_about(forward, F::from_usize(k) * step);
            vertices.push(center + spoke.scale(params.rope_radius));
        }
    }
    vertices
}

/// Two triangles per (ring, column) quad, wrapping both ways so the tube
/// closes on itself.
pub fn triangulate(ring_count: usize, rope_resolution: usize) -> Vec<u32> {
    let r = rope_resolution;
    let size = ring_count * r;
    let mut indices = Vec::with_capacity(size * 6);
    if size == 0 {
        return indices;
    }
    debug_assert!(u32::try_from(size - 1).is_ok(), "{size} vertices overflow u32 indices");
    for ring in 0..ring_count {
        let base = ring * r;
        for j in 0..r {
            let next_col = (j + 1) % r;
            let here = base + j;
            let ahead_next = (base + next_col + r) % size;
            let ahead = (base + j + r) % size;
            let next = base + next_col;
            indices.extend(
                [here, ahead_next, ahead, here, next, ahead_next]
                    .into_iter()
                    .map(|i| i as u32),
            );
        }
    }
    indices
}
