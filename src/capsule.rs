//! Closed capsule centerline that the rope tube is swept along.
//!
//! The loop runs: start cap fan, bridge to the end cap, end cap fan, bridge
//! back to the start. Both bridges are `linear_resolution` points long.

use crate::float::Float;
use crate::mesh::MeshParams;
use crate::vec::Vec3;

/// Number of centerline points for the given resolutions.
pub fn point_count(spherical_resolution: usize, linear_resolution: usize) -> usize {
    (spherical_resolution + linear_resolution) * 2
}

/// Build the centerline loop for `params` and bend it by `offsets`.
///
/// Every point is clamped to `params.min_height` before offsets are added.
pub fn centerline<F: Float>(params: &MeshParams<F>, offsets: &[Vec3<F>]) -> Vec<Vec3<F>> {
    let s = params.spherical_resolution;
    let l = params.linear_resolution;
    let n = point_count(s, l);
    let mut points = vec![Vec3::zero(); n];
    if n == 0 {
        return points;
    }

    let full_turn = F::from_f32(360.0);
    let (step, mut angle_offset) = if l != 0 {
        (full_turn / F::from_usize(2 * s.saturating_sub(1).max(1)), F::zero())
    } else {
        let step = full_turn / F::from_usize(2 * s);
        (step, step * F::half())
    };

    let start = &params.start;
    for (i, point) in points[..s].iter_mut().enumerate() {
        let angle = angle_offset + F::from_usize(i) * step;
        *point = fan_point(start.position, start.up, start.right, angle, params);
    }

    angle_offset = angle_offset + F::from_f32(180.0);
    let end = &params.end;
    for (i, point) in points[s + l..2 * s + l].iter_mut().enumerate() {
        let angle = (angle_offset + F::from_usize(i) * step).fmod(full_turn);
        *point = fan_point(end.position, end.up, end.right, angle, params);
    }

    bridge(&mut points, s, l, params.min_height);
    bridge(&mut points, 2 * s + l, l, params.min_height);

    blend_offsets(&mut points, s, l, offsets);
    points
}

fn fan_point<F: Float>(
    center: Vec3<F>,
    up: Vec3<F>,
    right: Vec3<F>,
    degrees: F,
    params: &MeshParams<F>,
) -> Vec3<F> {
    (center + right.rotate_about(up, degrees).scale(params.capsule_radius)).with_min_y(params.min_height)
}

/// Fill `len` points from `first` onward on the straight line between the
/// point before `first` and the point after the run (wrapping).
fn bridge<F: Float>(points: &mut [Vec3<F>], first: usize, len: usize, min_height: F) {
    if len == 0 {
        return;
    }
    let n = points.len();
    let from = points[(first + n - 1) % n];
    let to = points[(first + len) % n];
    let spacing = F::one() / F::from_usize(len + 1);
    for i in 0..len {
        points[first + i] = from.lerp(to, F::from_usize(i + 1) * spacing).with_min_y(min_height);
    }
}

/// Add the sampled offsets to both halves of the loop: the half from the
/// middle of the start cap walks the offsets forward, the other half walks
/// them backward, so both sides sag the same way.
fn blend_offsets<F: Float>(points: &mut [Vec3<F>], s: usize, l: usize, offsets: &[Vec3<F>]) {
    if offsets.is_empty() {
        return;
    }
    let n = points.len();
    let half = s + l;
    let p = F::one() / F::from_usize(half);

    let start = s / 2;
    for i in 0..half {
        points[(start + i) % n] += sample_offset(offsets, (p * F::from_usize(i)).clamp01());
    }
    let start = start + half;
    for i in 0..half {
        points[(start + i) % n] += sample_offset(offsets, (F::one() - p * F::from_usize(i)).clamp01());
    }
}

/// Offset at `t` in [0, 1] along the rope.
///
/// The offsets are treated as `len + 1` equal bins; `t` picks a bin and
/// interpolates towards the next sample. Bins past the second-to-last
/// sample return the last one.
pub fn sample_offset<F: Float>(offsets: &[Vec3<F>], t: F) -> Vec3<F> {
    let len = offsets.len();
    let Some(last) = offsets.last() else {
        return Vec3::zero();
    };
    let scaled = t * F::from_usize(len + 1);
    let id = scaled.to_index();
    if id + 1 >= len {
        return *last;
    }
    let frac = scaled - F::from_usize(id);
    offsets[id].lerp(offsets[id + 1], frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::Anchor;

    fn params(s: usize, l: usize) -> MeshParams<f32> {
        MeshParams {
            start: Anchor::at(Vec3::new(0.0, 0.0, 0.0)),
            end: Anchor::at(Vec3::new(10.0, 0.0, 0.0)),
            rope_radius: 0.2,
            capsule_radius: 2.0,
            rope_resolution: 8,
            spherical_resolution: s,
            linear_resolution: l,
            min_height: -100.0,
        }
    }

    #[test]
    fn start_fan_sits_on_capsule_radius() {
        let pts = centerline(&params(16, 20), &[]);
        assert_eq!(pts.len(), 72);
        for p in &pts[..16] {
            assert!((p.length() - 2.0).abs() < 1e-5);
        }
        for p in &pts[36..52] {
            assert!((p.distance(Vec3::new(10.0, 0.0, 0.0)) - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn fans_open_half_a_turn() {
        // With a straight run, the fan's first and last points are opposite.
        let pts = centerline(&params(16, 20), &[]);
        assert!((pts[0] + pts[15]).length() < 1e-4, "{:?} {:?}", pts[0], pts[15]);
    }

    #[test]
    fn bridge_points_are_collinear() {
        let pts = centerline(&params(4, 3), &[]);
        let from = pts[3];
        let to = pts[7];
        for (k, p) in pts[4..7].iter().enumerate() {
            let expected = from.lerp(to, (k + 1) as f32 / 4.0);
            assert!(p.approx_eq(expected, 1e-5));
        }
    }

    #[test]
    fn zero_linear_resolution_is_finite() {
        let pts = centerline(&params(6, 0), &[Vec3::new(0.0, -1.0, 0.0); 5]);
        assert_eq!(pts.len(), 12);
        assert!(pts.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn heights_are_clamped() {
        let mut p = params(8, 4);
        p.min_height = 0.5;
        let pts = centerline(&p, &[]);
        assert!(pts.iter().all(|v| v.y >= 0.5));
    }

    /// Point on a fan of radius 2 around `center` at `degrees`, for anchors
    /// built with `Anchor::at` (up +y, right +z).
    fn on_fan(center: Vec3<f32>, degrees: f32) -> Vec3<f32> {
        let r = degrees.to_radians();
        center + Vec3::new(r.sin(), 0.0, r.cos()).scale(2.0)
    }

    #[test]
    fn closed_fans_start_half_a_step_in() {
        // Four points and no straight run: 45 degree steps, offset by 22.5.
        let pts = centerline(&params(4, 0), &[]);
        assert!(pts[0].approx_eq(on_fan(Vec3::zero(), 22.5), 1e-5), "{:?}", pts[0]);
        assert!(pts[3].approx_eq(on_fan(Vec3::zero(), 157.5), 1e-5), "{:?}", pts[3]);
        let end = Vec3::new(10.0, 0.0, 0.0);
        assert!(pts[4].approx_eq(on_fan(end, 202.5), 1e-5), "{:?}", pts[4]);
    }

    #[test]
    fn end_fan_starts_opposite_and_wraps() {
        // Four points with a straight run: 60 degree steps from 0 and 180.
        let pts = centerline(&params(4, 3), &[]);
        let end = Vec3::new(10.0, 0.0, 0.0);
        assert!(pts[0].approx_eq(on_fan(Vec3::zero(), 0.0), 1e-5));
        assert!(pts[7].approx_eq(on_fan(end, 180.0), 1e-5), "{:?}", pts[7]);
        assert!(pts[9].approx_eq(on_fan(end, 300.0), 1e-5), "{:?}", pts[9]);
        // 180 + 3 * 60 lands back on 0.
        assert!(pts[10].approx_eq(on_fan(end, 0.0), 1e-5), "{:?}", pts[10]);
    }

    #[test]
    fn offsets_run_forward_on_one_side_and_back_on_the_other() {
        let (s, l) = (6, 4);
        let p = params(s, l);
        let offsets: Vec<Vec3<f32>> = (0..7)
            .map(|i| Vec3::new(0.0, -(i as f32), 0.5 * i as f32))
            .collect();
        let bare = centerline(&p, &[]);
        let bent = centerline(&p, &offsets);
        let n = bare.len();
        let half = s + l;
        let step = 1.0 / half as f32;

        for i in 0..half {
            let forward = s / 2 + i;
            let expected = sample_offset(&offsets, step * i as f32);
            let got = bent[forward] - bare[forward];
            assert!(got.approx_eq(expected, 1e-4), "forward {i}: {got:?} vs {expected:?}");

            let back = (s / 2 + half + i) % n;
            let expected = sample_offset(&offsets, 1.0 - step * i as f32);
            let got = bent[back] - bare[back];
            assert!(got.approx_eq(expected, 1e-4), "back {i}: {got:?} vs {expected:?}");
        }

        // The ramp starts at the middle of the start cap and peaks at the
        // middle of the end cap, whichever side is walked.
        assert!((bent[s / 2] - bare[s / 2]).approx_eq(offsets[0], 1e-5));
        assert!((bent[s / 2 + half] - bare[s / 2 + half]).approx_eq(offsets[6], 1e-5));
    }

    #[test]
    fn sample_offset_ends_and_interpolation() {
        let offsets = [
            Vec3::new(0.0f32, 0.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
            Vec3::new(0.0, 8.0, 0.0),
        ];
        assert_eq!(sample_offset(&offsets, 0.0), offsets[0]);
        assert_eq!(sample_offset(&offsets, 1.0), offsets[2]);
        // t = 0.125 is half way through the first of four bins.
        assert!(sample_offset(&offsets, 0.125).approx_eq(Vec3::new(0.0, 2.0, 0.0), 1e-5));
        assert_eq!(sample_offset::<f32>(&[], 0.5), Vec3::zero());
    }
}
