//! Rope constraints: adjacent-pair rest length and hard endpoint pins.

use crate::float::Float;
use crate::segment::PhysicsSegment;
use crate::vec::Vec3;

/// Keeps segments `a` and `a + 1` at `rest_length` apart.
///
/// When `a` is pinned the whole correction goes to the neighbour;
/// otherwise both ends move by half.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinkConstraint<F: Float> {
    pub a: usize,
    pub rest_length: F,
    pub a_pinned: bool,
}

impl<F: Float> LinkConstraint<F> {
    pub fn new(a: usize, rest_length: F, a_pinned: bool) -> Self {
        LinkConstraint { a, rest_length, a_pinned }
    }

    pub fn solve(&self, segments: &mut [PhysicsSegment<F>]) {
        let b = self.a + 1;
        if b >= segments.len() {
            return;
        }
        let a_pos = segments[self.a].pos;
        let b_pos = segments[b].pos;

        let dist = a_pos.distance(b_pos);
        let error = (dist - self.rest_length).abs();
        let direction = if dist > self.rest_length {
            (a_pos - b_pos).normalize()
        } else if dist < self.rest_length {
            (b_pos - a_pos).normalize()
        } else {
            Vec3::zero()
        };
        let change = direction.scale(error);

        if self.a_pinned {
            segments[b].pos += change;
        } else {
            segments[self.a].pos -= change.scale(F::half());
            segments[b].pos += change.scale(F::half());
        }
    }

    /// Absolute rest-length violation of this link.
    pub fn error(&self, segments: &[PhysicsSegment<F>]) -> F {
        match (segments.get(self.a), segments.get(self.a + 1)) {
            (Some(a), Some(b)) => (a.pos.distance(b.pos) - self.rest_length).abs(),
            _ => F::zero(),
        }
    }
}

/// Forces one segment onto a position, dropping its velocity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PinConstraint<F: Float> {
    pub segment: usize,
    pub position: Vec3<F>,
}

impl<F: Float> PinConstraint<F> {
    pub fn new(segment: usize, position: Vec3<F>) -> Self {
        PinConstraint { segment, position }
    }

    pub fn solve(&self, segments: &mut [PhysicsSegment<F>]) {
        if let Some(s) = segments.get_mut(self.segment) {
            s.pin_to(self.position);
        }
    }
}
