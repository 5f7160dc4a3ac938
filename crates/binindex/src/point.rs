//! Fixed-dimension points and segments used by the index.

use std::ops::Deref;

/// A point in `D`-dimensional space.
///
/// The dimension is part of the type, so mixing 2D and 3D coordinates is a
/// compile error rather than a runtime length check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point<const D: usize>(pub [f64; D]);

impl<const D: usize> Point<D> {
    /// Create a new `Point` from its coordinates.
    pub const fn new(coords: [f64; D]) -> Self {
        Self(coords)
    }

    /// Squared Euclidean distance to `other`.
    pub fn distance_sq(&self, other: &Self) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Self) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Return the point's coordinates as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl<const D: usize> From<[f64; D]> for Point<D> {
    fn from(coords: [f64; D]) -> Self {
        Self(coords)
    }
}

impl<const D: usize> From<Point<D>> for [f64; D] {
    fn from(point: Point<D>) -> Self {
        point.0
    }
}

impl<const D: usize> Deref for Point<D> {
    type Target = [f64];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A finite line segment between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment<const D: usize> {
    /// First endpoint.
    pub start: Point<D>,
    /// Second endpoint.
    pub end: Point<D>,
}

impl<const D: usize> Segment<D> {
    /// Create a segment from its endpoints.
    pub fn new(start: impl Into<Point<D>>, end: impl Into<Point<D>>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Distance from `p` to the closest point of the segment.
    ///
    /// The projection onto the supporting line is clamped to the endpoints, so
    /// points beyond either end measure their distance to that endpoint. A
    /// zero-length segment degenerates to a point distance.
    pub fn distance_to(&self, p: &Point<D>) -> f64 {
        let mut len_sq = 0.0;
        let mut dot = 0.0;
        for k in 0..D {
            let dir = self.end[k] - self.start[k];
            len_sq += dir * dir;
            dot += (p[k] - self.start[k]) * dir;
        }
        if len_sq <= 0.0 {
            return p.distance(&self.start);
        }
        let t = (dot / len_sq).clamp(0.0, 1.0);
        let mut closest = self.start;
        for k in 0..D {
            closest.0[k] += t * (self.end[k] - self.start[k]);
        }
        p.distance(&closest)
    }

    /// Whether `p` lies inside the segment's bounding envelope.
    ///
    /// The envelope is the axis-aligned box spanned by the endpoints
    /// (componentwise min/max), grown by `tol` on every side. Bounds are
    /// inclusive.
    pub fn envelope_contains(&self, p: &Point<D>, tol: f64) -> bool {
        (0..D).all(|k| {
            let lo = self.start[k].min(self.end[k]) - tol;
            let hi = self.start[k].max(self.end[k]) + tol;
            p[k] >= lo && p[k] <= hi
        })
    }
}
