//! Quadratic bezier math for connection curves.
//!
//! [`QuadBezier`] is a stateless value type holding three control points.
//! It provides curve evaluation and an iterative nearest-point search; the
//! connection module chains two of these into an S-shaped edge and uses the
//! nearest-point search for precise stroke hit-testing.

/// Squared euclidean distance between two points.
pub fn squared_distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    dx * dx + dy * dy
}

/// A quadratic bezier segment defined by start, control and end points.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuadBezier {
    pts: [(f32, f32); 3],
}

impl QuadBezier {
    /// Create a segment from start, control and end points.
    pub fn new(p0: (f32, f32), p1: (f32, f32), p2: (f32, f32)) -> Self {
        Self { pts: [p0, p1, p2] }
    }

    /// Replace all three control points.
    pub fn set(&mut self, p0: (f32, f32), p1: (f32, f32), p2: (f32, f32)) {
        self.pts = [p0, p1, p2];
    }

    /// Control point by index. Out-of-range indices clamp to the end point.
    pub fn point(&self, index: usize) -> (f32, f32) {
        self.pts[index.min(2)]
    }

    /// The curve's start point (t = 0).
    pub fn start_point(&self) -> (f32, f32) {
        self.pts[0]
    }

    /// The curve's end point (t = 1).
    pub fn end_point(&self) -> (f32, f32) {
        self.pts[2]
    }

    /// Evaluate the curve at parameter `t`:
    /// `(1-t)^2 * P0 + 2(1-t)t * P1 + t^2 * P2`.
    pub fn eval(&self, t: f32) -> (f32, f32) {
        let mt = 1.0 - t;
        let w0 = mt * mt;
        let w1 = 2.0 * mt * t;
        let w2 = t * t;
        (
            w0 * self.pts[0].0 + w1 * self.pts[1].0 + w2 * self.pts[2].0,
            w0 * self.pts[0].1 + w1 * self.pts[1].1 + w2 * self.pts[2].1,
        )
    }

    /// Approximate the curve point nearest to `query`.
    ///
    /// Adaptive bisection with a fixed iteration budget instead of
    /// closed-form root finding: sample five parameters spanning the current
    /// bracket, keep the sample closest to the query and narrow the bracket
    /// to its immediate neighbours. Ten rounds shrink the bracket width to
    /// about 1e-3, which is sub-pixel for UI-scale curves, without any
    /// derivative computation.
    pub fn closest_point_to(&self, query: (f32, f32)) -> (f32, f32) {
        let mut t0 = 0.0_f32;
        let mut t1 = 1.0_f32;
        let mut t_mid = 0.5_f32;

        for _ in 0..10 {
            let t_values = [t0, (t0 + t_mid) / 2.0, t_mid, (t_mid + t1) / 2.0, t1];

            let mut min_idx = 0;
            let mut min_sq_dist = squared_distance(query, self.eval(t_values[0]));
            for (idx, &t) in t_values.iter().enumerate().skip(1) {
                let sq_dist = squared_distance(query, self.eval(t));
                // Strict comparison: ties keep the lowest index, so the
                // bracket narrows deterministically.
                if sq_dist < min_sq_dist {
                    min_idx = idx;
                    min_sq_dist = sq_dist;
                }
            }

            t0 = t_values[min_idx.saturating_sub(1)];
            t1 = t_values[(min_idx + 1).min(4)];
            t_mid = (t0 + t1) / 2.0;
        }

        self.eval(t_mid)
    }
}
