//! Curve sampling: polar endpoints and the quadratic Bezier basis.

use glam::DVec2;

/// Squared Bernstein weights `((1-t)^2, t^2)` for `t` evenly spaced over
/// `[0, 1]`. The middle Bernstein term vanishes because the control point
/// sits at the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingBasis {
    weights: Vec<(f64, f64)>,
}

impl SamplingBasis {
    /// `samples` must be at least 2; callers validate before building.
    pub fn new(samples: usize) -> Self {
        let last = samples.saturating_sub(1).max(1) as f64;
        let weights = (0..samples)
            .map(|i| {
                let t = i as f64 / last;
                let s = 1.0 - t;
                (s * s, t * t)
            })
            .collect();
        Self { weights }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weights(&self) -> &[(f64, f64)] {
        &self.weights
    }

    /// Samples the curve from `start` to `end` bowed toward the origin.
    pub fn sample(&self, start: DVec2, end: DVec2) -> Vec<DVec2> {
        self.weights
            .iter()
            .map(|&(w0, w1)| w0 * start + w1 * end)
            .collect()
    }
}

/// Point on the circle of `radius` at `angle` radians.
#[inline]
pub fn polar_to_cartesian(radius: f64, angle: f64) -> DVec2 {
    let (sin, cos) = angle.sin_cos();
    DVec2::new(radius * cos, radius * sin)
}
