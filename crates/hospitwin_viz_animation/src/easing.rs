// SPDX-License-Identifier: MIT OR Apache-2.0
//! Easing and waypoint interpolation.

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Cubic ease-in-out of a normalized time.
    ///
    /// Input is clamped to `[0, 1]`. The curve is symmetric about `t = 0.5`,
    /// so `ease(t) + ease(1 - t) == 1`.
    pub fn ease(t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t < 0.5 {
            4.0 * t * t * t
        } else {
            1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
        }
    }

    /// Linear interpolation between two floats
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Interpolate Vec3
    pub fn lerp_vec3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
        [
            Self::lerp(a[0], b[0], t),
            Self::lerp(a[1], b[1], t),
            Self::lerp(a[2], b[2], t),
        ]
    }

    /// Position between two zone waypoints at an already eased time
    pub fn position(from: [f32; 3], to: [f32; 3], eased_t: f32) -> [f32; 3] {
        Self::lerp_vec3(from, to, eased_t)
    }

    /// Euclidean distance between two waypoints
    pub fn distance(a: [f32; 3], b: [f32; 3]) -> f32 {
        let dx = b[0] - a[0];
        let dy = b[1] - a[1];
        let dz = b[2] - a[2];
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Yaw (radians about +Y) facing from `from` towards `to`.
    ///
    /// Zero yaw faces +Z. Segments with no horizontal extent face +Z.
    pub fn heading(from: [f32; 3], to: [f32; 3]) -> f32 {
        let dx = to[0] - from[0];
        let dz = to[2] - from[2];
        if dx == 0.0 && dz == 0.0 {
            return 0.0;
        }
        dx.atan2(dz)
    }
}
