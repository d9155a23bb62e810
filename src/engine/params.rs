// Tunable parameters for the surface, its animation and the hover effect.
// Every magic number lives here with its unit and the range it is used in.

use glam::Vec3;
use std::ops::RangeInclusive;

// ============================================================================
// SURFACE
// ============================================================================

/// Shape of the grid mesh and its one-time irregularity.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceParams {
    /// Extent along model X in scene units.
    pub width: f32,
    /// Extent along model Y in scene units.
    pub height: f32,
    /// Number of grid cells along X. Vertices per row = width_segments + 1.
    pub width_segments: u32,
    /// Number of grid cells along Y. Rows = height_segments + 1.
    pub height_segments: u32,
    /// Upper bound of the per-axis jitter added once at construction: [0, jitter).
    pub jitter: f32,
    /// RNG seed for jitter, phases and initial colors. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Rotation of the surface about the X axis in radians.
    pub tilt: f32,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            width: 140.0,
            height: 40.0,
            width_segments: 80,
            height_segments: 40,
            jitter: 1.0,
            seed: None,
            tilt: -1.0,
        }
    }
}

impl SurfaceParams {
    pub const WIDTH_RANGE: RangeInclusive<f32> = 1.0..=240.0;
    pub const HEIGHT_RANGE: RangeInclusive<f32> = 1.0..=80.0;
    pub const WIDTH_SEGMENTS_RANGE: RangeInclusive<u32> = 1..=200;
    pub const HEIGHT_SEGMENTS_RANGE: RangeInclusive<u32> = 1..=100;

    /// Same parameters with every adjustable value clamped into its slider range.
    pub fn clamped(&self) -> Self {
        Self {
            width: self.width.clamp(*Self::WIDTH_RANGE.start(), *Self::WIDTH_RANGE.end()),
            height: self.height.clamp(*Self::HEIGHT_RANGE.start(), *Self::HEIGHT_RANGE.end()),
            width_segments: self.width_segments.clamp(
                *Self::WIDTH_SEGMENTS_RANGE.start(),
                *Self::WIDTH_SEGMENTS_RANGE.end(),
            ),
            height_segments: self.height_segments.clamp(
                *Self::HEIGHT_SEGMENTS_RANGE.start(),
                *Self::HEIGHT_SEGMENTS_RANGE.end(),
            ),
            ..self.clone()
        }
    }

    /// True if switching from `self` to `other` requires rebuilding the mesh.
    pub fn topology_differs(&self, other: &SurfaceParams) -> bool {
        self.width != other.width
            || self.height != other.height
            || self.width_segments != other.width_segments
            || self.height_segments != other.height_segments
    }
}

// ============================================================================
// WAVE
// ============================================================================

/// Stylized ripple applied on top of the rest positions every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    /// Displacement radius in scene units. Small enough that the surface
    /// still reads as one coherent sheet under the pointer.
    pub amplitude: f32,
    /// Time added per tick, independent of wall-clock frame time.
    pub time_step: f32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            amplitude: 0.002,
            time_step: 0.01,
        }
    }
}

// ============================================================================
// HOVER HIGHLIGHT
// ============================================================================

/// Colors and timing of the paint-and-fade hover effect.
/// Colors are linear RGB with channels in [0, 1] stored as (x, y, z) = (r, g, b).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightParams {
    pub hot: Vec3,
    pub base: Vec3,
    /// Seconds from hot back to base.
    pub duration: f32,
}

impl Default for HighlightParams {
    fn default() -> Self {
        Self {
            hot: Vec3::new(0.1, 0.5, 1.0),
            base: Vec3::new(0.0, 0.19, 0.4),
            duration: 0.5,
        }
    }
}

// ============================================================================
// CAMERA
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraParams {
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Initial eye position. The camera orbits the origin.
    pub eye: Vec3,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            fov: 75.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            eye: Vec3::new(0.0, 0.0, 20.0),
        }
    }
}

// ============================================================================
// LIGHTING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightParams {
    pub point_color: Vec3,
    pub point_position: Vec3,
    pub point_intensity: f32,
    pub back_color: Vec3,
    /// Direction the back light shines *from*.
    pub back_direction: Vec3,
    pub back_intensity: f32,
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            // #efadae
            point_color: Vec3::new(239.0 / 255.0, 173.0 / 255.0, 174.0 / 255.0),
            point_position: Vec3::new(-1.3, 7.0, -8.6),
            point_intensity: 1.3,
            back_color: Vec3::ONE,
            back_direction: Vec3::new(0.0, 0.0, 1.0),
            back_intensity: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_pulls_values_into_slider_ranges() {
        let params = SurfaceParams {
            width: 1000.0,
            height: 0.0,
            width_segments: 0,
            height_segments: 500,
            ..SurfaceParams::default()
        };
        let clamped = params.clamped();
        assert_eq!(clamped.width, 240.0);
        assert_eq!(clamped.height, 1.0);
        assert_eq!(clamped.width_segments, 1);
        assert_eq!(clamped.height_segments, 100);
        assert_eq!(clamped.jitter, params.jitter);
    }

    #[test]
    fn test_topology_differs_ignores_seed_and_tilt() {
        let a = SurfaceParams::default();
        let b = SurfaceParams { seed: Some(7), tilt: 0.3, ..a.clone() };
        assert!(!a.topology_differs(&b));

        let c = SurfaceParams { width_segments: 10, ..a.clone() };
        assert!(a.topology_differs(&c));
    }
}
