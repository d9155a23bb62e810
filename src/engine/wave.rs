// Wave Animator: cheap stylized ripple, not a fluid solver.
//
// Every tick the accumulated time advances by a fixed step (frame-rate
// independent on purpose) and every live vertex is recomputed from its rest
// position, so nothing drifts across frames:
//
//   x' = rest.x + cos(t + φ) · A
//   y' = rest.y + sin(t + φ) · A
//   z' = rest.z + cos(t + φ) · A

use bevy_ecs::prelude::*;
use glam::Vec3;

use super::params::WaveParams;
use super::surface::VertexField;

#[derive(Resource, Debug, Clone)]
pub struct WaveAnimator {
    pub params: WaveParams,
    time: f32,
}

impl WaveAnimator {
    pub fn new(params: WaveParams) -> Self {
        Self { params, time: 0.0 }
    }

    /// Accumulated animation time.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Restart the animation clock, e.g. after the surface is regenerated.
    pub fn reset(&mut self) {
        self.time = 0.0;
    }

    /// Step the clock by one fixed increment and rewrite every live position.
    pub fn advance(&mut self, field: &mut VertexField) {
        self.time += self.params.time_step;
        self.write_positions(field);
    }

    /// Rewrite live positions for the current time without stepping the clock.
    /// No-op on an empty field.
    pub fn write_positions(&self, field: &mut VertexField) {
        let (rest, phases, live) = field.split_mut();
        for ((out, &r), &phase) in live.iter_mut().zip(rest).zip(phases) {
            *out = displace(r, phase, self.time, self.params.amplitude);
        }
    }
}

/// Position of one vertex at time `t`. Pure: depends only on its arguments.
#[inline]
pub fn displace(rest: Vec3, phase: f32, t: f32, amplitude: f32) -> Vec3 {
    let (s, c) = (t + phase).sin_cos();
    rest + Vec3::new(c, s, c) * amplitude
}
