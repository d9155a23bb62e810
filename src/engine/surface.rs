// Vertex Field: the deforming grid surface.
//
// Owns three parallel per-vertex buffers plus the fixed topology:
//   rest:   jittered construction positions, never written after new()
//   phases: uniform [0, π) offsets that desynchronize the ripple
//   live:   what the renderer and picker read; rewritten by the wave animator

use bevy_ecs::prelude::*;
use glam::{Mat4, Vec3};
use rand::Rng;
use std::f32::consts::PI;

use super::mesh::{self, Topology};
use super::params::SurfaceParams;

#[derive(Resource, Debug, Clone)]
pub struct VertexField {
    topology: Topology,
    rest: Vec<Vec3>,
    phases: Vec<f32>,
    live: Vec<Vec3>,
    /// Model-to-world transform of the surface.
    pub model: Mat4,
}

impl VertexField {
    /// Build the grid described by `params`, jitter it once and draw a phase per vertex.
    pub fn new(params: &SurfaceParams, rng: &mut impl Rng) -> Self {
        let (mut positions, topology) = mesh::grid(
            params.width,
            params.height,
            params.width_segments,
            params.height_segments,
        );

        if params.jitter > 0.0 {
            for p in &mut positions {
                p.x += rng.gen_range(0.0..params.jitter);
                p.y += rng.gen_range(0.0..params.jitter);
                p.z += rng.gen_range(0.0..params.jitter);
            }
        }

        let phases = (0..positions.len()).map(|_| rng.gen_range(0.0..PI)).collect();

        Self::from_parts(
            topology,
            positions,
            phases,
            Mat4::from_rotation_x(params.tilt),
        )
    }

    /// Assemble a field from explicit buffers. Live positions start at rest.
    pub fn from_parts(topology: Topology, rest: Vec<Vec3>, phases: Vec<f32>, model: Mat4) -> Self {
        debug_assert_eq!(rest.len(), phases.len(), "one phase per vertex");
        let live = rest.clone();
        Self {
            topology,
            rest,
            phases,
            live,
            model,
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    #[cfg(test)]
    pub fn rest(&self) -> &[Vec3] {
        &self.rest
    }

    #[cfg(test)]
    pub fn phases(&self) -> &[f32] {
        &self.phases
    }

    pub fn live(&self) -> &[Vec3] {
        &self.live
    }

    pub fn vertex_count(&self) -> usize {
        self.rest.len()
    }

    /// True for a mesh with nothing to animate or pick.
    pub fn is_degenerate(&self) -> bool {
        self.rest.is_empty() || self.topology.faces.is_empty()
    }

    /// Rest and phase read-only, live writable: the only way to mutate positions.
    pub(super) fn split_mut(&mut self) -> (&[Vec3], &[f32], &mut [Vec3]) {
        (&self.rest, &self.phases, &mut self.live)
    }
}
