// Color Field: one RGB triple per vertex, interpolated across faces by the renderer.

use bevy_ecs::prelude::*;
use glam::Vec3;
use rand::Rng;

/// Per-vertex colors with channels in [0, 1], stored as (x, y, z) = (r, g, b).
#[derive(Resource, Debug, Clone)]
pub struct ColorField {
    colors: Vec<Vec3>,
}

impl ColorField {
    /// Independently random color per vertex.
    pub fn random(vertex_count: usize, rng: &mut impl Rng) -> Self {
        let colors = (0..vertex_count)
            .map(|_| Vec3::new(rng.r#gen(), rng.r#gen(), rng.r#gen()))
            .collect();
        Self { colors }
    }

    #[cfg(test)]
    pub fn uniform(vertex_count: usize, rgb: Vec3) -> Self {
        Self {
            colors: vec![rgb; vertex_count],
        }
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    #[cfg(test)]
    pub fn get(&self, vertex: u32) -> Option<Vec3> {
        self.colors.get(vertex as usize).copied()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Overwrite one vertex. Out-of-range indices are ignored.
    pub fn set(&mut self, vertex: u32, rgb: Vec3) {
        if let Some(c) = self.colors.get_mut(vertex as usize) {
            *c = rgb.clamp(Vec3::ZERO, Vec3::ONE);
        }
    }

    /// Put one vertex back to the resting color. The highlighter owns `base`.
    pub fn reset(&mut self, vertex: u32, base: Vec3) {
        self.set(vertex, base);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_random_channels_in_unit_range() {
        let field = ColorField::random(500, &mut StdRng::seed_from_u64(5));
        assert_eq!(field.len(), 500);
        for c in field.colors() {
            assert!(c.cmpge(Vec3::ZERO).all() && c.cmple(Vec3::ONE).all());
        }
    }

    #[test]
    fn test_set_and_reset() {
        let base = Vec3::new(0.0, 0.19, 0.4);
        let mut field = ColorField::uniform(3, Vec3::ONE);
        field.set(1, Vec3::new(1.0, 0.5, 0.25));
        assert_eq!(field.get(1), Some(Vec3::new(1.0, 0.5, 0.25)));
        field.reset(1, base);
        assert_eq!(field.get(1), Some(base));
        assert_eq!(field.get(0), Some(Vec3::ONE));
        field.reset(7, base);
        assert_eq!(field.len(), 3);
    }

    #[test]
    fn test_set_clamps_and_ignores_out_of_range() {
        let mut field = ColorField::uniform(2, Vec3::ZERO);
        field.set(0, Vec3::new(2.0, -1.0, 0.5));
        assert_eq!(field.get(0), Some(Vec3::new(1.0, 0.0, 0.5)));
        field.set(10, Vec3::ONE);
        assert_eq!(field.get(10), None);
        assert_eq!(field.len(), 2);
    }
}
