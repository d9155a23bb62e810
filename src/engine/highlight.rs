// Hover Highlighter: paint the hovered face hot, then fade it back to base.
//
// Tweens are keyed by vertex index and advanced synchronously from tick().
// A new hit replaces the tween of each of its three vertices outright, so a
// vertex shared with a previously hit face follows whichever hit came last.

use bevy_ecs::prelude::*;
use glam::Vec3;
use std::collections::HashMap;

use super::color::ColorField;
use super::mesh::Face;
use super::params::HighlightParams;

/// Quadratic ease-out: fast departure from the start color, gentle landing.
#[inline]
pub fn ease_out_quad(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv
}

/// One in-flight color interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTween {
    pub from: Vec3,
    pub to: Vec3,
    pub elapsed: f32,
    pub duration: f32,
}

impl ColorTween {
    pub fn new(from: Vec3, to: Vec3, duration: f32) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Color at the current elapsed time; exactly `to` once finished.
    pub fn sample(&self) -> Vec3 {
        if self.is_finished() {
            return self.to;
        }
        self.from.lerp(self.to, ease_out_quad(self.elapsed / self.duration))
    }
}

#[derive(Resource, Debug, Clone)]
pub struct HoverHighlighter {
    pub params: HighlightParams,
    tweens: HashMap<u32, ColorTween>,
}

impl HoverHighlighter {
    pub fn new(params: HighlightParams) -> Self {
        Self {
            params,
            tweens: HashMap::new(),
        }
    }

    /// Snap the face's vertices to the hot color and (re)start their fade.
    pub fn on_hit(&mut self, face: Face, colors: &mut ColorField) {
        let HighlightParams { hot, base, duration } = self.params;
        for vertex in face.indices() {
            colors.set(vertex, hot);
            self.tweens.insert(vertex, ColorTween::new(hot, base, duration));
        }
    }

    /// Advance every tween by `dt` seconds, write its color, drop finished ones.
    pub fn tick(&mut self, dt: f32, colors: &mut ColorField) {
        let base = self.params.base;
        self.tweens.retain(|&vertex, tween| {
            tween.elapsed += dt;
            if tween.is_finished() {
                colors.reset(vertex, base);
                return false;
            }
            colors.set(vertex, tween.sample());
            true
        });
    }

    #[cfg(test)]
    pub fn tween(&self, vertex: u32) -> Option<&ColorTween> {
        self.tweens.get(&vertex)
    }

    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }

    /// Forget every tween, e.g. when the surface is rebuilt.
    pub fn clear(&mut self) {
        self.tweens.clear();
    }
}
