// ECS systems for one frame of the surface
// Run in a fixed chained order by the frame driver:
//   advance_wave → pick_hovered_face → highlight_hovered_face → mark_buffers_dirty

use bevy_ecs::prelude::*;

use super::camera::OrbitCamera;
use super::color::ColorField;
use super::highlight::HoverHighlighter;
use super::input::PointerSample;
use super::picking::{self, HitResult};
use super::surface::VertexField;
use super::wave::WaveAnimator;

/// Wall-clock seconds since the previous tick.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct FrameTime {
    pub dt: f32,
}

/// Width / height of the render target, needed to unproject the pointer.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Viewport {
    pub aspect: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { aspect: 1.0 }
    }
}

/// Result of this frame's pick, read by the highlighter and the overlay.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct Hovered {
    pub hit: Option<HitResult>,
}

/// Buffers the renderer must re-upload before the next draw.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyBuffers {
    pub positions: bool,
    pub colors: bool,
}

/// Step the ripple clock and rewrite every live vertex position.
pub fn advance_wave(mut animator: ResMut<WaveAnimator>, mut field: ResMut<VertexField>) {
    animator.advance(&mut field);
}

/// Cast the latest pointer sample against the freshly deformed surface.
pub fn pick_hovered_face(
    pointer: Res<PointerSample>,
    camera: Res<OrbitCamera>,
    viewport: Res<Viewport>,
    field: Res<VertexField>,
    mut hovered: ResMut<Hovered>,
) {
    let hit = picking::pick(pointer.0, &camera, viewport.aspect, &field);

    let previous = hovered.hit.map(|h| h.face_index);
    if let Some(hit) = &hit {
        if previous != Some(hit.face_index) {
            log::debug!("hovering face {} {:?}", hit.face_index, hit.face.indices());
        }
    }
    hovered.hit = hit;
}

/// Fade existing tweens, then paint this frame's hit so it shows fully hot.
pub fn highlight_hovered_face(
    time: Res<FrameTime>,
    hovered: Res<Hovered>,
    mut highlighter: ResMut<HoverHighlighter>,
    mut colors: ResMut<ColorField>,
) {
    highlighter.tick(time.dt, &mut colors);
    if let Some(hit) = hovered.hit {
        highlighter.on_hit(hit.face, &mut colors);
    }
}

/// Positions change every tick; colors are flagged alongside so the renderer
/// re-uploads both once per frame.
pub fn mark_buffers_dirty(mut dirty: ResMut<DirtyBuffers>) {
    dirty.positions = true;
    dirty.colors = true;
}
