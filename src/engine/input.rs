// Input state tracking for the pointer
// Abstracts winit events into a queryable per-frame snapshot

use bevy_ecs::prelude::*;
use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Latest pointer position in normalized device coordinates.
/// `None` until the first move event. Overwritten on every move; no history.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSample(pub Option<Vec2>);

/// Map a screen-space pixel position to normalized device coordinates:
/// x ∈ [-1, 1] left to right, y ∈ [-1, 1] bottom to top.
pub fn normalize_pointer(screen: (f32, f32), viewport: (u32, u32)) -> Option<Vec2> {
    let (w, h) = (viewport.0 as f32, viewport.1 as f32);
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    Some(Vec2::new(
        (screen.0 / w - 0.5) * 2.0,
        (screen.1 / h - 0.5) * -2.0,
    ))
}

pub struct InputState {
    // Mouse
    pub mouse_position: (f32, f32),
    mouse_prev_position: (f32, f32),
    pub mouse_delta: (f32, f32),
    has_moved: bool,

    /// Left button held: drag orbits the camera.
    pub dragging: bool,

    /// Right button held: drag pans the camera target.
    pub panning: bool,

    // Scroll: accumulated vertical scroll this frame, reset in end_frame()
    pub scroll_delta: f32,

    // Window dimensions (used for pointer normalization)
    pub window_size: (u32, u32),
}

impl InputState {
    pub fn new() -> Self {
        Self {
            mouse_position: (0.0, 0.0),
            mouse_prev_position: (0.0, 0.0),
            mouse_delta: (0.0, 0.0),
            has_moved: false,
            dragging: false,
            panning: false,
            scroll_delta: 0.0,
            window_size: (0, 0),
        }
    }

    /// Feed a winit WindowEvent into the input state.
    /// Call this once per event the overlay did not consume.
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.move_to((position.x as f32, position.y as f32));
            }
            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                self.dragging = *state == ElementState::Pressed;
            }
            WindowEvent::MouseInput { state, button: MouseButton::Right, .. } => {
                self.panning = *state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.scroll_delta += y;
            }
            WindowEvent::Resized(size) => {
                self.window_size = (size.width, size.height);
            }
            _ => {}
        }
    }

    /// Record a cursor position in window pixels.
    pub fn move_to(&mut self, position: (f32, f32)) {
        if !self.has_moved {
            self.mouse_prev_position = position;
        }
        self.mouse_position = position;
        self.has_moved = true;
    }

    /// The current pointer sample, or `None` before the first move event.
    pub fn pointer_sample(&self) -> PointerSample {
        if !self.has_moved {
            return PointerSample(None);
        }
        PointerSample(normalize_pointer(self.mouse_position, self.window_size))
    }

    /// Call once per frame before update() consumes input.
    /// Computes the drag delta since the previous frame.
    pub fn begin_frame(&mut self) {
        self.mouse_delta = (
            self.mouse_position.0 - self.mouse_prev_position.0,
            self.mouse_position.1 - self.mouse_prev_position.1,
        );
        self.mouse_prev_position = self.mouse_position;
    }

    /// Call once per frame after update() and render() have consumed input.
    /// Resets per-frame accumulators.
    pub fn end_frame(&mut self) {
        self.scroll_delta = 0.0;
        self.mouse_delta = (0.0, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_corners_and_center() {
        let vp = (800, 600);
        assert_eq!(normalize_pointer((400.0, 300.0), vp), Some(Vec2::ZERO));
        assert_eq!(normalize_pointer((0.0, 0.0), vp), Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(normalize_pointer((800.0, 600.0), vp), Some(Vec2::new(1.0, -1.0)));
    }

    #[test]
    fn test_normalize_zero_viewport() {
        assert_eq!(normalize_pointer((10.0, 10.0), (0, 600)), None);
    }

    #[test]
    fn test_no_sample_before_first_move() {
        let mut input = InputState::new();
        input.window_size = (100, 100);
        assert_eq!(input.pointer_sample(), PointerSample(None));

        input.move_to((10.0, 20.0));
        input.move_to((75.0, 25.0));
        assert_eq!(input.pointer_sample(), PointerSample(Some(Vec2::new(0.5, 0.5))));
    }

    #[test]
    fn test_buttons_map_to_orbit_and_pan() {
        use winit::event::DeviceId;

        let mut input = InputState::new();
        let press = |button| WindowEvent::MouseInput {
            device_id: DeviceId::dummy(),
            state: ElementState::Pressed,
            button,
        };
        input.process_event(&press(MouseButton::Right));
        assert!(input.panning && !input.dragging);

        input.process_event(&press(MouseButton::Left));
        input.process_event(&WindowEvent::MouseInput {
            device_id: DeviceId::dummy(),
            state: ElementState::Released,
            button: MouseButton::Right,
        });
        assert!(input.dragging && !input.panning);
    }

    #[test]
    fn test_drag_delta_per_frame() {
        let mut input = InputState::new();
        input.move_to((10.0, 10.0));
        input.begin_frame();
        assert_eq!(input.mouse_delta, (0.0, 0.0));

        input.move_to((15.0, 7.0));
        input.begin_frame();
        assert_eq!(input.mouse_delta, (5.0, -3.0));
        input.end_frame();
        assert_eq!(input.mouse_delta, (0.0, 0.0));
    }
}
