// Engine module - the animated, pointer-painted surface
// Everything here is renderer-agnostic except the GPU vertex layouts in mesh.rs
// and the egui overlay.

pub mod camera;
pub mod color;
pub mod frame;
pub mod highlight;
pub mod input;
pub mod mesh;
pub mod overlay;
pub mod params;
pub mod picking;
pub mod surface;
pub mod systems;
pub mod wave;
