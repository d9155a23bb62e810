// Frame driver: owns the ECS world and runs one tick per display refresh.
//
// All per-frame state lives in the world as resources. The schedule runs on
// the calling thread in a fixed chain, so nothing inside a tick overlaps and
// no locking is needed. Pointer samples are plain overwrites between ticks.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::camera::OrbitCamera;
use super::color::ColorField;
use super::highlight::HoverHighlighter;
use super::input::PointerSample;
use super::params::{CameraParams, HighlightParams, SurfaceParams, WaveParams};
use super::picking::HitResult;
use super::surface::VertexField;
use super::systems::{self, DirtyBuffers, FrameTime, Hovered, Viewport};
use super::wave::WaveAnimator;

pub struct FrameDriver {
    world: World,
    schedule: Schedule,
    surface_params: SurfaceParams,
    rng: StdRng,
}

impl FrameDriver {
    pub fn new(
        surface: SurfaceParams,
        wave: WaveParams,
        highlight: HighlightParams,
        camera: CameraParams,
    ) -> Self {
        let mut world = World::new();
        world.insert_resource(WaveAnimator::new(wave));
        world.insert_resource(HoverHighlighter::new(highlight));
        world.insert_resource(OrbitCamera::new(&camera));
        world.insert_resource(PointerSample::default());
        world.insert_resource(FrameTime::default());
        world.insert_resource(Viewport::default());
        world.insert_resource(Hovered::default());
        world.insert_resource(DirtyBuffers::default());

        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems(
            (
                systems::advance_wave,
                systems::pick_hovered_face,
                systems::highlight_hovered_face,
                systems::mark_buffers_dirty,
            )
                .chain(),
        );

        let mut driver = Self {
            world,
            schedule,
            surface_params: surface.clone(),
            rng: StdRng::from_entropy(),
        };
        driver.regenerate(surface);
        driver
    }

    /// Discard and rebuild the vertex field, color field and all tweens.
    /// There is no incremental resize: topology, rest positions, phases and
    /// colors are all drawn fresh, and the wave clock restarts.
    pub fn regenerate(&mut self, params: SurfaceParams) {
        if let Some(seed) = params.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }

        let field = VertexField::new(&params, &mut self.rng);
        let colors = ColorField::random(field.vertex_count(), &mut self.rng);

        log::info!(
            "surface {}x{} ({}x{} segments): {} vertices, {} faces, seed {:?}",
            params.width,
            params.height,
            params.width_segments,
            params.height_segments,
            field.vertex_count(),
            field.topology().face_count(),
            params.seed,
        );
        if field.is_degenerate() {
            log::warn!("surface has no faces; animation and picking are idle");
        }

        self.world.insert_resource(field);
        self.world.insert_resource(colors);
        self.world.resource_mut::<HoverHighlighter>().clear();
        self.world.resource_mut::<WaveAnimator>().reset();
        self.world.resource_mut::<Hovered>().hit = None;
        *self.world.resource_mut::<DirtyBuffers>() = DirtyBuffers { positions: true, colors: true };
        self.surface_params = params;
    }

    /// Latest-sample-wins pointer update; may be called any number of times between ticks.
    pub fn set_pointer(&mut self, sample: PointerSample) {
        *self.world.resource_mut::<PointerSample>() = sample;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.world.resource_mut::<Viewport>().aspect = aspect;
    }

    /// Run one frame: wave → pick → highlight → mark dirty.
    pub fn tick(&mut self, dt: f32) {
        self.world.resource_mut::<FrameTime>().dt = dt;
        self.schedule.run(&mut self.world);
    }

    /// Dirty flags accumulated since the last call; resets them.
    pub fn take_dirty(&mut self) -> DirtyBuffers {
        std::mem::take(&mut *self.world.resource_mut::<DirtyBuffers>())
    }

    pub fn camera(&self) -> &OrbitCamera {
        self.world.resource::<OrbitCamera>()
    }

    pub fn camera_mut(&mut self) -> Mut<'_, OrbitCamera> {
        self.world.resource_mut::<OrbitCamera>()
    }

    pub fn field(&self) -> &VertexField {
        self.world.resource::<VertexField>()
    }

    pub fn colors(&self) -> &ColorField {
        self.world.resource::<ColorField>()
    }

    pub fn highlighter(&self) -> &HoverHighlighter {
        self.world.resource::<HoverHighlighter>()
    }

    pub fn hovered(&self) -> Option<HitResult> {
        self.world.resource::<Hovered>().hit
    }

    pub fn wave_time(&self) -> f32 {
        self.world.resource::<WaveAnimator>().time()
    }

    pub fn surface_params(&self) -> &SurfaceParams {
        &self.surface_params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mesh::Face;
    use glam::Vec2;

    fn flat_quad() -> SurfaceParams {
        SurfaceParams {
            width: 2.0,
            height: 2.0,
            width_segments: 1,
            height_segments: 1,
            jitter: 0.0,
            seed: Some(11),
            tilt: 0.0,
        }
    }

    fn driver() -> FrameDriver {
        let mut driver = FrameDriver::new(
            flat_quad(),
            WaveParams::default(),
            HighlightParams::default(),
            CameraParams::default(),
        );
        driver.set_aspect(16.0 / 9.0);
        driver
    }

    #[test]
    fn test_tick_without_pointer_only_animates() {
        let mut d = driver();
        let before = d.colors().colors().to_vec();
        d.tick(1.0 / 60.0);

        assert!(d.hovered().is_none());
        assert_eq!(d.colors().colors(), before.as_slice());
        assert!(d.field().live() != d.field().rest());
        assert_eq!(d.take_dirty(), DirtyBuffers { positions: true, colors: true });
        assert_eq!(d.take_dirty(), DirtyBuffers::default());
    }

    #[test]
    fn test_hovered_face_is_hot_in_the_same_frame() {
        let mut d = driver();
        d.set_pointer(PointerSample(Some(Vec2::new(0.01, 0.01))));
        d.tick(1.0 / 60.0);

        let hit = d.hovered().expect("pointer is over the quad");
        assert_eq!(hit.face, Face::new(2, 3, 1));
        let hot = d.highlighter().params.hot;
        for v in hit.face.indices() {
            assert_eq!(d.colors().get(v), Some(hot));
        }
    }

    #[test]
    fn test_fade_after_pointer_leaves() {
        let mut d = driver();
        d.set_pointer(PointerSample(Some(Vec2::new(0.01, 0.01))));
        d.tick(1.0 / 60.0);

        // Latest sample wins: only the off-surface position is observed.
        d.set_pointer(PointerSample(Some(Vec2::new(0.02, 0.02))));
        d.set_pointer(PointerSample(Some(Vec2::new(0.95, 0.95))));
        d.tick(0.1);
        assert!(d.hovered().is_none());
        let params = d.highlighter().params;
        let c = d.colors().get(3).unwrap_or_default();
        assert!(c != params.hot && c != params.base);

        d.tick(params.duration);
        assert_eq!(d.colors().get(3), Some(params.base));
        assert_eq!(d.highlighter().active_count(), 0);
    }

    #[test]
    fn test_regenerate_rebuilds_everything() {
        let mut d = driver();
        d.set_pointer(PointerSample(Some(Vec2::new(0.01, 0.01))));
        d.tick(1.0 / 60.0);
        d.tick(1.0 / 60.0);
        assert!(d.highlighter().active_count() > 0);
        d.take_dirty();

        let bigger = SurfaceParams { width_segments: 4, height_segments: 3, ..flat_quad() };
        d.regenerate(bigger.clone());

        assert_eq!(d.field().vertex_count(), 5 * 4);
        assert_eq!(d.colors().len(), 5 * 4);
        assert_eq!(d.highlighter().active_count(), 0);
        assert_eq!(d.wave_time(), 0.0);
        assert!(d.hovered().is_none());
        assert_eq!(d.surface_params(), &bigger);
        assert_eq!(d.take_dirty(), DirtyBuffers { positions: true, colors: true });
    }

    #[test]
    fn test_seeded_regeneration_is_reproducible() {
        let mut d = driver();
        let params = SurfaceParams { jitter: 1.0, width_segments: 6, ..flat_quad() };
        d.regenerate(params.clone());
        let first = (d.field().rest().to_vec(), d.colors().colors().to_vec());
        d.regenerate(params);
        assert_eq!(d.field().rest(), first.0.as_slice());
        assert_eq!(d.colors().colors(), first.1.as_slice());
    }

    #[test]
    fn test_degenerate_surface_ticks_quietly() {
        let mut d = driver();
        d.regenerate(SurfaceParams { width_segments: 0, ..flat_quad() });
        d.set_pointer(PointerSample(Some(Vec2::ZERO)));
        d.tick(1.0 / 60.0);
        assert!(d.hovered().is_none());
        assert_eq!(d.field().vertex_count(), 0);
    }
}
