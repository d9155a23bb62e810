// egui overlay: surface parameter sliders, light controls and frame stats.
//
// F1 toggles the parameter panel, F3 the stats readout. Slider changes to the
// surface shape are handed back to the caller as a regeneration request;
// light edits are applied in place.

use egui::epaint::Shadow;

use super::params::{LightParams, SurfaceParams};

pub struct OverlayStats {
    pub fps: u32,
    pub frame_time_avg_ms: f32,
    pub vertex_count: usize,
    pub face_count: usize,
    pub hovered_face: Option<usize>,
    pub active_tweens: usize,
    pub wave_time: f32,
    pub camera_distance: f32,
    pub resolution: (u32, u32),
}

/// What the user changed this frame.
#[derive(Default)]
pub struct OverlayResponse {
    pub regenerate: Option<SurfaceParams>,
}

pub struct Overlay {
    pub panel_visible: bool,
    pub stats_visible: bool,
    /// Slider values; may run ahead of the live surface until a change is committed.
    surface_edit: SurfaceParams,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Overlay {
    pub fn new(
        window: &winit::window::Window,
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        surface_params: &SurfaceParams,
    ) -> Self {
        let egui_ctx = egui::Context::default();

        // Style: dark, semi-transparent, small monospace white font
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = egui::Color32::from_rgba_premultiplied(0, 0, 0, 180);
        visuals.window_stroke = egui::Stroke::NONE;
        visuals.window_shadow = Shadow::NONE;
        visuals.override_text_color = Some(egui::Color32::WHITE);
        egui_ctx.set_visuals(visuals);

        let mut style = (*egui_ctx.style()).clone();
        style.override_font_id = Some(egui::FontId::monospace(13.0));
        egui_ctx.set_style(style);

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface_format,
            None,  // no depth
            1,     // msaa samples
            false, // no dithering
        );

        Self {
            panel_visible: true,
            stats_visible: false,
            surface_edit: surface_params.clone(),
            egui_ctx,
            egui_state,
            egui_renderer,
        }
    }

    pub fn toggle_panel(&mut self) {
        self.panel_visible = !self.panel_visible;
    }

    pub fn toggle_stats(&mut self) {
        self.stats_visible = !self.stats_visible;
    }

    pub fn handle_window_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> egui_winit::EventResponse {
        self.egui_state.on_window_event(window, event)
    }

    /// True while the pointer is over an egui widget; hover picking and
    /// camera drag should ignore the pointer then.
    pub fn wants_pointer(&self) -> bool {
        self.egui_ctx.wants_pointer_input() || self.egui_ctx.is_pointer_over_area()
    }

    /// Render one egui frame with the optional panel and stats readout.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &winit::window::Window,
        view: &wgpu::TextureView,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
        lights: &mut LightParams,
        stats: &OverlayStats,
    ) -> OverlayResponse {
        let raw_input = self.egui_state.take_egui_input(window);
        let mut response = OverlayResponse::default();

        let panel_visible = self.panel_visible;
        let stats_visible = self.stats_visible;
        let surface_edit = &mut self.surface_edit;

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            // ── F1: parameter panel ──────────────────────────────────────────
            if panel_visible {
                egui::Window::new("Surface")
                    .default_pos(egui::pos2(10.0, 10.0))
                    .resizable(false)
                    .show(ctx, |ui| {
                        let before = surface_edit.clone();
                        ui.add(
                            egui::Slider::new(&mut surface_edit.width, SurfaceParams::WIDTH_RANGE)
                                .text("width"),
                        );
                        ui.add(
                            egui::Slider::new(&mut surface_edit.height, SurfaceParams::HEIGHT_RANGE)
                                .text("height"),
                        );
                        ui.add(
                            egui::Slider::new(
                                &mut surface_edit.width_segments,
                                SurfaceParams::WIDTH_SEGMENTS_RANGE,
                            )
                            .text("widthSegments"),
                        );
                        ui.add(
                            egui::Slider::new(
                                &mut surface_edit.height_segments,
                                SurfaceParams::HEIGHT_SEGMENTS_RANGE,
                            )
                            .text("heightSegments"),
                        );
                        if before.topology_differs(surface_edit) {
                            response.regenerate = Some(surface_edit.clone());
                        }

                        ui.collapsing("Light 1", |ui| {
                            let mut rgb = lights.point_color.to_array();
                            if ui.color_edit_button_rgb(&mut rgb).changed() {
                                lights.point_color = rgb.into();
                            }
                            ui.add(egui::Slider::new(&mut lights.point_position.y, -10.0..=10.0).text("y"));
                            ui.add(egui::Slider::new(&mut lights.point_position.x, -10.0..=10.0).text("x"));
                            ui.add(egui::Slider::new(&mut lights.point_position.z, -100.0..=100.0).text("z"));
                            ui.add(egui::Slider::new(&mut lights.point_intensity, 0.0..=10.0).text("intensity"));
                        });
                    });
            }

            // ── F3: stats readout ────────────────────────────────────────────
            if stats_visible {
                egui::Area::new(egui::Id::new("stats_overlay"))
                    .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-10.0, 10.0))
                    .show(ctx, |ui| {
                        egui::Frame::none()
                            .fill(egui::Color32::from_rgba_premultiplied(0, 0, 0, 180))
                            .inner_margin(egui::Margin::same(8.0))
                            .rounding(4.0)
                            .show(ui, |ui: &mut egui::Ui| {
                                ui.label(format!("FPS: {}", stats.fps));
                                ui.label(format!("Frame: {:.2} ms", stats.frame_time_avg_ms));
                                ui.label(format!(
                                    "Vertices: {}  Faces: {}",
                                    stats.vertex_count, stats.face_count
                                ));
                                ui.label(match stats.hovered_face {
                                    Some(face) => format!("Hovered face: {face}"),
                                    None => "Hovered face: -".to_string(),
                                });
                                ui.label(format!("Active tweens: {}", stats.active_tweens));
                                ui.label(format!("Wave time: {:.2}", stats.wave_time));
                                ui.label(format!("Camera distance: {:.1}", stats.camera_distance));
                                ui.label(format!(
                                    "Resolution: {} x {}",
                                    stats.resolution.0, stats.resolution.1
                                ));
                            });
                    });
            }
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, &tris, screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.egui_renderer
                .render(&mut render_pass.forget_lifetime(), &tris, screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        response
    }
}
