// Undulating surface mesh that the pointer paints as it hovers.
// Geometry, picking and color fading live in engine/; this file owns the
// window, GPU state and event loop, and uploads whatever the frame driver
// flags dirty.

mod cli;
mod engine;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Mat4;
use wgpu::util::DeviceExt;
use winit::{
    event::{ElementState, Event as WinitEvent, KeyEvent, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use engine::frame::FrameDriver;
use engine::input::InputState;
use engine::mesh;
use engine::overlay::{Overlay, OverlayStats};
use engine::params::{CameraParams, LightParams};

// ============================================================================
// UNIFORM DATA
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    eye: [f32; 4],
    point_light: [f32; 4],
    point_color: [f32; 4],
    back_light: [f32; 4],
    back_color: [f32; 4],
}

impl Uniforms {
    fn new(view_proj: Mat4, model: Mat4, eye: glam::Vec3, lights: &LightParams) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            eye: eye.extend(1.0).to_array(),
            point_light: lights.point_position.extend(lights.point_intensity).to_array(),
            point_color: lights.point_color.extend(1.0).to_array(),
            back_light: lights.back_direction.extend(lights.back_intensity).to_array(),
            back_color: lights.back_color.extend(1.0).to_array(),
        }
    }
}

// ============================================================================
// SURFACE BUFFERS
// ============================================================================

/// GPU copies of the surface: positions and colors are rewritten when dirty,
/// the index buffer only when the surface is regenerated.
struct SurfaceBuffers {
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    indices: wgpu::Buffer,
    num_indices: u32,
}

impl SurfaceBuffers {
    fn new(device: &wgpu::Device, driver: &FrameDriver) -> Self {
        let field = driver.field();

        let positions = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Position Buffer"),
            contents: mesh::vec3_bytes(field.live()),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let colors = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Color Buffer"),
            contents: mesh::vec3_bytes(driver.colors().colors()),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let index_list = field.topology().index_list();
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&index_list),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            positions,
            colors,
            indices,
            num_indices: index_list.len() as u32,
        }
    }
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct State {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    render_pipeline: wgpu::RenderPipeline,
    buffers: SurfaceBuffers,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,

    driver: FrameDriver,
    input: InputState,
    overlay: Overlay,
    lights: LightParams,
    last_update: std::time::Instant,

    // Frame stats
    frame_count: u32,
    frame_time_accum: f32,
    last_fps_update: std::time::Instant,
    fps: u32,
    frame_time_avg_ms: f32,
}

impl State {
    async fn new(window: Arc<Window>, driver: FrameDriver) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("creating window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible GPU adapter")?;
        log::info!("adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .context("requesting GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Surface Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("surface.wgsl").into()),
        });

        let lights = LightParams::default();
        let uniforms = Uniforms::new(Mat4::IDENTITY, Mat4::IDENTITY, glam::Vec3::ZERO, &lights);

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("uniform_bind_group_layout"),
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("uniform_bind_group"),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Render Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Surface Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[mesh::position_layout(), mesh::color_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None, // double-sided
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let buffers = SurfaceBuffers::new(&device, &driver);
        let overlay = Overlay::new(&window, &device, surface_format, driver.surface_params());

        let mut input = InputState::new();
        input.window_size = (size.width, size.height);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            size,
            render_pipeline,
            buffers,
            uniform_buffer,
            uniform_bind_group,
            driver,
            input,
            overlay,
            lights,
            last_update: std::time::Instant::now(),
            frame_count: 0,
            frame_time_accum: 0.0,
            last_fps_update: std::time::Instant::now(),
            fps: 0,
            frame_time_avg_ms: 0.0,
        })
    }

    fn aspect(&self) -> f32 {
        self.size.width as f32 / self.size.height.max(1) as f32
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Route one window event. The overlay sees it first; events it consumes
    /// never reach the camera or the pointer sample.
    fn handle_window_event(&mut self, event: &WindowEvent) {
        let consumed = self.overlay.handle_window_event(&self.window, event).consumed;
        if matches!(event, WindowEvent::Resized(_)) || !consumed {
            self.input.process_event(event);
        }
        if let WindowEvent::CursorMoved { .. } = event {
            if self.overlay.wants_pointer() {
                self.driver.set_pointer(Default::default());
            } else {
                self.driver.set_pointer(self.input.pointer_sample());
            }
        }
    }

    fn update(&mut self) {
        let now = std::time::Instant::now();
        let dt = (now - self.last_update).as_secs_f32();
        self.last_update = now;

        self.input.begin_frame();
        self.driver.camera_mut().update(&self.input);
        self.driver.set_aspect(self.aspect());
        self.driver.tick(dt);

        let dirty = self.driver.take_dirty();
        if dirty.positions {
            self.queue.write_buffer(
                &self.buffers.positions,
                0,
                mesh::vec3_bytes(self.driver.field().live()),
            );
        }
        if dirty.colors {
            self.queue.write_buffer(
                &self.buffers.colors,
                0,
                mesh::vec3_bytes(self.driver.colors().colors()),
            );
        }

        self.input.end_frame();

        self.frame_count += 1;
        self.frame_time_accum += dt;
        if (now - self.last_fps_update).as_secs_f32() >= 1.0 {
            self.fps = self.frame_count;
            self.frame_time_avg_ms = self.frame_time_accum * 1000.0 / self.frame_count as f32;
            self.frame_count = 0;
            self.frame_time_accum = 0.0;
            self.last_fps_update = now;
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let camera = self.driver.camera();
        let uniforms = Uniforms::new(
            camera.view_projection(self.aspect()),
            self.driver.field().model,
            camera.camera_position(),
            &self.lights,
        );
        self.queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Surface Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if self.buffers.num_indices > 0 {
                render_pass.set_pipeline(&self.render_pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.buffers.positions.slice(..));
                render_pass.set_vertex_buffer(1, self.buffers.colors.slice(..));
                render_pass.set_index_buffer(self.buffers.indices.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.buffers.num_indices, 0, 0..1);
            }
        }

        let stats = OverlayStats {
            fps: self.fps,
            frame_time_avg_ms: self.frame_time_avg_ms,
            vertex_count: self.driver.field().vertex_count(),
            face_count: self.driver.field().topology().face_count(),
            hovered_face: self.driver.hovered().map(|hit| hit.face_index),
            active_tweens: self.driver.highlighter().active_count(),
            wave_time: self.driver.wave_time(),
            camera_distance: self.driver.camera().distance(),
            resolution: (self.size.width, self.size.height),
        };
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: self.window.scale_factor() as f32,
        };
        let response = self.overlay.render(
            &self.device,
            &self.queue,
            &mut encoder,
            &self.window,
            &view,
            &screen_descriptor,
            &mut self.lights,
            &stats,
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if let Some(params) = response.regenerate {
            self.driver.regenerate(params);
            self.buffers = SurfaceBuffers::new(&self.device, &self.driver);
        }

        Ok(())
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn main() -> Result<()> {
    env_logger::init();
    let args = cli::Args::parse();

    let driver = FrameDriver::new(
        args.surface_params(),
        args.wave_params(),
        args.highlight_params(),
        CameraParams::default(),
    );

    let event_loop = EventLoop::new().context("creating event loop")?;

    let window_attributes = Window::default_attributes()
        .with_title("Wave Paint")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

    let window = Arc::new(
        event_loop
            .create_window(window_attributes)
            .context("creating window")?,
    );

    let mut state = pollster::block_on(State::new(window.clone(), driver))?;

    event_loop.run(move |event, control_flow| {
        match event {
            WinitEvent::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            state: ElementState::Pressed,
                            physical_key: PhysicalKey::Code(KeyCode::Escape),
                            ..
                        },
                    ..
                } => control_flow.exit(),
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            state: ElementState::Pressed,
                            physical_key: PhysicalKey::Code(key @ (KeyCode::F1 | KeyCode::F3)),
                            repeat: false,
                            ..
                        },
                    ..
                } => match key {
                    KeyCode::F1 => state.overlay.toggle_panel(),
                    _ => state.overlay.toggle_stats(),
                },
                WindowEvent::Resized(physical_size) => {
                    state.handle_window_event(event);
                    state.resize(*physical_size);
                }
                WindowEvent::RedrawRequested => {
                    state.update();
                    match state.render() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            state.resize(state.size)
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("GPU out of memory");
                            control_flow.exit()
                        }
                        Err(e) => log::warn!("surface error: {e:?}"),
                    }
                }
                other => state.handle_window_event(other),
            },
            WinitEvent::AboutToWait => {
                window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
