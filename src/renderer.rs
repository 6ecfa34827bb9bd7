// renderer.rs: immersive sphere + overlay strip renderer
//
// Host-driven lifecycle, no internal timers:
//   on_init    surface created, every GPU resource is rebuilt from scratch
//   on_resize  viewport changed, bounds and overlay strip recomputed
//   on_frame   one frame: texture refresh, sphere pass, rectangle pass, HUD
//   on_release surface gone, GPU state dropped

use crate::camera::{Orientation, Viewport};
use crate::config::ViewerConfig;
use crate::error::RenderError;
use crate::mesh::{build_sphere, RECTANGLE_UVS};
use crate::shader::{ShaderProgram, DEPTH_FORMAT, FRAGMENT_SHADER, TEXTURE_GROUP, UNIFORM_GROUP, VERTEX_SHADER};
use crate::video::{VideoFrame, VideoSurface};
use glam::Mat4;
use image::RgbaImage;
use log::{debug, error, info, warn};
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// Draw passes of one frame, always issued in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawPass {
    Sphere,
    Rectangle,
}

pub const PASS_ORDER: [DrawPass; 2] = [DrawPass::Sphere, DrawPass::Rectangle];

impl DrawPass {
    /// Combined transform of the pass. Only the sphere follows the orientation.
    pub fn transform(self, viewport: &Viewport, orientation: &Orientation) -> Mat4 {
        match self {
            DrawPass::Sphere => viewport.sphere_transform(orientation),
            DrawPass::Rectangle => viewport.overlay_transform(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MatrixUniform {
    matrix: [[f32; 4]; 4],
}

impl From<Mat4> for MatrixUniform {
    fn from(m: Mat4) -> Self {
        Self { matrix: m.to_cols_array_2d() }
    }
}

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub sphere_radius: f32,
    pub tetta_steps: usize,
    pub phi_steps: usize,
    pub split_fraction: f32,
    pub clear_color: wgpu::Color,
    pub vsync: bool,
}

impl From<&ViewerConfig> for RenderSettings {
    fn from(config: &ViewerConfig) -> Self {
        let [r, g, b, a] = config.clear_color;
        Self {
            sphere_radius: config.sphere_radius,
            tetta_steps: config.tetta_steps,
            phi_steps: config.phi_steps,
            split_fraction: config.split_fraction(),
            clear_color: wgpu::Color { r, g, b, a },
            vsync: config.vsync,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frames_shown: u64,
    pub frame_size: Option<(u32, u32)>,
}

struct Geometry {
    positions: wgpu::Buffer,
    uvs: wgpu::Buffer,
    vertex_count: u32,
}

struct PassUniforms {
    transform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct VideoTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    size: (u32, u32),
}

struct GpuContext {
    window: Arc<Window>,
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,

    program: ShaderProgram,
    sphere: Geometry,
    rectangle: Geometry,
    texture_transform: wgpu::Buffer,
    sphere_uniforms: PassUniforms,
    rectangle_uniforms: PassUniforms,
    sampler: wgpu::Sampler,
    video: VideoTexture,

    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

pub struct SphereRenderer {
    settings: RenderSettings,
    viewport: Viewport,
    orientation: Orientation,
    texture_transform: Mat4,
    video: Arc<VideoSurface>,
    stats: FrameStats,
    gpu: Option<GpuContext>,
}

impl SphereRenderer {
    pub fn new(settings: RenderSettings, video: Arc<VideoSurface>) -> Self {
        let viewport = Viewport::new(1, 1, settings.split_fraction);
        Self {
            settings,
            viewport,
            orientation: Orientation::default(),
            texture_transform: Mat4::IDENTITY,
            video,
            stats: FrameStats::default(),
            gpu: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.gpu.is_some()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_size(&self) -> (u32, u32) {
        (self.viewport.width, self.viewport.height)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn orientation_mut(&mut self) -> &mut Orientation {
        &mut self.orientation
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Surface created. Drops whatever GPU state existed and rebuilds all of it.
    pub fn on_init(&mut self, window: Arc<Window>) -> Result<(), RenderError> {
        self.gpu = None;
        self.texture_transform = Mat4::IDENTITY;

        let size = window.inner_size();
        self.viewport.resize(size.width.max(1), size.height.max(1));

        let gpu = GpuContext::new(window, &self.settings, &self.viewport)?;
        self.gpu = Some(gpu);

        // the new texture starts as the placeholder; a still published once
        // before a suspend would otherwise never come back
        if self.video.republish_last() {
            debug!("Re-queued last video frame for the new texture");
        }
        Ok(())
    }

    pub fn on_release(&mut self) {
        if self.gpu.take().is_some() {
            info!("GPU resources released");
        }
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport.resize(width, height);

        if let Some(gpu) = self.gpu.as_mut() {
            gpu.config.width = width;
            gpu.config.height = height;
            gpu.surface.configure(&gpu.device, &gpu.config);
            gpu.depth_view = create_depth_view(&gpu.device, &gpu.config);
            gpu.queue.write_buffer(
                &gpu.rectangle.positions,
                0,
                bytemuck::cast_slice(&self.viewport.rectangle),
            );
        }
    }

    /// Reconfigures the surface at its current size, used after `SurfaceError::Lost`.
    pub fn reconfigure(&mut self) {
        let (width, height) = self.viewport_size();
        self.on_resize(width, height);
    }

    /// Forwards a window event to the HUD.
    pub fn handle_window_event(&mut self, event: &winit::event::WindowEvent<'_>) -> egui_winit::EventResponse {
        match self.gpu.as_mut() {
            Some(gpu) => gpu.egui_state.on_event(&gpu.egui_ctx, event),
            None => egui_winit::EventResponse { consumed: false, repaint: false },
        }
    }

    pub fn on_frame(&mut self, run_ui: impl FnOnce(&egui::Context)) -> Result<(), RenderError> {
        let Some(gpu) = self.gpu.as_mut() else {
            return Ok(());
        };

        let output = gpu
            .surface
            .get_current_texture()
            .map_err(|source| RenderError::Graphics { op: "acquire surface texture", source })?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        // 新帧到达时才刷新纹理，整个刷新过程持有锁
        let video = &self.video;
        let refreshed = video
            .frame_ready()
            .consume_with(|| video.take_frame().map(|frame| gpu.upload_frame(&frame)));
        if let Some(Some((transform, size))) = refreshed {
            self.texture_transform = transform;
            self.stats.frames_shown += 1;
            self.stats.frame_size = Some(size);
        }

        gpu.queue.write_buffer(
            &gpu.texture_transform,
            0,
            bytemuck::cast_slice(&[MatrixUniform::from(self.texture_transform)]),
        );
        for pass in PASS_ORDER {
            let uniforms = match pass {
                DrawPass::Sphere => &gpu.sphere_uniforms,
                DrawPass::Rectangle => &gpu.rectangle_uniforms,
            };
            let transform = pass.transform(&self.viewport, &self.orientation);
            gpu.queue.write_buffer(&uniforms.transform, 0, bytemuck::cast_slice(&[MatrixUniform::from(transform)]));
        }

        let mut encoder = gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        // 1. Scene: sphere then overlay strip
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sphere Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.settings.clear_color),
                        store: true,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &gpu.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: true,
                    }),
                    stencil_ops: None,
                }),
            });

            gpu.program.activate(&mut render_pass);
            render_pass.set_bind_group(TEXTURE_GROUP, &gpu.video.bind_group, &[]);

            for pass in PASS_ORDER {
                let (geometry, uniforms) = match pass {
                    DrawPass::Sphere => (&gpu.sphere, &gpu.sphere_uniforms),
                    DrawPass::Rectangle => (&gpu.rectangle, &gpu.rectangle_uniforms),
                };
                render_pass.set_bind_group(UNIFORM_GROUP, &uniforms.bind_group, &[]);
                render_pass.set_vertex_buffer(0, geometry.positions.slice(..));
                render_pass.set_vertex_buffer(1, geometry.uvs.slice(..));
                render_pass.draw(0..geometry.vertex_count, 0..1);
            }
        }

        // 2. HUD
        let window = gpu.window.as_ref();
        let raw_input = gpu.egui_state.take_egui_input(window);
        let full_output = gpu.egui_ctx.run(raw_input, run_ui);

        gpu.egui_state.handle_platform_output(window, &gpu.egui_ctx, full_output.platform_output);
        let clipped_primitives = gpu.egui_ctx.tessellate(full_output.shapes);

        let screen_descriptor = egui_wgpu::renderer::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        for (id, delta) in &full_output.textures_delta.set {
            gpu.egui_renderer.update_texture(&gpu.device, &gpu.queue, *id, delta);
        }

        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &clipped_primitives,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations { load: wgpu::LoadOp::Load, store: true },
                })],
                depth_stencil_attachment: None,
            });
            gpu.egui_renderer.render(&mut render_pass, &clipped_primitives, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl GpuContext {
    fn new(window: Arc<Window>, settings: &RenderSettings, viewport: &Viewport) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // the surface must not outlive the window; GpuContext keeps the Arc
        let surface = unsafe { instance.create_surface(window.as_ref()) }?;
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(RenderError::NoAdapter)?;
        info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                features: wgpu::Features::empty(),
                limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                label: None,
            },
            None,
        ))?;
        device.on_uncaptured_error(Box::new(|e| error!("wgpu: {}", e)));

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = pick_surface_format(&surface_caps.formats).ok_or(RenderError::SurfaceUnsupported)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: viewport.width,
            height: viewport.height,
            present_mode: if settings.vsync {
                wgpu::PresentMode::Fifo
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, &config);

        // --- 1. Program ---
        let program = ShaderProgram::compile_and_link(&device, VERTEX_SHADER, FRAGMENT_SHADER, config.format)?;

        // --- 2. Geometry ---
        let mesh = build_sphere(settings.sphere_radius, settings.tetta_steps, settings.phi_steps);
        let sphere = Geometry {
            positions: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sphere Positions"),
                contents: bytemuck::cast_slice(&mesh.positions),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            uvs: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sphere UVs"),
                contents: bytemuck::cast_slice(&mesh.uvs),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            vertex_count: mesh.vertex_count() as u32,
        };
        let rectangle = Geometry {
            positions: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Rectangle Positions"),
                contents: bytemuck::cast_slice(&viewport.rectangle),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            }),
            uvs: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Rectangle UVs"),
                contents: bytemuck::cast_slice(&RECTANGLE_UVS),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            vertex_count: RECTANGLE_UVS.len() as u32,
        };
        info!("Sphere mesh: {} vertices", sphere.vertex_count);

        // --- 3. Uniforms ---
        let texture_transform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Texture Transform"),
            contents: bytemuck::cast_slice(&[MatrixUniform::from(Mat4::IDENTITY)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let sphere_uniforms = create_pass_uniforms(&device, &program, &texture_transform, "Sphere");
        let rectangle_uniforms = create_pass_uniforms(&device, &program, &texture_transform, "Rectangle");

        // --- 4. Video texture (placeholder until the first frame) ---
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::Repeat, // 全景视频水平循环
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let video = create_video_texture(&device, &program, &sampler, (2, 2));
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &video.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &[255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255, 255, 255, 0, 255],
            wgpu::ImageDataLayout { offset: 0, bytes_per_row: Some(8), rows_per_image: Some(2) },
            wgpu::Extent3d { width: 2, height: 2, depth_or_array_layers: 1 },
        );

        // --- 5. HUD ---
        let egui_ctx = egui::Context::default();
        let mut egui_state = egui_winit::State::new(window.as_ref());
        egui_state.set_pixels_per_point(window.scale_factor() as f32);
        let egui_renderer = egui_wgpu::Renderer::new(&device, config.format, None, 1);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            depth_view,
            program,
            sphere,
            rectangle,
            texture_transform,
            sphere_uniforms,
            rectangle_uniforms,
            sampler,
            video,
            egui_ctx,
            egui_state,
            egui_renderer,
        })
    }

    /// Copies a decoded frame into the video texture, recreating it when the
    /// frame size changes. Returns the frame's texture transform and size.
    fn upload_frame(&mut self, frame: &VideoFrame) -> (Mat4, (u32, u32)) {
        let max = self.device.limits().max_texture_dimension_2d;
        let (src_w, src_h) = frame.size();

        let scaled: Option<RgbaImage> = if src_w > max || src_h > max {
            let scale = max as f32 / src_w.max(src_h) as f32;
            let new_w = ((src_w as f32 * scale) as u32).max(1);
            let new_h = ((src_h as f32 * scale) as u32).max(1);
            debug!("Frame {}x{} exceeds GPU limit {}, scaled to {}x{}", src_w, src_h, max, new_w, new_h);
            Some(image::imageops::resize(
                frame.image.as_ref(),
                new_w,
                new_h,
                image::imageops::FilterType::Triangle,
            ))
        } else {
            None
        };
        let image = scaled.as_ref().unwrap_or(frame.image.as_ref());
        let (width, height) = image.dimensions();

        if self.video.size != (width, height) {
            if width != src_w || height != src_h {
                warn!("Video {}x{} is larger than the GPU allows, showing {}x{}", src_w, src_h, width, height);
            }
            info!("Video texture resized to {}x{}", width, height);
            self.video = create_video_texture(&self.device, &self.program, &self.sampler, (width, height));
        }

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.video.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        );

        (frame.transform, (src_w, src_h))
    }
}

/// Prefers an sRGB format, else the first one the surface offers.
fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats.iter().copied().find(|f| f.is_srgb()).or_else(|| formats.first().copied())
}

fn create_depth_view(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_pass_uniforms(
    device: &wgpu::Device,
    program: &ShaderProgram,
    texture_transform: &wgpu::Buffer,
    label: &str,
) -> PassUniforms {
    let transform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Transform", label)),
        contents: bytemuck::cast_slice(&[MatrixUniform::from(Mat4::IDENTITY)]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: &program.uniform_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: program.handles.transform,
                resource: transform.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: program.handles.texture_transform,
                resource: texture_transform.as_entire_binding(),
            },
        ],
        label: Some(&format!("{} Bind Group", label)),
    });
    PassUniforms { transform, bind_group }
}

fn create_video_texture(
    device: &wgpu::Device,
    program: &ShaderProgram,
    sampler: &wgpu::Sampler,
    (width, height): (u32, u32),
) -> VideoTexture {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        label: Some("video_texture"),
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: &program.texture_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: program.handles.texture,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: program.handles.sampler,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
        label: Some("video_bind_group"),
    });
    VideoTexture { texture, bind_group, size: (width, height) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_pass_is_drawn_last_and_ignores_orientation() {
        let viewport = Viewport::new(800, 600, 0.2);
        let still = Orientation::default();
        let turned = Orientation { angle_x: 90.0, angle_y: 30.0 };

        let [first, last] = PASS_ORDER;
        assert_ne!(first.transform(&viewport, &still), first.transform(&viewport, &turned));
        assert_eq!(last.transform(&viewport, &still), last.transform(&viewport, &turned));
        assert_eq!(last.transform(&viewport, &turned), viewport.overlay_transform());
    }

    #[test]
    fn surface_format_prefers_srgb_and_rejects_empty_list() {
        use wgpu::TextureFormat::*;
        assert_eq!(pick_surface_format(&[Bgra8Unorm, Bgra8UnormSrgb]), Some(Bgra8UnormSrgb));
        assert_eq!(pick_surface_format(&[Rgba16Float]), Some(Rgba16Float));
        assert_eq!(pick_surface_format(&[]), None);
    }

    #[test]
    fn matrix_uniform_is_column_major() {
        let m = Mat4::from_cols_array(&[
            1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0,
        ]);
        let uniform = MatrixUniform::from(m);
        assert_eq!(std::mem::size_of::<MatrixUniform>(), 64);
        assert_eq!(uniform.matrix[3], [13.0, 14.0, 15.0, 16.0]);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&uniform));
        assert_eq!(floats[4], 5.0);
    }

    #[test]
    fn settings_follow_config() {
        let config = ViewerConfig { overlay_percentage: 25.0, vsync: false, ..ViewerConfig::default() };
        let settings = RenderSettings::from(&config);
        assert_eq!(settings.split_fraction, 0.25);
        assert!(!settings.vsync);
        assert_eq!(settings.clear_color, wgpu::Color { r: 0.0, g: 1.0, b: 0.0, a: 1.0 });
    }

    #[test]
    fn renderer_without_surface_tracks_viewport_and_orientation() {
        let mut renderer = SphereRenderer::new(
            RenderSettings::from(&ViewerConfig::default()),
            Arc::new(VideoSurface::new()),
        );
        assert!(!renderer.is_initialized());
        renderer.on_resize(800, 600);
        assert_eq!(renderer.viewport_size(), (800, 600));
        renderer.on_resize(0, 600);
        assert_eq!(renderer.viewport_size(), (800, 600));

        renderer.orientation_mut().angle_x = 45.0;
        assert_eq!(renderer.orientation().angle_x, 45.0);
        assert!(renderer.on_frame(|_| {}).is_ok());
        assert_eq!(renderer.stats(), FrameStats::default());
    }
}
