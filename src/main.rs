use anyhow::Result;
use ocean_config::AppConfig;
use ocean_render::camera::Camera;
use ocean_render::pipeline::{BackdropPipeline, BackdropUniforms};
use ocean_render::scene::OceanScene;
use ocean_sensor::fusion::{OffsetDirection, OrientationFuser};
use ocean_sensor::SensorClient;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Application state.
struct App {
    config: AppConfig,
    sensor: SensorClient,
    fuser: OrientationFuser,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
}

struct GpuState {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    pipeline: BackdropPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    scene: OceanScene,
    camera: Camera,
    started: Instant,
    frame_count: u64,
}

impl App {
    fn new(config: AppConfig, sensor: SensorClient) -> Self {
        let fuser = OrientationFuser::new(config.fusion.policy, config.fusion.step_radians);
        Self {
            config,
            sensor,
            fuser,
            window: None,
            gpu: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Ocean View")
            .with_inner_size(PhysicalSize::new(1280, 720));

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .expect("Failed to create window"),
        );
        self.window = Some(window.clone());

        // Initialize wgpu.
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("Failed to create surface");

        let (device, queue, adapter) = pollster::block_on(async {
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::HighPerformance,
                    compatible_surface: Some(&surface),
                    force_fallback_adapter: false,
                })
                .await
                .expect("No suitable GPU adapter found");

            info!(name = adapter.get_info().name, "Using GPU");

            let (device, queue) = adapter
                .request_device(
                    &wgpu::DeviceDescriptor {
                        label: Some("ocean_device"),
                        required_features: wgpu::Features::empty(),
                        required_limits: wgpu::Limits::default(),
                        memory_hints: Default::default(),
                    },
                    None,
                )
                .await
                .expect("Failed to create device");

            (device, queue, adapter)
        });

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let pipeline = BackdropPipeline::new(&device, format);

        let scene = OceanScene::from_config(&self.config.scene);
        let mut camera = Camera::new();
        camera.aspect_ratio = size.width as f32 / size.height as f32;

        let uniforms = BackdropUniforms::new(
            camera.view_projection_inverse(),
            scene.sun_direction(),
            scene.water_color,
            0.0,
            scene.distortion_scale,
        );
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("backdrop_uniform_buffer"),
            size: std::mem::size_of_val(&uniforms) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
        let uniform_bind_group = pipeline.create_uniform_bind_group(&device, &uniform_buffer);

        self.gpu = Some(GpuState {
            device,
            queue,
            surface,
            surface_config,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            scene,
            camera,
            started: Instant::now(),
            frame_count: 0,
        });

        info!("Application initialized");
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    if let Some(gpu) = &mut self.gpu {
                        gpu.surface_config.width = size.width;
                        gpu.surface_config.height = size.height;
                        gpu.surface.configure(&gpu.device, &gpu.surface_config);
                        gpu.camera.aspect_ratio = size.width as f32 / size.height as f32;
                    }
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == winit::event::ElementState::Pressed {
                    match event.physical_key {
                        PhysicalKey::Code(KeyCode::ArrowUp) => {
                            self.fuser.apply_offset(OffsetDirection::Up);
                        }
                        PhysicalKey::Code(KeyCode::ArrowDown) => {
                            self.fuser.apply_offset(OffsetDirection::Down);
                        }
                        PhysicalKey::Code(KeyCode::ArrowLeft) => {
                            self.fuser.apply_offset(OffsetDirection::Left);
                        }
                        PhysicalKey::Code(KeyCode::ArrowRight) => {
                            self.fuser.apply_offset(OffsetDirection::Right);
                        }
                        PhysicalKey::Code(KeyCode::KeyR) => {
                            self.fuser.reset_offsets();
                        }
                        PhysicalKey::Code(KeyCode::Escape) => {
                            event_loop.exit();
                        }
                        _ => {}
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                // Feed the newest complete reading into the fuser, then
                // query the frame rotation exactly once.
                let reading = self.sensor.latest();
                self.fuser.ingest(&reading);

                if let Some(gpu) = &mut self.gpu {
                    gpu.camera.orientation = self.fuser.camera_rotation();

                    let uniforms = BackdropUniforms::new(
                        gpu.camera.view_projection_inverse(),
                        gpu.scene.sun_direction(),
                        gpu.scene.water_color,
                        gpu.started.elapsed().as_secs_f32(),
                        gpu.scene.distortion_scale,
                    );
                    gpu.queue
                        .write_buffer(&gpu.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

                    let output = match gpu.surface.get_current_texture() {
                        Ok(output) => output,
                        Err(e) => {
                            warn!(?e, "Failed to get surface texture");
                            return;
                        }
                    };
                    let view = output
                        .texture
                        .create_view(&wgpu::TextureViewDescriptor::default());

                    let mut encoder =
                        gpu.device
                            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                                label: Some("backdrop_render"),
                            });

                    {
                        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                            label: Some("backdrop_pass"),
                            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view: &view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                                    store: wgpu::StoreOp::Store,
                                },
                            })],
                            depth_stencil_attachment: None,
                            timestamp_writes: None,
                            occlusion_query_set: None,
                        });

                        pass.set_pipeline(&gpu.pipeline.pipeline);
                        pass.set_bind_group(0, &gpu.uniform_bind_group, &[]);
                        pass.draw(0..3, 0..1);
                    }

                    gpu.queue.submit(std::iter::once(encoder.finish()));
                    output.present();

                    gpu.frame_count += 1;
                    if gpu.frame_count % 300 == 0 {
                        tracing::debug!(frames = gpu.frame_count, "Render heartbeat");
                    }
                }

                // Request next frame.
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ocean_app=info,ocean_sensor=info,ocean_render=info".into()),
        )
        .init();

    info!("Ocean View starting");

    // Load config.
    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!(?e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Connect to the sensor (fall back to mock if unavailable).
    let sensor = match SensorClient::connect(config.serial.port.as_deref(), config.serial.baud_rate)
    {
        Ok(client) => {
            info!("Sensor connected");
            client
        }
        Err(e) => {
            warn!(?e, "Sensor not available, using mock (no motion steering)");
            SensorClient::mock()
        }
    };

    // Run the application.
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, sensor);
    event_loop.run_app(&mut app)?;

    Ok(())
}
