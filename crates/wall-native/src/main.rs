use std::path::{Path, PathBuf};
use std::time::Instant;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

use image::RgbaImage;
use wall_core::gpu::SceneRenderer;
use wall_core::relief::decode_rgba;
use wall_core::scene::scene_time;
use wall_core::{
    Camera, Controls, Mode, MorphStyle, ProjectKind, ReliefSource, Scene, SceneConfig,
    ViewportClass, ViewportProfile, WallError,
};

// Longest frame fed to the tweens after a stall (window drag, breakpoint)
const MAX_FRAME_DT_SEC: f32 = 0.1;

#[derive(Debug, Default, PartialEq)]
struct Args {
    style: MorphStyle,
    relief: Option<PathBuf>,
    images: Vec<PathBuf>,
    mobile: bool,
}

impl Args {
    fn parse(mut it: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut args = Args::default();
        while let Some(arg) = it.next() {
            match arg.as_str() {
                "--style" => {
                    let name = it.next().unwrap_or_default();
                    args.style = MorphStyle::from_name(&name)
                        .ok_or_else(|| anyhow::anyhow!("unknown style {name:?}"))?;
                }
                "--relief" => {
                    args.relief = it.next().map(PathBuf::from);
                }
                "--images" => {
                    let list = it.next().unwrap_or_default();
                    args.images = list
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(PathBuf::from)
                        .collect();
                }
                "--mobile" => args.mobile = true,
                other => anyhow::bail!("unexpected argument {other:?}"),
            }
        }
        Ok(args)
    }
}

/// Read and decode an image; IO failures degrade like a missing asset.
fn load_image(path: &Path) -> Result<RgbaImage, WallError> {
    let bytes = std::fs::read(path).unwrap_or_else(|e| {
        log::warn!("{}: {e}", path.display());
        Vec::new()
    });
    decode_rgba(&bytes)
}

struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: SceneRenderer,
    width: u32,
    height: u32,
}

impl<'w> GpuState<'w> {
    async fn new(window: &'w winit::window::Window) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        let renderer = SceneRenderer::new(&device, format);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            width: config.width,
            height: config.height,
            config,
            renderer,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    fn render(&mut self, scene: &mut Scene, camera: &Camera) -> Result<(), wgpu::SurfaceError> {
        self.renderer.sync(
            &self.device,
            &self.queue,
            scene,
            camera,
            (self.width, self.height),
        );
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        self.renderer.encode(&mut encoder, &view);
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

/// Everything the event loop mutates besides the GPU.
struct App {
    scene: Scene,
    controls: Controls,
    camera: Camera,
    images: Vec<PathBuf>,
    start: Instant,
    last_frame: Instant,
}

impl App {
    fn new(args: &Args, aspect: f32) -> Self {
        let class = if args.mobile {
            ViewportClass::Mobile
        } else {
            ViewportClass::Desktop
        };
        let profile = ViewportProfile::for_class(class);
        let camera = Camera::for_profile(&profile, aspect);
        let mut scene = Scene::new(SceneConfig::new(args.style, profile));
        if args.style == MorphStyle::ImageRelief {
            match &args.relief {
                Some(path) => {
                    scene.set_relief_image(load_image(path).and_then(ReliefSource::new))
                }
                None => log::warn!("no --relief image; relief morph disabled"),
            }
        }
        let now = Instant::now();
        Self {
            scene,
            controls: Controls::default(),
            camera,
            images: args.images.clone(),
            start: now,
            last_frame: now,
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.controls.set_mode(mode) && mode != Mode::Works {
            self.controls.set_hover(None);
            self.scene.clear_planes();
        }
    }

    /// Hover a project type; in Works this also floats the image planes.
    fn hover(&mut self, kind: ProjectKind, gpu: &mut GpuState) {
        self.controls.hover_project(kind);
        if self.controls.mode() != Mode::Works || self.images.is_empty() {
            return;
        }
        let ids = self.scene.show_planes(self.images.len());
        for (id, path) in ids.into_iter().zip(&self.images) {
            match load_image(path) {
                Ok(image) => {
                    if self.scene.resolve_plane(id, Ok(image.dimensions())) {
                        gpu.renderer
                            .attach_plane(&gpu.device, &gpu.queue, id, &image);
                    }
                }
                Err(e) => {
                    log::warn!("plane image {}: {e}", path.display());
                    self.scene.resolve_plane(id, Err(e));
                }
            }
        }
    }

    fn unhover(&mut self) {
        self.controls.set_hover(None);
        self.scene.clear_planes();
    }

    fn key(&mut self, code: KeyCode, gpu: &mut GpuState) {
        self.controls.start();
        match code {
            KeyCode::KeyH => self.set_mode(Mode::Home),
            KeyCode::KeyA => self.set_mode(Mode::About),
            KeyCode::KeyW => self.set_mode(Mode::Works),
            KeyCode::KeyC => self.set_mode(Mode::Contacts),
            KeyCode::KeyP => self.hover(ProjectKind::Product, gpu),
            KeyCode::KeyG => self.hover(ProjectKind::Graphic, gpu),
            KeyCode::KeyS => self.hover(ProjectKind::Sound, gpu),
            KeyCode::Digit0 => self.unhover(),
            _ => {}
        }
    }

    fn frame(&mut self, gpu: &mut GpuState) -> Result<(), wgpu::SurfaceError> {
        let now = Instant::now();
        let dt_sec = (now - self.last_frame).as_secs_f32().min(MAX_FRAME_DT_SEC);
        self.last_frame = now;
        let t = scene_time((now - self.start).as_secs_f64());

        let input = self.controls.advance(dt_sec);
        self.scene.frame(t, dt_sec, &input);
        self.camera.set_aspect(gpu.aspect());
        gpu.render(&mut self.scene, &self.camera)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse(std::env::args().skip(1))?;
    log::info!("{args:?}");

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Cymatic wall (native)")
        .build(&event_loop)?;

    let mut gpu = pollster::block_on(GpuState::new(&window))?;
    let mut app = App::new(&args, gpu.aspect());

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => gpu.resize(size),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(code),
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                },
            ..
        } => match code {
            KeyCode::Escape => elwt.exit(),
            KeyCode::Space => app.controls.start(),
            code => app.key(code, &mut gpu),
        },
        Event::WindowEvent {
            event:
                WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    ..
                },
            ..
        } => app.controls.start(),
        Event::AboutToWait => match app.frame(&mut gpu) {
            Ok(_) => gpu.window.request_redraw(),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.resize(gpu.window.inner_size())
            }
            Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
            Err(e) => log::warn!("frame skipped: {e:?}"),
        },
        _ => {}
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(list: &[&str]) -> anyhow::Result<Args> {
        Args::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults_to_relief_on_desktop() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.style, MorphStyle::ImageRelief);
        assert!(!args.mobile);
        assert!(args.images.is_empty());
    }

    #[test]
    fn reads_style_relief_and_image_list() {
        let args = parse(&[
            "--style",
            "wave",
            "--relief",
            "face.png",
            "--images",
            "a.jpg, b.jpg,,",
            "--mobile",
        ])
        .unwrap();
        assert_eq!(args.style, MorphStyle::WaveLine);
        assert_eq!(args.relief, Some(PathBuf::from("face.png")));
        assert_eq!(args.images, vec![PathBuf::from("a.jpg"), PathBuf::from("b.jpg")]);
        assert!(args.mobile);
    }

    #[test]
    fn rejects_unknown_input() {
        assert!(parse(&["--style", "blob"]).is_err());
        assert!(parse(&["--fast"]).is_err());
    }

    #[test]
    fn missing_file_is_an_empty_asset() {
        let r = load_image(Path::new("/definitely/not/here.png"));
        assert!(matches!(r, Err(WallError::EmptyAsset)));
    }
}
