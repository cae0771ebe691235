use crate::constants::MAX_FRAME_DT_SEC;
use crate::dom;
use image::RgbaImage;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wall_core::gpu::SceneRenderer;
use wall_core::scene::scene_time;
use wall_core::{Camera, Controls, PlaneId, Scene, ViewportClass, ViewportProfile};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// State shared between the DOM handlers, the asset loaders and the frame loop.
#[derive(Clone)]
pub struct WallState {
    pub scene: Rc<RefCell<Scene>>,
    pub controls: Rc<RefCell<Controls>>,
    /// Decoded plane images waiting for a texture upload.
    pub textures: Rc<RefCell<Vec<(PlaneId, RgbaImage)>>>,
}

impl WallState {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene: Rc::new(RefCell::new(scene)),
            controls: Rc::new(RefCell::new(Controls::default())),
            textures: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: SceneRenderer,
    width: u32,
    height: u32,
}

impl GpuState {
    pub async fn new(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let renderer = SceneRenderer::new(&device, format);
        log::info!("WebGPU ready: {format:?} {width}x{height}");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            renderer,
            width,
            height,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn attach_plane(&mut self, id: PlaneId, image: &RgbaImage) {
        self.renderer
            .attach_plane(&self.device, &self.queue, id, image);
    }

    pub fn render(&mut self, scene: &mut Scene, camera: &Camera) -> Result<(), wgpu::SurfaceError> {
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

pub struct FrameContext {
    pub state: WallState,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: GpuState,
    pub camera: Camera,
    pub start: Instant,
    pub last_instant: Instant,
}

impl FrameContext {
    pub fn new(state: WallState, canvas: web::HtmlCanvasElement, gpu: GpuState) -> Self {
        let camera = Camera::for_profile(&state.scene.borrow().config().profile, gpu.aspect());
        let now = Instant::now();
        Self {
            state,
            canvas,
            gpu,
            camera,
            start: now,
            last_instant: now,
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant)
            .as_secs_f32()
            .min(MAX_FRAME_DT_SEC);
        self.last_instant = now;
        let t = scene_time((now - self.start).as_secs_f64());

        let input = self.state.controls.borrow_mut().advance(dt_sec);
        let mut scene = self.state.scene.borrow_mut();

        let class = ViewportClass::from_css_width(dom::css_width());
        if class != scene.config().profile.class {
            log::info!("viewport class -> {class:?}");
            let profile = ViewportProfile::for_class(class);
            self.camera = Camera::for_profile(&profile, self.gpu.aspect());
            scene.set_profile(profile);
        }

        scene.frame(t, dt_sec, &input);

        for (id, image) in self.state.textures.borrow_mut().drain(..) {
            self.gpu.attach_plane(id, &image);
        }

        self.gpu
            .resize_if_needed(self.canvas.width(), self.canvas.height());
        self.camera.set_aspect(self.gpu.aspect());
        match self.gpu.render(&mut scene, &self.camera) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (w, h) = (self.gpu.width, self.gpu.height);
                self.gpu.surface.configure(&self.gpu.device, &self.gpu.config);
                log::debug!("surface reconfigured at {w}x{h}");
            }
            Err(e) => log::error!("render error: {:?}", e),
        }
    }
}

type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Handle to a running animation loop; `stop` cancels the pending frame.
#[derive(Clone)]
pub struct LoopHandle {
    running: Rc<Cell<bool>>,
    raf_id: Rc<Cell<Option<i32>>>,
    tick: Tick,
}

impl LoopHandle {
    pub fn stop(&self) {
        if !self.running.replace(false) {
            return;
        }
        if let (Some(id), Some(w)) = (self.raf_id.take(), web::window()) {
            let _ = w.cancel_animation_frame(id);
        }
        // not called from inside the tick, so the closure can go
        self.tick.borrow_mut().take();
        log::info!("animation loop stopped");
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> LoopHandle {
    let handle = LoopHandle {
        running: Rc::new(Cell::new(true)),
        raf_id: Rc::new(Cell::new(None)),
        tick: Rc::new(RefCell::new(None)),
    };
    let running = handle.running.clone();
    let raf_id = handle.raf_id.clone();
    let tick_clone = handle.tick.clone();
    *handle.tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !running.get() {
            return;
        }
        frame_ctx.borrow_mut().frame();
        raf_id.set(request_frame(&tick_clone));
    }) as Box<dyn FnMut()>));
    handle.raf_id.set(request_frame(&handle.tick));
    handle
}

fn request_frame(tick: &Tick) -> Option<i32> {
    let window = web::window()?;
    let tick = tick.borrow();
    let cb = tick.as_ref()?;
    window
        .request_animation_frame(cb.as_ref().unchecked_ref())
        .ok()
}
