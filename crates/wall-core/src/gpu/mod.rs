//! wgpu renderer shared by the web and native front-ends.
//!
//! Spheres are drawn as instanced billboard quads, one instance per point;
//! planes as indexed textured grids. There is no depth buffer: planes go first
//! and the points are alpha-blended over them. Once the relief is built, the
//! points also sample the relief image at their UV.

mod planes;
mod points;

use crate::camera::Camera;
use crate::constants::{CLEAR_COLOR, POINT_SIZE};
use crate::relief::fit_within;
use crate::scene::{PlaneId, Scene};
use image::RgbaImage;
use planes::PlanesPass;
use points::PointsPass;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct CameraUniform {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    // width, height, point size, time
    viewport: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct ModelUniform {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    // relief tint, unused x3
    params: [f32; 4],
}

pub(crate) fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// A sampled RGBA8 texture and its view.
pub(crate) struct ImageTexture {
    // kept alive for the view
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

/// Upload `image` as an sRGB texture, downscaled first if it exceeds the
/// device's 2D texture limit. Returns `None` for an empty image.
pub(crate) fn upload_image(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    image: &RgbaImage,
) -> Option<ImageTexture> {
    let image = fit_within(image, device.limits().max_texture_dimension_2d);
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return None;
    }
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        image.as_raw(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    Some(ImageTexture {
        _texture: texture,
        view,
    })
}

pub(crate) fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension: wgpu::TextureViewDimension::D2,
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
        },
        count: None,
    }
}

pub(crate) fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

pub(crate) fn clamped_sampler(device: &wgpu::Device, label: &str) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

pub(crate) fn uniform_buffer(device: &wgpu::Device, label: &str, size: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: size as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

pub struct SceneRenderer {
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    points: PointsPass,
    planes: PlanesPass,
    clear_color: wgpu::Color,
}

impl SceneRenderer {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let camera_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_bgl"),
            entries: &[uniform_entry(0)],
        });
        let camera_buffer =
            uniform_buffer(device, "camera_uniforms", std::mem::size_of::<CameraUniform>());
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bg"),
            layout: &camera_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });
        let [r, g, b, a] = CLEAR_COLOR;
        Self {
            points: PointsPass::new(device, format, &camera_bgl),
            planes: PlanesPass::new(device, format, &camera_bgl),
            camera_buffer,
            camera_bind_group,
            clear_color: wgpu::Color { r, g, b, a },
        }
    }

    /// Upload the image behind a plane. Planes without a texture are not drawn.
    pub fn attach_plane(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        id: PlaneId,
        image: &RgbaImage,
    ) {
        self.planes.attach(device, queue, id, image);
    }

    /// Push this frame's camera, transforms and dirty buffers to the GPU.
    pub fn sync(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &mut Scene,
        camera: &Camera,
        size: (u32, u32),
    ) {
        let u = CameraUniform {
            view: camera.view_matrix().to_cols_array_2d(),
            proj: camera.projection_matrix().to_cols_array_2d(),
            viewport: [size.0 as f32, size.1 as f32, POINT_SIZE, scene.time()],
        };
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&u));
        self.planes.sync(device, queue, scene);
        self.points.sync(device, queue, scene);
    }

    pub fn encode(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        rpass.set_bind_group(0, &self.camera_bind_group, &[]);
        self.planes.draw(&mut rpass);
        self.points.draw(&mut rpass);
    }
}
