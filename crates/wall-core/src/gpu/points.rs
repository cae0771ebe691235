use super::{
    clamped_sampler, sampler_entry, texture_entry, uniform_buffer, uniform_entry, upload_image,
    ImageTexture, ModelUniform,
};
use crate::scene::{Scene, SphereInstance};
use image::{Rgba, RgbaImage};
use wgpu::util::DeviceExt;

struct SphereDraw {
    instance_vb: wgpu::Buffer,
    uv_vb: wgpu::Buffer,
    capacity: usize,
    count: u32,
    // mesh the uv buffer was filled from
    topology: Option<u64>,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
}

/// The image the points sample while the relief is showing.
struct ReliefImage {
    // None for the 1x1 placeholder
    fingerprint: Option<u64>,
    _texture: ImageTexture,
    bind_group: wgpu::BindGroup,
}

pub(super) struct PointsPass {
    pipeline: wgpu::RenderPipeline,
    model_bgl: wgpu::BindGroupLayout,
    relief_bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    relief: Option<ReliefImage>,
    quad_vb: wgpu::Buffer,
    spheres: Vec<SphereDraw>,
}

impl PointsPass {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        camera_bgl: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("points_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::POINTS_WGSL.into()),
        });
        let model_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("points_model_bgl"),
            entries: &[uniform_entry(0)],
        });
        let relief_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("points_relief_bgl"),
            entries: &[texture_entry(0), sampler_entry(1)],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("points_pl"),
            bind_group_layouts: &[camera_bgl, &model_bgl, &relief_bgl],
            push_constant_ranges: &[],
        });
        // Quad corners for two triangles
        let quad_vertices: [f32; 12] = [
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let vertex_buffers = [
            // slot 0: quad corners
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: one point position per instance
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 3) as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 1,
                }],
            },
            // slot 2: the point's rest UV
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 2,
                }],
            },
        ];
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("points_pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_points"),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_points"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });
        Self {
            pipeline,
            model_bgl,
            relief_bgl,
            sampler: clamped_sampler(device, "points_relief_sampler"),
            relief: None,
            quad_vb,
            spheres: Vec::new(),
        }
    }

    fn relief_image(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &RgbaImage,
        fingerprint: Option<u64>,
    ) -> Option<ReliefImage> {
        let texture = upload_image(device, queue, "points_relief_tex", image)?;
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("points_relief_bg"),
            layout: &self.relief_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        Some(ReliefImage {
            fingerprint,
            _texture: texture,
            bind_group,
        })
    }

    /// Keep the bound relief texture in step with the scene's relief image.
    fn sync_relief(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &Scene) {
        let current = self.relief.as_ref().map(|r| r.fingerprint);
        match scene.relief_source() {
            Some(src) if current != Some(Some(src.fingerprint())) => {
                log::debug!("uploading relief texture {:x}", src.fingerprint());
                match self.relief_image(device, queue, src.image(), Some(src.fingerprint())) {
                    Some(relief) => self.relief = Some(relief),
                    None => log::warn!("relief texture upload skipped"),
                }
            }
            _ if current.is_none() => {
                // white until the relief image arrives; the tint weight is 0 anyway
                let placeholder = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255]));
                self.relief = self.relief_image(device, queue, &placeholder, None);
            }
            _ => {}
        }
    }

    fn create_draw(&self, device: &wgpu::Device, capacity: usize) -> SphereDraw {
        let instance_buffer = |label: &str, stride: usize| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: (capacity.max(1) * stride) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let model_buffer = uniform_buffer(
            device,
            "points_model",
            std::mem::size_of::<ModelUniform>(),
        );
        let model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("points_model_bg"),
            layout: &self.model_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: model_buffer.as_entire_binding(),
            }],
        });
        SphereDraw {
            instance_vb: instance_buffer("points_instance_vb", std::mem::size_of::<[f32; 3]>()),
            uv_vb: instance_buffer("points_uv_vb", std::mem::size_of::<[f32; 2]>()),
            capacity,
            count: 0,
            topology: None,
            model_buffer,
            model_bind_group,
        }
    }

    pub fn sync(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &mut Scene) {
        self.sync_relief(device, queue, scene);
        let mesh = scene.mesh().clone();
        for (i, sphere) in scene.spheres_mut().iter_mut().enumerate() {
            let needed = sphere.positions().len();
            if self.spheres.get(i).map_or(true, |d| d.capacity < needed) {
                log::debug!("allocating point buffer for sphere {i} ({needed} points)");
                let draw = self.create_draw(device, needed);
                if i < self.spheres.len() {
                    self.spheres[i] = draw;
                } else {
                    self.spheres.push(draw);
                }
                // fresh buffer: force an upload
                upload(queue, &mut self.spheres[i], sphere);
            } else if sphere.take_dirty() {
                upload(queue, &mut self.spheres[i], sphere);
            }
            let draw = &mut self.spheres[i];
            if draw.topology != Some(mesh.topology_id()) && mesh.len() == needed {
                queue.write_buffer(&draw.uv_vb, 0, bytemuck::cast_slice(mesh.uvs()));
                draw.topology = Some(mesh.topology_id());
            }
            let [r, g, b] = sphere.color();
            let m = ModelUniform {
                model: sphere.transform().matrix().to_cols_array_2d(),
                color: [r, g, b, 1.0],
                params: [sphere.relief_tint(), 0.0, 0.0, 0.0],
            };
            queue.write_buffer(&draw.model_buffer, 0, bytemuck::bytes_of(&m));
        }
    }

    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        let Some(relief) = &self.relief else {
            return;
        };
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(2, &relief.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
        for d in &self.spheres {
            if d.count == 0 {
                continue;
            }
            rpass.set_bind_group(1, &d.model_bind_group, &[]);
            rpass.set_vertex_buffer(1, d.instance_vb.slice(..));
            rpass.set_vertex_buffer(2, d.uv_vb.slice(..));
            rpass.draw(0..6, 0..d.count);
        }
    }
}

fn upload(queue: &wgpu::Queue, draw: &mut SphereDraw, sphere: &mut SphereInstance) {
    sphere.take_dirty();
    queue.write_buffer(&draw.instance_vb, 0, bytemuck::cast_slice(sphere.positions()));
    draw.count = sphere.positions().len() as u32;
}
