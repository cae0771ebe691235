use super::{
    clamped_sampler, sampler_entry, texture_entry, uniform_buffer, uniform_entry, upload_image,
    ImageTexture, ModelUniform,
};
use crate::constants::PLANE_OPACITY;
use crate::scene::{PlaneId, Scene};
use fnv::FnvHashMap;
use image::RgbaImage;
use wgpu::util::DeviceExt;

struct PlaneDraw {
    position_vb: wgpu::Buffer,
    uv_vb: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    model_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub(super) struct PlanesPass {
    pipeline: wgpu::RenderPipeline,
    bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: FnvHashMap<PlaneId, ImageTexture>,
    draws: FnvHashMap<PlaneId, PlaneDraw>,
    order: Vec<PlaneId>,
}

impl PlanesPass {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        camera_bgl: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("plane_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::PLANE_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("plane_bgl"),
            entries: &[uniform_entry(0), texture_entry(1), sampler_entry(2)],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("plane_pl"),
            bind_group_layouts: &[camera_bgl, &bgl],
            push_constant_ranges: &[],
        });
        let sampler = clamped_sampler(device, "plane_sampler");
        let vertex_buffers = [
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 3) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 1,
                }],
            },
        ];
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("plane_pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_plane"),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            // both faces are visible while the planes wobble
            primitive: wgpu::PrimitiveState {
                cull_mode: None,
                ..wgpu::PrimitiveState::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_plane"),
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
            bgl,
            sampler,
            textures: FnvHashMap::default(),
            draws: FnvHashMap::default(),
            order: Vec::new(),
        }
    }

    pub fn attach(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        id: PlaneId,
        image: &RgbaImage,
    ) {
        let Some(texture) = upload_image(device, queue, "plane_tex", image) else {
            log::warn!("plane {id:?}: empty image, not drawn");
            return;
        };
        self.draws.remove(&id);
        self.textures.insert(id, texture);
    }

    pub fn sync(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &mut Scene) {
        let live = scene.live_plane_ids();
        self.textures.retain(|id, _| live.contains(id));
        self.draws.retain(|id, _| live.contains(id));
        self.order.clear();

        for (id, plane) in scene.planes_mut() {
            let Some(tex) = self.textures.get(&id) else {
                continue;
            };
            let draw = self.draws.entry(id).or_insert_with(|| {
                let mesh = plane.mesh();
                let model_buffer = uniform_buffer(
                    device,
                    "plane_model",
                    std::mem::size_of::<ModelUniform>(),
                );
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("plane_bg"),
                    layout: &self.bgl,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: model_buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::TextureView(&tex.view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::Sampler(&self.sampler),
                        },
                    ],
                });
                PlaneDraw {
                    position_vb: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("plane_position_vb"),
                        contents: bytemuck::cast_slice(plane.positions()),
                        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    }),
                    uv_vb: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("plane_uv_vb"),
                        contents: bytemuck::cast_slice(mesh.uvs()),
                        usage: wgpu::BufferUsages::VERTEX,
                    }),
                    index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("plane_index"),
                        contents: bytemuck::cast_slice(mesh.indices()),
                        usage: wgpu::BufferUsages::INDEX,
                    }),
                    index_count: mesh.indices().len() as u32,
                    model_buffer,
                    bind_group,
                }
            });
            if plane.take_dirty() {
                queue.write_buffer(&draw.position_vb, 0, bytemuck::cast_slice(plane.positions()));
            }
            let m = ModelUniform {
                model: plane.transform().matrix().to_cols_array_2d(),
                color: [1.0, 1.0, 1.0, PLANE_OPACITY],
                params: [0.0; 4],
            };
            queue.write_buffer(&draw.model_buffer, 0, bytemuck::bytes_of(&m));
            self.order.push(id);
        }
    }

    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        if self.order.is_empty() {
            return;
        }
        rpass.set_pipeline(&self.pipeline);
        for d in self.order.iter().filter_map(|id| self.draws.get(id)) {
            rpass.set_bind_group(1, &d.bind_group, &[]);
            rpass.set_vertex_buffer(0, d.position_vb.slice(..));
            rpass.set_vertex_buffer(1, d.uv_vb.slice(..));
            rpass.set_index_buffer(d.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..d.index_count, 0, 0..1);
        }
    }
}
