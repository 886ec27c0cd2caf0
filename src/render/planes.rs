use super::helpers;
use crate::core::MeshInstance;
use wgpu;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct CameraUniforms {
    pub(crate) view_proj: [[f32; 4]; 4],
}

/// Mirrors `PlaneUniforms` in plane.wgsl (96 bytes, vec3 aligned to 16).
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PlaneUniforms {
    pub(crate) model: [[f32; 4]; 4],
    pub(crate) resolution: [f32; 2],
    pub(crate) progress: f32,
    pub(crate) _pad0: f32,
    pub(crate) color: [f32; 3],
    pub(crate) _pad1: f32,
}

impl PlaneUniforms {
    pub(crate) fn from_instance(mesh: &MeshInstance) -> Self {
        Self {
            model: mesh.model.to_cols_array_2d(),
            resolution: mesh.material.resolution.to_array(),
            progress: mesh.material.progress.clamp(0.0, 1.0),
            _pad0: 0.0,
            color: mesh.material.color.to_array(),
            _pad1: 0.0,
        }
    }
}

/// GPU side of one plane: its uniform buffer, current texture and bind group.
pub(crate) struct PlaneResources {
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) texture: Option<wgpu::Texture>,
    pub(crate) bind_group: wgpu::BindGroup,
}

/// Shared pipeline state for all planes.
pub(crate) struct PlanePipeline {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) plane_bgl: wgpu::BindGroupLayout,
    pub(crate) camera_buffer: wgpu::Buffer,
    pub(crate) camera_bind_group: wgpu::BindGroup,
    pub(crate) sampler: wgpu::Sampler,
    pub(crate) blank_view: wgpu::TextureView,
    _blank_texture: wgpu::Texture,
}

pub(crate) fn create_plane_pipeline(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    color_format: wgpu::TextureFormat,
) -> PlanePipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("plane_shader"),
        source: wgpu::ShaderSource::Wgsl(crate::core::PLANE_WGSL.into()),
    });
    let camera_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("camera_bgl"),
        entries: &[helpers::uniform_entry(0, wgpu::ShaderStages::VERTEX)],
    });
    let plane_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("plane_bgl"),
        entries: &[
            helpers::uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("plane_pl"),
        bind_group_layouts: &[&camera_bgl, &plane_bgl],
        push_constant_ranges: &[],
    });
    let pipeline = helpers::make_plane_pipeline(device, &layout, &shader, color_format);

    let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("camera_uniforms"),
        size: std::mem::size_of::<CameraUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("camera_bg"),
        layout: &camera_bgl,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: camera_buffer.as_entire_binding(),
        }],
    });
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("plane_sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });
    let (blank_texture, blank_view) = helpers::create_blank_texture(device, queue, [0, 0, 0, 0]);

    PlanePipeline {
        pipeline,
        plane_bgl,
        camera_buffer,
        camera_bind_group,
        sampler,
        blank_view,
        _blank_texture: blank_texture,
    }
}

impl PlanePipeline {
    fn bind_group(
        &self,
        device: &wgpu::Device,
        uniform_buffer: &wgpu::Buffer,
        view: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("plane_bg"),
            layout: &self.plane_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    pub(crate) fn create_plane(&self, device: &wgpu::Device) -> PlaneResources {
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("plane_uniforms"),
            size: std::mem::size_of::<PlaneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = self.bind_group(device, &uniform_buffer, &self.blank_view);
        PlaneResources {
            uniform_buffer,
            texture: None,
            bind_group,
        }
    }

    /// Swap in a loaded texture and rebuild the plane's bind group around it.
    pub(crate) fn attach_texture(
        &self,
        device: &wgpu::Device,
        plane: &mut PlaneResources,
        texture: wgpu::Texture,
    ) {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        plane.bind_group = self.bind_group(device, &plane.uniform_buffer, &view);
        if let Some(old) = plane.texture.replace(texture) {
            old.destroy();
        }
    }
}
