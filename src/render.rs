use crate::core::{CameraModel, DeviceViewport, MeshInstance, PlaneId, SceneRenderer};
use fnv::FnvHashMap;
use web_sys as web;

mod helpers;
mod planes;
use planes::{create_plane_pipeline, CameraUniforms, PlanePipeline, PlaneResources, PlaneUniforms};

pub struct GpuState {
    canvas: web::HtmlCanvasElement,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: PlanePipeline,
    planes: FnvHashMap<PlaneId, PlaneResources>,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
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
        // The canvas is transparent over the page background
        let alpha_mode = caps
            .alpha_modes
            .iter()
            .copied()
            .find(|m| *m == wgpu::CompositeAlphaMode::PreMultiplied)
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = create_plane_pipeline(&device, &queue, format);

        Ok(Self {
            canvas: canvas.clone(),
            surface,
            device,
            queue,
            config,
            pipeline,
            planes: FnvHashMap::default(),
            width,
            height,
            clear_color: wgpu::Color::TRANSPARENT,
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

    fn acquire_frame(&mut self) -> anyhow::Result<Option<wgpu::SurfaceTexture>> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("[gpu] surface lost; reconfiguring");
                self.surface.configure(&self.device, &self.config);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl SceneRenderer for GpuState {
    type Image = web::HtmlImageElement;

    fn add_mesh(&mut self, id: PlaneId) {
        let resources = self.pipeline.create_plane(&self.device);
        self.planes.insert(id, resources);
    }

    fn remove_mesh(&mut self, id: PlaneId) {
        if let Some(resources) = self.planes.remove(&id) {
            resources.uniform_buffer.destroy();
            if let Some(texture) = resources.texture {
                texture.destroy();
            }
        }
    }

    fn set_texture(&mut self, id: PlaneId, image: &Self::Image) -> anyhow::Result<()> {
        let (width, height) = (image.natural_width(), image.natural_height());
        if width == 0 || height == 0 {
            anyhow::bail!("image has no pixels");
        }
        let Some(resources) = self.planes.get_mut(&id) else {
            anyhow::bail!("no mesh registered for {id}");
        };
        let (texture, _view) = helpers::create_color_texture(
            &self.device,
            "plane_texture",
            width,
            height,
            helpers::PLANE_TEXTURE_FORMAT,
            wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        self.queue.copy_external_image_to_texture(
            &wgpu::CopyExternalImageSourceInfo {
                source: wgpu::ExternalImageSource::HTMLImageElement(image.clone()),
                origin: wgpu::Origin2d::ZERO,
                flip_y: false,
            },
            wgpu::CopyExternalImageDestInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
                color_space: wgpu::PredefinedColorSpace::Srgb,
                premultiplied_alpha: false,
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.pipeline.attach_texture(&self.device, resources, texture);
        Ok(())
    }

    fn set_surface_size(&mut self, device: &DeviceViewport) {
        let (w, h) = device.physical_size();
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        let style = self.canvas.style();
        _ = style.set_property("width", &format!("{}px", device.width));
        _ = style.set_property("height", &format!("{}px", device.height));
        self.resize_if_needed(w, h);
    }

    fn draw(&mut self, camera: &CameraModel, meshes: &[MeshInstance]) -> anyhow::Result<()> {
        let camera_uniforms = CameraUniforms {
            view_proj: camera.view_projection().to_cols_array_2d(),
        };
        self.queue.write_buffer(
            &self.pipeline.camera_buffer,
            0,
            bytemuck::bytes_of(&camera_uniforms),
        );
        for mesh in meshes {
            if let Some(resources) = self.planes.get(&mesh.id) {
                let u = PlaneUniforms::from_instance(mesh);
                self.queue
                    .write_buffer(&resources.uniform_buffer, 0, bytemuck::bytes_of(&u));
            }
        }

        let Some(frame) = self.acquire_frame()? else {
            return Ok(());
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
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
            rpass.set_pipeline(&self.pipeline.pipeline);
            rpass.set_bind_group(0, &self.pipeline.camera_bind_group, &[]);
            for mesh in meshes {
                if let Some(resources) = self.planes.get(&mesh.id) {
                    rpass.set_bind_group(1, &resources.bind_group, &[]);
                    rpass.draw(0..6, 0..1);
                }
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
