use std::sync::Arc;

use anyhow::Context as _;
use winit::window::Window;

use crate::{
    camera::{Camera, CameraResources, Projection},
    config::{self, GridConfig},
    data_structures::texture,
    fps::FpsCounter,
    pipelines::{
        Pipelines,
        light::{Environment, LightResources},
    },
};

#[cfg(feature = "ui")]
use crate::text::TextOverlay;

/// Every GPU resource the engine owns, plus the per-frame settings flows may change.
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub pipelines: Pipelines,
    pub clear_colour: wgpu::Color,
    pub fps: FpsCounter,
    #[cfg(feature = "ui")]
    pub(crate) text: TextOverlay,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Cannot create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No graphics adapter is compatible with the window surface")?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
                ..Default::default()
            })
            .await
            .context("Cannot open the graphics device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders output linear colours and rely on an Srgb surface.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("The surface reports no supported formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let projection = Projection::new(
            config.width,
            config.height,
            config::FIELD_OF_VIEW,
            config::Z_NEAR,
            config::Z_FAR,
        );
        let camera = CameraResources::new(
            &device,
            Camera::framing(&GridConfig::default()),
            &projection,
        );

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        let light = LightResources::new(&Environment::default(), &device);

        let pipelines = Pipelines::new(
            &device,
            &config,
            &light.bind_group_layout,
            &camera.bind_group_layout,
        );

        #[cfg(feature = "ui")]
        let text = TextOverlay::new(&device, &queue, config.format);

        log::info!(
            "Context ready ({}x{}, {:?})",
            config.width,
            config.height,
            config.format
        );

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            camera,
            projection,
            light,
            pipelines,
            clear_colour: config::CLEAR_COLOUR,
            fps: FpsCounter::new(),
            #[cfg(feature = "ui")]
            text,
        })
    }

    /// Replace the lighting environment used by the 3D pass.
    pub fn set_environment(&mut self, environment: &Environment) {
        self.light.set(&self.queue, environment);
    }

    /// Point the camera somewhere else and upload the new view.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera.camera = camera;
        self.camera.update(&self.queue, &self.projection);
    }

    /// Physical size of the surface in pixels.
    pub fn window_size(&self) -> [u32; 2] {
        [self.config.width, self.config.height]
    }

    /// Physical pixels per logical pixel. Sprites and labels are laid out in logical pixels.
    pub fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }
}

/// The parts of the [`Context`] async flow constructors need to create GPU resources.
///
/// Cloning is cheap: device and queue are reference counted.
#[derive(Clone, Debug)]
pub struct InitContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub scale_factor: f64,
}

impl From<&Context> for InitContext {
    fn from(ctx: &Context) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            config: ctx.config.clone(),
            scale_factor: ctx.scale_factor(),
        }
    }
}
