//! Render pipelines.
//!
//! - `basic` is the lit, instanced pipeline for models in the 3D pass
//! - `gui` draws textured quads in the overlay pass
//! - `light` holds the lighting environment uniform shared by the 3D pass

pub mod basic;
pub mod gui;
pub mod light;

/// Every pipeline the engine binds while drawing a frame.
#[derive(Debug)]
pub struct Pipelines {
    pub basic: wgpu::RenderPipeline,
    pub gui: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        light_bind_group_layout: &wgpu::BindGroupLayout,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            basic: basic::mk_basic_pipeline(
                device,
                config,
                light_bind_group_layout,
                camera_bind_group_layout,
            ),
            gui: gui::mk_gui_pipeline(device, config),
        }
    }
}
