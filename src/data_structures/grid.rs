use cgmath::{Deg, Vector3};
use wgpu::util::DeviceExt;

use crate::{
    config::GridConfig,
    context::InitContext,
    data_structures::{instance::Instance, model},
    render::{Instanced, Render},
    resources,
};

/**
 * An `InstanceGrid` draws one shared model many times, laid out on the XZ plane.
 *
 * All instances live in a single instance buffer so the whole grid is one
 * instanced draw call per mesh.
 */
pub struct InstanceGrid {
    pub model: model::Model,
    pub instances: Vec<Instance>,
    pub instance_buffer: wgpu::Buffer,
    config: GridConfig,
}

impl InstanceGrid {
    pub async fn load(ctx: &InitContext, config: GridConfig, obj_file: &str) -> anyhow::Result<Self> {
        let model = resources::load_model_obj(obj_file, &ctx.device, &ctx.queue).await?;
        Ok(Self::from_model(&ctx.device, model, config))
    }

    pub fn from_model(device: &wgpu::Device, model: model::Model, config: GridConfig) -> Self {
        let instances = layout(&config);
        let instance_data = instances.iter().map(Instance::to_raw).collect::<Vec<_>>();
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Instance Buffer"),
            contents: bytemuck::cast_slice(&instance_data),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        log::debug!(
            "Created a {}x{} grid ({} instances)",
            config.objects_x,
            config.objects_z,
            instances.len()
        );

        Self {
            model,
            instances,
            instance_buffer,
            config,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Rotate every instance around its local Y axis.
    pub fn rotate(&mut self, angle: Deg<f32>) {
        rotate_instances(&mut self.instances, angle);
    }

    pub fn write_to_buffer(&self, queue: &wgpu::Queue) {
        let instance_data = self
            .instances
            .iter()
            .map(Instance::to_raw)
            .collect::<Vec<_>>();
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instance_data));
    }

    /// Triangles the grid submits per frame, based on the configured per-mesh count.
    pub fn triangle_count(&self) -> u64 {
        self.config.triangle_count()
    }

    pub fn destroy(&self) {
        self.instance_buffer.destroy();
        self.model.destroy();
    }
}

/// Instances for every grid cell, `z` in the outer loop and `x` in the inner one.
pub fn layout(config: &GridConfig) -> Vec<Instance> {
    (0..config.objects_z)
        .flat_map(|z| (0..config.objects_x).map(move |x| (x, z)))
        .map(|(x, z)| Instance::from(config.offset(x, z)))
        .collect()
}

pub fn rotate_instances(instances: &mut [Instance], angle: Deg<f32>) {
    instances
        .iter_mut()
        .for_each(|instance| instance.rotate(Vector3::unit_y(), angle));
}

impl<'a> From<&'a InstanceGrid> for Render<'a> {
    fn from(grid: &'a InstanceGrid) -> Self {
        Render::Default(Instanced {
            instance: &grid.instance_buffer,
            model: &grid.model,
            amount: grid.instances.len(),
        })
    }
}
