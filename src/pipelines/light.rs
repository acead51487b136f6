use cgmath::{InnerSpace, Vector3};
use wgpu::util::DeviceExt;

use crate::config;

/// Lighting applied uniformly to the 3D pass: one ambient term and one directional light.
#[derive(Clone, Debug, PartialEq)]
pub struct Environment {
    pub ambient: [f32; 3],
    pub directional: DirectionalLight,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    pub colour: [f32; 3],
    /// Direction the light travels in, not the direction towards the light.
    pub direction: Vector3<f32>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            ambient: config::AMBIENT_LIGHT,
            directional: DirectionalLight {
                colour: config::LIGHT_COLOUR,
                direction: config::LIGHT_DIRECTION.into(),
            },
        }
    }
}

#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(environment: &Environment, device: &wgpu::Device) -> Self {
        let uniform = LightUniform::from(environment);
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn set(&mut self, queue: &wgpu::Queue, environment: &Environment) {
        self.uniform = environment.into();
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    // Uniforms require 16 byte (4 float) spacing, so every field is a vec4 with an unused w
    ambient: [f32; 4],
    colour: [f32; 4],
    direction: [f32; 4],
}

impl LightUniform {
    pub fn ambient(&self) -> [f32; 3] {
        [self.ambient[0], self.ambient[1], self.ambient[2]]
    }

    pub fn colour(&self) -> [f32; 3] {
        [self.colour[0], self.colour[1], self.colour[2]]
    }

    pub fn direction(&self) -> Vector3<f32> {
        Vector3::new(self.direction[0], self.direction[1], self.direction[2])
    }
}

impl From<&Environment> for LightUniform {
    fn from(environment: &Environment) -> Self {
        let [ar, ag, ab] = environment.ambient;
        let [cr, cg, cb] = environment.directional.colour;
        let direction = if environment.directional.direction.magnitude2() > 0.0 {
            environment.directional.direction.normalize()
        } else {
            log::warn!("Directional light without a direction, pointing it straight down");
            -Vector3::unit_y()
        };
        Self {
            ambient: [ar, ag, ab, 1.0],
            colour: [cr, cg, cb, 1.0],
            direction: direction.extend(0.0).into(),
        }
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Uniform Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}
