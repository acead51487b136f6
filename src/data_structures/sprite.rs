//! Textured quads drawn in logical window pixel coordinates.

use wgpu::util::DeviceExt;

use crate::{
    context::InitContext,
    data_structures::{model, texture::Texture},
    pipelines::gui::Vertex,
    render::{Flat, Render},
    resources,
};

pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// An image drawn at its natural size on top of the 3D scene.
///
/// `position` is the bottom-left corner in logical pixels with the origin at
/// the bottom-left of the window, so the sprite keeps its distance to the
/// bottom edge when the window is resized. One texel covers one logical pixel,
/// which is `scale_factor` physical pixels on high-DPI displays.
pub struct Sprite {
    texture: Texture,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    position: [f32; 2],
}

impl Sprite {
    pub async fn load(ctx: &InitContext, file_name: &str, position: [f32; 2]) -> anyhow::Result<Self> {
        let texture = resources::load_texture(file_name, &ctx.device, &ctx.queue).await?;
        Ok(Self::from_texture(
            &ctx.device,
            texture,
            position,
            logical_screen([ctx.config.width, ctx.config.height], ctx.scale_factor),
        ))
    }

    pub fn from_texture(
        device: &wgpu::Device,
        texture: Texture,
        position: [f32; 2],
        screen: [f32; 2],
    ) -> Self {
        let layout = resources::diffuse_layout(device);
        let material = model::Material::new(device, "sprite", texture, &layout);
        let vertices = quad_vertices(position, texture_size(&material.diffuse_texture), screen);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sprite Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sprite Index Buffer"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            texture: material.diffuse_texture,
            bind_group: material.bind_group,
            vertex_buffer,
            index_buffer,
            position,
        }
    }

    /// Recompute the quad for a new physical window size or scale factor.
    pub fn resize(&self, queue: &wgpu::Queue, width: u32, height: u32, scale_factor: f64) {
        if width == 0 || height == 0 {
            return;
        }
        let vertices = quad_vertices(
            self.position,
            self.size(),
            logical_screen([width, height], scale_factor),
        );
        queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
    }

    pub fn size(&self) -> [f32; 2] {
        texture_size(&self.texture)
    }

    pub fn destroy(&self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        self.texture.destroy();
    }
}

fn texture_size(texture: &Texture) -> [f32; 2] {
    let [w, h] = texture.size();
    [w as f32, h as f32]
}

/// Window size in logical pixels for a physical size and the window's scale factor.
pub fn logical_screen(physical: [u32; 2], scale_factor: f64) -> [f32; 2] {
    let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
    physical.map(|pixels| (pixels.max(1) as f64 / scale) as f32)
}

/// Corners of a rectangle in `screen` pixels in normalized device coordinates.
///
/// Order is bottom-left, bottom-right, top-right, top-left which makes
/// [`QUAD_INDICES`] wind counter-clockwise.
pub fn quad_vertices(position: [f32; 2], size: [f32; 2], screen: [f32; 2]) -> [Vertex; 4] {
    let to_ndc = |x: f32, y: f32| [x / screen[0] * 2.0 - 1.0, y / screen[1] * 2.0 - 1.0, 0.0];
    let [x, y] = position;
    let [w, h] = size;
    [
        Vertex {
            position: to_ndc(x, y),
            tex_coords: [0.0, 1.0],
        },
        Vertex {
            position: to_ndc(x + w, y),
            tex_coords: [1.0, 1.0],
        },
        Vertex {
            position: to_ndc(x + w, y + h),
            tex_coords: [1.0, 0.0],
        },
        Vertex {
            position: to_ndc(x, y + h),
            tex_coords: [0.0, 0.0],
        },
    ]
}

impl<'a> From<&'a Sprite> for Render<'a> {
    fn from(sprite: &'a Sprite) -> Self {
        Render::GUI(Flat {
            vertex: &sprite.vertex_buffer,
            index: &sprite.index_buffer,
            group: &sprite.bind_group,
            amount: QUAD_INDICES.len(),
        })
    }
}
