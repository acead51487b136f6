//! Loading meshes and textures from external files.
//!
//! Native builds read from the asset directory (see [`crate::config::asset_dir`]),
//! wasm builds fetch the same file names relative to the page origin.

use std::io::{BufReader, Cursor};

use anyhow::Context as _;

use crate::data_structures::model;

pub mod mesh;
pub mod texture;

pub use texture::{diffuse_layout, load_binary, load_string, load_texture};

pub async fn load_model_obj(
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<model::Model> {
    let bind_group_layout = diffuse_layout(device);

    let (models, obj_materials) = texture::load_obj(file_name).await?;
    let materials =
        texture::load_materials(file_name, &obj_materials, device, queue, &bind_group_layout)
            .await?;
    let meshes = mesh::load_meshes(&models, file_name, device);
    anyhow::ensure!(!meshes.is_empty(), "{file_name} contains no usable mesh");

    let model = model::Model { meshes, materials };
    log::info!(
        "Loaded {} ({} meshes, {} triangles)",
        file_name,
        model.meshes.len(),
        model.triangle_count()
    );
    Ok(model)
}

/// Parse OBJ text synchronously, ignoring any material library it references.
pub fn parse_obj(obj_text: &str) -> anyhow::Result<Vec<tobj::Model>> {
    let mut reader = BufReader::new(Cursor::new(obj_text));
    let (models, _) = tobj::load_obj_buf(
        &mut reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| Ok(Default::default()),
    )
    .context("parsing OBJ data")?;
    Ok(models)
}
