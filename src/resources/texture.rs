use std::path::PathBuf;

use anyhow::Context as _;

use crate::data_structures::{model, texture};

/// Layout shared by model materials and sprites: one filterable texture and its sampler.
pub fn diffuse_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("diffuse_bind_group_layout"),
    })
}

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().context("no browser window")?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| anyhow::anyhow!("page origin is not readable"))?;
    let base = reqwest::Url::parse(&format!("{}/assets/", origin))?;
    Ok(base.join(file_name)?)
}

pub async fn load_string(file_name: &str) -> anyhow::Result<String> {
    #[cfg(target_arch = "wasm32")]
    let txt = {
        let url = format_url(file_name)?;
        reqwest::get(url).await?.text().await?
    };
    #[cfg(not(target_arch = "wasm32"))]
    let txt = {
        let path = crate::config::asset_dir().join(file_name);
        log::debug!("Reading {}", path.display());
        std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?
    };

    Ok(txt)
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name)?;
        reqwest::get(url).await?.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = crate::config::asset_dir().join(file_name);
        log::debug!("Reading {}", path.display());
        std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?
    };

    Ok(data)
}

pub async fn load_texture(
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<texture::Texture> {
    let data = load_binary(file_name).await?;
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str());
    texture::Texture::from_bytes(device, queue, &data, file_name, extension)
        .with_context(|| format!("decoding texture {file_name}"))
}

/// Parse OBJ text into triangulated, single-indexed models and their materials.
pub async fn load_obj(
    file_name: &str,
) -> anyhow::Result<(Vec<tobj::Model>, Vec<tobj::Material>)> {
    let obj_text: String = load_string(file_name).await?;

    let (models, obj_materials) = tobj::futures::load_obj_buf(
        futures::io::Cursor::new(obj_text.into_bytes()),
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |p: PathBuf| async move {
            let p = p.to_string_lossy().into_owned();
            match load_string(&p).await {
                Ok(mat_text) => {
                    tobj::futures::load_mtl_buf(futures::io::Cursor::new(mat_text.into_bytes()))
                        .await
                }
                Err(e) => {
                    log::warn!("Material library {p} could not be read: {e:#}");
                    Err(tobj::LoadError::OpenFileFailed)
                }
            }
        },
    )
    .await
    .with_context(|| format!("parsing {file_name}"))?;

    let materials = match obj_materials {
        Ok(materials) => materials,
        Err(e) => {
            log::warn!("{file_name} is rendered with the default material: {e}");
            Vec::new()
        }
    };
    Ok((models, materials))
}

/// Turn OBJ materials into GPU materials.
///
/// A diffuse texture wins over a diffuse colour. When the file defines no
/// material at all a single white one is created so every mesh can be drawn.
pub async fn load_materials(
    file_name: &str,
    obj_materials: &[tobj::Material],
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
) -> anyhow::Result<Vec<model::Material>> {
    let mut materials = Vec::new();
    for m in obj_materials {
        let diffuse_texture = match (&m.diffuse_texture, m.diffuse) {
            (Some(diffuse_texture), _) => load_texture(diffuse_texture, device, queue).await?,
            (None, Some(diffuse)) => {
                texture::Texture::create_solid(colour_to_rgba(diffuse), &m.name, device, queue)
            }
            (None, None) => {
                log::warn!("Material {} of {file_name} has neither texture nor colour.", m.name);
                texture::Texture::create_solid([255; 4], &m.name, device, queue)
            }
        };
        materials.push(model::Material::new(device, &m.name, diffuse_texture, layout));
    }
    if materials.is_empty() {
        log::debug!("{file_name} defines no materials, using plain white");
        let white = texture::Texture::create_solid([255; 4], "default material", device, queue);
        materials.push(model::Material::new(device, "default", white, layout));
    }
    Ok(materials)
}

pub fn colour_to_rgba(colour: [f32; 3]) -> [u8; 4] {
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [to_u8(colour[0]), to_u8(colour[1]), to_u8(colour[2]), 255]
}
