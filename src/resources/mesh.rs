use anyhow::ensure;
use cgmath::InnerSpace;
use wgpu::util::DeviceExt;

use crate::data_structures::model;

/// CPU side of a mesh: what gets uploaded into the vertex and index buffers.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<model::ModelVertex>,
    pub indices: Vec<u32>,
    pub material: usize,
}

impl MeshData {
    /// Build the vertex list of a triangulated, single-indexed OBJ model.
    ///
    /// Texture V is flipped because OBJ puts the origin at the bottom-left while
    /// wgpu samples from the top-left. Models exported without normals get
    /// smooth normals computed from the triangles they belong to.
    pub fn from_obj(m: &tobj::Model) -> anyhow::Result<Self> {
        let mesh = &m.mesh;
        let vertex_count = mesh.positions.len() / 3;
        let mut vertices = (0..vertex_count)
            .map(|i| model::ModelVertex {
                position: [
                    mesh.positions[i * 3],
                    mesh.positions[i * 3 + 1],
                    mesh.positions[i * 3 + 2],
                ],
                tex_coords: [
                    mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                    1.0 - mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                ],
                normal: [
                    mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                    mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                    mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                ],
            })
            .collect::<Vec<_>>();

        ensure!(
            mesh.indices.len() % 3 == 0,
            "mesh {} is not triangulated ({} indices)",
            m.name,
            mesh.indices.len()
        );
        if let Some(bad) = mesh.indices.iter().find(|&&i| i as usize >= vertex_count) {
            anyhow::bail!(
                "mesh {} references vertex {} but only has {}",
                m.name,
                bad,
                vertex_count
            );
        }

        if mesh.normals.len() < vertex_count * 3 {
            compute_normals(&mut vertices, &mesh.indices);
        }

        Ok(Self {
            name: m.name.clone(),
            vertices,
            indices: mesh.indices.clone(),
            material: mesh.material_id.unwrap_or(0),
        })
    }

    pub fn triangle_count(&self) -> u32 {
        self.indices.len() as u32 / 3
    }

    pub fn upload(&self, device: &wgpu::Device) -> model::Mesh {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", self.name)),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", self.name)),
            // The indices are for positions, texels, and normals because we set `single_index` to true
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        model::Mesh {
            name: self.name.clone(),
            vertex_buffer,
            index_buffer,
            num_elements: self.indices.len() as u32,
            material: self.material,
        }
    }
}

/// Area-weighted smooth normals: the unnormalized face normal is proportional to
/// the triangle's area, so summing them weights larger faces more.
fn compute_normals(vertices: &mut [model::ModelVertex], indices: &[u32]) {
    let mut sums = vec![cgmath::Vector3::new(0.0f32, 0.0, 0.0); vertices.len()];
    for c in indices.chunks(3) {
        let pos0: cgmath::Vector3<_> = vertices[c[0] as usize].position.into();
        let pos1: cgmath::Vector3<_> = vertices[c[1] as usize].position.into();
        let pos2: cgmath::Vector3<_> = vertices[c[2] as usize].position.into();
        let face = (pos1 - pos0).cross(pos2 - pos0);
        for &i in c {
            sums[i as usize] += face;
        }
    }
    for (vertex, sum) in vertices.iter_mut().zip(sums) {
        if sum.magnitude2() > 0.0 {
            vertex.normal = sum.normalize().into();
        }
    }
}

/// Convert every OBJ model, skipping (and reporting) the ones that are malformed.
pub fn to_mesh_data(models: &[tobj::Model], file_name: &str) -> Vec<MeshData> {
    models
        .iter()
        .enumerate()
        .filter_map(|(idx, m)| match MeshData::from_obj(m) {
            Ok(mesh) => Some(mesh),
            Err(e) => {
                log::warn!("Mesh at index {} in file {} could not be loaded: {:#}", idx, file_name, e);
                None
            }
        })
        .collect()
}

pub fn load_meshes(models: &[tobj::Model], file_name: &str, device: &wgpu::Device) -> Vec<model::Mesh> {
    to_mesh_data(models, file_name)
        .iter()
        .map(|data| data.upload(device))
        .collect()
}
