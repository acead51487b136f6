use approx::assert_relative_eq;
use sphere_grid::{
    config,
    resources::{self, mesh::MeshData},
};

use crate::common::test_utils::{QUAD_OBJ, bundled_asset, parse_meshes, vertex_at};

mod common;

#[test]
fn inline_obj_is_parsed_into_one_mesh() {
    let meshes = parse_meshes(QUAD_OBJ);
    assert_eq!(meshes.len(), 1);

    let quad = &meshes[0];
    assert_eq!(quad.name, "quad");
    assert_eq!(quad.triangle_count(), 2);
    assert_eq!(quad.indices.len(), 6);
    assert_eq!(quad.vertices.len(), 4);
    assert_eq!(quad.material, 0);
}

#[test]
fn texture_v_is_flipped() {
    let meshes = parse_meshes(QUAD_OBJ);
    let quad = &meshes[0];

    assert_eq!(vertex_at(quad, [0.0, 0.0, 0.0]).tex_coords, [0.0, 1.0]);
    assert_eq!(vertex_at(quad, [1.0, 0.0, 0.0]).tex_coords, [1.0, 1.0]);
    assert_eq!(vertex_at(quad, [1.0, 0.0, 1.0]).tex_coords, [1.0, 0.0]);
    assert_eq!(vertex_at(quad, [0.0, 0.0, 1.0]).tex_coords, [0.0, 0.0]);
}

#[test]
fn missing_normals_are_computed_from_faces() {
    let meshes = parse_meshes(QUAD_OBJ);
    for vertex in &meshes[0].vertices {
        assert_relative_eq!(vertex.normal[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(vertex.normal[1], 1.0, epsilon = 1e-6);
        assert_relative_eq!(vertex.normal[2], 0.0, epsilon = 1e-6);
    }
}

#[test]
fn bundled_sphere_loads_asynchronously_without_materials() {
    let (models, materials) =
        futures::executor::block_on(resources::texture::load_obj(config::MESH_FILE))
            .expect("the sphere mesh ships with the crate");

    let triangles: u64 = models.iter().map(|m| m.mesh.indices.len() as u64 / 3).sum();
    assert_eq!(triangles, config::TRIANGLES_PER_MESH);
    assert!(materials.is_empty());
}

#[test]
fn bundled_sphere_has_the_configured_triangle_count() {
    let obj_text = std::fs::read_to_string(bundled_asset(config::MESH_FILE))
        .expect("the sphere mesh ships with the crate");
    let meshes = parse_meshes(&obj_text);

    let triangles: u64 = meshes.iter().map(|m| m.triangle_count() as u64).sum();
    assert_eq!(triangles, config::TRIANGLES_PER_MESH);

    for vertex in meshes.iter().flat_map(|m| m.vertices.iter()) {
        let [x, y, z] = vertex.normal;
        assert_relative_eq!((x * x + y * y + z * z).sqrt(), 1.0, epsilon = 1e-3);
    }
}

#[test]
fn out_of_range_indices_are_rejected() {
    let broken = tobj::Model::new(
        tobj::Mesh {
            positions: vec![0.0; 9],
            indices: vec![0, 1, 5],
            ..Default::default()
        },
        "broken".to_string(),
    );
    let err = MeshData::from_obj(&broken).unwrap_err();
    assert!(err.to_string().contains("broken"));
}

#[test]
fn untriangulated_meshes_are_rejected() {
    let quad = tobj::Model::new(
        tobj::Mesh {
            positions: vec![0.0; 12],
            indices: vec![0, 1, 2, 3],
            ..Default::default()
        },
        "quad".to_string(),
    );
    assert!(MeshData::from_obj(&quad).is_err());
}

#[test]
fn invalid_meshes_are_skipped_and_the_rest_kept() {
    let mut models = resources::parse_obj(QUAD_OBJ).unwrap();
    models.push(tobj::Model::new(
        tobj::Mesh {
            positions: vec![0.0; 9],
            indices: vec![0, 1, 9],
            ..Default::default()
        },
        "broken".to_string(),
    ));

    let meshes = resources::mesh::to_mesh_data(&models, "mixed.obj");
    assert_eq!(meshes.len(), 1);
    assert_eq!(meshes[0].name, "quad");
}

#[test]
fn material_colours_become_opaque_texels() {
    assert_eq!(resources::texture::colour_to_rgba([1.0, 0.5, 0.0]), [255, 128, 0, 255]);
    assert_eq!(resources::texture::colour_to_rgba([2.0, -1.0, 0.2]), [255, 0, 51, 255]);
}
