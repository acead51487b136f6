#![allow(dead_code)]

use sphere_grid::resources::mesh::MeshData;

/// Shared state of the lifecycle tests, counting every hook invocation.
pub(crate) struct State {
    frame_counter: u32,
    init_invocations: u32,
    update_invocations: u32,
    pub dummy_state: String,
}
impl State {
    pub fn new() -> Self {
        Self {
            frame_counter: 0,
            init_invocations: 0,
            update_invocations: 0,
            dummy_state: String::new(),
        }
    }

    pub fn frame(&mut self) {
        self.frame_counter += 1;
    }

    pub fn init(&mut self) {
        self.init_invocations += 1;
    }

    pub fn update(&mut self) {
        self.update_invocations += 1;
    }

    pub fn frame_counter(&self) -> u32 {
        self.frame_counter
    }

    pub fn init_invocations(&self) -> u32 {
        self.init_invocations
    }

    pub fn update_invocations(&self) -> u32 {
        self.update_invocations
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// A unit square in the XZ plane facing up, without normals.
pub(crate) const QUAD_OBJ: &str = "\
o quad
v 0 0 0
v 1 0 0
v 1 0 1
v 0 0 1
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 4/4 3/3
f 1/1 3/3 2/2
";

pub(crate) fn bundled_asset(file_name: &str) -> String {
    format!("{}/assets/{}", env!("CARGO_MANIFEST_DIR"), file_name)
}

pub(crate) fn parse_meshes(obj_text: &str) -> Vec<MeshData> {
    let models = sphere_grid::resources::parse_obj(obj_text).expect("OBJ text should parse");
    sphere_grid::resources::mesh::to_mesh_data(&models, "inline")
}

pub(crate) fn vertex_at(mesh: &MeshData, position: [f32; 3]) -> &sphere_grid::data_structures::model::ModelVertex {
    mesh.vertices
        .iter()
        .find(|v| v.position == position)
        .unwrap_or_else(|| panic!("no vertex at {position:?}"))
}
