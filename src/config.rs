//! Scene configuration.
//!
//! Everything the demo needs to know about its scene is fixed at compile time:
//! the grid dimensions, the camera placement, the light setup and the assets.
//! [`GridConfig`] bundles the values that describe the instance grid so they
//! can be passed around (and overridden in tests) as one unit.

use cgmath::{Deg, Vector3};

/// Number of mesh instances along the X axis.
pub const OBJECTS_X: u32 = 10;
/// Number of mesh instances along the Z axis.
pub const OBJECTS_Z: u32 = 10;
/// Distance between two neighbouring instances.
pub const GRID_SPACING: f32 = 2.0;
/// Rotation applied to every instance around its local Y axis once per frame.
pub const ROTATION_STEP: Deg<f32> = Deg(0.5);
/// Triangles in one `Sphere128x64.obj` (128 slices, 64 stacks, collapsed poles).
pub const TRIANGLES_PER_MESH: u64 = 16128;

pub const MESH_FILE: &str = "Sphere128x64.obj";
pub const SPRITE_FILE: &str = "libgdx.png";
/// Bottom-left corner of the sprite in logical pixels, origin at the bottom-left of the window.
pub const SPRITE_POSITION: [f32; 2] = [140.0, 210.0];

pub const CLEAR_COLOUR: wgpu::Color = wgpu::Color {
    r: 0.15,
    g: 0.15,
    b: 0.2,
    a: 1.0,
};

/// Vertical field of view.
pub const FIELD_OF_VIEW: Deg<f32> = Deg(67.0);
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;
/// The camera sits on this ray from the origin.
pub const CAMERA_DIRECTION: [f32; 3] = [5.0, 5.0, 2.0];
pub const CAMERA_DISTANCE_FACTOR: f32 = 1.5;

pub const AMBIENT_LIGHT: [f32; 3] = [0.4, 0.4, 0.4];
pub const LIGHT_COLOUR: [f32; 3] = [0.8, 0.8, 0.8];
pub const LIGHT_DIRECTION: [f32; 3] = [-1.0, -0.8, -0.2];

pub const FONT_SIZE: f32 = 15.0;
pub const LINE_HEIGHT: f32 = 18.0;
/// Left margin of the overlay text in logical pixels.
pub const TEXT_MARGIN: f32 = 10.0;

pub const WINDOW_TITLE: &str = "Sphere Grid";
pub const WINDOW_SIZE: [u32; 2] = [640, 480];

/// Overrides the directory assets are loaded from.
pub const ASSET_DIR_ENV: &str = "SPHERE_GRID_ASSETS";

/// Dimensions and animation of the instance grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    pub objects_x: u32,
    pub objects_z: u32,
    pub spacing: f32,
    pub rotation_step: Deg<f32>,
    pub triangles_per_mesh: u64,
}

impl GridConfig {
    pub fn new(objects_x: u32, objects_z: u32) -> Self {
        Self {
            objects_x,
            objects_z,
            ..Default::default()
        }
    }

    pub fn instance_count(&self) -> usize {
        self.objects_x as usize * self.objects_z as usize
    }

    /// Translation of the instance at grid cell `(x, z)`.
    ///
    /// The grid is centred on the origin using the same half-extent for every
    /// cell, so for even dimensions the cell at index `X / 2` sits on the axis.
    pub fn offset(&self, x: u32, z: u32) -> Vector3<f32> {
        Vector3::new(
            (x as f32 - self.objects_x as f32 * 0.5) * self.spacing,
            0.0,
            (z as f32 - self.objects_z as f32 * 0.5) * self.spacing,
        )
    }

    /// Triangles submitted per frame for the whole grid.
    pub fn triangle_count(&self) -> u64 {
        self.triangles_per_mesh * self.objects_x as u64 * self.objects_z as u64
    }

    /// Distance between the camera and the origin so the whole grid stays in view.
    ///
    /// Uses `max(X, Z)` on purpose, not `max(X, X)`, so deep grids (`Z > X`)
    /// stay in view as well.
    pub fn camera_distance(&self) -> f32 {
        self.objects_x.max(self.objects_z) as f32 * CAMERA_DISTANCE_FACTOR
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            objects_x: OBJECTS_X,
            objects_z: OBJECTS_Z,
            spacing: GRID_SPACING,
            rotation_step: ROTATION_STEP,
            triangles_per_mesh: TRIANGLES_PER_MESH,
        }
    }
}

/// Directory that native builds read assets from.
///
/// Resolution order: the `SPHERE_GRID_ASSETS` environment variable, `./assets`
/// relative to the working directory, then the copy `build.rs` placed next to
/// the build output.
#[cfg(not(target_arch = "wasm32"))]
pub fn asset_dir() -> std::path::PathBuf {
    use std::path::PathBuf;

    if let Some(dir) = std::env::var_os(ASSET_DIR_ENV) {
        return PathBuf::from(dir);
    }
    let local = std::path::Path::new("./").join("assets");
    if local.exists() {
        return local;
    }
    match option_env!("SPHERE_GRID_BUNDLED_ASSETS") {
        Some(bundled) => PathBuf::from(bundled),
        None => local,
    }
}
