//! Engine data structures: models, textures, instances and what is built from them.
//!
//! - `model` contains mesh and material definitions, GPU resources for 3D models
//! - `texture` contains GPU texture wrapper and creation utilities
//! - `instance` holds per-instance transformation data
//! - `grid` lays out instances of one shared model on a grid
//! - `sprite` is a textured quad placed in window pixel coordinates

pub mod grid;
pub mod instance;
pub mod model;
pub mod sprite;
pub mod texture;
