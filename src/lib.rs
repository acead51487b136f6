//! sphere-grid
//!
//! A grid of instanced, spinning spheres rendered with wgpu, with a sprite and
//! an FPS / triangle counter drawn on top. The crate runs natively and in the
//! browser (WebGL) and is built around a small flow-based engine that can host
//! other scenes as well.
//!
//! High-level modules
//! - `camera`: camera, projection and the uniform the shaders read them from
//! - `config`: grid dimensions, scene constants and asset lookup
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: engine data models (meshes, instances, textures, sprites)
//! - `demo`: the sphere grid flow
//! - `flow`: high level flow control (scenes / update loops)
//! - `fps`: frames per second counter
//! - `pipelines`: definitions for the render pipelines (basic, gui) and lighting
//! - `resources`: helpers to load textures/models and create GPU resources
//! - `render`: render composition for efficient pipeline reuse
//! - `text`: overlay text (feature `ui`)
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod demo;
pub mod flow;
pub mod fps;
pub mod pipelines;
pub mod render;
pub mod resources;
#[cfg(feature = "ui")]
pub mod text;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::event::WindowEvent;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), JsValue> {
    use crate::{config::GridConfig, demo::{DemoState, SphereGrid}};

    flow::run::<DemoState>(vec![SphereGrid::constructor(GridConfig::default())])
        .map_err(|e| JsValue::from_str(&format!("{e:#}")))
}
