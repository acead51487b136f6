//! Render composition and pipeline batching.
//!
//! Flows describe what they want drawn each frame with a [`Render`] value. The
//! engine flattens all of them into [`Batches`] so every pipeline is bound once:
//! first the instanced 3D models, then (in the overlay pass) flat quads and
//! text labels.
//!
//! # Key types
//!
//! - [`Render<'a>`] is the primary enum describing render operations
//! - [`Instanced<'a>`] contains data for instanced rendering (model + instance buffer)
//! - [`Flat<'a>`] contains data for flat (2D) rendering (vertex + index buffers)
//! - [`Label<'a>`] is a line of overlay text
//!

use crate::data_structures::model::Model;

/// Data for instanced object rendering: a model, and its instance buffer.
#[derive(Clone)]
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub model: &'a Model,
    pub amount: usize,
}

/// Data for flat (2D) rendering: vertex and index buffers with a texture bind group.
#[derive(Clone)]
pub struct Flat<'a> {
    pub vertex: &'a wgpu::Buffer,
    pub index: &'a wgpu::Buffer,
    pub group: &'a wgpu::BindGroup,
    pub amount: usize,
}

/// A line of text drawn in the overlay pass.
///
/// `left` and `top` are logical pixels from the top-left corner of the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Label<'a> {
    pub text: &'a str,
    pub left: f32,
    pub top: f32,
}

/// Specifies how a flow's objects should be rendered.
///
/// # Variants
///
/// - `None` renders nothing
/// - `Default(Instanced)` renders a single opaque instanced object
/// - `Defaults(Vec<Instanced>)` renders a batch of opaque instanced objects
/// - `GUI(Flat)` renders a 2D quad on top of the scene
/// - `Text(Label)` renders a line of text on top of the scene
/// - `Composed(Vec<Render>)` recursively renders composition of multiple renders
///
pub enum Render<'a> {
    None,
    Default(Instanced<'a>),
    Defaults(Vec<Instanced<'a>>),
    GUI(Flat<'a>),
    Text(Label<'a>),
    Composed(Vec<Render<'a>>),
}

/// Everything submitted for one frame, grouped by pipeline.
#[derive(Default)]
pub struct Batches<'a> {
    pub basics: Vec<Instanced<'a>>,
    pub guis: Vec<Flat<'a>>,
    pub labels: Vec<Label<'a>>,
}

impl<'a> Batches<'a> {
    pub fn is_empty(&self) -> bool {
        self.basics.is_empty() && self.guis.is_empty() && self.labels.is_empty()
    }
}

impl<'a> Render<'a> {
    /// Sort this render tree into `batches`, keeping submission order within each batch.
    pub fn set_pipelines(self, batches: &mut Batches<'a>) {
        match self {
            Render::Default(instanced) => batches.basics.push(instanced),
            Render::Defaults(mut vec) => batches.basics.append(&mut vec),
            Render::GUI(flat) => batches.guis.push(flat),
            Render::Text(label) => batches.labels.push(label),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(batches)),
            Render::None => (),
        }
    }
}
