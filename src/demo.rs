//! The sphere grid demo: a grid of spinning, lit spheres with a sprite and an
//! FPS / triangle counter drawn on top.

use instant::Duration;
use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::{
    camera::Camera,
    config::{self, GridConfig},
    context::{Context, InitContext},
    data_structures::{grid::InstanceGrid, sprite::Sprite},
    flow::{FlowConstructor, GraphicsFlow, Out},
    pipelines::light::Environment,
    render::{Label, Render},
};

/// State shared by the demo's flows.
#[derive(Debug, Default)]
pub struct DemoState {
    pub frames: u64,
    pub disposed: u32,
}

pub struct SphereGrid {
    grid: InstanceGrid,
    sprite: Sprite,
    labels: [String; 2],
}

impl SphereGrid {
    pub async fn new(ctx: InitContext, config: GridConfig) -> anyhow::Result<Self> {
        let (grid, sprite) = futures::try_join!(
            InstanceGrid::load(&ctx, config, config::MESH_FILE),
            Sprite::load(&ctx, config::SPRITE_FILE, config::SPRITE_POSITION),
        )?;

        check_triangle_count(
            config::MESH_FILE,
            grid.model.triangle_count(),
            grid.config().triangles_per_mesh,
        );

        let labels = overlay_lines(0, grid.triangle_count());
        Ok(Self {
            grid,
            sprite,
            labels,
        })
    }

    pub fn constructor(config: GridConfig) -> FlowConstructor<DemoState> {
        Box::new(move |ctx| {
            Box::pin(async move {
                let flow: Box<dyn GraphicsFlow<DemoState>> =
                    Box::new(SphereGrid::new(ctx, config).await?);
                Ok(flow)
            })
        })
    }
}

impl GraphicsFlow<DemoState> for SphereGrid {
    fn on_init(&mut self, ctx: &mut Context, _: &mut DemoState) -> Out<DemoState> {
        ctx.clear_colour = config::CLEAR_COLOUR;
        ctx.set_camera(Camera::framing(self.grid.config()));
        ctx.set_environment(&Environment::default());
        let [width, height] = ctx.window_size();
        self.sprite.resize(&ctx.queue, width, height, ctx.scale_factor());
        log::info!(
            "Rendering {} spheres, {} triangles per frame",
            self.grid.instances.len(),
            self.grid.triangle_count()
        );
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, state: &mut DemoState, _: Duration) -> Out<DemoState> {
        state.frames += 1;
        let step = self.grid.config().rotation_step;
        self.grid.rotate(step);
        self.grid.write_to_buffer(&ctx.queue);

        let lines = overlay_lines(ctx.fps.frames_per_second(), self.grid.triangle_count());
        if lines != self.labels {
            self.labels = lines;
        }
        Out::Empty
    }

    fn on_window_events(
        &mut self,
        ctx: &Context,
        _: &mut DemoState,
        event: &WindowEvent,
    ) -> Out<DemoState> {
        match event {
            WindowEvent::Resized(size) => {
                self.sprite
                    .resize(&ctx.queue, size.width, size.height, ctx.scale_factor());
                Out::Empty
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let [width, height] = ctx.window_size();
                self.sprite.resize(&ctx.queue, width, height, *scale_factor);
                Out::Empty
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => Out::Exit,
            _ => Out::Empty,
        }
    }

    fn on_render(&self) -> Render<'_> {
        let [fps, triangles] = &self.labels;
        Render::Composed(vec![
            (&self.grid).into(),
            (&self.sprite).into(),
            Render::Text(Label {
                text: fps,
                left: config::TEXT_MARGIN,
                top: label_top(1),
            }),
            Render::Text(Label {
                text: triangles,
                left: config::TEXT_MARGIN,
                top: label_top(2),
            }),
        ])
    }

    fn on_dispose(self: Box<Self>, _: &Context, state: &mut DemoState) {
        self.grid.destroy();
        self.sprite.destroy();
        state.disposed += 1;
        log::info!("Sphere grid disposed after {} frames", state.frames);
    }
}

/// Warn when `mesh_file` does not have the triangle count the overlay reports.
///
/// Returns whether the counts agree.
pub fn check_triangle_count(mesh_file: &str, loaded: u64, expected: u64) -> bool {
    if loaded != expected {
        log::warn!(
            "{} has {} triangles, the overlay reports {} per mesh",
            mesh_file,
            loaded,
            expected
        );
        return false;
    }
    true
}

/// The two overlay lines: frames per second and triangles submitted per frame.
pub fn overlay_lines(fps: u32, triangles: u64) -> [String; 2] {
    [format!("FPS: {fps}"), format!("triangles count: {triangles}")]
}

/// Top edge in logical pixels of the `line`-th overlay line, counted from the top of the window.
pub fn label_top(line: usize) -> f32 {
    config::LINE_HEIGHT * line as f32
}
