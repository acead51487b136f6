#![cfg(feature = "integration-tests")]

use std::sync::atomic::{AtomicU64, Ordering};

use sphere_grid::{
    WindowEvent,
    config::GridConfig,
    context::Context,
    demo::{DemoState, SphereGrid},
    flow::{FlowConstructor, GraphicsFlow, Out},
    render::Render,
};

const FRAMES: u64 = 3;

static FRAMES_AT_DISPOSE: AtomicU64 = AtomicU64::new(0);

struct Stopper;

impl GraphicsFlow<DemoState> for Stopper {
    fn on_init(&mut self, _: &mut Context, _: &mut DemoState) -> Out<DemoState> {
        Out::Empty
    }

    fn on_update(&mut self, _: &Context, state: &mut DemoState, _: instant::Duration) -> Out<DemoState> {
        if state.frames == FRAMES {
            Out::Exit
        } else {
            Out::Empty
        }
    }

    fn on_window_events(&mut self, _: &Context, _: &mut DemoState, _: &WindowEvent) -> Out<DemoState> {
        Out::Empty
    }

    fn on_render(&self) -> Render<'_> {
        Render::None
    }

    fn on_dispose(self: Box<Self>, _: &Context, state: &mut DemoState) {
        FRAMES_AT_DISPOSE.store(state.frames, Ordering::SeqCst);
    }
}

#[test]
fn grid_without_columns_renders_only_the_overlay() {
    let stopper: FlowConstructor<DemoState> = Box::new(|_| {
        Box::pin(async move {
            let flow: Box<dyn GraphicsFlow<DemoState>> = Box::new(Stopper);
            Ok(flow)
        })
    });

    sphere_grid::flow::run(vec![SphereGrid::constructor(GridConfig::new(0, 3)), stopper])
        .expect("Failed to run an empty grid for integration test.");

    assert_eq!(FRAMES_AT_DISPOSE.load(Ordering::SeqCst), FRAMES);
}
