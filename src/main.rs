use sphere_grid::{
    config::GridConfig,
    demo::{DemoState, SphereGrid},
    flow,
};

fn main() -> anyhow::Result<()> {
    flow::run::<DemoState>(vec![SphereGrid::constructor(GridConfig::default())])
}
