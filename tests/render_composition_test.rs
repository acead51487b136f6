use sphere_grid::render::{Batches, Label, Render};

fn label(text: &str, top: f32) -> Label<'_> {
    Label {
        text,
        left: 10.0,
        top,
    }
}

#[test]
fn nothing_to_render_gives_empty_batches() {
    let mut batches = Batches::default();
    Render::None.set_pipelines(&mut batches);
    Render::Composed(vec![]).set_pipelines(&mut batches);
    assert!(batches.is_empty());
}

#[test]
fn nested_compositions_are_flattened_in_submission_order() {
    let render = Render::Composed(vec![
        Render::Text(label("first", 18.0)),
        Render::None,
        Render::Composed(vec![
            Render::Text(label("second", 36.0)),
            Render::Composed(vec![Render::Text(label("third", 54.0))]),
        ]),
        Render::Text(label("fourth", 72.0)),
    ]);

    let mut batches = Batches::default();
    render.set_pipelines(&mut batches);

    let texts: Vec<_> = batches.labels.iter().map(|l| l.text).collect();
    assert_eq!(texts, ["first", "second", "third", "fourth"]);
    assert!(batches.basics.is_empty());
    assert!(batches.guis.is_empty());
    assert!(!batches.is_empty());
}

#[test]
fn renders_of_several_flows_share_one_batch() {
    let fps = String::from("FPS: 60");
    let triangles = String::from("triangles count: 1612800");

    let mut batches = Batches::default();
    for render in [
        Render::Text(label(&fps, 18.0)),
        Render::Text(label(&triangles, 36.0)),
    ] {
        render.set_pipelines(&mut batches);
    }

    assert_eq!(batches.labels, vec![label(&fps, 18.0), label(&triangles, 36.0)]);
}
