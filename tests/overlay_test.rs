use approx::assert_relative_eq;
use instant::{Duration, Instant};
use sphere_grid::{
    config,
    data_structures::sprite::{QUAD_INDICES, logical_screen, quad_vertices},
    demo::{label_top, overlay_lines},
    fps::FpsCounter,
};

#[test]
fn sprite_quad_is_placed_from_the_bottom_left() {
    let quad = quad_vertices(config::SPRITE_POSITION, [128.0, 128.0], [640.0, 480.0]);

    let expected = [
        [-0.5625, -0.125],
        [-0.1625, -0.125],
        [-0.1625, 0.408_333],
        [-0.5625, 0.408_333],
    ];
    for (vertex, [x, y]) in quad.iter().zip(expected) {
        assert_relative_eq!(vertex.position[0], x, epsilon = 1e-5);
        assert_relative_eq!(vertex.position[1], y, epsilon = 1e-5);
        assert_eq!(vertex.position[2], 0.0);
    }

    assert_eq!(quad[0].tex_coords, [0.0, 1.0]);
    assert_eq!(quad[1].tex_coords, [1.0, 1.0]);
    assert_eq!(quad[2].tex_coords, [1.0, 0.0]);
    assert_eq!(quad[3].tex_coords, [0.0, 0.0]);
}

#[test]
fn sprite_keeps_its_logical_size_on_high_dpi_screens() {
    let size = [128.0, 128.0];
    let standard = quad_vertices(config::SPRITE_POSITION, size, logical_screen([640, 480], 1.0));
    let retina = quad_vertices(config::SPRITE_POSITION, size, logical_screen([1280, 960], 2.0));

    for (a, b) in standard.iter().zip(retina.iter()) {
        assert_relative_eq!(a.position[0], b.position[0], epsilon = 1e-6);
        assert_relative_eq!(a.position[1], b.position[1], epsilon = 1e-6);
    }
    assert_relative_eq!(retina[1].position[0] - retina[0].position[0], 0.4, epsilon = 1e-6);
}

#[test]
fn logical_screen_divides_by_the_scale_factor() {
    assert_eq!(logical_screen([1280, 960], 2.0), [640.0, 480.0]);
    assert_eq!(logical_screen([960, 720], 1.5), [640.0, 480.0]);
    assert_eq!(logical_screen([0, 0], 1.0), [1.0, 1.0]);
    assert_eq!(logical_screen([640, 480], 0.0), [640.0, 480.0]);
}

#[test]
fn sprite_quad_winds_counter_clockwise() {
    let quad = quad_vertices([0.0, 0.0], [10.0, 10.0], [100.0, 100.0]);
    for triangle in QUAD_INDICES.chunks(3) {
        let [a, b, c] = [0, 1, 2].map(|i| quad[triangle[i] as usize].position);
        let signed_area = (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]);
        assert!(signed_area > 0.0);
    }
}

#[test]
fn full_screen_quad_covers_ndc() {
    let quad = quad_vertices([0.0, 0.0], [800.0, 600.0], [800.0, 600.0]);
    assert_eq!(quad[0].position, [-1.0, -1.0, 0.0]);
    assert_eq!(quad[2].position, [1.0, 1.0, 0.0]);
}

#[test]
fn overlay_shows_fps_and_triangles() {
    assert_eq!(
        overlay_lines(60, 1_612_800),
        ["FPS: 60".to_string(), "triangles count: 1612800".to_string()]
    );
    assert_eq!(overlay_lines(0, 0), ["FPS: 0".to_string(), "triangles count: 0".to_string()]);
}

#[test]
fn overlay_lines_are_stacked_from_the_top() {
    assert_relative_eq!(label_top(1), config::LINE_HEIGHT);
    assert_relative_eq!(label_top(2), 2.0 * config::LINE_HEIGHT);
    assert!(label_top(2) - label_top(1) >= config::FONT_SIZE);
}

#[test]
fn fps_is_zero_during_the_first_second() {
    let start = Instant::now();
    let mut fps = FpsCounter::starting_at(start);
    for frame in 1..=30 {
        fps.tick_at(start + Duration::from_millis(frame * 20));
    }
    assert_eq!(fps.frames_per_second(), 0);
}

#[test]
fn fps_is_published_once_per_second() {
    let start = Instant::now();
    let mut fps = FpsCounter::starting_at(start);

    for frame in 1..60 {
        fps.tick_at(start + Duration::from_millis(frame * 16));
    }
    fps.tick_at(start + Duration::from_millis(1000));
    assert_eq!(fps.frames_per_second(), 60);

    // a slower second does not show up until it is over
    for frame in 1..30 {
        fps.tick_at(start + Duration::from_millis(1000 + frame * 33));
    }
    assert_eq!(fps.frames_per_second(), 60);
    fps.tick_at(start + Duration::from_millis(2000));
    assert_eq!(fps.frames_per_second(), 30);
}

#[test]
fn new_counter_starts_at_zero() {
    assert_eq!(FpsCounter::new().frames_per_second(), 0);
    assert_eq!(FpsCounter::default().frames_per_second(), 0);
}
