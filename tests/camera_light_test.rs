use approx::assert_relative_eq;
use sphere_grid::{
    camera::{Camera, CameraUniform, Projection},
    config::{self, GridConfig},
    pipelines::light::{DirectionalLight, Environment, LightUniform},
    EuclideanSpace, InnerSpace, Matrix4, Point3, Vector3, Vector4,
};

fn clip_depth(projection: &Projection, distance: f32) -> f32 {
    let clip = projection.calc_matrix() * Vector4::new(0.0, 0.0, -distance, 1.0);
    clip.z / clip.w
}

#[test]
fn default_camera_frames_the_grid_from_above() {
    let camera = Camera::framing(&GridConfig::default());
    let offset = camera.position.to_vec();

    assert_relative_eq!(offset.magnitude(), 15.0, epsilon = 1e-4);
    let expected = Vector3::from(config::CAMERA_DIRECTION).normalize();
    let actual = offset.normalize();
    assert_relative_eq!(actual.x, expected.x, epsilon = 1e-5);
    assert_relative_eq!(actual.y, expected.y, epsilon = 1e-5);
    assert_relative_eq!(actual.z, expected.z, epsilon = 1e-5);

    assert_eq!(camera.target, Point3::origin());
    assert_eq!(camera.up, Vector3::unit_y());
    assert!(camera.direction().y < 0.0);
}

#[test]
fn wide_grids_move_the_camera_further_away() {
    let camera = Camera::framing(&GridConfig::new(20, 4));
    assert_relative_eq!(camera.position.to_vec().magnitude(), 30.0, epsilon = 1e-4);
}

#[test]
fn projection_maps_near_and_far_to_wgpu_depth() {
    let projection = Projection::default();
    assert_relative_eq!(clip_depth(&projection, config::Z_NEAR), 0.0, epsilon = 1e-4);
    assert_relative_eq!(clip_depth(&projection, config::Z_FAR), 1.0, epsilon = 1e-4);
    assert!(clip_depth(&projection, 10.0) > 0.0 && clip_depth(&projection, 10.0) < 1.0);
}

#[test]
fn projection_follows_the_window_aspect() {
    let mut projection = Projection::default();
    assert_relative_eq!(projection.aspect(), 640.0 / 480.0);

    projection.resize(1920, 1080);
    assert_relative_eq!(projection.aspect(), 1920.0 / 1080.0);

    // minimized windows report a zero height
    projection.resize(800, 0);
    assert!(projection.aspect().is_finite());
}

#[test]
fn uniform_combines_view_and_projection() {
    let camera = Camera::framing(&GridConfig::default());
    let projection = Projection::default();

    let mut uniform = CameraUniform::new();
    uniform.update_view_proj(&camera, &projection);

    let expected: Matrix4<f32> = projection.calc_matrix() * camera.calc_matrix();
    let actual = uniform.view_proj();
    for col in 0..4 {
        for row in 0..4 {
            assert_relative_eq!(actual[col][row], expected[col][row], epsilon = 1e-6);
        }
    }

    // the origin is in front of the camera and inside the depth range
    let origin = actual * Vector4::new(0.0, 0.0, 0.0, 1.0);
    let depth = origin.z / origin.w;
    assert!(depth > 0.0 && depth < 1.0);
}

#[test]
fn default_environment_matches_the_scene_lighting() {
    let uniform = LightUniform::from(&Environment::default());

    assert_eq!(uniform.ambient(), [0.4, 0.4, 0.4]);
    assert_eq!(uniform.colour(), [0.8, 0.8, 0.8]);

    let direction = uniform.direction();
    assert_relative_eq!(direction.magnitude(), 1.0, epsilon = 1e-6);
    let expected = Vector3::from(config::LIGHT_DIRECTION).normalize();
    assert_relative_eq!(direction.x, expected.x, epsilon = 1e-6);
    assert_relative_eq!(direction.y, expected.y, epsilon = 1e-6);
    assert_relative_eq!(direction.z, expected.z, epsilon = 1e-6);
}

#[test]
fn directionless_light_points_down() {
    let environment = Environment {
        ambient: [0.0; 3],
        directional: DirectionalLight {
            colour: [1.0; 3],
            direction: Vector3::new(0.0, 0.0, 0.0),
        },
    };
    let direction = LightUniform::from(&environment).direction();
    assert_eq!(direction, Vector3::new(0.0, -1.0, 0.0));
}
