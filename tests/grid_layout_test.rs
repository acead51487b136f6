use approx::assert_relative_eq;
use sphere_grid::{
    config::{self, GridConfig},
    data_structures::{
        grid::{layout, rotate_instances},
        instance::Instance,
    },
    demo::check_triangle_count,
    Deg, Quaternion, Rotation3, Vector3,
};

fn assert_vec_eq(actual: Vector3<f32>, expected: [f32; 3]) {
    assert_relative_eq!(actual.x, expected[0], epsilon = 1e-5);
    assert_relative_eq!(actual.y, expected[1], epsilon = 1e-5);
    assert_relative_eq!(actual.z, expected[2], epsilon = 1e-5);
}

fn assert_quat_eq(actual: Quaternion<f32>, expected: Quaternion<f32>) {
    // q and -q describe the same rotation
    let sign = if actual.s * expected.s < 0.0 { -1.0 } else { 1.0 };
    assert_relative_eq!(actual.s, sign * expected.s, epsilon = 1e-4);
    assert_relative_eq!(actual.v.x, sign * expected.v.x, epsilon = 1e-4);
    assert_relative_eq!(actual.v.y, sign * expected.v.y, epsilon = 1e-4);
    assert_relative_eq!(actual.v.z, sign * expected.v.z, epsilon = 1e-4);
}

#[test]
fn default_grid_has_one_hundred_instances() {
    let config = GridConfig::default();
    assert_eq!(config.objects_x, config::OBJECTS_X);
    assert_eq!(config.objects_z, config::OBJECTS_Z);
    assert_eq!(config.instance_count(), 100);
    assert_eq!(layout(&config).len(), 100);
}

#[test]
fn grid_is_laid_out_row_by_row_around_the_origin() {
    let instances = layout(&GridConfig::default());

    assert_vec_eq(instances[0].position, [-10.0, 0.0, -10.0]);
    // x is the inner loop
    assert_vec_eq(instances[1].position, [-8.0, 0.0, -10.0]);
    assert_vec_eq(instances[9].position, [8.0, 0.0, -10.0]);
    assert_vec_eq(instances[10].position, [-10.0, 0.0, -8.0]);
    assert_vec_eq(instances[55].position, [0.0, 0.0, 0.0]);
    assert_vec_eq(instances[99].position, [8.0, 0.0, 8.0]);

    for instance in &instances {
        assert_eq!(instance.rotation, Quaternion::new(1.0, 0.0, 0.0, 0.0));
        assert_vec_eq(instance.scale, [1.0, 1.0, 1.0]);
    }
}

#[test]
fn odd_grids_use_the_same_half_extent() {
    let config = GridConfig::new(3, 1);
    let instances = layout(&config);
    assert_eq!(instances.len(), 3);
    assert_vec_eq(instances[0].position, [-3.0, 0.0, -1.0]);
    assert_vec_eq(instances[1].position, [-1.0, 0.0, -1.0]);
    assert_vec_eq(instances[2].position, [1.0, 0.0, -1.0]);
}

#[test]
fn empty_grid_has_no_instances() {
    let config = GridConfig::new(0, 10);
    assert!(layout(&config).is_empty());
    assert_eq!(config.triangle_count(), 0);
}

#[test]
fn rotation_accumulates_per_frame_around_local_y() {
    let mut instances = layout(&GridConfig::new(2, 2));
    let positions: Vec<_> = instances.iter().map(|i| i.position).collect();

    for _ in 0..4 {
        rotate_instances(&mut instances, config::ROTATION_STEP);
    }

    let expected = Quaternion::from_angle_y(Deg(2.0));
    for (instance, position) in instances.iter().zip(positions) {
        assert_quat_eq(instance.rotation, expected);
        // spinning in place never moves the sphere
        assert_eq!(instance.position, position);
    }
}

#[test]
fn a_full_turn_takes_seven_hundred_twenty_frames() {
    let mut instances = vec![Instance::from(Vector3::new(4.0, 0.0, -2.0))];
    for _ in 0..720 {
        rotate_instances(&mut instances, config::ROTATION_STEP);
    }
    assert_quat_eq(instances[0].rotation, Quaternion::new(1.0, 0.0, 0.0, 0.0));
}

#[test]
fn raw_instance_keeps_the_grid_offset_as_translation() {
    let mut instance = Instance::from(Vector3::new(-10.0, 0.0, 6.0));
    instance.rotate(Vector3::unit_y(), Deg(90.0));
    let model = instance.to_raw().model();

    assert_relative_eq!(model.w.x, -10.0, epsilon = 1e-5);
    assert_relative_eq!(model.w.y, 0.0, epsilon = 1e-5);
    assert_relative_eq!(model.w.z, 6.0, epsilon = 1e-5);
    assert_relative_eq!(model.w.w, 1.0, epsilon = 1e-5);
    // local +X turns into world -Z after a quarter turn around Y
    assert_relative_eq!(model.x.z, -1.0, epsilon = 1e-5);
}

#[test]
fn triangle_count_scales_with_the_grid() {
    assert_eq!(GridConfig::default().triangle_count(), 1_612_800);
    assert_eq!(GridConfig::new(3, 2).triangle_count(), 16128 * 6);
    assert_eq!(GridConfig::new(1, 1).triangle_count(), config::TRIANGLES_PER_MESH);
}

#[test]
fn mismatched_mesh_triangle_counts_are_reported() {
    assert!(check_triangle_count(config::MESH_FILE, 16128, config::TRIANGLES_PER_MESH));
    assert!(!check_triangle_count(config::MESH_FILE, 2, config::TRIANGLES_PER_MESH));
    assert!(!check_triangle_count("cube.obj", 12, 0));
}

#[test]
fn camera_distance_follows_the_larger_dimension() {
    assert_relative_eq!(GridConfig::default().camera_distance(), 15.0);
    assert_relative_eq!(GridConfig::new(4, 10).camera_distance(), 15.0);
    assert_relative_eq!(GridConfig::new(20, 4).camera_distance(), 30.0);
    // Only the depth of the grid grows, the camera still moves back.
    assert_relative_eq!(GridConfig::new(2, 30).camera_distance(), 45.0);
}
