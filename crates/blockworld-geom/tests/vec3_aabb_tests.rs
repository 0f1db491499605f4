use blockworld_geom::{Aabb, Vec3};

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn vec3_approx_eq(a: Vec3, b: Vec3, eps: f32) -> bool {
    approx_eq(a.x, b.x, eps) && approx_eq(a.y, b.y, eps) && approx_eq(a.z, b.z, eps)
}

#[test]
fn vec3_add_sub_neg() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(-4.0, 5.0, -6.0);
    let c = a + b;
    assert!(vec3_approx_eq(c, Vec3::new(-3.0, 7.0, -3.0), 1e-6));
    assert!(vec3_approx_eq(c - a, b, 1e-6));
    assert!(vec3_approx_eq(-a, Vec3::new(-1.0, -2.0, -3.0), 1e-6));
}

#[test]
fn vec3_dot_length_normalized() {
    let v = Vec3::new(3.0, 4.0, 0.0);
    assert!(approx_eq(v.dot(v), 25.0, 1e-6));
    assert!(approx_eq(v.length(), 5.0, 1e-6));
    assert!(approx_eq(v.length_xz(), 3.0, 1e-6));
    let n = v.normalized();
    assert!(vec3_approx_eq(n, Vec3::new(0.6, 0.8, 0.0), 1e-6));
    // Zero vector normalization stays zero instead of producing NaN
    assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
}

#[test]
fn yaw_zero_faces_negative_z() {
    assert!(vec3_approx_eq(Vec3::forward_from_yaw(0.0), Vec3::new(0.0, 0.0, -1.0), 1e-6));
    assert!(vec3_approx_eq(Vec3::right_from_yaw(0.0), Vec3::new(1.0, 0.0, 0.0), 1e-6));
    let quarter = std::f32::consts::FRAC_PI_2;
    assert!(vec3_approx_eq(Vec3::forward_from_yaw(quarter), Vec3::new(-1.0, 0.0, 0.0), 1e-6));
}

#[test]
fn unit_block_is_centered_on_integer_coords() {
    let b = Aabb::unit_block(2, -1, 0);
    assert!(vec3_approx_eq(b.min, Vec3::new(1.5, -1.5, -0.5), 1e-6));
    assert!(vec3_approx_eq(b.max, Vec3::new(2.5, -0.5, 0.5), 1e-6));
    assert!(b.contains(Vec3::new(2.0, -1.0, 0.0)));
    assert!(!b.contains(Vec3::new(3.0, -1.0, 0.0)));
}

#[test]
fn closest_point_clamps_each_axis() {
    let b = Aabb::unit_block(0, 0, 0);
    let p = b.closest_point(Vec3::new(0.2, 3.0, -4.0));
    assert!(vec3_approx_eq(p, Vec3::new(0.2, 0.5, -0.5), 1e-6));
    let inside = Vec3::new(0.1, -0.1, 0.3);
    assert_eq!(b.closest_point(inside), inside);
}

#[test]
fn block_coord_rounds_to_cell_center() {
    use blockworld_geom::block_coord;
    assert_eq!(block_coord(0.0), 0);
    assert_eq!(block_coord(0.49), 0);
    assert_eq!(block_coord(0.5), 1);
    assert_eq!(block_coord(-0.5), 0);
    assert_eq!(block_coord(-0.51), -1);
    assert_eq!(block_coord(31.7), 32);
}
