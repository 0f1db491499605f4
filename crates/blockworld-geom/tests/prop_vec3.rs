use blockworld_geom::{Aabb, Vec3};
use proptest::num::f32::NORMAL;
use proptest::prelude::*;
use proptest::strategy::Strategy;

fn approx_abs_rel(a: f32, b: f32, atol: f32, rtol: f32) -> bool {
    let diff = (a - b).abs();
    let scale = a.abs().max(b.abs());
    diff <= atol + rtol * scale
}

fn vapprox_abs_rel(a: Vec3, b: Vec3, atol: f32, rtol: f32) -> bool {
    approx_abs_rel(a.x, b.x, atol, rtol)
        && approx_abs_rel(a.y, b.y, atol, rtol)
        && approx_abs_rel(a.z, b.z, atol, rtol)
}

fn small_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded", |v| v.is_finite() && v.abs() <= 1e3)
}

fn small_vec3() -> impl Strategy<Value = Vec3> {
    (small_f32(), small_f32(), small_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn yaw() -> impl Strategy<Value = f32> {
    -10.0f32..10.0
}

proptest! {
    // Rotating into the yaw frame and back is the identity
    #[test]
    fn local_world_round_trip(v in small_vec3(), y in yaw()) {
        let back = v.local_to_world(y).world_to_local(y);
        prop_assert!(vapprox_abs_rel(back, v, 1e-3, 1e-4));
    }

    // Yaw rotation preserves length and the vertical component
    #[test]
    fn yaw_rotation_preserves_length(v in small_vec3(), y in yaw()) {
        let w = v.local_to_world(y);
        prop_assert!(approx_abs_rel(w.length(), v.length(), 1e-3, 1e-4));
        prop_assert_eq!(w.y, v.y);
    }

    // The closest point always lies inside the box and is never farther than the point itself
    #[test]
    fn closest_point_is_inside(p in small_vec3(), bx in -50i32..50, by in -50i32..50, bz in -50i32..50) {
        let b = Aabb::unit_block(bx, by, bz);
        let c = b.closest_point(p);
        prop_assert!(b.contains(c));
        if b.contains(p) {
            prop_assert_eq!(c, p);
        }
    }
}
