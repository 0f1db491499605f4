use std::collections::HashSet;

use blockworld_blocks::{Block, BlockType};
use blockworld_geom::Vec3;
use blockworld_physics::{Body, BodyInput, Physics};

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn sampler(solid: HashSet<(i32, i32, i32)>) -> impl Fn(i32, i32, i32) -> Option<Block> {
    move |x, y, z| {
        Some(if solid.contains(&(x, y, z)) {
            Block::of(BlockType::Stone)
        } else {
            Block::EMPTY
        })
    }
}

fn floor(r: i32) -> HashSet<(i32, i32, i32)> {
    let mut s = HashSet::new();
    for x in -r..=r {
        for z in -r..=r {
            s.insert((x, 0, z));
        }
    }
    s
}

#[test]
fn body_resting_in_block_is_pushed_up_and_grounded() {
    let sample = sampler([(0, 0, 0)].into_iter().collect());
    let mut physics = Physics::new();
    let mut body = Body::new(Vec3::new(0.0, 0.4, 0.0));
    let steps = physics.update(physics.step_size(), &mut body, BodyInput::default(), &sample);
    assert_eq!(steps, 1);
    // Block top is at y = 0.5
    assert!(body.position.y >= 0.5 - 1e-5, "y = {}", body.position.y);
    assert!(body.on_ground);
    assert!(approx_eq(body.velocity.y, 0.0, 1e-5));
}

#[test]
fn falling_body_lands_on_floor() {
    let sample = sampler(floor(2));
    let mut physics = Physics::new();
    let mut body = Body::new(Vec3::new(0.2, 3.0, -0.3));
    for _ in 0..120 {
        physics.update(1.0 / 60.0, &mut body, BodyInput::default(), &sample);
    }
    assert!(body.on_ground);
    assert!(approx_eq(body.position.y, 0.5, 1e-3), "y = {}", body.position.y);
    assert!(approx_eq(body.position.x, 0.2, 1e-4));
    assert!(approx_eq(body.position.z, -0.3, 1e-4));
}

#[test]
fn airborne_body_is_not_grounded() {
    let sample = sampler(HashSet::new());
    let mut physics = Physics::new();
    let mut body = Body::new(Vec3::new(0.0, 10.0, 0.0));
    body.on_ground = true;
    physics.update(0.05, &mut body, BodyInput::default(), &sample);
    assert!(!body.on_ground);
    assert!(body.position.y < 10.0);
    assert!(body.velocity.y < 0.0);
}

#[test]
fn unknown_cells_do_not_collide() {
    let sample = |_: i32, _: i32, _: i32| -> Option<Block> { None };
    let mut physics = Physics::new();
    let mut body = Body::new(Vec3::new(0.0, 0.4, 0.0));
    physics.update(0.1, &mut body, BodyInput::default(), &sample);
    assert!(body.position.y < 0.4);
    assert!(!body.on_ground);
}

#[test]
fn wall_stops_horizontal_motion() {
    let mut solid = floor(3);
    solid.insert((1, 1, 0));
    solid.insert((1, 2, 0));
    let sample = sampler(solid);
    let mut physics = Physics::new();
    let mut body = Body::new(Vec3::new(-1.0, 0.5, 0.0));
    let walk = BodyInput {
        right: 1.0,
        ..Default::default()
    };
    for _ in 0..60 {
        physics.update(1.0 / 60.0, &mut body, walk, &sample);
    }
    // Wall face at x = 0.5, radius 0.5
    assert!(body.position.x <= 1e-3, "x = {}", body.position.x);
    assert!(body.position.x > -0.1);
    assert!(approx_eq(body.position.y, 0.5, 1e-3));
    assert!(approx_eq(body.position.z, 0.0, 1e-3));
    assert!(body.on_ground);
}

#[test]
fn jump_leaves_the_ground() {
    let sample = sampler(floor(2));
    let mut physics = Physics::new();
    let mut body = Body::new(Vec3::new(0.0, 0.5, 0.0));
    physics.update(0.02, &mut body, BodyInput::default(), &sample);
    assert!(body.on_ground);
    let jump = BodyInput {
        jump: true,
        ..Default::default()
    };
    physics.update(0.1, &mut body, jump, &sample);
    assert!(body.position.y > 1.0, "y = {}", body.position.y);
    assert!(!body.on_ground);
}

#[test]
fn steps_do_not_depend_on_frame_split() {
    let step = 1.0 / 128.0;
    let sample = sampler(floor(2));
    let mut a = Physics::with_step(step);
    let mut b = Physics::with_step(step);
    let mut body_a = Body::new(Vec3::new(0.0, 4.0, 0.0));
    let mut body_b = body_a.clone();
    let walk = BodyInput {
        forward: 1.0,
        right: 0.5,
        jump: false,
    };
    for _ in 0..32 {
        a.update(step * 2.0, &mut body_a, walk, &sample);
    }
    b.update(step * 64.0, &mut body_b, walk, &sample);
    assert_eq!(a.total_steps(), 64);
    assert_eq!(b.total_steps(), 64);
    assert_eq!(body_a, body_b);
}

#[test]
fn leftover_time_carries_over() {
    let step = 1.0 / 128.0;
    let sample = sampler(HashSet::new());
    let mut physics = Physics::with_step(step);
    let mut body = Body::new(Vec3::ZERO);
    assert_eq!(physics.update(step * 2.5, &mut body, BodyInput::default(), &sample), 2);
    assert!(approx_eq(physics.accumulator(), step * 0.5, 1e-7));
    assert_eq!(physics.update(step * 0.5, &mut body, BodyInput::default(), &sample), 1);
}

#[test]
fn center_inside_block_is_not_pushed_down() {
    let sample = sampler([(0, 1, 0)].into_iter().collect());
    let mut body = Body::new(Vec3::ZERO);
    let candidates = Physics::broad_phase(&body, &sample);
    assert!(candidates.contains(&(0, 1, 0)));
    let contacts = Physics::narrow_phase(&mut body, &candidates);
    assert!(contacts.is_empty());
    Physics::resolve(&mut body, contacts);
    assert_eq!(body.position, Vec3::ZERO);
    assert!(!body.on_ground);
}

#[test]
fn narrow_phase_grounds_only_on_upward_normals() {
    let floor_sample = sampler([(0, 0, 0)].into_iter().collect());
    let mut body = Body::new(Vec3::new(0.0, 0.4, 0.0));
    let candidates = Physics::broad_phase(&body, &floor_sample);
    let contacts = Physics::narrow_phase(&mut body, &candidates);
    assert_eq!(contacts.len(), 1);
    assert!(contacts[0].normal.y > 0.0);
    assert!(body.on_ground);

    // Head in the block above
    let ceiling_sample = sampler([(0, 2, 0)].into_iter().collect());
    let mut body = Body::new(Vec3::new(0.0, 0.0, 0.0));
    body.on_ground = true;
    let candidates = Physics::broad_phase(&body, &ceiling_sample);
    let contacts = Physics::narrow_phase(&mut body, &candidates);
    assert_eq!(contacts.len(), 1);
    assert!(contacts[0].normal.y < 0.0);
    assert!(!body.on_ground);
}
