use blockworld_blocks::Block;
use blockworld_geom::{Aabb, Vec3, block_coord};

use crate::{Body, BodyInput};

const HORIZONTAL_EPS: f32 = 1e-6;

/// One body/block intersection found by the narrow phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub block: (i32, i32, i32),
    /// Point on the block nearest to the body's axis.
    pub point: Vec3,
    /// Direction the body is pushed out along.
    pub normal: Vec3,
    pub overlap: f32,
}

/// Fixed-timestep integrator and collision resolver.
#[derive(Clone, Debug)]
pub struct Physics {
    pub gravity: f32,
    step: f32,
    accumulator: f32,
    steps: u64,
}

impl Default for Physics {
    fn default() -> Self {
        Self::with_step(1.0 / 200.0)
    }
}

impl Physics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step(step: f32) -> Self {
        Self {
            gravity: 32.0,
            step,
            accumulator: 0.0,
            steps: 0,
        }
    }

    #[inline]
    pub fn step_size(&self) -> f32 {
        self.step
    }

    /// Unconsumed time carried into the next update.
    #[inline]
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Steps run since creation.
    #[inline]
    pub fn total_steps(&self) -> u64 {
        self.steps
    }

    /// Consumes `dt` seconds in whole steps. `sample` reports the block at a cell, or
    /// `None` when nothing is known there; unknown cells never collide. Returns the
    /// number of steps run.
    pub fn update<F>(&mut self, dt: f32, body: &mut Body, input: BodyInput, sample: &F) -> u32
    where
        F: Fn(i32, i32, i32) -> Option<Block>,
    {
        if dt.is_finite() && dt > 0.0 {
            self.accumulator += dt;
        }
        let mut n = 0u32;
        while self.accumulator >= self.step {
            self.step_once(body, input, sample);
            self.accumulator -= self.step;
            n += 1;
        }
        if n > 0 {
            log::trace!(
                target: "physics",
                "{} steps, pos ({:.3}, {:.3}, {:.3}), on_ground {}",
                n,
                body.position.x,
                body.position.y,
                body.position.z,
                body.on_ground
            );
        }
        n
    }

    fn step_once<F>(&mut self, body: &mut Body, input: BodyInput, sample: &F)
    where
        F: Fn(i32, i32, i32) -> Option<Block>,
    {
        body.apply_input(input);
        body.velocity.y -= self.gravity * self.step;
        body.integrate(self.step);
        let candidates = Self::broad_phase(body, sample);
        let contacts = Self::narrow_phase(body, &candidates);
        Self::resolve(body, contacts);
        self.steps += 1;
    }

    /// Solid cells overlapping the body's bounding box.
    pub fn broad_phase<F>(body: &Body, sample: &F) -> Vec<(i32, i32, i32)>
    where
        F: Fn(i32, i32, i32) -> Option<Block>,
    {
        let p = body.position;
        let (min_x, max_x) = (block_coord(p.x - body.radius), block_coord(p.x + body.radius));
        let (min_y, max_y) = (block_coord(p.y), block_coord(p.y + body.height));
        let (min_z, max_z) = (block_coord(p.z - body.radius), block_coord(p.z + body.radius));
        let mut out = Vec::new();
        for y in min_y..=max_y {
            for z in min_z..=max_z {
                for x in min_x..=max_x {
                    if sample(x, y, z).is_some_and(|b| b.is_solid()) {
                        out.push((x, y, z));
                    }
                }
            }
        }
        out
    }

    /// Contacts for candidate cells whose nearest point lies inside the cylinder. The
    /// normal is along whichever axis (vertical or radial) penetrates least. Resets
    /// `on_ground` and sets it again for any upward vertical normal.
    pub fn narrow_phase(body: &mut Body, candidates: &[(i32, i32, i32)]) -> Vec<Contact> {
        body.on_ground = false;
        let center = body.center();
        let half = body.height * 0.5;
        let mut out = Vec::new();
        for &(x, y, z) in candidates {
            let point = Aabb::unit_block(x, y, z).closest_point(center);
            if !body.contains_point(point) {
                continue;
            }
            let dy = point.y - center.y;
            let radial = Vec3::new(point.x - center.x, 0.0, point.z - center.z);
            let dist = radial.length_xz();
            let overlap_y = half - dy.abs();
            let overlap_xz = body.radius - dist;
            let (normal, overlap) = if overlap_y < overlap_xz || dist < HORIZONTAL_EPS {
                // Center inside the block: no direction to push along
                if dy == 0.0 {
                    continue;
                }
                let ny = -dy.signum();
                if ny > 0.0 {
                    body.on_ground = true;
                }
                (Vec3::new(0.0, ny, 0.0), overlap_y)
            } else {
                (-radial / dist, overlap_xz)
            };
            out.push(Contact {
                block: (x, y, z),
                point,
                normal,
                overlap,
            });
        }
        out
    }

    /// Pushes the body out of each contact, smallest overlap first, and removes the
    /// velocity component along each applied normal.
    pub fn resolve(body: &mut Body, mut contacts: Vec<Contact>) {
        contacts.sort_by(|a, b| a.overlap.total_cmp(&b.overlap));
        for c in contacts {
            // An earlier push may already have separated this one
            if !body.contains_point(c.point) {
                continue;
            }
            body.position += c.normal * c.overlap;
            let into = body.world_velocity().dot(c.normal);
            body.apply_world_delta_velocity(-(c.normal * into));
        }
    }
}
