use blockworld_geom::Vec3;

/// Movement intent for one frame. `forward` and `right` are signed axes in `[-1, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BodyInput {
    pub forward: f32,
    pub right: f32,
    pub jump: bool,
}

/// Upright cylinder standing on `position` (feet center).
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub position: Vec3,
    pub radius: f32,
    pub height: f32,
    /// Velocity in the yaw frame: x = right, y = up, z = forward.
    pub velocity: Vec3,
    /// Radians; 0 faces -Z.
    pub yaw: f32,
    pub on_ground: bool,
    pub max_speed: f32,
    pub jump_speed: f32,
}

impl Body {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            radius: 0.5,
            height: 1.75,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            on_ground: false,
            max_speed: 10.0,
            jump_speed: 10.0,
        }
    }

    /// Center of the cylinder.
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.position + Vec3::UP * (self.height * 0.5)
    }

    #[inline]
    pub fn world_velocity(&self) -> Vec3 {
        self.velocity.local_to_world(self.yaw)
    }

    /// Adds a world-space velocity change, keeping the local representation in sync.
    pub fn apply_world_delta_velocity(&mut self, delta: Vec3) {
        let world = self.world_velocity() + delta;
        self.velocity = world.world_to_local(self.yaw);
    }

    /// Sets horizontal velocity from input and starts a jump when standing.
    pub fn apply_input(&mut self, input: BodyInput) {
        self.velocity.x = input.right.clamp(-1.0, 1.0) * self.max_speed;
        self.velocity.z = input.forward.clamp(-1.0, 1.0) * self.max_speed;
        if input.jump && self.on_ground {
            self.velocity.y = self.jump_speed;
            self.on_ground = false;
        }
    }

    /// Moves along the current velocity for `dt` seconds, ignoring collisions.
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.position += self.world_velocity() * dt;
    }

    /// Teleports to `spawn` and stops.
    pub fn reset(&mut self, spawn: Vec3) {
        self.position = spawn;
        self.velocity = Vec3::ZERO;
        self.on_ground = false;
    }

    /// Whether `p` lies strictly inside the cylinder.
    pub fn contains_point(&self, p: Vec3) -> bool {
        let c = self.center();
        let dy = p.y - c.y;
        let dx = p.x - c.x;
        let dz = p.z - c.z;
        dy.abs() < self.height * 0.5 && dx * dx + dz * dz < self.radius * self.radius
    }
}
