//! Kinematic body with axis-separated move/resolve.
//!
//! One `step` per tick:
//! 1. clamp own velocity to terminal speed
//! 2. X pass: move by carried + own velocity, resolve against blockers
//! 3. Y pass: same, plus ground/ceiling flags and surface friction
//! 4. carried velocity from the collision record
//! 5. friction (grounded only)
//! 6. gravity
//!
//! Position is the only stored geometry; `rect()` is derived from it.

use crate::core::{Rect, Sound, SoundSet, Vec2};
use crate::domain::{CollisionGroup, Direction};

use super::context::StepContext;
use super::effects::Effect;
use super::query::{Capabilities, Contact, EntityRef, CAP_KINEMATIC, CAP_NONE, CAP_PLATFORM, CAP_SPRING};

/// One resolved blocker of this tick, seen from the mover.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collision {
    pub contact: Contact,
    pub direction: Direction,
}

/// Per-kind overrides of the generic step.
pub trait BodyHooks {
    /// An entity the mover never collides with (a projectile's parent).
    fn excluded(&self) -> Option<EntityRef> {
        None
    }

    fn on_axis_resolved(&mut self, _body: &mut Body, _hit: Collision, _ctx: &mut StepContext<'_>) {}

    fn apply_friction(&mut self, body: &mut Body) {
        body.apply_friction();
    }

    fn apply_gravity(&mut self, body: &mut Body, gravity: f32) {
        body.apply_gravity(gravity);
    }

    fn on_tick(&mut self, _body: &mut Body, _ctx: &mut StepContext<'_>) {}
}

/// Plain body, no overrides.
impl BodyHooks for () {}

#[derive(Clone, Debug, Default)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Carried velocity inherited from the platform being ridden.
    pub base: Vec2,
    pub prev_pos: Vec2,
    pub gravity_scale: f32,
    /// Friction of the surface last stood on.
    pub friction: f32,
    /// Coefficient applied by the latest resolution.
    pub bounce_scale: f32,
    pub group: CollisionGroup,
    pub caps: Capabilities,
    pub collisions: Vec<Collision>,
    pub wall_collision: bool,
    pub ground_collision: bool,
    pub ceiling_collision: bool,
    pub sounds: SoundSet,
}

impl Body {
    pub fn new(rect: Rect, group: CollisionGroup) -> Self {
        Self {
            pos: rect.position(),
            size: rect.size(),
            prev_pos: rect.position(),
            gravity_scale: 1.0,
            group,
            caps: CAP_NONE,
            ..Default::default()
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_gravity_scale(mut self, gravity_scale: f32) -> Self {
        self.gravity_scale = gravity_scale;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_caps(mut self, caps: Capabilities) -> Self {
        self.caps = caps;
        self
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_position(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Velocity actually applied per tick.
    pub fn effective_velocity(&self) -> Vec2 {
        self.base + self.vel
    }

    /// Moves without interpolation history, for spawns and respawns.
    pub fn teleport(&mut self, pos: Vec2) {
        self.pos = pos;
        self.prev_pos = pos;
    }

    /// Displacement over the last step.
    pub fn displacement(&self) -> Vec2 {
        self.pos - self.prev_pos
    }

    /// Zeroes own and carried velocity.
    pub fn halt(&mut self) {
        self.vel = Vec2::zero();
        self.base = Vec2::zero();
    }

    pub fn contact(&self, entity: EntityRef) -> Contact {
        Contact {
            entity,
            rect: self.rect(),
            group: self.group,
            velocity: self.vel,
            friction: self.friction,
            caps: self.caps | CAP_KINEMATIC,
        }
    }

    pub fn collided_with(&self, entity: EntityRef, direction: Direction) -> bool {
        self.collisions
            .iter()
            .any(|c| c.contact.entity == entity && c.direction == direction)
    }

    pub fn step<H: BodyHooks + ?Sized>(&mut self, ctx: &mut StepContext<'_>, me: EntityRef, hooks: &mut H) {
        self.prev_pos = self.pos;
        self.collisions.clear();
        self.vel = ctx.config().limit_speed(self.vel);

        self.move_x(ctx, me, hooks);
        self.move_y(ctx, me, hooks);
        self.update_carried_velocity();

        hooks.apply_friction(self);
        let gravity = ctx.config().gravity;
        hooks.apply_gravity(self, gravity);
        hooks.on_tick(self, ctx);
    }

    /// Constant-velocity move that ignores every obstacle.
    pub fn sweep(&mut self) {
        self.prev_pos = self.pos;
        self.collisions.clear();
        self.wall_collision = false;
        self.ground_collision = false;
        self.ceiling_collision = false;
        self.pos += self.effective_velocity();
    }

    fn blockers(&self, ctx: &StepContext<'_>, me: EntityRef, exclude: Option<EntityRef>) -> Vec<Contact> {
        if self.group == CollisionGroup::None {
            return Vec::new();
        }
        let tables = ctx.tables();
        let mut found = ctx.query(&self.rect(), me, exclude);
        found.retain(|c| tables.can_collide(self.group, c.group));
        found
    }

    fn move_x<H: BodyHooks + ?Sized>(&mut self, ctx: &mut StepContext<'_>, me: EntityRef, hooks: &mut H) {
        let travel = self.base.x + self.vel.x;
        self.pos.x += travel;

        let blockers = self.blockers(ctx, me, hooks.excluded());
        let bump_speed = ctx.config().bump_speed;
        let mut bounce = 0.0;
        for contact in &blockers {
            let relative = travel - contact.velocity.x;
            let direction = if relative > 0.0 {
                self.pos.x = contact.rect.left() - self.size.x;
                Some(Direction::Right)
            } else if relative < 0.0 {
                self.pos.x = contact.rect.right();
                Some(Direction::Left)
            } else {
                None
            };

            // Springs only launch vertically.
            if !contact.has(CAP_SPRING) {
                bounce = ctx.tables().bounce_coefficient(self.group, contact.group);
            }

            let speed = relative.abs();
            if speed > bump_speed || (speed >= 0.5 * bump_speed && self.group != CollisionGroup::Player) {
                self.sounds.insert(Sound::Bump);
            }

            if let Some(direction) = direction {
                let hit = Collision { contact: *contact, direction };
                self.collisions.push(hit);
                hooks.on_axis_resolved(self, hit, ctx);
            }
        }

        self.wall_collision = !blockers.is_empty();
        if self.wall_collision {
            self.vel.x *= -bounce;
            self.bounce_scale = bounce;
        }
    }

    fn move_y<H: BodyHooks + ?Sized>(&mut self, ctx: &mut StepContext<'_>, me: EntityRef, hooks: &mut H) {
        let travel = self.base.y + self.vel.y;
        self.pos.y += travel;

        let blockers = self.blockers(ctx, me, hooks.excluded());
        let bump_speed = ctx.config().bump_speed;
        let launch = ctx.config().spring_launch_velocity;
        let mut bounce = 0.0;
        self.ground_collision = false;
        self.ceiling_collision = false;
        for contact in &blockers {
            let relative = travel - contact.velocity.y;
            let direction = if relative > 0.0 {
                self.pos.y = contact.rect.top() - self.size.y;
                self.ground_collision = true;
                self.friction = contact.friction;
                Some(Direction::Down)
            } else if relative < 0.0 {
                self.pos.y = contact.rect.bottom();
                self.ceiling_collision = true;
                Some(Direction::Up)
            } else {
                None
            };

            if contact.has(CAP_SPRING) {
                ctx.emit(Effect::SpringBounce { target: contact.entity });
                if self.vel.y != 0.0 {
                    bounce = launch / self.vel.y;
                }
            } else {
                bounce = ctx.tables().bounce_coefficient(self.group, contact.group);
                if relative.abs() >= bump_speed {
                    self.sounds.insert(Sound::Bump);
                }
            }

            if let Some(direction) = direction {
                let hit = Collision { contact: *contact, direction };
                self.collisions.push(hit);
                hooks.on_axis_resolved(self, hit, ctx);
            }
        }

        if !blockers.is_empty() {
            self.vel.y *= -bounce;
            self.bounce_scale = bounce;
        }
    }

    /// Adopts the velocity of the first platform met beside or below; any
    /// non-platform recorded before it drops the carried velocity. An empty
    /// record keeps it, so momentum survives walking off a platform.
    pub fn update_carried_velocity(&mut self) {
        if self.caps & CAP_PLATFORM != 0 {
            return;
        }
        for hit in &self.collisions {
            if !hit.contact.has(CAP_PLATFORM) {
                self.base = Vec2::zero();
            } else if hit.direction != Direction::Up {
                self.base = hit.contact.velocity;
                break;
            }
        }
    }

    /// Clamped linear decay towards zero while grounded.
    pub fn apply_friction(&mut self) {
        if !self.ground_collision {
            return;
        }
        if self.vel.x > 0.0 {
            self.vel.x = (self.vel.x - self.friction).max(0.0);
        } else if self.vel.x < 0.0 {
            self.vel.x = (self.vel.x + self.friction).min(0.0);
        }
    }

    pub fn apply_gravity(&mut self, gravity: f32) {
        if self.gravity_scale != 0.0 {
            self.vel.y += self.gravity_scale * gravity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Room;
    use crate::systems::entities::WallKind;
    use crate::systems::physics::WorldView;

    fn step_once(room: &Room, body: &mut Body) -> Vec<Effect> {
        let mut effects = Vec::new();
        let mut rng = 1;
        let mut ctx = StepContext::new(WorldView::new(room, None), &mut effects, &mut rng);
        body.step(&mut ctx, EntityRef::Detached, &mut ());
        effects
    }

    fn floor_room() -> Room {
        let mut room = Room::new(10, 10);
        for col in 0..10 {
            room.add_wall(col, 5, WallKind::Wall);
        }
        room
    }

    #[test]
    fn friction_never_overshoots() {
        let room = floor_room();
        let mut body = Body::new(Rect::new(64.0, 128.0, 32.0, 32.0), CollisionGroup::Player)
            .with_velocity(Vec2::new(0.3, 1.0));
        step_once(&room, &mut body);
        assert!(body.ground_collision);
        assert_eq!(body.friction, 0.5);
        assert_eq!(body.vel.x, 0.0);
        assert_eq!(body.pos.y, 128.0);
    }

    #[test]
    fn resting_on_floor_records_down_each_tick() {
        let room = floor_room();
        let mut body = Body::new(Rect::new(64.0, 128.0, 32.0, 32.0), CollisionGroup::Player);
        for _ in 0..5 {
            step_once(&room, &mut body);
        }
        assert_eq!(body.pos.y, 128.0);
        assert!(body.ground_collision);
        assert!(body.collided_with(EntityRef::Wall { col: 2, row: 5 }, Direction::Down));
    }

    #[test]
    fn zero_relative_velocity_neither_snaps_nor_records() {
        let mut room = Room::new(10, 10);
        room.add_wall(2, 2, WallKind::Wall);
        let mut body = Body::new(Rect::new(60.0, 60.0, 8.0, 8.0), CollisionGroup::Player).with_gravity_scale(0.0);
        step_once(&room, &mut body);
        assert_eq!(body.pos, Vec2::new(60.0, 60.0));
        assert!(body.collisions.is_empty());
        assert!(body.wall_collision);
        assert!(!body.ground_collision);
    }

    #[test]
    fn air_clears_flags() {
        let room = Room::new(10, 10);
        let mut body = Body::new(Rect::new(64.0, 64.0, 32.0, 32.0), CollisionGroup::Player);
        body.ground_collision = true;
        body.wall_collision = true;
        step_once(&room, &mut body);
        assert!(!body.ground_collision);
        assert!(!body.wall_collision);
        assert_eq!(body.vel.y, 1.0);
    }

    #[test]
    fn sweep_ignores_obstacles() {
        let mut body = Body::new(Rect::new(64.0, 150.0, 32.0, 32.0), CollisionGroup::Walls)
            .with_velocity(Vec2::new(0.0, 8.0));
        body.sweep();
        assert_eq!(body.pos.y, 158.0);
        assert!(body.collisions.is_empty());
    }
}
