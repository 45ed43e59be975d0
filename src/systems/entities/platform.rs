//! Moving and falling platforms. Both are wall-group bodies that riders adopt
//! as carried velocity.

use crate::core::{Rect, Vec2};
use crate::domain::{CollisionGroup, Direction, PhysicsConfig};
use crate::systems::physics::{
    Body, BodyHooks, Collider, Contact, Effect, EntityRef, StepContext, CAP_PLATFORM,
};

/// Ticks between a rider landing on a falling platform and the fall.
pub const FALL_DELAY: u32 = 30;

/// Whether the player stands on (or is pressed into) a platform that just moved from `prev`.
fn player_rides(ctx: &StepContext<'_>, prev: Rect, now: Rect) -> bool {
    let Some(player) = ctx.world.player else {
        return false;
    };
    if !player.alive() {
        return false;
    }
    let rider = player.rect();
    let beside = rider.right() > prev.left() && rider.left() < prev.right();
    (beside && (rider.bottom() - prev.top()).abs() < 0.5) || rider.overlaps(&now)
}

#[derive(Clone, Copy, Debug, Default)]
struct PlatformMotion;

impl BodyHooks for PlatformMotion {
    fn apply_friction(&mut self, _body: &mut Body) {}

    fn on_tick(&mut self, body: &mut Body, ctx: &mut StepContext<'_>) {
        let config = ctx.config();
        let rect = body.rect();
        if (rect.left() < 0.0 && body.vel.x < 0.0) || (rect.right() > config.room_pixel_width() && body.vel.x > 0.0) {
            body.vel.x = -body.vel.x;
        }
        if (rect.top() < 0.0 && body.vel.y < 0.0) || (rect.bottom() > config.room_pixel_height() && body.vel.y > 0.0) {
            body.vel.y = -body.vel.y;
        }
    }
}

/// Patrols at constant speed, reversing off walls and room edges.
#[derive(Clone, Debug)]
pub struct MovingPlatform {
    pub body: Body,
    spawn: Vec2,
    spawn_vel: Vec2,
}

impl MovingPlatform {
    pub fn new(config: &PhysicsConfig, rect: Rect, vel: Vec2) -> Self {
        let body = Body::new(rect, CollisionGroup::Walls)
            .with_velocity(vel)
            .with_gravity_scale(0.0)
            .with_friction(0.125 * config.scale)
            .with_caps(CAP_PLATFORM);
        Self { spawn: body.pos, spawn_vel: vel, body }
    }

    /// Three tiles wide, one tall, moving right (`vertical == false`) or down.
    pub fn from_tile(config: &PhysicsConfig, col: i32, row: i32, vertical: bool) -> Self {
        let t = config.tile_size;
        let rect = Rect::new(col as f32 * t, row as f32 * t, 3.0 * t, t);
        let speed = 0.5 * config.scale;
        let vel = if vertical { Vec2::new(0.0, speed) } else { Vec2::new(speed, 0.0) };
        Self::new(config, rect, vel)
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn update(&mut self, ctx: &mut StepContext<'_>, me: EntityRef) {
        let prev = self.body.rect();
        self.body.step(ctx, me, &mut PlatformMotion);
        if player_rides(ctx, prev, self.body.rect()) {
            ctx.emit(Effect::Carry { target: EntityRef::Player, velocity: self.body.vel });
        }
    }

    pub fn reset(&mut self) {
        self.body.teleport(self.spawn);
        self.body.vel = self.spawn_vel;
        self.body.collisions.clear();
    }
}

impl Collider for MovingPlatform {
    fn contact(&self, entity: EntityRef) -> Option<Contact> {
        Some(self.body.contact(entity))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallState {
    Idle,
    Armed { remaining: u32 },
    Falling,
    Returning,
}

/// Drops once stood on, then climbs back to where it started after leaving the room.
#[derive(Clone, Debug)]
pub struct FallingPlatform {
    pub body: Body,
    pub state: FallState,
    spawn: Vec2,
    speed: f32,
}

impl FallingPlatform {
    pub fn new(config: &PhysicsConfig, col: i32, row: i32) -> Self {
        let t = config.tile_size;
        let rect = Rect::new(col as f32 * t, row as f32 * t, 2.0 * t, 0.5 * t);
        let body = Body::new(rect, CollisionGroup::Walls)
            .with_gravity_scale(0.0)
            .with_friction(0.125 * config.scale)
            .with_caps(CAP_PLATFORM);
        Self { spawn: body.pos, body, state: FallState::Idle, speed: 2.0 * config.scale }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn update(&mut self, ctx: &mut StepContext<'_>, me: EntityRef) {
        match self.state {
            FallState::Idle => {
                let stood_on = ctx
                    .world
                    .player
                    .map_or(false, |p| p.alive() && p.body().collided_with(me, Direction::Down));
                if stood_on {
                    self.state = FallState::Armed { remaining: FALL_DELAY };
                }
            }
            FallState::Armed { remaining } => {
                if remaining <= 1 {
                    self.state = FallState::Falling;
                    self.body.vel = Vec2::new(0.0, self.speed);
                } else {
                    self.state = FallState::Armed { remaining: remaining - 1 };
                }
            }
            FallState::Falling => {
                let prev = self.body.rect();
                self.body.sweep();
                if player_rides(ctx, prev, self.body.rect()) {
                    ctx.emit(Effect::Carry { target: EntityRef::Player, velocity: self.body.vel });
                }
                if self.body.rect().top() > ctx.config().room_pixel_height() {
                    self.state = FallState::Returning;
                    self.body.vel = Vec2::new(0.0, -self.speed);
                }
            }
            FallState::Returning => {
                self.body.sweep();
                if self.body.pos.y <= self.spawn.y {
                    self.settle();
                }
            }
        }
    }

    fn settle(&mut self) {
        self.body.teleport(self.spawn);
        self.body.vel = Vec2::zero();
        self.state = FallState::Idle;
    }

    pub fn reset(&mut self) {
        self.settle();
        self.body.collisions.clear();
    }
}

impl Collider for FallingPlatform {
    fn contact(&self, entity: EntityRef) -> Option<Contact> {
        Some(self.body.contact(entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Room;
    use crate::systems::physics::WorldView;

    fn tick(room: &Room, f: impl FnOnce(&mut StepContext<'_>)) -> Vec<Effect> {
        let mut effects = Vec::new();
        let mut rng = 5;
        let mut ctx = StepContext::new(WorldView::new(room, None), &mut effects, &mut rng);
        f(&mut ctx);
        effects
    }

    #[test]
    fn platform_turns_at_room_edge() {
        let room = Room::new(6, 6);
        let config = room.config().clone();
        let mut platform = MovingPlatform::new(&config, Rect::new(90.0, 32.0, 96.0, 32.0), Vec2::new(2.0, 0.0));
        for _ in 0..3 {
            tick(&room, |ctx| platform.update(ctx, EntityRef::Dynamic(0)));
        }
        assert_eq!(platform.body.vel.x, 2.0);
        tick(&room, |ctx| platform.update(ctx, EntityRef::Dynamic(0)));
        assert_eq!(platform.body.vel.x, -2.0);
        platform.reset();
        assert_eq!(platform.body.pos, Vec2::new(90.0, 32.0));
        assert_eq!(platform.body.vel.x, 2.0);
    }

    #[test]
    fn platform_reverses_off_walls() {
        let mut room = Room::new(10, 4);
        room.add_object(5, 1, 'W');
        let config = room.config().clone();
        let mut platform = MovingPlatform::new(&config, Rect::new(60.0, 32.0, 96.0, 32.0), Vec2::new(2.0, 0.0));
        let mut reversed = false;
        for _ in 0..4 {
            tick(&room, |ctx| platform.update(ctx, EntityRef::Dynamic(0)));
            if platform.body.vel.x < 0.0 {
                reversed = true;
                break;
            }
        }
        assert!(reversed);
        assert_eq!(platform.rect().right(), 160.0);
    }

    #[test]
    fn falling_platform_returns_exactly_to_spawn() {
        let room = Room::new(4, 4);
        let config = room.config().clone();
        let mut platform = FallingPlatform::new(&config, 1, 1);
        platform.state = FallState::Armed { remaining: 1 };
        tick(&room, |ctx| platform.update(ctx, EntityRef::Dynamic(0)));
        assert_eq!(platform.state, FallState::Falling);

        let mut ticks = 0;
        while platform.state != FallState::Idle && ticks < 500 {
            tick(&room, |ctx| platform.update(ctx, EntityRef::Dynamic(0)));
            ticks += 1;
        }
        assert_eq!(platform.state, FallState::Idle);
        assert_eq!(platform.body.pos, Vec2::new(32.0, 32.0));
        assert_eq!(platform.body.vel, Vec2::zero());
    }
}
