use crate::core::{Animation, Rect, Sound, SoundSet, Vec2};
use crate::domain::{CollisionGroup, PhysicsConfig};
use crate::systems::physics::{Body, BodyHooks, Collider, Contact, EntityRef, StepContext, CAP_DAMAGEABLE, CAP_HARMFUL};

use super::creature::Creature;

pub const BOSS_HEALTH: i32 = 10;
const BOSS_GIBS: usize = 6;

#[derive(Clone, Copy, Debug)]
struct BossMotion;

impl BodyHooks for BossMotion {
    fn apply_friction(&mut self, _body: &mut Body) {}
}

/// The room's single large enemy. Patrols between walls; its corpse stops
/// blocking by leaving the `boss` group until reset.
#[derive(Clone, Debug)]
pub struct Boss {
    pub creature: Creature,
    pub animation: Animation,
    speed: f32,
    spawn_speed: f32,
}

impl Boss {
    pub fn new(config: &PhysicsConfig, x: f32, y: f32) -> Self {
        let s = config.scale;
        let body = Body::new(Rect::new(x, y, 24.0 * s, 24.0 * s), CollisionGroup::Boss)
            .with_caps(CAP_DAMAGEABLE | CAP_HARMFUL);
        let speed = 0.5 * s;
        Self { creature: Creature::new(body, BOSS_HEALTH), animation: Animation::new("walk", 4, 10, true), speed, spawn_speed: speed }
    }

    /// Boss whose feet rest on the bottom of tile `(col, row)`.
    pub fn from_tile(config: &PhysicsConfig, col: i32, row: i32) -> Self {
        let t = config.tile_size;
        let mut boss = Self::new(config, col as f32 * t, 0.0);
        let spawn = Vec2::new(col as f32 * t, (row + 1) as f32 * t - boss.creature.body.size.y);
        boss.creature.body.teleport(spawn);
        boss.creature.set_spawn(spawn);
        boss
    }

    pub fn alive(&self) -> bool {
        self.creature.alive
    }

    pub fn rect(&self) -> Rect {
        self.creature.rect()
    }

    pub fn update(&mut self, ctx: &mut StepContext<'_>) {
        let was_alive = self.creature.alive;
        if was_alive {
            self.creature.body.vel.x = self.speed;
            self.creature.step(ctx, EntityRef::Boss, &mut BossMotion);
            if self.creature.body.wall_collision {
                self.speed = -self.speed;
            }
        } else {
            // Corpse still falls and settles.
            self.creature.body.step(ctx, EntityRef::Boss, &mut BossMotion);
            self.creature.update_gibs(ctx);
        }
        if was_alive && !self.creature.alive {
            self.on_death(ctx.config(), &mut *ctx.rng);
        }
        self.animation.play(if self.creature.alive { "walk" } else { "die" });
        self.animation.advance();
    }

    pub fn hurt(&mut self, amount: i32, knockback: Vec2, config: &PhysicsConfig, rng: &mut u32) {
        if self.creature.damage(amount, knockback) {
            self.on_death(config, rng);
        }
    }

    fn on_death(&mut self, config: &PhysicsConfig, rng: &mut u32) {
        log::info!("boss defeated");
        self.creature.body.group = CollisionGroup::Enemies;
        self.creature.body.sounds.insert(Sound::Die);
        self.creature.spawn_gibs(config, rng, BOSS_GIBS);
    }

    pub fn drain_sounds(&mut self) -> SoundSet {
        self.creature.body.sounds.drain()
    }

    pub fn reset(&mut self) {
        self.creature.reset();
        self.creature.body.group = CollisionGroup::Boss;
        self.speed = self.spawn_speed;
        self.animation.play("walk");
    }
}

impl Collider for Boss {
    fn contact(&self, entity: EntityRef) -> Option<Contact> {
        self.creature.contact(entity)
    }
}
