//! Death fragments and rubble. Purely cosmetic: neither group takes part in blocking.

use crate::core::{random_range, Rect, Vec2};
use crate::domain::{CollisionGroup, PhysicsConfig};
use crate::systems::physics::{Body, Collider, Contact, EntityRef, StepContext};

use super::projectile::{Particle, ParticleKind};

const DEBRIS_LIFETIME: u32 = 120;

/// Rubble from a destroyed block.
#[derive(Clone, Debug)]
pub struct Debris {
    pub body: Body,
    pub alive: bool,
    age: u32,
}

impl Debris {
    pub fn new(config: &PhysicsConfig, center: Vec2, vel: Vec2) -> Self {
        let size = 4.0 * config.scale;
        let rect = Rect::new(center.x - size * 0.5, center.y - size * 0.5, size, size);
        Self {
            body: Body::new(rect, CollisionGroup::Debris).with_velocity(vel).with_friction(0.5 * config.scale),
            alive: true,
            age: 0,
        }
    }

    pub fn update(&mut self, ctx: &mut StepContext<'_>) {
        if !self.alive {
            return;
        }
        self.body.step(ctx, EntityRef::Detached, &mut ());
        self.age += 1;
        if self.age >= DEBRIS_LIFETIME || ctx.is_off_room(&self.body.rect()) {
            self.alive = false;
        }
    }
}

/// Body part flung out when a creature dies. Bleeds while moving fast.
#[derive(Clone, Debug)]
pub struct Gib {
    pub body: Body,
    pub alive: bool,
    pub trail: Vec<Particle>,
}

impl Gib {
    pub fn new(config: &PhysicsConfig, center: Vec2, vel: Vec2) -> Self {
        let size = 4.0 * config.scale;
        let rect = Rect::new(center.x - size * 0.5, center.y - size * 0.5, size, size);
        Self {
            body: Body::new(rect, CollisionGroup::None).with_velocity(vel).with_friction(0.75 * config.scale),
            alive: true,
            trail: Vec::new(),
        }
    }

    /// `count` gibs thrown up and sideways from `center`.
    pub fn burst(config: &PhysicsConfig, rng: &mut u32, center: Vec2, count: usize) -> Vec<Gib> {
        (0..count)
            .map(|_| {
                let vel = Vec2::new(
                    random_range(rng, -1.0, 1.0) * config.scale,
                    random_range(rng, -3.0, -1.0) * config.scale,
                );
                Gib::new(config, center, vel)
            })
            .collect()
    }

    pub fn is_finished(&self) -> bool {
        !self.alive && self.trail.is_empty()
    }

    pub fn update(&mut self, ctx: &mut StepContext<'_>) {
        if self.alive {
            self.body.step(ctx, EntityRef::Detached, &mut ());
            let config = ctx.config();
            if ctx.is_off_room(&self.body.rect()) {
                self.alive = false;
            } else if self.body.vel.length() > 0.5 * config.scale {
                self.trail.push(Particle::new(config, ParticleKind::Blood, self.body.center(), Vec2::zero(), 0.0));
            }
        }
        for drop in self.trail.iter_mut() {
            drop.update(ctx);
        }
        self.trail.retain(|p| p.alive);
    }
}

impl Collider for Gib {
    fn contact(&self, entity: EntityRef) -> Option<Contact> {
        self.alive.then(|| self.body.contact(entity))
    }
}
