//! Living bodies: health, death, gibs and the crushed-death rule.

use crate::core::{Rect, Sound, Vec2};
use crate::domain::{Direction, PhysicsConfig};
use crate::systems::physics::{Body, BodyHooks, Collider, Contact, EntityRef, StepContext, CAP_SPRING};

use super::debris::Gib;

#[derive(Clone, Debug)]
pub struct Creature {
    pub body: Body,
    pub alive: bool,
    pub health: i32,
    pub max_health: i32,
    pub gibs: Vec<Gib>,
    spawn: Vec2,
    spawn_vel: Vec2,
}

impl Creature {
    pub fn new(body: Body, health: i32) -> Self {
        let spawn = body.pos;
        let spawn_vel = body.vel;
        Self { body, alive: true, health, max_health: health, gibs: Vec::new(), spawn, spawn_vel }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    pub fn set_spawn(&mut self, spawn: Vec2) {
        self.spawn = spawn;
    }

    /// Moves the body (while alive), applies the crushed-death rule, then advances gibs.
    pub fn step<H: BodyHooks + ?Sized>(&mut self, ctx: &mut StepContext<'_>, me: EntityRef, hooks: &mut H) {
        if self.alive {
            self.body.step(ctx, me, hooks);
            if self.is_crushed() {
                log::debug!("{:?} crushed at {:?}", me, self.body.pos);
                self.body.sounds.insert(Sound::Squish);
                self.die();
            }
        }
        self.update_gibs(ctx);
    }

    pub fn update_gibs(&mut self, ctx: &mut StepContext<'_>) {
        for gib in self.gibs.iter_mut() {
            gib.update(ctx);
        }
        self.gibs.retain(|g| !g.is_finished());
    }

    /// A non-spring collision this tick together with either a corrective jump
    /// larger than half the body, or two opposing blockers closer than half the body.
    pub fn is_crushed(&self) -> bool {
        let body = &self.body;
        let solid = || body.collisions.iter().filter(|c| !c.contact.has(CAP_SPRING));
        if solid().next().is_none() {
            return false;
        }

        let moved = body.displacement();
        if moved.x.abs() > 0.5 * body.size.x || moved.y.abs() > 0.5 * body.size.y {
            return true;
        }

        let closure = |near: Direction, far: Direction, size: f32| -> Option<f32> {
            let near_edge = solid()
                .filter(|c| c.direction == near)
                .map(|c| if near == Direction::Up { c.contact.rect.bottom() } else { c.contact.rect.right() })
                .reduce(f32::max)?;
            let far_edge = solid()
                .filter(|c| c.direction == far)
                .map(|c| if far == Direction::Down { c.contact.rect.top() } else { c.contact.rect.left() })
                .reduce(f32::min)?;
            Some(size - (far_edge - near_edge))
        };
        let vertical = closure(Direction::Up, Direction::Down, body.size.y);
        let horizontal = closure(Direction::Left, Direction::Right, body.size.x);
        vertical.map_or(false, |c| c > 0.5 * body.size.y) || horizontal.map_or(false, |c| c > 0.5 * body.size.x)
    }

    /// Applies knockback and damage. Returns true when this call killed the creature.
    pub fn damage(&mut self, amount: i32, knockback: Vec2) -> bool {
        if !self.alive {
            return false;
        }
        self.body.vel += knockback;
        self.health -= amount;
        if self.health <= 0 {
            self.die();
            return true;
        }
        false
    }

    pub fn die(&mut self) {
        self.alive = false;
        self.body.halt();
    }

    pub fn spawn_gibs(&mut self, config: &PhysicsConfig, rng: &mut u32, count: usize) {
        let center = self.body.center();
        self.gibs.extend(Gib::burst(config, rng, center, count));
    }

    pub fn reset(&mut self) {
        self.body.teleport(self.spawn);
        self.body.vel = self.spawn_vel;
        self.body.base = Vec2::zero();
        self.body.collisions.clear();
        self.body.wall_collision = false;
        self.body.ground_collision = false;
        self.body.ceiling_collision = false;
        self.alive = true;
        self.health = self.max_health;
        self.gibs.clear();
    }
}

impl Collider for Creature {
    fn contact(&self, entity: EntityRef) -> Option<Contact> {
        self.alive.then(|| self.body.contact(entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CollisionGroup;

    fn creature() -> Creature {
        Creature::new(Body::new(Rect::new(0.0, 0.0, 32.0, 32.0), CollisionGroup::Enemies), 3)
    }

    #[test]
    fn damage_until_dead() {
        let mut c = creature();
        assert!(!c.damage(1, Vec2::new(2.0, 0.0)));
        assert_eq!(c.body.vel.x, 2.0);
        assert!(!c.damage(1, Vec2::zero()));
        assert!(c.damage(1, Vec2::zero()));
        assert!(!c.alive);
        assert_eq!(c.body.vel, Vec2::zero());
        assert!(!c.damage(5, Vec2::zero()));
    }

    #[test]
    fn reset_restores_spawn_state() {
        let mut c = creature();
        c.body.pos = Vec2::new(100.0, 50.0);
        c.body.base = Vec2::new(2.0, 0.0);
        c.damage(3, Vec2::zero());
        c.reset();
        assert!(c.alive);
        assert_eq!(c.health, 3);
        assert_eq!(c.body.pos, Vec2::zero());
        assert_eq!(c.body.base, Vec2::zero());
    }

    #[test]
    fn no_collision_no_crush() {
        let mut c = creature();
        c.body.prev_pos = Vec2::new(0.0, -100.0);
        assert!(!c.is_crushed());
    }
}
