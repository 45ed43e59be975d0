//! Bullets and the cosmetic particles they leave behind.

use crate::core::{Animation, Rect, Sound, Vec2};
use crate::domain::{CollisionGroup, Direction, PhysicsConfig};
use crate::systems::physics::{
    Body, BodyHooks, Collider, Collision, Contact, Effect, EntityRef, StepContext, CAP_DAMAGEABLE,
    CAP_DESTRUCTIBLE, CAP_KNOCKBACK,
};

/// Particles spawned when a bullet dies on impact.
pub const IMPACT_PARTICLES: usize = 3;
/// Perpendicular spread of impact particles, in multiples of scale.
const IMPACT_SPREAD: f32 = 2.0;
/// Share of the bullet's velocity impact particles keep along the impact axis.
const IMPACT_INHERIT: f32 = 0.25;
/// Share of the bullet's incoming velocity applied as knockback.
const KNOCKBACK: f32 = 0.25;
const PARTICLE_LIFETIME: u32 = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    Spark,
    Blood,
    Dust,
}

impl ParticleKind {
    fn action(self) -> &'static str {
        match self {
            ParticleKind::Spark => "spark",
            ParticleKind::Blood => "blood",
            ParticleKind::Dust => "dust",
        }
    }
}

/// Short-lived decoration. Group `none`, so it passes through everything.
#[derive(Clone, Debug)]
pub struct Particle {
    pub body: Body,
    pub kind: ParticleKind,
    pub alive: bool,
    pub animation: Animation,
    age: u32,
    lifetime: u32,
}

impl Particle {
    pub fn new(config: &PhysicsConfig, kind: ParticleKind, center: Vec2, vel: Vec2, gravity_scale: f32) -> Self {
        let size = 2.0 * config.scale;
        let rect = Rect::new(center.x - size * 0.5, center.y - size * 0.5, size, size);
        Self {
            body: Body::new(rect, CollisionGroup::None).with_velocity(vel).with_gravity_scale(gravity_scale),
            kind,
            alive: true,
            animation: Animation::new(kind.action(), 3, PARTICLE_LIFETIME / 3, false),
            age: 0,
            lifetime: PARTICLE_LIFETIME,
        }
    }

    pub fn update(&mut self, ctx: &mut StepContext<'_>) {
        if !self.alive {
            return;
        }
        self.body.step(ctx, EntityRef::Detached, &mut ());
        self.animation.advance();
        self.age += 1;
        if self.age >= self.lifetime {
            self.alive = false;
        }
    }
}

#[derive(Clone, Debug)]
struct BulletState {
    parent: EntityRef,
    /// Lifetime in ticks, -1 for unlimited.
    range: i32,
    age: i32,
    impact: Option<Direction>,
}

impl BodyHooks for BulletState {
    fn excluded(&self) -> Option<EntityRef> {
        Some(self.parent)
    }

    fn on_axis_resolved(&mut self, _body: &mut Body, hit: Collision, _ctx: &mut StepContext<'_>) {
        if self.impact.is_none() {
            self.impact = Some(hit.direction);
        }
    }
}

#[derive(Clone, Debug)]
pub struct Bullet {
    pub body: Body,
    /// Collision-active. A dead bullet lingers until its particles are gone.
    pub alive: bool,
    pub particles: Vec<Particle>,
    state: BulletState,
}

impl Bullet {
    pub fn new(parent: EntityRef, center: Vec2, velocity: Vec2, group: CollisionGroup, range: i32, size: f32) -> Self {
        let rect = Rect::new(center.x - size * 0.5, center.y - size * 0.5, size, size);
        Self {
            body: Body::new(rect, group).with_velocity(velocity).with_gravity_scale(0.0),
            alive: true,
            particles: Vec::new(),
            state: BulletState { parent, range, age: 0, impact: None },
        }
    }

    pub fn parent(&self) -> EntityRef {
        self.state.parent
    }

    pub fn is_finished(&self) -> bool {
        !self.alive && self.particles.is_empty()
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn update(&mut self, ctx: &mut StepContext<'_>, me: EntityRef) {
        if self.alive {
            let incoming = self.body.vel;
            self.body.step(ctx, me, &mut self.state);
            self.state.age += 1;

            if !self.body.collisions.is_empty() {
                let kind = self.dispatch_impacts(ctx, incoming);
                self.burst(ctx, kind);
            } else if self.state.range >= 0 && self.state.age >= self.state.range {
                self.alive = false;
            } else if ctx.is_off_room(&self.body.rect()) {
                self.alive = false;
            }
        }

        for particle in self.particles.iter_mut() {
            particle.update(ctx);
        }
        self.particles.retain(|p| p.alive);
    }

    /// One effect per recorded collision, chosen by what the other side accepts.
    fn dispatch_impacts(&mut self, ctx: &mut StepContext<'_>, incoming: Vec2) -> ParticleKind {
        let mut first = None;
        let hits: Vec<Contact> = self.body.collisions.iter().map(|c| c.contact).collect();
        for contact in hits {
            let kind = if contact.has(CAP_DESTRUCTIBLE) {
                ctx.emit(Effect::Destroy { target: contact.entity });
                ParticleKind::Spark
            } else if contact.has(CAP_DAMAGEABLE) {
                let knockback = if contact.has(CAP_KNOCKBACK) { incoming * KNOCKBACK } else { Vec2::zero() };
                ctx.emit(Effect::Damage { target: contact.entity, amount: 1, knockback });
                ctx.emit(Effect::Sound { target: self.state.parent, sound: Sound::Hit });
                if contact.has(CAP_KNOCKBACK) {
                    ParticleKind::Blood
                } else {
                    ParticleKind::Spark
                }
            } else {
                ParticleKind::Spark
            };
            first.get_or_insert(kind);
        }
        first.unwrap_or(ParticleKind::Spark)
    }

    fn burst(&mut self, ctx: &mut StepContext<'_>, kind: ParticleKind) {
        self.alive = false;
        let config = ctx.config();
        let center = self.body.center();
        let vertical = self.state.impact.map_or(false, Direction::is_vertical);
        for _ in 0..IMPACT_PARTICLES {
            let spread = ctx.random(-IMPACT_SPREAD, IMPACT_SPREAD) * config.scale;
            let vel = if vertical {
                Vec2::new(spread, self.body.vel.y * IMPACT_INHERIT)
            } else {
                Vec2::new(self.body.vel.x * IMPACT_INHERIT, spread)
            };
            self.particles.push(Particle::new(config, kind, center, vel, 0.5));
        }
    }
}

impl Collider for Bullet {
    fn contact(&self, entity: EntityRef) -> Option<Contact> {
        self.alive.then(|| self.body.contact(entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Room;
    use crate::systems::entities::WallKind;
    use crate::systems::physics::WorldView;

    fn run(room: &Room, bullet: &mut Bullet, ticks: usize) -> Vec<Effect> {
        let mut effects = Vec::new();
        let mut rng = 99;
        for _ in 0..ticks {
            let mut ctx = StepContext::new(WorldView::new(room, None), &mut effects, &mut rng);
            bullet.update(&mut ctx, EntityRef::PlayerProjectile(0));
        }
        effects
    }

    #[test]
    fn finite_range_expires_without_particles() {
        let room = Room::new(20, 10);
        let mut bullet = Bullet::new(EntityRef::Player, Vec2::new(40.0, 40.0), Vec2::new(4.0, 0.0), CollisionGroup::Bullets, 3, 8.0);
        run(&room, &mut bullet, 2);
        assert!(bullet.alive);
        run(&room, &mut bullet, 1);
        assert!(!bullet.alive);
        assert!(bullet.is_finished());
    }

    #[test]
    fn unlimited_range_dies_off_room() {
        let room = Room::new(4, 4);
        let mut bullet = Bullet::new(EntityRef::Player, Vec2::new(100.0, 40.0), Vec2::new(16.0, 0.0), CollisionGroup::Bullets, -1, 8.0);
        run(&room, &mut bullet, 2);
        assert!(bullet.alive);
        run(&room, &mut bullet, 1);
        assert!(!bullet.alive);
    }

    #[test]
    fn wall_hit_sparks_and_lingers() {
        let mut room = Room::new(10, 10);
        room.add_wall(3, 1, WallKind::Wall);
        let mut bullet = Bullet::new(EntityRef::Player, Vec2::new(80.0, 48.0), Vec2::new(16.0, 0.0), CollisionGroup::Bullets, -1, 8.0);
        let effects = run(&room, &mut bullet, 1);
        assert!(!bullet.alive);
        assert!(effects.is_empty());
        assert_eq!(bullet.particles.len(), IMPACT_PARTICLES);
        assert!(!bullet.is_finished());
        for p in &bullet.particles {
            assert_eq!(p.kind, ParticleKind::Spark);
            // Bounced off the wall: parallel component points back.
            assert!(p.body.vel.x < 0.0);
            assert!(p.body.vel.y.abs() <= IMPACT_SPREAD * 4.0);
        }
        run(&room, &mut bullet, PARTICLE_LIFETIME as usize);
        assert!(bullet.is_finished());
    }

    #[test]
    fn destructible_hit_emits_destroy() {
        let mut room = Room::new(10, 10);
        room.add_object(3, 1, 'D');
        let mut bullet = Bullet::new(EntityRef::Player, Vec2::new(80.0, 48.0), Vec2::new(16.0, 0.0), CollisionGroup::Bullets, -1, 8.0);
        let effects = run(&room, &mut bullet, 1);
        assert_eq!(effects, vec![Effect::Destroy { target: EntityRef::Dynamic(0) }]);
    }
}
