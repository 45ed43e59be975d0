//! Springs and cannons: fixed room devices with a little behaviour of their own.

use crate::core::{Animation, Rect, Sound, SoundSet, Vec2};
use crate::domain::{CollisionGroup, Facing, PhysicsConfig};
use crate::systems::physics::{Collider, Contact, EntityRef, StepContext, CAP_NONE, CAP_SPRING};

use super::projectile::Bullet;
use super::tiles::tile_rect;

pub const CANNON_INTERVAL: u32 = 90;

/// Half a tile tall, sitting on the bottom of its cell. Launches whatever lands on it.
#[derive(Clone, Debug)]
pub struct Spring {
    pub rect: Rect,
    pub animation: Animation,
    pub sounds: SoundSet,
}

impl Spring {
    pub fn new(config: &PhysicsConfig, col: i32, row: i32) -> Self {
        let t = config.tile_size;
        let rect = Rect::new(col as f32 * t, (row as f32 + 0.5) * t, t, 0.5 * t);
        Self { rect, animation: Animation::new("bounce", 4, 3, false), sounds: SoundSet::empty() }
    }

    pub fn bounce(&mut self) {
        self.animation.restart();
        self.sounds.insert(Sound::Spring);
    }
}

impl Collider for Spring {
    fn contact(&self, entity: EntityRef) -> Option<Contact> {
        Some(Contact::fixed(entity, self.rect, CollisionGroup::Springs, 0.0, CAP_SPRING))
    }
}

/// Solid block that shoots enemy bullets along its facing on a timer.
#[derive(Clone, Debug)]
pub struct Cannon {
    pub rect: Rect,
    pub facing: Facing,
    pub bullets: Vec<Bullet>,
    pub sounds: SoundSet,
    cooldown: u32,
    friction: f32,
}

impl Cannon {
    pub fn new(config: &PhysicsConfig, col: i32, row: i32, facing: Facing) -> Self {
        Self {
            rect: tile_rect(config, col, row, 1.0, 1.0),
            facing,
            bullets: Vec::new(),
            sounds: SoundSet::empty(),
            cooldown: CANNON_INTERVAL,
            friction: 0.125 * config.scale,
        }
    }

    pub fn update(&mut self, ctx: &mut StepContext<'_>, me: EntityRef) {
        self.cooldown = self.cooldown.saturating_sub(1);
        if self.cooldown == 0 {
            self.cooldown = CANNON_INTERVAL;
            self.fire(ctx.config(), me);
        }

        let EntityRef::Device(device) = me else {
            return;
        };
        for (index, bullet) in self.bullets.iter_mut().enumerate() {
            bullet.update(ctx, EntityRef::DeviceProjectile { device, index });
        }
        self.bullets.retain(|b| !b.is_finished());
    }

    fn fire(&mut self, config: &PhysicsConfig, me: EntityRef) {
        let speed = 2.0 * config.scale;
        let size = 2.0 * config.scale;
        let center = self.rect.center();
        let muzzle = Vec2::new(center.x + self.facing.sign() * (self.rect.size().x + size) * 0.5, center.y);
        let vel = Vec2::new(self.facing.sign() * speed, 0.0);
        self.bullets.push(Bullet::new(me, muzzle, vel, CollisionGroup::EnemyBullets, -1, size));
        self.sounds.insert(Sound::Shoot);
    }

    pub fn reset(&mut self) {
        self.bullets.clear();
        self.cooldown = CANNON_INTERVAL;
    }
}

impl Collider for Cannon {
    fn contact(&self, entity: EntityRef) -> Option<Contact> {
        Some(Contact::fixed(entity, self.rect, CollisionGroup::Walls, self.friction, CAP_NONE))
    }
}

#[derive(Clone, Debug)]
pub enum Device {
    Spring(Spring),
    Cannon(Cannon),
    /// Slot of a device that is stepping right now, or one the editor removed.
    Vacant,
}

impl Device {
    pub fn rect(&self) -> Option<Rect> {
        match self {
            Device::Spring(s) => Some(s.rect),
            Device::Cannon(c) => Some(c.rect),
            Device::Vacant => None,
        }
    }

    pub fn update(&mut self, ctx: &mut StepContext<'_>, me: EntityRef) {
        match self {
            Device::Spring(s) => s.animation.advance(),
            Device::Cannon(c) => c.update(ctx, me),
            Device::Vacant => {}
        }
    }

    /// Cannon bullets in flight. Springs shoot nothing.
    pub fn projectiles(&self) -> &[Bullet] {
        match self {
            Device::Cannon(c) => &c.bullets,
            _ => &[],
        }
    }

    pub fn projectiles_mut(&mut self) -> Option<&mut Vec<Bullet>> {
        match self {
            Device::Cannon(c) => Some(&mut c.bullets),
            _ => None,
        }
    }

    pub fn drain_sounds(&mut self) -> SoundSet {
        let mut sounds = match self {
            Device::Spring(s) => s.sounds.drain(),
            Device::Cannon(c) => c.sounds.drain(),
            Device::Vacant => SoundSet::empty(),
        };
        for bullet in self.projectiles_mut().into_iter().flatten() {
            sounds.merge(bullet.body.sounds.drain());
        }
        sounds
    }

    pub fn reset(&mut self) {
        match self {
            Device::Spring(s) => s.animation.restart(),
            Device::Cannon(c) => c.reset(),
            Device::Vacant => {}
        }
    }
}

impl Collider for Device {
    fn contact(&self, entity: EntityRef) -> Option<Contact> {
        match self {
            Device::Spring(s) => s.contact(entity),
            Device::Cannon(c) => c.contact(entity),
            Device::Vacant => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Room;
    use crate::systems::physics::WorldView;

    #[test]
    fn spring_occupies_lower_half_of_its_tile() {
        let config = PhysicsConfig::default();
        let spring = Spring::new(&config, 2, 3);
        assert_eq!(spring.rect, Rect::new(64.0, 112.0, 32.0, 16.0));
        assert!(spring.contact(EntityRef::Device(0)).map_or(false, |c| c.has(CAP_SPRING)));
    }

    #[test]
    fn cannon_fires_on_interval() {
        let room = Room::new(20, 10);
        let config = room.config().clone();
        let mut device = Device::Cannon(Cannon::new(&config, 1, 1, Facing::Right));
        let mut effects = Vec::new();
        let mut rng = 11;
        for _ in 0..CANNON_INTERVAL {
            let mut ctx = StepContext::new(WorldView::new(&room, None), &mut effects, &mut rng);
            device.update(&mut ctx, EntityRef::Device(0));
        }
        assert_eq!(device.projectiles().len(), 1);
        let bullet = &device.projectiles()[0];
        assert_eq!(bullet.parent(), EntityRef::Device(0));
        assert!(bullet.body.vel.x > 0.0);
        assert!(bullet.rect().left() >= 64.0);
        assert!(device.drain_sounds().contains(Sound::Shoot));
    }
}
