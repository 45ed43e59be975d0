//! Overlap queries against a room.
//!
//! A query returns every entity whose rectangle overlaps the candidate,
//! without looking at collision groups. Movers filter the result through
//! `CollisionTables::can_collide` before treating anything as an obstacle.

use crate::core::{Rect, Vec2};
use crate::domain::CollisionGroup;
use crate::simulation::Room;
use crate::systems::entities::Player;

use super::perf::count_query;

/// Capability flags attached to a contact. Effects are dispatched on these,
/// never on the concrete entity type.
pub type Capabilities = u16;

pub const CAP_NONE: Capabilities = 0;
/// Moves on its own; its velocity counts towards relative speed.
pub const CAP_KINEMATIC: Capabilities = 1 << 0;
/// Riders adopt its velocity as carried velocity.
pub const CAP_PLATFORM: Capabilities = 1 << 1;
pub const CAP_SPRING: Capabilities = 1 << 2;
pub const CAP_DESTRUCTIBLE: Capabilities = 1 << 3;
/// Accepts impact damage.
pub const CAP_DAMAGEABLE: Capabilities = 1 << 4;
/// Gets pushed back by impacts.
pub const CAP_KNOCKBACK: Capabilities = 1 << 5;
/// Kills the player on contact.
pub const CAP_HARMFUL: Capabilities = 1 << 6;
/// Static damaging tile (spikes).
pub const CAP_HAZARD: Capabilities = 1 << 7;

/// Stable name of an entity slot inside a room (or the level's player).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Wall { col: u32, row: u32 },
    Hazard(usize),
    Dynamic(usize),
    Device(usize),
    DeviceProjectile { device: usize, index: usize },
    Enemy(usize),
    EnemyProjectile { enemy: usize, index: usize },
    Boss,
    Player,
    PlayerProjectile(usize),
    /// Cosmetic bodies and probes that nothing can address.
    Detached,
}

/// Snapshot of an overlapping entity, taken when the query ran.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub entity: EntityRef,
    pub rect: Rect,
    pub group: CollisionGroup,
    /// Zero for anything that is not kinematic.
    pub velocity: Vec2,
    pub friction: f32,
    pub caps: Capabilities,
}

impl Contact {
    pub fn fixed(entity: EntityRef, rect: Rect, group: CollisionGroup, friction: f32, caps: Capabilities) -> Self {
        Self { entity, rect, group, velocity: Vec2::zero(), friction, caps }
    }

    #[inline]
    pub fn has(&self, cap: Capabilities) -> bool {
        self.caps & cap != 0
    }
}

/// Anything the query can report. Inactive entities (dead, destroyed, vacant slots) return `None`.
pub trait Collider {
    fn contact(&self, entity: EntityRef) -> Option<Contact>;
}

/// Read-only view of the world a mover is resolved against.
#[derive(Clone, Copy)]
pub struct WorldView<'a> {
    pub room: &'a Room,
    pub player: Option<&'a Player>,
}

impl<'a> WorldView<'a> {
    pub fn new(room: &'a Room, player: Option<&'a Player>) -> Self {
        Self { room, player }
    }
}

/// Every entity overlapping `rect`, in a fixed order: walls, hazards (only when no wall
/// overlapped), dynamic objects, devices and enemies each followed by their projectiles,
/// the boss, the player.
///
/// `requester` is never reported, nor are projectiles whose parent is `requester`.
/// `exclude` removes one more entity (a projectile's parent).
pub fn query_overlaps(world: &WorldView<'_>, rect: &Rect, requester: EntityRef, exclude: Option<EntityRef>) -> Vec<Contact> {
    let room = world.room;
    let mut found = Vec::new();
    let push = |contact: Option<Contact>, found: &mut Vec<Contact>| {
        if let Some(contact) = contact {
            if contact.entity != requester && Some(contact.entity) != exclude && contact.rect.overlaps(rect) {
                found.push(contact);
            }
        }
    };

    let tile = room.config().tile_size;
    let col0 = (rect.left() / tile).floor() as i32 - 1;
    let row0 = (rect.top() / tile).floor() as i32 - 1;
    let col1 = (rect.right() / tile).floor() as i32 + 1;
    let row1 = (rect.bottom() / tile).floor() as i32 + 1;
    for (col, row, wall) in room.walls.region(col0, row0, col1, row1) {
        push(wall.contact(EntityRef::Wall { col, row }), &mut found);
    }

    if found.is_empty() {
        for (i, hazard) in room.hazards.iter().enumerate() {
            push(hazard.contact(EntityRef::Hazard(i)), &mut found);
        }
    }

    for (i, object) in room.dynamic_objects.iter().enumerate() {
        push(object.contact(EntityRef::Dynamic(i)), &mut found);
    }

    for (i, device) in room.devices.iter().enumerate() {
        push(device.contact(EntityRef::Device(i)), &mut found);
        if requester == EntityRef::Device(i) {
            continue;
        }
        for (j, bullet) in device.projectiles().iter().enumerate() {
            push(bullet.contact(EntityRef::DeviceProjectile { device: i, index: j }), &mut found);
        }
    }

    for (i, enemy) in room.enemies.iter().enumerate() {
        push(enemy.contact(EntityRef::Enemy(i)), &mut found);
        if requester == EntityRef::Enemy(i) {
            continue;
        }
        for (j, projectile) in enemy.projectiles.iter().enumerate() {
            push(projectile.contact(EntityRef::EnemyProjectile { enemy: i, index: j }), &mut found);
        }
    }

    if let Some(boss) = room.boss.as_ref() {
        push(boss.contact(EntityRef::Boss), &mut found);
    }

    if let Some(player) = world.player {
        push(player.contact(EntityRef::Player), &mut found);
    }

    count_query(found.len());
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::entities::{Bullet, Enemy, EnemyProjectile, WallKind};

    #[test]
    fn walls_shadow_hazards() {
        let mut room = Room::new(10, 10);
        room.add_wall(1, 1, WallKind::Wall);
        room.add_object(2, 1, '*');
        let world = WorldView::new(&room, None);

        let both = Rect::new(40.0, 40.0, 40.0, 8.0);
        let hits = query_overlaps(&world, &both, EntityRef::Detached, None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entity, EntityRef::Wall { col: 1, row: 1 });

        let spike_only = Rect::new(70.0, 40.0, 8.0, 8.0);
        let hits = query_overlaps(&world, &spike_only, EntityRef::Detached, None);
        assert_eq!(hits.len(), 1);
        assert!(hits[0].has(CAP_HAZARD));
    }

    #[test]
    fn query_near_grid_edge_is_safe() {
        let mut room = Room::new(2, 2);
        room.add_wall(0, 0, WallKind::Wall);
        let world = WorldView::new(&room, None);
        let far = Rect::new(-500.0, -500.0, 16.0, 16.0);
        assert!(query_overlaps(&world, &far, EntityRef::Detached, None).is_empty());
        let corner = Rect::new(-4.0, -4.0, 8.0, 8.0);
        assert_eq!(query_overlaps(&world, &corner, EntityRef::Detached, None).len(), 1);
    }

    #[test]
    fn parent_and_own_projectiles_are_hidden() {
        let mut room = Room::new(10, 10);
        let enemy = Enemy::zombie(room.config(), 64.0, 64.0);
        let rect = enemy.rect();
        room.spawn_enemy(enemy);
        let bullet = Bullet::new(EntityRef::Enemy(0), rect.center(), Vec2::new(8.0, 0.0), CollisionGroup::EnemyBullets, -1, 4.0);
        room.enemies[0].projectiles.push(EnemyProjectile::Bullet(bullet));
        let world = WorldView::new(&room, None);

        let from_enemy = query_overlaps(&world, &rect, EntityRef::Enemy(0), None);
        assert!(from_enemy.is_empty());

        let me = EntityRef::EnemyProjectile { enemy: 0, index: 0 };
        let from_bullet = query_overlaps(&world, &rect, me, Some(EntityRef::Enemy(0)));
        assert!(from_bullet.is_empty());

        let bystander = query_overlaps(&world, &rect, EntityRef::Detached, None);
        assert_eq!(bystander.len(), 2);
        assert_eq!(bystander[0].entity, EntityRef::Enemy(0));
        assert_eq!(bystander[1].entity, me);
    }
}
