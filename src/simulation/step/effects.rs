use std::sync::Arc;

use crate::core::{Sound, Vec2};
use crate::systems::entities::{Device, DynamicObject, EnemyProjectile, Player};
use crate::systems::physics::{Effect, EntityRef};

use super::Room;

/// Applies and clears the queued effects. Targets that no longer exist, or
/// that do not accept the effect, are skipped. Returns how many were applied.
pub(super) fn apply_effects(room: &mut Room, mut player: Option<&mut Player>, effects: &mut Vec<Effect>) -> usize {
    let mut applied = 0;
    for effect in effects.drain(..) {
        let done = match effect {
            Effect::Damage { target, amount, knockback } => damage(room, player.as_deref_mut(), target, amount, knockback),
            Effect::Destroy { target } => destroy(room, target),
            Effect::SpringBounce { target: EntityRef::Device(i) } => match room.devices.get_mut(i) {
                Some(Device::Spring(spring)) => {
                    spring.bounce();
                    true
                }
                _ => false,
            },
            Effect::SpringBounce { .. } => false,
            Effect::Carry { target: EntityRef::Player, velocity } => match player.as_deref_mut() {
                Some(p) => {
                    p.body_mut().base = velocity;
                    true
                }
                None => false,
            },
            Effect::Carry { .. } => false,
            Effect::Sound { target, sound } => {
                play(room, player.as_deref_mut(), target, sound);
                true
            }
            Effect::ActivateCheckpoint { index } => {
                if index < room.checkpoints.len() {
                    for (i, checkpoint) in room.checkpoints.iter_mut().enumerate() {
                        checkpoint.active = i == index;
                    }
                    true
                } else {
                    false
                }
            }
        };
        if done {
            applied += 1;
        }
    }
    applied
}

fn damage(room: &mut Room, player: Option<&mut Player>, target: EntityRef, amount: i32, knockback: Vec2) -> bool {
    let config = Arc::clone(&room.config);
    let rng = &mut room.rng_state;
    match target {
        EntityRef::Enemy(i) => match room.enemies.get_mut(i) {
            Some(enemy) => {
                enemy.hurt(amount, knockback, &config, rng);
                true
            }
            None => false,
        },
        EntityRef::EnemyProjectile { enemy, index } => {
            let projectile = room.enemies.get_mut(enemy).and_then(|e| e.projectiles.get_mut(index));
            match projectile {
                Some(EnemyProjectile::Chaser(chaser)) => {
                    chaser.hurt(amount, knockback, &config, rng);
                    true
                }
                _ => false,
            }
        }
        EntityRef::Boss => match room.boss.as_mut() {
            Some(boss) => {
                boss.hurt(amount, knockback, &config, rng);
                true
            }
            None => false,
        },
        EntityRef::Player => match player {
            Some(p) => {
                p.hurt(amount, knockback, &config, rng);
                true
            }
            None => false,
        },
        _ => false,
    }
}

fn destroy(room: &mut Room, target: EntityRef) -> bool {
    let EntityRef::Dynamic(i) = target else {
        return false;
    };
    let config = Arc::clone(&room.config);
    match room.dynamic_objects.get_mut(i) {
        Some(DynamicObject::Destructible(block)) => {
            let broke = block.destroy(&config, &mut room.rng_state);
            if broke {
                room.sounds.insert(Sound::Break);
            }
            broke
        }
        _ => false,
    }
}

/// Sounds land on the target's body when it has one, on the room otherwise.
fn play(room: &mut Room, player: Option<&mut Player>, target: EntityRef, sound: Sound) {
    let body = match target {
        EntityRef::Player => player.map(|p| p.body_mut()),
        EntityRef::Enemy(i) => room.enemies.get_mut(i).map(|e| &mut e.creature.body),
        EntityRef::Boss => room.boss.as_mut().map(|b| &mut b.creature.body),
        _ => None,
    };
    match body {
        Some(body) => body.sounds.insert(sound),
        None => room.sounds.insert(sound),
    }
}
