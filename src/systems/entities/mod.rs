//! Everything that lives in a room: tiles, devices, platforms, creatures and what they shoot.

mod boss;
mod creature;
mod debris;
mod devices;
mod enemy;
mod objects;
mod platform;
mod player;
mod projectile;
mod tiles;

pub use boss::{Boss, BOSS_HEALTH};
pub use creature::Creature;
pub use debris::{Debris, Gib};
pub use devices::{Cannon, Device, Spring, CANNON_INTERVAL};
pub use enemy::{Enemy, EnemyKind, EnemyProjectile, MAX_CHASERS, SPAWN_INTERVAL};
pub use objects::DynamicObject;
pub use platform::{FallState, FallingPlatform, MovingPlatform, FALL_DELAY};
pub use player::{Player, FULL_AUTO_COOLDOWN, GUN_COOLDOWN};
pub use projectile::{Bullet, Particle, ParticleKind};
pub use tiles::{tile_rect, Checkpoint, Destructible, Hazard, Ladder, Powerup, Wall, WallKind, Water};
