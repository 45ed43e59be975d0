//! Domain data: collision groups and tables, physics settings, abilities, save snapshots.

pub mod abilities;
pub mod config;
pub mod error;
pub mod groups;
pub mod save;
pub mod tables;

pub use abilities::{Ability, AbilitySet};
pub use config::{PhysicsConfig, SCALE};
pub use error::ConfigError;
pub use groups::{CollisionGroup, Direction, Facing, GROUP_COUNT};
pub use save::Save;
pub use tables::CollisionTables;
