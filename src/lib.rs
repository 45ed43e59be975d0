//! Platformer Engine - kinematic physics and collision core for a tile-based platformer
//!
//! Every tick each room entity moves through the tile-and-object world one
//! axis at a time, resolves overlaps against what its collision group may
//! touch, and derives grounded/walled/ceilinged state, friction, bounce and
//! damage from those resolutions.
//!
//! Architecture:
//! - core/       - Geometry, RNG, sound intents, animation frames
//! - domain/     - Collision groups and tables, settings, abilities, saves
//! - spatial/    - Tile grid
//! - systems/    - Physics (bodies, queries, effects) and room entities
//! - simulation/ - Rooms, levels, wasm facade

pub mod core;
pub mod spatial;
pub mod domain;
pub mod systems;
pub mod simulation;

pub use systems::entities;
pub use systems::physics;

use wasm_bindgen::prelude::*;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    web_sys::console::log_1(&format!("platformer engine {} initialized", version()).into());
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use domain::{CollisionGroup, CollisionTables, ConfigError, PhysicsConfig};
pub use simulation::{Level, PerfStats, Room, World};
