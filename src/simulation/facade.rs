use std::sync::Arc;

use wasm_bindgen::prelude::*;

use crate::domain::{CollisionTables, PhysicsConfig, Save};

use super::perf_stats::PerfStats;
use super::Level;

/// Browser-facing handle on a level.
#[wasm_bindgen]
pub struct World {
    level: Level,
    perf_enabled: bool,
}

#[wasm_bindgen]
impl World {
    /// Level from a tile map with the default settings and tables
    #[wasm_bindgen(constructor)]
    pub fn new(tilemap: &str) -> World {
        Self::from_level(Level::from_tilemap(
            Arc::new(PhysicsConfig::default()),
            Arc::new(CollisionTables::standard()),
            tilemap,
        ))
    }

    /// Level from a tile map with settings and tables given as JSON.
    /// An empty string keeps the defaults for that part.
    #[wasm_bindgen(js_name = withSettings)]
    pub fn with_settings(tilemap: &str, config_json: &str, tables_json: &str) -> Result<World, JsValue> {
        let config = if config_json.is_empty() {
            PhysicsConfig::default()
        } else {
            PhysicsConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let tables = if tables_json.is_empty() {
            CollisionTables::standard()
        } else {
            CollisionTables::from_json(tables_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        Ok(Self::from_level(Level::from_tilemap(Arc::new(config), Arc::new(tables), tilemap)))
    }

    /// Advance one tick
    pub fn step(&mut self) {
        if self.perf_enabled {
            self.level.current_room().enable_perf_metrics(true);
        }
        self.level.update();
    }

    pub fn reset(&mut self) {
        self.level.reset();
    }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 { self.level.frame() }

    // === CONTROLS ===

    pub fn request_run(&mut self, dir: f32) {
        self.level.player.request_run(dir);
    }

    pub fn request_jump(&mut self) {
        self.level.player.request_jump();
    }

    pub fn release_jump(&mut self) {
        self.level.player.release_jump();
    }

    pub fn request_shoot(&mut self) {
        self.level.player.request_shoot();
    }

    // === PLAYER ===

    #[wasm_bindgen(getter)]
    pub fn player_x(&self) -> f32 { self.level.player.body().pos.x }

    #[wasm_bindgen(getter)]
    pub fn player_y(&self) -> f32 { self.level.player.body().pos.y }

    #[wasm_bindgen(getter)]
    pub fn player_alive(&self) -> bool { self.level.player.alive() }

    #[wasm_bindgen(getter)]
    pub fn player_facing(&self) -> f32 { self.level.player.facing.sign() }

    #[wasm_bindgen(getter)]
    pub fn player_action(&self) -> String { self.level.player.animation.action.to_string() }

    #[wasm_bindgen(getter)]
    pub fn room_x(&self) -> i32 { self.level.player.room_x }

    #[wasm_bindgen(getter)]
    pub fn room_y(&self) -> i32 { self.level.player.room_y }

    // === EDITOR ===

    /// Add a tile code to the current room
    pub fn add_object(&mut self, col: i32, row: i32, code: char) -> bool {
        self.level.current_room().add_object(col, row, code)
    }

    /// Remove everything in a tile area of the current room
    pub fn remove_object(&mut self, col: i32, row: i32, width: u32, height: u32) -> bool {
        self.level.current_room().remove_object(col, row, width, height)
    }

    // === DATA ===

    pub fn load_tables_json(&mut self, json: &str) -> Result<(), JsValue> {
        let tables = CollisionTables::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.level.set_tables(tables);
        Ok(())
    }

    pub fn tables_json(&self) -> String {
        self.level.tables().to_json()
    }

    pub fn save_json(&self) -> String {
        self.level.player.save.to_json()
    }

    /// Replace the save snapshot and roll back to it
    pub fn load_save_json(&mut self, json: &str) -> Result<(), JsValue> {
        let save = Save::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.level.player.save = save;
        self.level.reset();
        Ok(())
    }

    /// Sound keys requested since the last call
    pub fn drain_sounds(&mut self) -> Vec<String> {
        self.level.drain_sounds().iter().map(|s| s.key().to_string()).collect()
    }

    // === PERF ===

    /// Enable or disable per-tick perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.perf_enabled = enabled;
        self.level.current_room().enable_perf_metrics(enabled);
    }

    /// Last tick perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&mut self) -> PerfStats {
        self.level.current_room().perf_stats()
    }
}

impl World {
    fn from_level(level: Level) -> Self {
        World { level, perf_enabled: false }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }
}
