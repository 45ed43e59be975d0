//! Rooms and levels.
//!
//! A `Room` owns every tile and entity of one screen and advances them in a
//! fixed order each tick. A `Level` owns the rooms of a map together with the
//! player and moves the player between them.
//!
//! Implementation is split the same way the tick is:
//! - init/     - construction from tile codes
//! - commands/ - editor mutations
//! - step/     - tick order and effect application
//! - perf/     - optional timings

use std::sync::Arc;

use crate::core::{Rect, SoundSet};
use crate::domain::{CollisionTables, PhysicsConfig};
use crate::spatial::TileGrid;
use crate::systems::entities::{
    Boss, Checkpoint, Device, DynamicObject, Enemy, Hazard, Ladder, Player, Powerup, Wall, WallKind, Water,
};

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "init/init.rs"]
mod init;
#[path = "commands/commands.rs"]
mod commands;
#[path = "step/step.rs"]
mod step;
#[path = "step/effects.rs"]
mod effects;
mod facade;
mod level;

pub use facade::World;
pub use level::Level;
pub use perf_stats::PerfStats;

use perf_timer::PerfTimer;

const DEFAULT_SEED: u32 = 12345;

/// One screen of a level.
pub struct Room {
    config: Arc<PhysicsConfig>,
    tables: Arc<CollisionTables>,
    x: i32,
    y: i32,

    pub(crate) walls: TileGrid<Wall>,
    pub(crate) hazards: Vec<Hazard>,
    pub(crate) ladders: Vec<Ladder>,
    pub(crate) checkpoints: Vec<Checkpoint>,
    pub(crate) powerups: Vec<Powerup>,
    pub(crate) water: Vec<Water>,
    pub(crate) dynamic_objects: Vec<DynamicObject>,
    pub(crate) devices: Vec<Device>,
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) boss: Option<Boss>,

    /// Sounds of things that have no body of their own (breaking blocks).
    sounds: SoundSet,
    rng_state: u32,
    frame: u64,

    perf_enabled: bool,
    perf_stats: PerfStats,
}

impl Room {
    /// Empty room of `width` x `height` tiles with the default settings and tables.
    pub fn new(width: u32, height: u32) -> Self {
        let config = PhysicsConfig { room_width: width, room_height: height, ..PhysicsConfig::default() };
        Self::with_config(Arc::new(config), Arc::new(CollisionTables::standard()), 0, 0)
    }

    /// Empty room at level coordinates `(x, y)`, sized by `config`.
    pub fn with_config(config: Arc<PhysicsConfig>, tables: Arc<CollisionTables>, x: i32, y: i32) -> Self {
        init::create_room(config, tables, x, y)
    }

    /// Room at `(x, y)` built from rows of tile codes.
    pub fn from_tilemap(config: Arc<PhysicsConfig>, tables: Arc<CollisionTables>, x: i32, y: i32, map: &str) -> Self {
        let mut room = Self::with_config(config, tables, x, y);
        room.load_tilemap(map);
        room
    }

    /// Adds every tile of `map`, one row per line. Returns how many codes were accepted.
    pub fn load_tilemap(&mut self, map: &str) -> usize {
        init::load_tilemap(self, map)
    }

    #[inline]
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    #[inline]
    pub fn tables(&self) -> &CollisionTables {
        &self.tables
    }

    pub fn set_tables(&mut self, tables: Arc<CollisionTables>) {
        self.tables = tables;
    }

    /// Level coordinates of this room.
    pub fn coords(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn width(&self) -> u32 {
        self.walls.width()
    }

    pub fn height(&self) -> u32 {
        self.walls.height()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Whether the pixel `(x, y)` lies inside a wall tile.
    pub fn wall_at_point(&self, x: f32, y: f32) -> bool {
        let tile = self.config.tile_size;
        self.walls.is_occupied((x / tile).floor() as i32, (y / tile).floor() as i32)
    }

    /// Adds the thing a tile code stands for at `(col, row)`. Unknown codes are ignored.
    pub fn add_object(&mut self, col: i32, row: i32, code: char) -> bool {
        init::add_object(self, col, row, code)
    }

    pub fn add_wall(&mut self, col: i32, row: i32, kind: WallKind) -> bool {
        init::add_wall(self, col, row, kind)
    }

    pub fn add_dynamic(&mut self, object: DynamicObject) -> usize {
        self.dynamic_objects.push(object);
        self.dynamic_objects.len() - 1
    }

    pub fn add_device(&mut self, device: Device) -> usize {
        self.devices.push(device);
        self.devices.len() - 1
    }

    pub fn spawn_enemy(&mut self, enemy: Enemy) -> usize {
        self.enemies.push(enemy);
        self.enemies.len() - 1
    }

    pub fn set_boss(&mut self, boss: Boss) {
        self.boss = Some(boss);
    }

    /// Removes everything overlapping the `width` x `height` tile area at `(col, row)`.
    pub fn remove_object(&mut self, col: i32, row: i32, width: u32, height: u32) -> bool {
        commands::remove_object(self, col, row, width, height)
    }

    /// Advances every room entity once, in the fixed room order. The player is
    /// only observed here; it takes its own turn in `update_player`.
    pub fn update(&mut self, player: Option<&mut Player>) {
        step::update(self, player);
    }

    /// The player's turn in this room.
    pub fn update_player(&mut self, player: &mut Player) {
        step::update_player(self, player);
    }

    /// Restores enemies, objects, devices and the boss to their spawn state.
    /// Static tiles and checkpoints are kept.
    pub fn reset(&mut self) {
        log::debug!("reset room ({}, {})", self.x, self.y);
        for enemy in self.enemies.iter_mut() {
            enemy.reset();
        }
        for object in self.dynamic_objects.iter_mut() {
            object.reset();
        }
        for device in self.devices.iter_mut() {
            device.reset();
        }
        if let Some(boss) = self.boss.as_mut() {
            boss.reset();
        }
        self.sounds = SoundSet::empty();
    }

    /// Union of every sound requested in this room since the last drain.
    pub fn drain_sounds(&mut self) -> SoundSet {
        let mut sounds = self.sounds.drain();
        for enemy in self.enemies.iter_mut() {
            sounds.merge(enemy.drain_sounds());
        }
        for object in self.dynamic_objects.iter_mut() {
            match object {
                DynamicObject::Platform(p) => sounds.merge(p.body.sounds.drain()),
                DynamicObject::FallingPlatform(p) => sounds.merge(p.body.sounds.drain()),
                _ => {}
            }
        }
        for device in self.devices.iter_mut() {
            sounds.merge(device.drain_sounds());
        }
        if let Some(boss) = self.boss.as_mut() {
            sounds.merge(boss.drain_sounds());
        }
        sounds
    }

    pub fn walls(&self) -> &TileGrid<Wall> {
        &self.walls
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn ladders(&self) -> &[Ladder] {
        &self.ladders
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn powerups(&self) -> &[Powerup] {
        &self.powerups
    }

    pub fn water(&self) -> &[Water] {
        &self.water
    }

    pub fn dynamic_objects(&self) -> &[DynamicObject] {
        &self.dynamic_objects
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn boss(&self) -> Option<&Boss> {
        self.boss.as_ref()
    }

    /// Enable or disable per-tick perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.perf_enabled = enabled;
        if !enabled {
            self.perf_stats.reset();
        }
    }

    /// Last tick's perf snapshot (zeros when perf disabled)
    pub fn perf_stats(&self) -> PerfStats {
        self.perf_stats.clone()
    }

    /// Pixel rectangle of the whole room.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.config.room_pixel_width(), self.config.room_pixel_height())
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
