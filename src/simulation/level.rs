use std::collections::HashMap;
use std::sync::Arc;

use crate::core::SoundSet;
use crate::domain::{AbilitySet, CollisionTables, Facing, PhysicsConfig, Save};
use crate::systems::entities::Player;

use super::Room;

/// Every room of a map plus the player walking through them.
pub struct Level {
    config: Arc<PhysicsConfig>,
    tables: Arc<CollisionTables>,
    rooms: HashMap<(i32, i32), Room>,
    pub player: Player,
    frame: u64,
}

impl Level {
    /// Level with no rooms; the player stands at `(x, y)` of room (0, 0).
    pub fn new(config: Arc<PhysicsConfig>, tables: Arc<CollisionTables>, x: f32, y: f32) -> Self {
        let mut player = Player::new(&config, x, y);
        player.save = Save::new(x, y, 0, 0, Facing::Right, AbilitySet::default());
        Self { config, tables, rooms: HashMap::new(), player, frame: 0 }
    }

    /// Cuts `map` into rooms of the configured size, row-major, room (0, 0)
    /// at the top left. The player starts at the first checkpoint met, or in
    /// the top-left corner when the map has none.
    pub fn from_tilemap(config: Arc<PhysicsConfig>, tables: Arc<CollisionTables>, map: &str) -> Self {
        let lines: Vec<Vec<char>> = map.lines().map(|l| l.chars().collect()).collect();
        let room_w = config.room_width.max(1) as usize;
        let room_h = config.room_height.max(1) as usize;
        let cols = lines.iter().map(Vec::len).max().unwrap_or(0);
        let rooms_x = (cols + room_w - 1) / room_w;
        let rooms_y = (lines.len() + room_h - 1) / room_h;

        let t = config.tile_size;
        let mut level = Self::new(Arc::clone(&config), Arc::clone(&tables), t, t);
        let mut spawn = None;
        for ry in 0..rooms_y {
            for rx in 0..rooms_x {
                let mut room = Room::with_config(Arc::clone(&config), Arc::clone(&tables), rx as i32, ry as i32);
                for (row, line) in lines.iter().skip(ry * room_h).take(room_h).enumerate() {
                    for (col, &code) in line.iter().skip(rx * room_w).take(room_w).enumerate() {
                        room.add_object(col as i32, row as i32, code);
                    }
                }
                if spawn.is_none() {
                    if let Some(checkpoint) = room.checkpoints.first() {
                        let pos = checkpoint.spawn_point(level.player.body().size);
                        spawn = Some((pos, rx as i32, ry as i32));
                    }
                }
                level.rooms.insert((rx as i32, ry as i32), room);
            }
        }

        if let Some((pos, rx, ry)) = spawn {
            level.player.save = Save::new(pos.x, pos.y, rx, ry, Facing::Right, AbilitySet::default());
            level.player.reset();
        }
        log::debug!("level: {} rooms, player in room ({}, {})", level.rooms.len(), level.player.room_x, level.player.room_y);
        level
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn tables(&self) -> &CollisionTables {
        &self.tables
    }

    /// Swaps the collision tables of every room, present and future.
    pub fn set_tables(&mut self, tables: CollisionTables) {
        self.tables = Arc::new(tables);
        for room in self.rooms.values_mut() {
            room.set_tables(Arc::clone(&self.tables));
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn room(&self, x: i32, y: i32) -> Option<&Room> {
        self.rooms.get(&(x, y))
    }

    /// Room at `(x, y)`, created empty when the map has none there.
    pub fn room_mut(&mut self, x: i32, y: i32) -> &mut Room {
        let (config, tables) = (&self.config, &self.tables);
        self.rooms
            .entry((x, y))
            .or_insert_with(|| Room::with_config(Arc::clone(config), Arc::clone(tables), x, y))
    }

    /// The room the player is in.
    pub fn current_room(&mut self) -> &mut Room {
        let (x, y) = (self.player.room_x, self.player.room_y);
        self.room_mut(x, y)
    }

    /// One tick: the current room, then the player, then the room change if
    /// the player left through an edge. The entered room starts from spawn state.
    pub fn update(&mut self) {
        let key = (self.player.room_x, self.player.room_y);
        let (config, tables) = (&self.config, &self.tables);
        let room = self
            .rooms
            .entry(key)
            .or_insert_with(|| Room::with_config(Arc::clone(config), Arc::clone(tables), key.0, key.1));
        room.update(Some(&mut self.player));
        room.update_player(&mut self.player);

        if self.player.alive() {
            if let Some((x, y)) = self.player.change_room(&self.config) {
                log::info!("player entered room ({}, {})", x, y);
                self.room_mut(x, y).reset();
            }
        }
        self.frame += 1;
    }

    /// Rolls the player back to the last save and restarts that room.
    pub fn reset(&mut self) {
        self.player.reset();
        self.current_room().reset();
    }

    /// Sounds of the current room and the player.
    pub fn drain_sounds(&mut self) -> SoundSet {
        let mut sounds = self.current_room().drain_sounds();
        sounds.merge(self.player.drain_sounds());
        sounds
    }
}
