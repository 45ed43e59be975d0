use std::sync::Arc;

use crate::domain::{Ability, CollisionTables, Facing, PhysicsConfig};
use crate::spatial::TileGrid;
use crate::systems::entities::{
    tile_rect, Boss, Cannon, Checkpoint, Destructible, Device, DynamicObject, Enemy, FallingPlatform, Hazard,
    Ladder, MovingPlatform, Powerup, Spring, Wall, WallKind, Water,
};

use super::perf_stats::PerfStats;
use super::{Room, DEFAULT_SEED};

pub(super) fn create_room(config: Arc<PhysicsConfig>, tables: Arc<CollisionTables>, x: i32, y: i32) -> Room {
    log::debug!("room ({}, {}): {}x{} tiles", x, y, config.room_width, config.room_height);
    Room {
        walls: TileGrid::new(config.room_width, config.room_height),
        config,
        tables,
        x,
        y,
        hazards: Vec::new(),
        ladders: Vec::new(),
        checkpoints: Vec::new(),
        powerups: Vec::new(),
        water: Vec::new(),
        dynamic_objects: Vec::new(),
        devices: Vec::new(),
        enemies: Vec::new(),
        boss: None,
        sounds: Default::default(),
        rng_state: DEFAULT_SEED ^ (x as u32).wrapping_mul(73_856_093) ^ (y as u32).wrapping_mul(19_349_663),
        frame: 0,
        perf_enabled: false,
        perf_stats: PerfStats::default(),
    }
}

pub(super) fn load_tilemap(room: &mut Room, map: &str) -> usize {
    let mut accepted = 0;
    for (row, line) in map.lines().enumerate() {
        for (col, code) in line.chars().enumerate() {
            if room.add_object(col as i32, row as i32, code) {
                accepted += 1;
            }
        }
    }
    accepted
}

pub(super) fn add_object(room: &mut Room, col: i32, row: i32, code: char) -> bool {
    if !room.walls.in_bounds(col, row) {
        return false;
    }
    if let Some(kind) = WallKind::from_code(code) {
        return add_wall(room, col, row, kind);
    }

    let config = Arc::clone(&room.config);
    match code {
        'P' | 'V' => {
            room.add_dynamic(DynamicObject::Platform(MovingPlatform::from_tile(&config, col, row, code == 'V')));
        }
        'F' => {
            room.add_dynamic(DynamicObject::FallingPlatform(FallingPlatform::new(&config, col, row)));
        }
        'D' => {
            room.add_dynamic(DynamicObject::Destructible(Destructible::new(&config, col, row)));
        }
        '#' => {
            room.ladders.push(Ladder { rect: tile_rect(&config, col, row, 1.0, 1.0), top: false });
            refresh_ladders(room);
        }
        '~' => {
            room.water.push(Water::new(&config, col, row));
            refresh_water(room);
        }
        'C' => room.checkpoints.push(Checkpoint::new(&config, col, row)),
        '*' => room.hazards.push(Hazard::spike(&config, col, row)),
        '^' => {
            room.add_device(Device::Spring(Spring::new(&config, col, row)));
        }
        '<' | '>' => {
            let facing = if code == '<' { Facing::Left } else { Facing::Right };
            room.add_device(Device::Cannon(Cannon::new(&config, col, row, facing)));
        }
        'B' => room.set_boss(Boss::from_tile(&config, col, row)),
        _ => {
            if let Some(enemy) = Enemy::from_code(&config, code, col, row) {
                room.spawn_enemy(enemy);
            } else if let Some(ability) = code.to_digit(10).and_then(Ability::from_digit) {
                room.powerups.push(Powerup::new(&config, col, row, ability));
            } else {
                log::trace!("ignored tile code {:?} at ({}, {})", code, col, row);
                return false;
            }
        }
    }
    true
}

/// One wall per cell; a second wall code on an occupied cell is ignored.
pub(super) fn add_wall(room: &mut Room, col: i32, row: i32, kind: WallKind) -> bool {
    let wall = Wall::new(&room.config, kind, col, row);
    if !room.walls.insert(col, row, wall) {
        return false;
    }
    refresh_autotile(room, col, row);
    true
}

const NEIGHBOURS: [(i32, i32, u8); 4] = [(0, -1, 1), (1, 0, 2), (0, 1, 4), (-1, 0, 8)];

/// Recomputes the neighbour masks of `(col, row)` and the four cells around it.
pub(super) fn refresh_autotile(room: &mut Room, col: i32, row: i32) {
    for (dc, dr) in [(0, 0), (0, -1), (1, 0), (0, 1), (-1, 0)] {
        let (c, r) = (col + dc, row + dr);
        let mask = NEIGHBOURS
            .iter()
            .filter(|(nc, nr, _)| room.walls.is_occupied(c + nc, r + nr))
            .fold(0, |mask, (_, _, bit)| mask | bit);
        if let Some(wall) = room.walls.get_mut(c, r) {
            wall.autotile = mask;
        }
    }
}

/// A ladder is a top rung unless another ladder sits right above it.
pub(super) fn refresh_ladders(room: &mut Room) {
    let rects: Vec<_> = room.ladders.iter().map(|l| l.rect).collect();
    for ladder in room.ladders.iter_mut() {
        let above = ladder.rect.top() - ladder.rect.size().y;
        ladder.top = !rects.iter().any(|r| r.left() == ladder.rect.left() && r.top() == above);
    }
}

/// Water is a surface tile unless more water sits right above it.
pub(super) fn refresh_water(room: &mut Room) {
    let rects: Vec<_> = room.water.iter().map(|w| w.rect).collect();
    for water in room.water.iter_mut() {
        let above = water.rect.top() - water.rect.size().y;
        water.surface = !rects.iter().any(|r| r.left() == water.rect.left() && r.top() == above);
    }
}
