//! Static tiles and tile-sized room furniture.

use crate::core::{random_range, Animation, Rect, Vec2};
use crate::domain::{Ability, CollisionGroup, PhysicsConfig};
use crate::systems::physics::{
    Collider, Contact, EntityRef, StepContext, CAP_DESTRUCTIBLE, CAP_HARMFUL, CAP_HAZARD, CAP_NONE,
};

use super::debris::Debris;

pub const DESTRUCTIBLE_DEBRIS: usize = 4;

/// Wall surface material.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallKind {
    Wall,
    Ground,
    Rock,
    Metal,
    Ice,
}

impl WallKind {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'W' => Some(WallKind::Wall),
            'G' => Some(WallKind::Ground),
            'R' => Some(WallKind::Rock),
            'M' => Some(WallKind::Metal),
            'I' => Some(WallKind::Ice),
            _ => None,
        }
    }

    pub fn friction(self, config: &PhysicsConfig) -> f32 {
        match self {
            WallKind::Ice => 0.01 * config.scale,
            _ => 0.125 * config.scale,
        }
    }
}

pub fn tile_rect(config: &PhysicsConfig, col: i32, row: i32, cols: f32, rows: f32) -> Rect {
    let t = config.tile_size;
    Rect::new(col as f32 * t, row as f32 * t, cols * t, rows * t)
}

#[derive(Clone, Debug)]
pub struct Wall {
    pub kind: WallKind,
    pub rect: Rect,
    pub friction: f32,
    /// Neighbour mask for autotiling: up 1, right 2, down 4, left 8.
    pub autotile: u8,
}

impl Wall {
    pub fn new(config: &PhysicsConfig, kind: WallKind, col: i32, row: i32) -> Self {
        Self { kind, rect: tile_rect(config, col, row, 1.0, 1.0), friction: kind.friction(config), autotile: 0 }
    }
}

impl Collider for Wall {
    fn contact(&self, entity: EntityRef) -> Option<Contact> {
        Some(Contact::fixed(entity, self.rect, CollisionGroup::Walls, self.friction, CAP_NONE))
    }
}

/// Spike tile. Blocks like a wall and hurts whatever touches it.
#[derive(Clone, Debug)]
pub struct Hazard {
    pub rect: Rect,
    pub friction: f32,
}

impl Hazard {
    pub fn spike(config: &PhysicsConfig, col: i32, row: i32) -> Self {
        Self { rect: tile_rect(config, col, row, 1.0, 1.0), friction: 0.125 * config.scale }
    }
}

impl Collider for Hazard {
    fn contact(&self, entity: EntityRef) -> Option<Contact> {
        Some(Contact::fixed(entity, self.rect, CollisionGroup::Walls, self.friction, CAP_HAZARD | CAP_HARMFUL))
    }
}

#[derive(Clone, Debug)]
pub struct Ladder {
    pub rect: Rect,
    pub top: bool,
}

#[derive(Clone, Debug)]
pub struct Checkpoint {
    pub rect: Rect,
    pub active: bool,
    pub animation: Animation,
}

impl Checkpoint {
    pub fn new(config: &PhysicsConfig, col: i32, row: i32) -> Self {
        Self { rect: tile_rect(config, col, row, 1.0, 2.0), active: false, animation: Animation::new("idle", 4, 8, true) }
    }

    /// Where a player of `size` respawns: centred, feet on the checkpoint's base.
    pub fn spawn_point(&self, size: Vec2) -> Vec2 {
        Vec2::new(self.rect.center().x - size.x * 0.5, self.rect.bottom() - size.y)
    }

    pub fn update(&mut self) {
        self.animation.play(if self.active { "active" } else { "idle" });
        self.animation.advance();
    }
}

#[derive(Clone, Debug)]
pub struct Water {
    pub rect: Rect,
    pub surface: bool,
    pub animation: Animation,
}

impl Water {
    pub fn new(config: &PhysicsConfig, col: i32, row: i32) -> Self {
        Self { rect: tile_rect(config, col, row, 1.0, 1.0), surface: false, animation: Animation::new("body", 4, 10, true) }
    }

    pub fn update(&mut self) {
        self.animation.play(if self.surface { "surface" } else { "body" });
        self.animation.advance();
    }
}

#[derive(Clone, Debug)]
pub struct Powerup {
    pub rect: Rect,
    pub ability: Ability,
    pub visible: bool,
    pub animation: Animation,
}

impl Powerup {
    pub fn new(config: &PhysicsConfig, col: i32, row: i32, ability: Ability) -> Self {
        Self { rect: tile_rect(config, col, row, 1.0, 1.0), ability, visible: true, animation: Animation::new("idle", 4, 6, true) }
    }

    pub fn update(&mut self, owned: bool) {
        self.visible = !owned;
        self.animation.advance();
    }
}

/// Breakable block. Solid until shot, then crumbles into debris until reset.
#[derive(Clone, Debug)]
pub struct Destructible {
    pub rect: Rect,
    pub destroyed: bool,
    pub debris: Vec<Debris>,
    friction: f32,
}

impl Destructible {
    pub fn new(config: &PhysicsConfig, col: i32, row: i32) -> Self {
        Self { rect: tile_rect(config, col, row, 1.0, 1.0), destroyed: false, debris: Vec::new(), friction: 0.125 * config.scale }
    }

    pub fn destroy(&mut self, config: &PhysicsConfig, rng: &mut u32) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        let center = self.rect.center();
        let offset = 5.0;
        for (sx, sy) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
            let pos = Vec2::new(center.x + sx * offset, center.y + sy * offset);
            let vel = Vec2::new(sx * random_range(rng, 0.5, 1.0) * config.scale, -random_range(rng, 1.0, 2.0) * config.scale);
            self.debris.push(Debris::new(config, pos, vel));
        }
        true
    }

    pub fn update(&mut self, ctx: &mut StepContext<'_>) {
        for piece in self.debris.iter_mut() {
            piece.update(ctx);
        }
        self.debris.retain(|d| d.alive);
    }

    pub fn reset(&mut self) {
        self.destroyed = false;
        self.debris.clear();
    }
}

impl Collider for Destructible {
    fn contact(&self, entity: EntityRef) -> Option<Contact> {
        if self.destroyed {
            return None;
        }
        Some(Contact::fixed(entity, self.rect, CollisionGroup::Walls, self.friction, CAP_DESTRUCTIBLE))
    }
}
