use crate::core::{random_range, Rect};
use crate::domain::{CollisionTables, PhysicsConfig};

use super::effects::Effect;
use super::query::{query_overlaps, Contact, EntityRef, WorldView};

/// Everything a mover may touch during its turn.
pub struct StepContext<'a> {
    pub world: WorldView<'a>,
    pub effects: &'a mut Vec<Effect>,
    pub rng: &'a mut u32,
}

impl<'a> StepContext<'a> {
    pub fn new(world: WorldView<'a>, effects: &'a mut Vec<Effect>, rng: &'a mut u32) -> Self {
        Self { world, effects, rng }
    }

    #[inline]
    pub fn config(&self) -> &'a PhysicsConfig {
        self.world.room.config()
    }

    #[inline]
    pub fn tables(&self) -> &'a CollisionTables {
        self.world.room.tables()
    }

    pub fn query(&self, rect: &Rect, requester: EntityRef, exclude: Option<EntityRef>) -> Vec<Contact> {
        query_overlaps(&self.world, rect, requester, exclude)
    }

    #[inline]
    pub fn emit(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn random(&mut self, low: f32, high: f32) -> f32 {
        random_range(self.rng, low, high)
    }

    /// Whether `rect` is completely outside the room.
    pub fn is_off_room(&self, rect: &Rect) -> bool {
        let config = self.config();
        rect.right() < 0.0
            || rect.left() > config.room_pixel_width()
            || rect.bottom() < 0.0
            || rect.top() > config.room_pixel_height()
    }
}
