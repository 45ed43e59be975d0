use crate::core::{Sound, Vec2};

use super::query::EntityRef;

/// A consequence one entity's turn has on another entity.
///
/// Movers only see the world read-only while they step, so anything that has
/// to mutate someone else is queued here and applied by the room right after
/// the mover's turn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    Damage { target: EntityRef, amount: i32, knockback: Vec2 },
    Destroy { target: EntityRef },
    SpringBounce { target: EntityRef },
    /// Overwrites the target's carried velocity.
    Carry { target: EntityRef, velocity: Vec2 },
    Sound { target: EntityRef, sound: Sound },
    ActivateCheckpoint { index: usize },
}
