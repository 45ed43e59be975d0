//! Core primitives shared by every system: geometry, RNG, sound intents, animation frames.

pub mod animation;
pub mod geometry;
pub mod random;
pub mod sound;

pub use animation::Animation;
pub use geometry::{Rect, Vec2};
pub use random::{random_range, xorshift32};
pub use sound::{Sound, SoundSet};
