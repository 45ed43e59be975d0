use crate::core::Rect;
use crate::systems::physics::{Collider, Contact, EntityRef, StepContext};

use super::platform::{FallingPlatform, MovingPlatform};
use super::tiles::Destructible;

/// Room objects that are not tiles but take part in blocking.
#[derive(Clone, Debug)]
pub enum DynamicObject {
    Destructible(Destructible),
    Platform(MovingPlatform),
    FallingPlatform(FallingPlatform),
    /// Placeholder while the object steps, or after the editor removed it.
    Vacant,
}

impl DynamicObject {
    pub fn rect(&self) -> Option<Rect> {
        match self {
            DynamicObject::Destructible(d) => Some(d.rect),
            DynamicObject::Platform(p) => Some(p.rect()),
            DynamicObject::FallingPlatform(p) => Some(p.rect()),
            DynamicObject::Vacant => None,
        }
    }

    pub fn is_vacant(&self) -> bool {
        matches!(self, DynamicObject::Vacant)
    }

    pub fn update(&mut self, ctx: &mut StepContext<'_>, me: EntityRef) {
        match self {
            DynamicObject::Destructible(d) => d.update(ctx),
            DynamicObject::Platform(p) => p.update(ctx, me),
            DynamicObject::FallingPlatform(p) => p.update(ctx, me),
            DynamicObject::Vacant => {}
        }
    }

    pub fn reset(&mut self) {
        match self {
            DynamicObject::Destructible(d) => d.reset(),
            DynamicObject::Platform(p) => p.reset(),
            DynamicObject::FallingPlatform(p) => p.reset(),
            DynamicObject::Vacant => {}
        }
    }
}

impl Collider for DynamicObject {
    fn contact(&self, entity: EntityRef) -> Option<Contact> {
        match self {
            DynamicObject::Destructible(d) => d.contact(entity),
            DynamicObject::Platform(p) => p.contact(entity),
            DynamicObject::FallingPlatform(p) => p.contact(entity),
            DynamicObject::Vacant => None,
        }
    }
}
