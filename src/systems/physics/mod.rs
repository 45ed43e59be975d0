//! Kinematic physics: bodies, overlap queries and the deferred effect queue.

mod body;
mod context;
mod effects;
pub mod perf;
mod query;

pub use body::{Body, BodyHooks, Collision};
pub use context::StepContext;
pub use effects::Effect;
pub use perf::{reset_query_perf_counters, take_query_perf_counters};
pub use query::{
    query_overlaps, Capabilities, Collider, Contact, EntityRef, WorldView, CAP_DAMAGEABLE, CAP_DESTRUCTIBLE,
    CAP_HARMFUL, CAP_HAZARD, CAP_KINEMATIC, CAP_KNOCKBACK, CAP_NONE, CAP_PLATFORM, CAP_SPRING,
};
