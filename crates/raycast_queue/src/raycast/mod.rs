//! Ray-cast specialization of the deferred queue
//!
//! Request/result payloads, object filtering, and two reference executors:
//! [`SphereCaster`] answers synchronously, [`LatentCaster`] delays any
//! executor's answers by a fixed number of ticks.

pub mod geometry;
pub mod object_types;
pub mod request;
pub mod sphere_caster;
pub mod latent_caster;

pub use geometry::{BoundingSphere, Ray};
pub use object_types::ObjectTypes;
pub use request::{RayCastRequest, RayCastResult, RayHit};
pub use sphere_caster::{SphereBody, SphereCaster};
pub use latent_caster::LatentCaster;

use crate::scheduler::{ActionExecutor, DeferredActionQueue};

/// Executor over ray-cast payloads
pub trait RayCaster: ActionExecutor<Action = RayCastRequest, Outcome = RayCastResult> {}

impl<T> RayCaster for T where T: ActionExecutor<Action = RayCastRequest, Outcome = RayCastResult> {}

/// Deferred queue of ray casts
pub type RayCastQueue<C> = DeferredActionQueue<C>;
