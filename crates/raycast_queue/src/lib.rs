//! # Ray-Cast Queue
//!
//! Deferred, prioritized admission of ray-cast requests to a shared physics
//! resource under a per-tick quota.
//!
//! ## Features
//!
//! - **Quota Admission**: at most `quota` requests reach the executor per tick
//! - **Age-Aware Priority**: waiting requests gain priority so nothing starves
//! - **Cancellation**: queued or in-flight requests can be withdrawn by id
//! - **Contention Stats**: throughput averages, peaks and optional request history
//! - **Pluggable Executors**: synchronous or latent backends behind one trait
//!
//! ## Quick Start
//!
//! ```rust
//! use raycast_queue::prelude::*;
//!
//! let mut world = SphereCaster::new();
//! world.add_body(
//!     EntityId(7),
//!     BoundingSphere::new(Vec3::new(0.0, 0.0, 10.0), 1.0),
//!     ObjectTypes::LIVING,
//! );
//!
//! let mut queue = RayCastQueue::new(RayCastQueueConfig::new(8), world)?;
//! let id = queue.queue(
//!     Priority::High,
//!     RayCastRequest::new(Vec3::zeros(), Vec3::z(), 50.0).with_object_types(ObjectTypes::all()),
//!     |id, result: RayCastResult| log::info!("{} hit {:?}", id, result.closest()),
//! );
//!
//! assert!(queue.is_pending(id));
//! queue.update(1.0 / 60.0);
//! assert!(!queue.is_pending(id));
//! # Ok::<(), QueueError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod config;
pub mod foundation;
pub mod queue;
pub mod contention;
pub mod request;
pub mod raycast;
pub mod scheduler;

mod error;

pub use error::QueueError;

/// Common imports for queue users
pub mod prelude {
    pub use crate::{
        QueueError,
        contention::{ContentionPolicy, ContentionStats, RequestDebugInfo, RequestState},
        core::config::{AgingConfig, ContentionConfig, RayCastQueueConfig},
        config::{Config, ConfigError},
        foundation::{
            math::Vec3,
            time::FrameStamp,
        },
        raycast::{
            BoundingSphere, LatentCaster, ObjectTypes, RayCastQueue, RayCastRequest, RayCastResult,
            RayCaster, RayHit, SphereCaster,
        },
        request::{EntityId, Priority, QueuedId, RequesterDebugInfo},
        scheduler::{ActionExecutor, DeferredActionQueue, Dispatch, SubmitCallback},
    };
}
