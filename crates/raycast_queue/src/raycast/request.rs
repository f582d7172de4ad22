//! Ray-cast request and result payloads

use serde::{Deserialize, Serialize};

use super::geometry::Ray;
use super::object_types::ObjectTypes;
use crate::foundation::math::Vec3;
use crate::request::EntityId;

/// Parameters of one ray-cast query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RayCastRequest {
    /// Ray origin and normalized direction
    pub ray: Ray,
    /// Length of the cast
    pub max_distance: f32,
    /// Kinds of bodies the cast may hit
    pub object_types: ObjectTypes,
    /// Maximum number of hits to report (closest first)
    pub max_hit_count: usize,
    /// Entities the cast passes through
    pub skip_list: Vec<EntityId>,
}

impl RayCastRequest {
    /// Cast from `origin` along `direction` for `max_distance`, first hit only
    pub fn new(origin: Vec3, direction: Vec3, max_distance: f32) -> Self {
        Self {
            ray: Ray::new(origin, direction),
            max_distance,
            object_types: ObjectTypes::default(),
            max_hit_count: 1,
            skip_list: Vec::new(),
        }
    }

    /// Cast from `from` to `to`
    pub fn segment(from: Vec3, to: Vec3) -> Self {
        let delta = to - from;
        Self::new(from, delta, delta.magnitude())
    }

    /// Restrict the kinds of bodies the cast may hit
    pub fn with_object_types(mut self, object_types: ObjectTypes) -> Self {
        self.object_types = object_types;
        self
    }

    /// Report up to `max_hit_count` hits
    pub fn with_max_hits(mut self, max_hit_count: usize) -> Self {
        self.max_hit_count = max_hit_count;
        self
    }

    /// Ignore an entity (typically the requester itself)
    pub fn skipping(mut self, entity: EntityId) -> Self {
        self.skip_list.push(entity);
        self
    }
}

impl Default for RayCastRequest {
    /// Zero-length cast that hits nothing; filled in by a submit callback
    fn default() -> Self {
        Self {
            ray: Ray::new(Vec3::zeros(), Vec3::zeros()),
            max_distance: 0.0,
            object_types: ObjectTypes::default(),
            max_hit_count: 1,
            skip_list: Vec::new(),
        }
    }
}

/// Result of a ray intersection test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// The entity that was hit
    pub entity: EntityId,
    /// The distance from the ray origin to the hit point
    pub distance: f32,
    /// The point of intersection in world space
    pub point: Vec3,
    /// The surface normal at the intersection point
    pub normal: Vec3,
}

/// Hits of one ray cast, closest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RayCastResult {
    /// Hits sorted by ascending distance
    pub hits: Vec<RayHit>,
}

impl RayCastResult {
    /// Result with no hits
    pub fn miss() -> Self {
        Self::default()
    }

    /// Whether anything was hit
    pub fn has_hit(&self) -> bool {
        !self.hits.is_empty()
    }

    /// Closest hit, if any
    pub fn closest(&self) -> Option<&RayHit> {
        self.hits.first()
    }

    /// Number of hits
    pub fn hit_count(&self) -> usize {
        self.hits.len()
    }
}
