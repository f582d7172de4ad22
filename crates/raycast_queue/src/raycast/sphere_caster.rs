//! Synchronous reference caster over bounding spheres
//!
//! Stands in for the physics world in tests and the demo. Real integrations
//! implement [`ActionExecutor`] over their own physics backend.

use log::trace;

use super::geometry::BoundingSphere;
use super::object_types::ObjectTypes;
use super::request::{RayCastRequest, RayCastResult, RayHit};
use crate::request::{EntityId, QueuedId};
use crate::scheduler::{ActionExecutor, Dispatch};

/// A body the caster can hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereBody {
    /// Owning entity
    pub entity: EntityId,
    /// Shape
    pub sphere: BoundingSphere,
    /// Kind of body
    pub object_type: ObjectTypes,
}

/// Caster that answers every request during `execute`
#[derive(Debug, Clone, Default)]
pub struct SphereCaster {
    bodies: Vec<SphereBody>,
    casts_performed: u64,
}

impl SphereCaster {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a world from a list of bodies
    pub fn with_bodies(bodies: Vec<SphereBody>) -> Self {
        Self {
            bodies,
            casts_performed: 0,
        }
    }

    /// Add a body
    pub fn add_body(&mut self, entity: EntityId, sphere: BoundingSphere, object_type: ObjectTypes) {
        self.bodies.push(SphereBody { entity, sphere, object_type });
    }

    /// Remove every body owned by `entity`
    pub fn remove_entity(&mut self, entity: EntityId) {
        self.bodies.retain(|body| body.entity != entity);
    }

    /// Number of bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of casts executed so far
    pub fn casts_performed(&self) -> u64 {
        self.casts_performed
    }

    /// Intersect `request` against the world
    pub fn cast(&mut self, request: &RayCastRequest) -> RayCastResult {
        self.casts_performed += 1;

        if request.max_hit_count == 0 || request.max_distance <= 0.0 {
            return RayCastResult::miss();
        }

        let mut hits: Vec<RayHit> = self
            .bodies
            .iter()
            .filter(|body| request.object_types.accepts(body.object_type))
            .filter(|body| !request.skip_list.contains(&body.entity))
            .filter_map(|body| {
                let (distance, point, normal) = body.sphere.intersect_ray(&request.ray)?;
                (distance <= request.max_distance).then_some(RayHit {
                    entity: body.entity,
                    distance,
                    point,
                    normal,
                })
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(request.max_hit_count);
        RayCastResult { hits }
    }
}

impl ActionExecutor for SphereCaster {
    type Action = RayCastRequest;
    type Outcome = RayCastResult;

    fn execute(&mut self, queued_id: QueuedId, action: &RayCastRequest) -> Dispatch<RayCastResult> {
        let result = self.cast(action);
        trace!("Ray cast {} finished with {} hit(s)", queued_id, result.hit_count());
        Dispatch::Completed(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    fn world() -> SphereCaster {
        let mut caster = SphereCaster::new();
        caster.add_body(EntityId(1), BoundingSphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0), ObjectTypes::STATIC);
        caster.add_body(EntityId(2), BoundingSphere::new(Vec3::new(0.0, 0.0, 10.0), 1.0), ObjectTypes::LIVING);
        caster.add_body(EntityId(3), BoundingSphere::new(Vec3::new(0.0, 0.0, 15.0), 1.0), ObjectTypes::STATIC);
        caster
    }

    fn forward(distance: f32) -> RayCastRequest {
        RayCastRequest::new(Vec3::zeros(), Vec3::z(), distance)
    }

    #[test]
    fn test_first_hit_is_closest() {
        let mut caster = world();
        let result = caster.cast(&forward(100.0).with_object_types(ObjectTypes::all()));
        assert_eq!(result.hit_count(), 1);
        assert_eq!(result.closest().map(|hit| hit.entity), Some(EntityId(1)));
    }

    #[test]
    fn test_multiple_hits_sorted_and_limited() {
        let mut caster = world();
        let result = caster.cast(&forward(100.0).with_object_types(ObjectTypes::all()).with_max_hits(2));
        let entities: Vec<EntityId> = result.hits.iter().map(|hit| hit.entity).collect();
        assert_eq!(entities, vec![EntityId(1), EntityId(2)]);
    }

    #[test]
    fn test_filters_apply() {
        let mut caster = world();

        let living_only = caster.cast(&forward(100.0).with_object_types(ObjectTypes::LIVING));
        assert_eq!(living_only.closest().map(|hit| hit.entity), Some(EntityId(2)));

        let skipped = caster.cast(&forward(100.0).skipping(EntityId(1)));
        assert_eq!(skipped.closest().map(|hit| hit.entity), Some(EntityId(3)));

        let short = caster.cast(&forward(3.0));
        assert!(!short.has_hit());
        assert_eq!(caster.casts_performed(), 3);
    }

    #[test]
    fn test_execute_completes_synchronously() {
        let mut caster = world();
        match caster.execute(QueuedId::FIRST, &forward(100.0)) {
            Dispatch::Completed(result) => assert!(result.has_hit()),
            Dispatch::Pending => panic!("sphere caster must answer immediately"),
        }

        caster.remove_entity(EntityId(1));
        assert_eq!(caster.body_count(), 2);
    }
}
