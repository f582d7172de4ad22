//! Minimal ray geometry used by the reference casters

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// A ray for ray casting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (unit length, or zero for a degenerate ray)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray, normalizing the direction
    ///
    /// A zero direction stays zero; such a ray hits nothing.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Whether the ray has a usable direction
    pub fn is_degenerate(&self) -> bool {
        self.direction.magnitude_squared() <= f32::EPSILON
    }
}

/// A bounding sphere standing in for a physical body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Test ray intersection with this sphere
    ///
    /// Returns `(distance, hit_point, normal)` of the closest intersection in
    /// front of the origin. A ray starting inside the sphere reports the exit
    /// point.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, Vec3, Vec3)> {
        if ray.is_degenerate() {
            return None;
        }

        // Solve |origin + t*direction - center|^2 = radius^2
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * oc.dot(&ray.direction);
        let c = oc.dot(&oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_discriminant = discriminant.sqrt();
        let t1 = (-b - sqrt_discriminant) / (2.0 * a);
        let t2 = (-b + sqrt_discriminant) / (2.0 * a);

        let t = if t1 > 0.0 {
            t1
        } else if t2 > 0.0 {
            t2
        } else {
            return None;
        };

        let hit_point = ray.point_at(t);
        let normal = (hit_point - self.center)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| -ray.direction);

        Some((t, hit_point, normal))
    }
}
