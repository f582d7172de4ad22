//! Object type filtering for ray casts
//!
//! A ray cast names the kinds of physical objects it may hit; bodies carry
//! the kind they are. A body is a candidate only when its type is in the
//! request's set.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Set of physical object kinds
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ObjectTypes: u32 {
        /// Static level geometry
        const STATIC = 1 << 0;
        /// Terrain heightfield
        const TERRAIN = 1 << 1;
        /// Awake rigid bodies
        const RIGID = 1 << 2;
        /// Rigid bodies at rest
        const SLEEPING_RIGID = 1 << 3;
        /// Characters (players, agents)
        const LIVING = 1 << 4;
        /// Particles, ropes and other independent simulations
        const INDEPENDENT = 1 << 5;
        /// Water volumes
        const WATER = 1 << 6;

        /// Everything that blocks line of sight
        const SOLID = Self::STATIC.bits() | Self::TERRAIN.bits() | Self::RIGID.bits() | Self::SLEEPING_RIGID.bits();
    }
}

impl ObjectTypes {
    /// Check if a body of kind `body` is a candidate for a query over `self`
    ///
    /// # Example
    /// ```
    /// use raycast_queue::raycast::ObjectTypes;
    ///
    /// let visibility = ObjectTypes::SOLID;
    /// assert!(visibility.accepts(ObjectTypes::TERRAIN));
    /// assert!(!visibility.accepts(ObjectTypes::LIVING));
    /// ```
    pub fn accepts(self, body: Self) -> bool {
        self.intersects(body)
    }
}

impl Default for ObjectTypes {
    fn default() -> Self {
        Self::SOLID
    }
}
