use rapier3d::prelude::ColliderHandle;

/// A component that gives this entity a shape that device rays can hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collider {
    pub handle: ColliderHandle,
}
