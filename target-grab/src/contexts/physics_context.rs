use glam::{Quat, Vec3};
use hecs::Entity;
use rapier3d::prelude::*;

use crate::{
    components::{
        Collider as ColliderComponent, RigidBody as RigidBodyComponent, SimulationState,
    },
    util::{decompose_isometry, isometry_from_parts, na_point_from_glam, na_vector_from_glam},
};

/// Wrapper around the parts of the physics simulation that grabbing talks to.
///
/// Stepping is the host's business. This context only creates bodies and colliders,
/// answers ray casts and relays the handful of commands a grab needs.
pub struct PhysicsContext {
    pub colliders: ColliderSet,
    pub rigid_bodies: RigidBodySet,
    pub island_manager: IslandManager,
    pub impulse_joints: ImpulseJointSet,
    pub multibody_joints: MultibodyJointSet,
}

impl Default for PhysicsContext {
    fn default() -> Self {
        PhysicsContext {
            colliders: ColliderSet::new(),
            rigid_bodies: RigidBodySet::new(),
            island_manager: IslandManager::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
        }
    }
}

impl PhysicsContext {
    pub fn create_rigid_body(
        &mut self,
        entity: Entity,
        mut rigid_body: RigidBody,
    ) -> RigidBodyComponent {
        rigid_body.user_data = entity.to_bits().get() as _;
        RigidBodyComponent {
            handle: self.rigid_bodies.insert(rigid_body),
        }
    }

    /// Insert a collider for `entity`, attached to `parent` if given. Ray hits on this
    /// collider resolve back to `entity`.
    pub fn create_collider(
        &mut self,
        entity: Entity,
        mut collider: Collider,
        parent: Option<RigidBodyHandle>,
    ) -> ColliderComponent {
        collider.user_data = entity.to_bits().get() as _;
        let handle = match parent {
            Some(parent) => {
                self.colliders
                    .insert_with_parent(collider, parent, &mut self.rigid_bodies)
            }
            None => self.colliders.insert(collider),
        };

        ColliderComponent { handle }
    }

    /// Cast a ray and return the nearest entity hit along with the distance to it.
    pub fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<(Entity, f32)> {
        let direction = direction.try_normalize()?;
        let ray = Ray::new(na_point_from_glam(origin), na_vector_from_glam(direction));

        self.colliders
            .iter()
            .filter_map(|(_, collider)| {
                collider
                    .shape()
                    .cast_ray(collider.position(), &ray, max_distance, true)
                    .map(|toi| (collider.user_data, toi))
            })
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .and_then(|(user_data, toi)| {
                Entity::from_bits(user_data as u64).map(|entity| (entity, toi))
            })
    }

    /// Stop the body being moved by the simulation and by gravity. Returns how it was
    /// simulated before, for [`PhysicsContext::restore_simulation`].
    pub fn make_kinematic(&mut self, handle: RigidBodyHandle) -> Option<SimulationState> {
        let rigid_body = self.rigid_bodies.get_mut(handle)?;
        let previous = SimulationState {
            body_type: rigid_body.body_type(),
            gravity_scale: rigid_body.gravity_scale(),
        };

        rigid_body.set_body_type(RigidBodyType::KinematicPositionBased, true);
        rigid_body.set_gravity_scale(0.0, true);
        Some(previous)
    }

    pub fn restore_simulation(&mut self, handle: RigidBodyHandle, state: SimulationState) {
        if let Some(rigid_body) = self.rigid_bodies.get_mut(handle) {
            rigid_body.set_body_type(state.body_type, true);
            rigid_body.set_gravity_scale(state.gravity_scale, true);
        }
    }

    pub fn is_kinematic(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_bodies
            .get(handle)
            .map(|r| r.is_kinematic())
            .unwrap_or(false)
    }

    pub fn apply_impulse(&mut self, handle: RigidBodyHandle, impulse: Vec3) {
        if let Some(rigid_body) = self.rigid_bodies.get_mut(handle) {
            rigid_body.apply_impulse(na_vector_from_glam(impulse), true);
        }
    }

    /// Teleport a body. Its colliders are moved straight away so that ray casts made
    /// before the next simulation step see the new position.
    pub fn set_pose(&mut self, handle: RigidBodyHandle, translation: Vec3, rotation: Quat) {
        let Some(rigid_body) = self.rigid_bodies.get_mut(handle) else {
            return;
        };
        let position = isometry_from_parts(translation, rotation);
        rigid_body.set_position(position, true);

        for collider_handle in rigid_body.colliders() {
            if let Some(collider) = self.colliders.get_mut(*collider_handle) {
                let parent_from_collider = collider
                    .position_wrt_parent()
                    .copied()
                    .unwrap_or_else(Isometry::identity);
                collider.set_position(position * parent_from_collider);
            }
        }
    }

    /// Teleport a collider that has no body of its own.
    pub fn set_collider_pose(&mut self, handle: ColliderHandle, translation: Vec3, rotation: Quat) {
        if let Some(collider) = self.colliders.get_mut(handle) {
            collider.set_position(isometry_from_parts(translation, rotation));
        }
    }

    pub fn get_pose(&self, handle: RigidBodyHandle) -> Option<(Quat, Vec3)> {
        self.rigid_bodies
            .get(handle)
            .map(|r| decompose_isometry(r.position()))
    }

    pub fn get_collider_pose(&self, handle: ColliderHandle) -> Option<(Quat, Vec3)> {
        self.colliders
            .get(handle)
            .map(|c| decompose_isometry(c.position()))
    }

    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_bodies.remove(
            handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        self.colliders.remove(
            handle,
            &mut self.island_manager,
            &mut self.rigid_bodies,
            true,
        );
    }
}
