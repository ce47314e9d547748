use glam::{Quat, Vec3};
use hecs::{Entity, World};
use log::{error, info, warn};
use rand::{rngs::StdRng, seq::index, Rng};
use serde::{Deserialize, Serialize};

use crate::{
    components::{Collider, Info, Panel, RigidBody, Transform},
    contexts::{BroadcastBus, BusMessage, PhysicsContext},
    systems::grabbing::force_release,
    GrabError, GrabResult,
};

/// A named place in the world that a pool member can be put.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlacementSlot {
    pub name: String,
    pub translation: Vec3,
    #[serde(default)]
    pub rotation: Quat,
}

impl PlacementSlot {
    pub fn new(name: impl Into<String>, translation: Vec3) -> Self {
        Self {
            name: name.into(),
            translation,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Owns the pool of grabbable objects, the slots they can be placed in and which of
/// them the player is currently looking for.
///
/// The registry is the only thing allowed to move pool members between slots. Before it
/// does, every pool member is told to let go through the [`BroadcastBus`].
pub struct TargetRegistry {
    pool: Vec<Entity>,
    slots: Vec<PlacementSlot>,
    current_target: Option<Entity>,
    placement: Vec<(Entity, usize)>,
    display: Option<Entity>,
    text_prefix: String,
    rng: StdRng,
}

impl TargetRegistry {
    pub fn new(slots: Vec<PlacementSlot>, text_prefix: impl Into<String>, rng: StdRng) -> Self {
        Self {
            pool: Vec::new(),
            slots,
            current_target: None,
            placement: Vec::new(),
            display: None,
            text_prefix: text_prefix.into(),
            rng,
        }
    }

    /// Pool members, in the order they were added
    pub fn pool(&self) -> &[Entity] {
        &self.pool
    }

    pub fn slots(&self) -> &[PlacementSlot] {
        &self.slots
    }

    pub fn current_target(&self) -> Option<Entity> {
        self.current_target
    }

    /// Which slot each pool member was put in by the last relocation
    pub fn placement(&self) -> &[(Entity, usize)] {
        &self.placement
    }

    pub fn slot_of(&self, entity: Entity) -> Option<&PlacementSlot> {
        self.placement
            .iter()
            .find(|(e, _)| *e == entity)
            .map(|(_, slot)| &self.slots[*slot])
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.pool.contains(&entity)
    }

    /// Set the panel that shows the target's name.
    pub fn set_display(&mut self, panel: Option<Entity>) {
        self.display = panel;
    }

    pub fn display(&self) -> Option<Entity> {
        self.display
    }

    pub(crate) fn add(&mut self, entity: Entity) -> bool {
        if self.contains(entity) {
            return false;
        }
        self.pool.push(entity);
        true
    }

    pub(crate) fn remove(&mut self, entity: Entity) -> bool {
        let before = self.pool.len();
        self.pool.retain(|e| *e != entity);
        self.placement.retain(|(e, _)| *e != entity);
        if self.current_target == Some(entity) {
            self.current_target = None;
        }
        self.pool.len() != before
    }

    /// Check that every pool member can be given a slot of its own.
    pub fn validate(&self) -> GrabResult<()> {
        if self.slots.len() < self.pool.len() {
            return Err(GrabError::NotEnoughSlots {
                slots: self.slots.len(),
                pool: self.pool.len(),
            });
        }
        Ok(())
    }

    /// Make `entity` the target and show its name.
    pub fn set_current_target(&mut self, world: &mut World, entity: Entity) -> GrabResult<()> {
        if !self.contains(entity) {
            return Err(GrabError::NotInPool);
        }
        self.current_target = Some(entity);
        self.publish_target(world);
        Ok(())
    }

    /// Force every pool member to be released, put each one in a different randomly chosen
    /// slot, then pick a new target at random.
    ///
    /// If there are fewer slots than pool members nothing is released or moved, and the
    /// previous placement and target are kept.
    pub fn relocate_all(
        &mut self,
        world: &mut World,
        physics_context: &mut PhysicsContext,
        bus: &BroadcastBus,
    ) -> GrabResult<()> {
        if let Err(e) = self.validate() {
            error!("[TARGET_REGISTRY] Refusing to relocate: {e}");
            return Err(e);
        }

        // Every release must land before anything moves.
        bus.broadcast(BusMessage::ForceRelease, |entity, _| {
            force_release(world, physics_context, entity);
        });

        if self.pool.is_empty() {
            warn!("[TARGET_REGISTRY] No objects in the pool to place or pick from");
            self.placement.clear();
            self.current_target = None;
            return Ok(());
        }

        let chosen = index::sample(&mut self.rng, self.slots.len(), self.pool.len());
        self.placement = self.pool.iter().copied().zip(chosen.iter()).collect();
        for (entity, slot) in &self.placement {
            place(world, physics_context, *entity, &self.slots[*slot]);
        }

        let target = self.pool[self.rng.gen_range(0..self.pool.len())];
        self.current_target = Some(target);
        self.publish_target(world);

        Ok(())
    }

    fn publish_target(&self, world: &mut World) {
        let Some(target) = self.current_target else {
            return;
        };
        let name = world
            .get::<&Info>(target)
            .map(|i| i.name.clone())
            .unwrap_or_else(|_| format!("{target:?}"));
        info!("[TARGET_REGISTRY] Target Object: {name}");

        if let Some(display) = self.display {
            match world.get::<&mut Panel>(display) {
                Ok(mut panel) => panel.set_text(format!("{}{}", self.text_prefix, name)),
                Err(e) => warn!("[TARGET_REGISTRY] Unable to update display panel: {e}"),
            }
        }
    }
}

fn place(
    world: &World,
    physics_context: &mut PhysicsContext,
    entity: Entity,
    slot: &PlacementSlot,
) {
    if let Ok(mut transform) = world.get::<&mut Transform>(entity) {
        transform.translation = slot.translation;
        transform.rotation = slot.rotation;
    }

    if let Ok(rigid_body) = world.get::<&RigidBody>(entity) {
        physics_context.set_pose(rigid_body.handle, slot.translation, slot.rotation);
    } else if let Ok(collider) = world.get::<&Collider>(entity) {
        physics_context.set_collider_pose(collider.handle, slot.translation, slot.rotation);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::components::{GrabState, Grabbable, Grabbed, Holder};
    use crate::systems::grabbing::pick_up;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rapier3d::prelude::{ColliderBuilder, RigidBodyBuilder};

    fn six_slots() -> Vec<PlacementSlot> {
        ["Bench", "Shelf", "Sink", "Desk", "Cabinet", "Window"]
            .iter()
            .enumerate()
            .map(|(i, name)| PlacementSlot::new(*name, [i as f32, 1.0, -1.0].into()))
            .collect()
    }

    fn setup(
        pool_size: usize,
        slots: Vec<PlacementSlot>,
    ) -> (World, PhysicsContext, BroadcastBus, TargetRegistry) {
        let mut world = World::default();
        let mut physics_context = PhysicsContext::default();
        let mut bus = BroadcastBus::default();
        let mut registry = TargetRegistry::new(slots, "Target Object: ", StdRng::seed_from_u64(42));

        for i in 0..pool_size {
            let name = ((b'A' + i as u8) as char).to_string();
            let entity = world.spawn((
                Info::new(name),
                Transform::default(),
                Grabbable::new(true),
            ));
            let rigid_body = physics_context
                .create_rigid_body(entity, RigidBodyBuilder::dynamic().build());
            let collider = physics_context.create_collider(
                entity,
                ColliderBuilder::cuboid(0.1, 0.1, 0.1).build(),
                Some(rigid_body.handle),
            );
            world.insert(entity, (rigid_body, collider)).unwrap();
            registry.add(entity);
            bus.subscribe(entity);
        }

        (world, physics_context, bus, registry)
    }

    #[test]
    pub fn test_relocation_is_injective() {
        let (mut world, mut physics_context, bus, mut registry) = setup(4, six_slots());

        for _ in 0..50 {
            registry
                .relocate_all(&mut world, &mut physics_context, &bus)
                .unwrap();

            assert_eq!(registry.placement().len(), 4);
            let used: HashSet<usize> = registry.placement().iter().map(|(_, s)| *s).collect();
            assert_eq!(used.len(), 4);
            assert!(used.iter().all(|s| *s < registry.slots().len()));

            for (entity, slot) in registry.placement() {
                let slot = &registry.slots()[*slot];
                let transform = world.get::<&Transform>(*entity).unwrap();
                assert_relative_eq!(transform.translation, slot.translation);

                let rigid_body = world.get::<&RigidBody>(*entity).unwrap();
                let (_, translation) = physics_context.get_pose(rigid_body.handle).unwrap();
                assert_relative_eq!(translation, slot.translation);
            }

            assert!(registry.contains(registry.current_target().unwrap()));
        }
    }

    #[test]
    pub fn test_target_selection_is_uniform() {
        let (mut world, mut physics_context, bus, mut registry) = setup(4, six_slots());
        let runs = 4000;

        let mut counts = [0usize; 4];
        for _ in 0..runs {
            registry
                .relocate_all(&mut world, &mut physics_context, &bus)
                .unwrap();
            let target = registry.current_target().unwrap();
            let index = registry.pool().iter().position(|e| *e == target).unwrap();
            counts[index] += 1;
        }

        // Expected 1000 each with a standard deviation of ~27. Allow five of them.
        for count in counts {
            assert!((865..=1135).contains(&count), "counts were {counts:?}");
        }

        // Pearson's chi-squared with 3 degrees of freedom; p = 0.001 sits at 16.27.
        let expected = runs as f32 / 4.;
        let chi_squared: f32 = counts
            .iter()
            .map(|c| (*c as f32 - expected).powi(2) / expected)
            .sum();
        assert!(chi_squared < 16.27, "chi squared was {chi_squared}");
    }

    #[test]
    pub fn test_slot_usage_is_spread() {
        let (mut world, mut physics_context, bus, mut registry) = setup(4, six_slots());

        let mut slot_counts = [0usize; 6];
        for _ in 0..3000 {
            registry
                .relocate_all(&mut world, &mut physics_context, &bus)
                .unwrap();
            for (_, slot) in registry.placement() {
                slot_counts[*slot] += 1;
            }
        }

        // Each relocation fills 4 of 6 slots, so each slot is used 2000 times on average.
        for count in slot_counts {
            assert!((1800..=2200).contains(&count), "slot counts were {slot_counts:?}");
        }
    }

    #[test]
    pub fn test_not_enough_slots_leaves_placement_alone() {
        let (mut world, mut physics_context, bus, mut registry) = setup(4, six_slots()[..4].to_vec());
        registry
            .relocate_all(&mut world, &mut physics_context, &bus)
            .unwrap();
        let placement = registry.placement().to_vec();
        let target = registry.current_target();

        // Hold something so we can check nothing was released either
        let held = registry.pool()[0];
        assert!(pick_up(&mut world, &mut physics_context, held, Holder::Hand, None));

        // A fifth member with no room for it
        let extra = world.spawn((Info::new("E"), Transform::default(), Grabbable::new(true)));
        registry.add(extra);

        let result = registry.relocate_all(&mut world, &mut physics_context, &bus);
        assert!(matches!(
            result,
            Err(GrabError::NotEnoughSlots { slots: 4, pool: 5 })
        ));
        assert_eq!(registry.placement(), placement.as_slice());
        assert_eq!(registry.current_target(), target);
        assert_eq!(
            world.get::<&Grabbable>(held).unwrap().state,
            GrabState::HeldByHand
        );
        let rigid_body = *world.get::<&RigidBody>(held).unwrap();
        assert!(physics_context.is_kinematic(rigid_body.handle));
        assert_relative_eq!(world.get::<&Transform>(extra).unwrap().translation, Vec3::ZERO);
    }

    #[test]
    pub fn test_held_objects_are_released_before_moving() {
        let (mut world, mut physics_context, bus, mut registry) = setup(4, six_slots());
        let a = registry.pool()[0];
        let b = registry.pool()[1];
        assert!(pick_up(&mut world, &mut physics_context, a, Holder::Hand, None));
        assert!(pick_up(
            &mut world,
            &mut physics_context,
            b,
            Holder::Device(crate::components::DeviceId(1)),
            Some(glam::Affine3A::IDENTITY),
        ));

        registry
            .relocate_all(&mut world, &mut physics_context, &bus)
            .unwrap();

        for entity in registry.pool() {
            let grabbable = world.get::<&Grabbable>(*entity).unwrap();
            assert_eq!(grabbable.state, GrabState::Idle);
            assert!(world.get::<&Grabbed>(*entity).is_err());
            let rigid_body = world.get::<&RigidBody>(*entity).unwrap();
            assert!(!physics_context.is_kinematic(rigid_body.handle));
        }
    }

    #[test]
    pub fn test_publishes_target_name() {
        let (mut world, mut physics_context, bus, mut registry) = setup(4, six_slots());
        let panel = world.spawn((Panel::default(),));
        registry.set_display(Some(panel));

        registry
            .relocate_all(&mut world, &mut physics_context, &bus)
            .unwrap();
        let target = registry.current_target().unwrap();
        let name = world.get::<&Info>(target).unwrap().name.clone();
        assert_eq!(
            world.get::<&Panel>(panel).unwrap().text,
            format!("Target Object: {name}")
        );

        let c = registry.pool()[2];
        registry.set_current_target(&mut world, c).unwrap();
        assert_eq!(world.get::<&Panel>(panel).unwrap().text, "Target Object: C");

        let stranger = world.spawn(());
        assert!(matches!(
            registry.set_current_target(&mut world, stranger),
            Err(GrabError::NotInPool)
        ));
    }

    #[test]
    pub fn test_empty_pool() {
        let (mut world, mut physics_context, bus, mut registry) = setup(0, six_slots());
        registry
            .relocate_all(&mut world, &mut physics_context, &bus)
            .unwrap();
        assert_eq!(registry.current_target(), None);
        assert!(registry.placement().is_empty());
    }

    #[test]
    pub fn test_remove_clears_target() {
        let (mut world, mut physics_context, bus, mut registry) = setup(4, six_slots());
        registry
            .relocate_all(&mut world, &mut physics_context, &bus)
            .unwrap();
        let target = registry.current_target().unwrap();

        assert!(registry.remove(target));
        assert!(!registry.remove(target));
        assert_eq!(registry.current_target(), None);
        assert_eq!(registry.pool().len(), 3);
        assert!(registry.slot_of(target).is_none());
    }
}
