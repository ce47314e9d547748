use glam::{Quat, Vec3};
use hecs::{Entity, World};
use log::{debug, error, info, warn};
use rand::{rngs::StdRng, SeedableRng};
use rapier3d::prelude::{Collider as RapierCollider, RigidBody as RapierRigidBody};

use crate::{
    components::{
        Collider, DeviceId, Grabbable, Holder, Info, Layer, LayerId, LayerSwitch, Panel, Parent,
        Pointer, RigidBody, Transform,
    },
    config::{GrabConfig, SceneDescription},
    contexts::{
        AudioContext, BroadcastBus, InputContext, LayerRegistry, PhysicsContext, PlacementSlot,
        TargetRegistry,
    },
    systems::{
        grabbing::{self, GrabEvent, Transition},
        grabbing_system, held_objects_system, init_layer_switch, pointers_system,
    },
    util::decompose_isometry,
    GrabResult,
};

/// Builder for [`Session`].
pub struct SessionBuilder {
    config: GrabConfig,
    slots: Vec<PlacementSlot>,
    rng_seed: Option<u64>,
    layer_registry: LayerRegistry,
    register_grabbed_layer: bool,
    audio_context: AudioContext,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            config: Default::default(),
            slots: Vec::new(),
            rng_seed: None,
            layer_registry: Default::default(),
            register_grabbed_layer: true,
            audio_context: Default::default(),
        }
    }
}

impl SessionBuilder {
    /// Create a `SessionBuilder`
    pub fn new() -> Self {
        Default::default()
    }

    /// Start from a scene authored in JSON
    pub fn from_scene(scene: SceneDescription) -> Self {
        let mut builder = Self::new();
        builder.config(scene.config).slots(scene.slots);
        builder
    }

    pub fn config(&mut self, config: GrabConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// Set the places pool members can be put in
    pub fn slots(&mut self, slots: Vec<PlacementSlot>) -> &mut Self {
        self.slots = slots;
        self
    }

    /// Make every relocation reproducible
    pub fn rng_seed(&mut self, seed: u64) -> &mut Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Use the scene's own layers
    pub fn layer_registry(&mut self, layer_registry: LayerRegistry) -> &mut Self {
        self.layer_registry = layer_registry;
        self
    }

    /// Should the grabbed layer be added to the layer registry if it isn't there?
    /// When this is off, the layer must already be registered or switching is disabled.
    pub fn register_grabbed_layer(&mut self, register: bool) -> &mut Self {
        self.register_grabbed_layer = register;
        self
    }

    pub fn audio_context(&mut self, audio_context: AudioContext) -> &mut Self {
        self.audio_context = audio_context;
        self
    }

    /// Build the `Session`
    pub fn build(self) -> Session {
        let mut layer_registry = self.layer_registry;
        if self.register_grabbed_layer {
            if let Err(e) = layer_registry.register(&self.config.grabbed_layer_name) {
                error!(
                    "[GRAB_TARGET] Unable to register layer '{}': {e}",
                    self.config.grabbed_layer_name
                );
            }
        }

        let rng = match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let target_registry =
            TargetRegistry::new(self.slots, self.config.target_text_prefix.clone(), rng);

        Session {
            world: Default::default(),
            physics_context: Default::default(),
            input_context: Default::default(),
            audio_context: self.audio_context,
            layer_registry,
            bus: Default::default(),
            target_registry,
            config: self.config,
            callbacks: Vec::new(),
            started: false,
        }
    }
}

/// The grab-and-target game state: the world, the contexts that talk to the host, and
/// the registry that decides which object the player is looking for.
///
/// Hosts create one with [`SessionBuilder`], add grabbables and devices, call
/// [`Session::start`] once and then [`Session::tick`] every frame.
pub struct Session {
    pub world: World,
    pub physics_context: PhysicsContext,
    pub input_context: InputContext,
    pub audio_context: AudioContext,
    pub layer_registry: LayerRegistry,
    pub bus: BroadcastBus,
    pub target_registry: TargetRegistry,
    pub config: GrabConfig,
    callbacks: Vec<Box<dyn FnMut(Entity)>>,
    started: bool,
}

impl Session {
    /// Add a member of the target pool. Objects without a rigid body can still be held,
    /// and objects without a collider can only be picked up by hand.
    pub fn add_grabbable(
        &mut self,
        name: &str,
        rigid_body: Option<RapierRigidBody>,
        collider: Option<RapierCollider>,
    ) -> Entity {
        let (rotation, translation) = match (&rigid_body, &collider) {
            (Some(rigid_body), _) => decompose_isometry(rigid_body.position()),
            (None, Some(collider)) => decompose_isometry(collider.position()),
            (None, None) => (Quat::IDENTITY, Vec3::ZERO),
        };

        let entity = self.world.spawn((
            Info::new(name),
            Transform::new(translation, rotation),
            Grabbable::new(self.config.make_kinematic_while_held),
            Layer::default(),
        ));

        let rigid_body = rigid_body.map(|r| self.physics_context.create_rigid_body(entity, r));
        if let Some(rigid_body) = rigid_body {
            let _ = self.world.insert_one(entity, rigid_body);
        } else {
            warn!("[GRAB_TARGET] {name} has no rigid body, it will not be made kinematic when held");
        }

        match collider {
            Some(collider) => {
                let collider = self.physics_context.create_collider(
                    entity,
                    collider,
                    rigid_body.map(|r| r.handle),
                );
                let _ = self.world.insert_one(entity, collider);
            }
            None => warn!("[GRAB_TARGET] {name} has no collider, devices will not be able to hit it"),
        }

        self.bus.subscribe(entity);
        self.target_registry.add(entity);

        if self.started {
            init_layer_switch(
                &mut self.world,
                &self.layer_registry,
                entity,
                &self.config.grabbed_layer_name,
            );
        }

        entity
    }

    /// Add a node under `parent`. Children that exist when the session starts switch layers
    /// along with their grabbable.
    pub fn add_child(&mut self, parent: Entity, name: &str, layer: LayerId) -> Entity {
        self.world
            .spawn((Info::new(name), Parent(parent), Layer(layer)))
    }

    /// Start polling a device. Its pose and button must be fed in every tick with
    /// [`InputContext::update_device`].
    pub fn add_device(&mut self, id: DeviceId) {
        self.input_context.add_device(id);
    }

    /// Add a laser that follows `device`
    pub fn add_pointer(&mut self, device: DeviceId) -> Entity {
        self.add_device(device);
        self.world
            .spawn((Pointer::new(device, self.config.pointer_length),))
    }

    /// Add the panel the target's name is written to.
    pub fn add_display_panel(&mut self) -> Entity {
        let panel = self
            .world
            .spawn((Info::new("Target Display"), Panel::default()));
        self.target_registry.set_display(Some(panel));

        if let Some(target) = self.current_target() {
            let _ = self.target_registry.set_current_target(&mut self.world, target);
        }
        panel
    }

    /// Capture each grabbable's sub-tree for layer switching, then place the pool and pick
    /// the first target.
    pub fn start(&mut self) -> GrabResult<()> {
        let uninitialised: Vec<Entity> = self
            .target_registry
            .pool()
            .iter()
            .copied()
            .filter(|e| self.world.get::<&LayerSwitch>(*e).is_err())
            .collect();
        for entity in uninitialised {
            init_layer_switch(
                &mut self.world,
                &self.layer_registry,
                entity,
                &self.config.grabbed_layer_name,
            );
        }
        self.started = true;

        self.relocate_all()
    }

    /// Run one frame: resolve grabs, move held objects, then update pointers.
    pub fn tick(&mut self) {
        grabbing_system(self);
        held_objects_system(self);
        pointers_system(self);
    }

    /// Feed a single event through `entity`'s state machine. A pickup of the current
    /// target runs the success path, which relocates the pool before this returns.
    pub fn handle_event(&mut self, entity: Entity, event: GrabEvent) -> Transition {
        let transition = grabbing::handle_event(
            &mut self.world,
            &mut self.physics_context,
            &self.input_context,
            entity,
            event,
        );

        if let Transition::PickedUp(_) = transition {
            if grabbing::check_for_success(&self.world, &self.target_registry, entity) {
                self.correct_object_grabbed(entity);
            }
        }

        transition
    }

    fn correct_object_grabbed(&mut self, entity: Entity) {
        info!("[GRAB_TARGET] Correct object was grabbed!");
        for callback in &mut self.callbacks {
            callback(entity);
        }
        if let Some(clip) = self.audio_context.play_correct_cue() {
            debug!("[GRAB_TARGET] Playing {clip:?}");
        }
        if let Err(e) = self.relocate_all() {
            error!("[GRAB_TARGET] Unable to choose a new target: {e}");
        }
    }

    /// Ask for `entity` to be held by `holder`. False if it is already held, the device
    /// is holding something else, or the device is unknown.
    pub fn pick_up(&mut self, entity: Entity, holder: Holder) -> bool {
        let event = match holder {
            Holder::Hand => GrabEvent::HandSelect,
            Holder::Device(id) => GrabEvent::DevicePick(id),
        };
        matches!(self.handle_event(entity, event), Transition::PickedUp(_))
    }

    /// Let go of `entity`, whoever holds it. False if it wasn't held.
    pub fn release(&mut self, entity: Entity) -> bool {
        grabbing::release(&mut self.world, &mut self.physics_context, entity)
    }

    pub fn force_release(&mut self, entity: Entity) -> bool {
        grabbing::force_release(&mut self.world, &mut self.physics_context, entity)
    }

    pub fn is_held(&self, entity: Entity) -> bool {
        self.current_holder(entity).is_some()
    }

    pub fn current_holder(&self, entity: Entity) -> Option<Holder> {
        self.world
            .get::<&Grabbable>(entity)
            .ok()
            .and_then(|g| g.state.holder())
    }

    /// Release everything, shuffle the pool into new slots and pick a new target.
    pub fn relocate_all(&mut self) -> GrabResult<()> {
        self.target_registry
            .relocate_all(&mut self.world, &mut self.physics_context, &self.bus)
    }

    pub fn current_target(&self) -> Option<Entity> {
        self.target_registry.current_target()
    }

    /// Choose the target directly instead of at random.
    pub fn set_current_target(&mut self, entity: Entity) -> GrabResult<()> {
        self.target_registry
            .set_current_target(&mut self.world, entity)
    }

    /// Register a callback that is run each time the current target is picked up.
    pub fn on_correct_grab(&mut self, callback: impl FnMut(Entity) + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    pub fn apply_impulse(&mut self, entity: Entity, impulse: Vec3) -> GrabResult<()> {
        let handle = self.world.get::<&RigidBody>(entity)?.handle;
        self.physics_context.apply_impulse(handle, impulse);
        Ok(())
    }

    /// Remove a pool member from the session altogether. Its children are left alone.
    pub fn despawn(&mut self, entity: Entity) -> GrabResult<()> {
        self.force_release(entity);
        self.bus.unsubscribe(entity);
        if self.target_registry.current_target() == Some(entity) {
            warn!("[GRAB_TARGET] The current target was despawned, there is no target until the next relocation");
        }
        self.target_registry.remove(entity);

        let rigid_body = self.world.get::<&RigidBody>(entity).ok().map(|r| r.handle);
        let collider = self.world.get::<&Collider>(entity).ok().map(|c| c.handle);
        match (rigid_body, collider) {
            (Some(rigid_body), _) => self.physics_context.remove_rigid_body(rigid_body),
            (None, Some(collider)) => self.physics_context.remove_collider(collider),
            (None, None) => {}
        }

        self.world.despawn(entity)?;
        Ok(())
    }
}
