use glam::Affine3A;
use hecs::{Entity, World};
use log::{debug, trace};

use crate::{
    components::{
        Collider, DeviceId, GrabState, Grabbable, Grabbed, Holder, RigidBody, Transform,
    },
    config::{GrabButtonMode, GrabConfig},
    contexts::{HandSignal, InputContext, PhysicsContext, TargetRegistry},
    Session,
};

use super::layer_switch::{apply_grabbed_layer, restore_original_layer};

/// Everything that can happen to a grabbable, whichever modality it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabEvent {
    HandSelect,
    HandUnselect,
    DevicePick(DeviceId),
    DeviceRelease(DeviceId),
}

impl From<HandSignal> for GrabEvent {
    fn from(signal: HandSignal) -> Self {
        match signal {
            HandSignal::Select => GrabEvent::HandSelect,
            HandSignal::Unselect => GrabEvent::HandUnselect,
        }
    }
}

/// What a [`GrabEvent`] did to the object it was aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    PickedUp(Holder),
    Released,
    Ignored,
}

/// Grabbing system
/// Turns this tick's hand notifications and device samples into grab events and feeds
/// them, one at a time, through [`Session::handle_event`].
pub fn grabbing_system(session: &mut Session) {
    for (entity, signal) in session.input_context.take_hand_signals() {
        session.handle_event(entity, signal.into());
    }

    let device_ids: Vec<DeviceId> = session.input_context.devices().map(|d| d.id()).collect();
    for id in device_ids {
        // Resolved per device, so an earlier relocation this tick is already visible.
        let request = device_request(
            &session.world,
            &session.input_context,
            &session.physics_context,
            &session.config,
            id,
        );
        if let Some((entity, event)) = request {
            session.handle_event(entity, event);
        }
    }
}

/// Poll a single device. Returns a release if the device just let go of the object it
/// holds, or a pickup if its grab condition holds and its ray lands on a grabbable.
pub fn device_request(
    world: &World,
    input_context: &InputContext,
    physics_context: &PhysicsContext,
    config: &GrabConfig,
    id: DeviceId,
) -> Option<(Entity, GrabEvent)> {
    let device = input_context.device(id)?;

    if device.grab_button_just_released() {
        return held_by_device(world, id).map(|entity| (entity, GrabEvent::DeviceRelease(id)));
    }

    let grab = match config.grab_button_mode {
        GrabButtonMode::Press => device.grab_button_just_pressed(),
        GrabButtonMode::Hold => device.grab_button(),
    };
    if !grab {
        return None;
    }

    let (entity, _) =
        physics_context.cast_ray(device.position(), device.forward(), config.raycast_distance)?;
    world.get::<&Grabbable>(entity).ok()?;

    Some((entity, GrabEvent::DevicePick(id)))
}

/// Apply a single event to `entity`'s state machine.
pub fn handle_event(
    world: &mut World,
    physics_context: &mut PhysicsContext,
    input_context: &InputContext,
    entity: Entity,
    event: GrabEvent,
) -> Transition {
    let transition = match event {
        GrabEvent::HandSelect => {
            picked_up(pick_up(world, physics_context, entity, Holder::Hand, None), Holder::Hand)
        }
        GrabEvent::DevicePick(id) => {
            let Some(device) = input_context.device(id) else {
                debug!("[GRAB_TARGET] Ignoring pick from unknown device {id:?}");
                return Transition::Ignored;
            };
            let holder = Holder::Device(id);
            picked_up(
                pick_up(
                    world,
                    physics_context,
                    entity,
                    holder,
                    Some(device.global_from_device()),
                ),
                holder,
            )
        }
        GrabEvent::HandUnselect => released(release_if(world, physics_context, entity, |s| {
            s == GrabState::HeldByHand
        })),
        GrabEvent::DeviceRelease(id) => released(release_if(world, physics_context, entity, |s| {
            s == GrabState::HeldByDevice(id)
        })),
    };

    trace!("[GRAB_TARGET] {event:?} on {entity:?}: {transition:?}");
    transition
}

fn picked_up(accepted: bool, holder: Holder) -> Transition {
    if accepted {
        Transition::PickedUp(holder)
    } else {
        Transition::Ignored
    }
}

fn released(released: bool) -> Transition {
    if released {
        Transition::Released
    } else {
        Transition::Ignored
    }
}

/// Try to claim `entity` for `holder`. Returns false, changing nothing, if the object is
/// already held or the device is already holding something else.
///
/// `global_from_device` is where the device is now. When given, the object is attached
/// to the device with its current offset.
pub fn pick_up(
    world: &mut World,
    physics_context: &mut PhysicsContext,
    entity: Entity,
    holder: Holder,
    global_from_device: Option<Affine3A>,
) -> bool {
    if let Holder::Device(id) = holder {
        if held_by_device(world, id).is_some() {
            return false;
        }
    }

    let make_kinematic = {
        let Ok(mut grabbable) = world.get::<&mut Grabbable>(entity) else {
            return false;
        };
        if grabbable.state.is_held() {
            return false;
        }
        grabbable.state = holder.into();
        grabbable.success_consumed = false;
        grabbable.make_kinematic_while_held
    };

    if make_kinematic {
        let simulation = world
            .get::<&RigidBody>(entity)
            .ok()
            .and_then(|r| physics_context.make_kinematic(r.handle));
        if let Ok(mut grabbable) = world.get::<&mut Grabbable>(entity) {
            grabbable.simulation_before_grab = simulation;
        }
    }
    apply_grabbed_layer(world, entity);

    if let (Holder::Device(device), Some(global_from_device)) = (holder, global_from_device) {
        let global_from_local = sync_transform(world, physics_context, entity);
        let grabbed = Grabbed {
            device,
            device_from_local: global_from_device.inverse() * global_from_local,
        };
        let _ = world.insert_one(entity, grabbed);
    }

    debug!("[GRAB_TARGET] {entity:?} picked up by {holder:?}");
    true
}

/// Release `entity` whoever is holding it. Returns false if it wasn't held.
pub fn release(world: &mut World, physics_context: &mut PhysicsContext, entity: Entity) -> bool {
    release_if(world, physics_context, entity, |_| true)
}

/// The handler for [`crate::contexts::BusMessage::ForceRelease`].
pub fn force_release(
    world: &mut World,
    physics_context: &mut PhysicsContext,
    entity: Entity,
) -> bool {
    let released = release(world, physics_context, entity);
    if released {
        trace!("[GRAB_TARGET] {entity:?} was forced to let go");
    }
    released
}

fn release_if(
    world: &mut World,
    physics_context: &mut PhysicsContext,
    entity: Entity,
    held_by: impl Fn(GrabState) -> bool,
) -> bool {
    let simulation = {
        let Ok(mut grabbable) = world.get::<&mut Grabbable>(entity) else {
            return false;
        };
        if !grabbable.state.is_held() || !held_by(grabbable.state) {
            return false;
        }
        grabbable.state = GrabState::Idle;
        grabbable.success_consumed = false;
        grabbable.simulation_before_grab.take()
    };

    let _ = world.remove_one::<Grabbed>(entity);
    restore_original_layer(world, entity);
    if let Some(simulation) = simulation {
        if let Ok(rigid_body) = world.get::<&RigidBody>(entity) {
            physics_context.restore_simulation(rigid_body.handle, simulation);
        }
    }

    debug!("[GRAB_TARGET] {entity:?} released");
    true
}

/// Mark the success path as taken for this hold of `entity`. True only for the first
/// call during a hold of the current target.
pub fn check_for_success(world: &World, registry: &TargetRegistry, entity: Entity) -> bool {
    if registry.current_target() != Some(entity) {
        return false;
    }
    let Ok(mut grabbable) = world.get::<&mut Grabbable>(entity) else {
        return false;
    };
    if !grabbable.state.is_held() || grabbable.success_consumed {
        return false;
    }
    grabbable.success_consumed = true;
    true
}

/// The object `id` is holding, if any
pub fn held_by_device(world: &World, id: DeviceId) -> Option<Entity> {
    world
        .query::<&Grabbable>()
        .iter()
        .find(|(_, g)| g.state == GrabState::HeldByDevice(id))
        .map(|(e, _)| e)
}

/// Bring `entity`'s [`Transform`] up to date with wherever the simulation has moved its
/// body or collider, and return it.
fn sync_transform(world: &World, physics_context: &PhysicsContext, entity: Entity) -> Affine3A {
    let simulated = if let Ok(rigid_body) = world.get::<&RigidBody>(entity) {
        physics_context.get_pose(rigid_body.handle)
    } else if let Ok(collider) = world.get::<&Collider>(entity) {
        physics_context.get_collider_pose(collider.handle)
    } else {
        None
    };

    let Ok(mut transform) = world.get::<&mut Transform>(entity) else {
        return simulated
            .map(|(r, t)| Affine3A::from_rotation_translation(r, t))
            .unwrap_or(Affine3A::IDENTITY);
    };
    if let Some((rotation, translation)) = simulated {
        transform.rotation = rotation;
        transform.translation = translation;
    }
    transform.to_affine()
}
