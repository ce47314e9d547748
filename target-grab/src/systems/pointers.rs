use hecs::World;

use crate::{components::Pointer, contexts::InputContext, Session};

/// Pointers system
/// Lines each pointer's laser up with the ray its device grabs with
pub fn pointers_system(session: &mut Session) {
    pointers_system_inner(&mut session.world, &session.input_context);
}

pub fn pointers_system_inner(world: &mut World, input_context: &InputContext) {
    for (_, pointer) in world.query_mut::<&mut Pointer>() {
        let Some(device) = input_context.device(pointer.device) else {
            continue;
        };

        pointer.start = device.position();
        pointer.end = pointer.start + device.forward() * pointer.length;
    }
}
