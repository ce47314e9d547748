use hecs::World;

use crate::{
    components::{Grabbed, RigidBody, Transform},
    contexts::{InputContext, PhysicsContext},
    Session,
};

/// Held objects system
/// Moves everything a device is holding along with that device
pub fn held_objects_system(session: &mut Session) {
    held_objects_system_inner(
        &mut session.world,
        &session.input_context,
        &mut session.physics_context,
    );
}

pub fn held_objects_system_inner(
    world: &mut World,
    input_context: &InputContext,
    physics_context: &mut PhysicsContext,
) {
    for (_, (grabbed, transform, rigid_body)) in
        world.query_mut::<(&Grabbed, &mut Transform, Option<&RigidBody>)>()
    {
        let Some(device) = input_context.device(grabbed.device) else {
            continue;
        };

        let global_from_local = device.global_from_device() * grabbed.device_from_local;
        transform.update_from_affine(&global_from_local);

        if let Some(rigid_body) = rigid_body {
            physics_context.set_pose(rigid_body.handle, transform.translation, transform.rotation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::{Affine3A, Quat, Vec3};
    use rapier3d::prelude::RigidBodyBuilder;

    use crate::components::DeviceId;

    #[test]
    pub fn test_held_objects_follow_their_device() {
        let mut world = World::default();
        let mut physics_context = PhysicsContext::default();
        let mut input_context = InputContext::default();
        let id = DeviceId(1);
        input_context.add_device(id);

        let held = world.spawn((Transform::default(),));
        let rigid_body =
            physics_context.create_rigid_body(held, RigidBodyBuilder::kinematic_position_based().build());
        world
            .insert(
                held,
                (
                    rigid_body,
                    Grabbed {
                        device: id,
                        device_from_local: Affine3A::from_translation([0., 0., -0.5].into()),
                    },
                ),
            )
            .unwrap();
        let idle = world.spawn((Transform::new([5., 0., 0.].into(), Quat::IDENTITY),));

        let global_from_device = Affine3A::from_rotation_translation(
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            [1., 1., 0.].into(),
        );
        input_context
            .update_device(id, true, global_from_device)
            .unwrap();
        held_objects_system_inner(&mut world, &input_context, &mut physics_context);

        // Half a metre down the device's -Z, which now points at -X
        let expected = Vec3::new(0.5, 1., 0.);
        let transform = *world.get::<&Transform>(held).unwrap();
        assert_relative_eq!(transform.translation, expected, epsilon = 1e-5);
        let (_, translation) = physics_context.get_pose(rigid_body.handle).unwrap();
        assert_relative_eq!(translation, expected, epsilon = 1e-5);

        assert_relative_eq!(
            world.get::<&Transform>(idle).unwrap().translation,
            Vec3::new(5., 0., 0.)
        );
    }

    #[test]
    pub fn test_missing_device_leaves_object_in_place() {
        let mut world = World::default();
        let mut physics_context = PhysicsContext::default();
        let input_context = InputContext::default();

        let held = world.spawn((
            Transform::new(Vec3::ONE, Quat::IDENTITY),
            Grabbed {
                device: DeviceId(3),
                device_from_local: Affine3A::IDENTITY,
            },
        ));
        held_objects_system_inner(&mut world, &input_context, &mut physics_context);
        assert_relative_eq!(world.get::<&Transform>(held).unwrap().translation, Vec3::ONE);
    }
}
