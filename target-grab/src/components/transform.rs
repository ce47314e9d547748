use glam::{Affine3A, Quat, Vec3};

/// The entity's position in global space.
///
/// Pool members are moved by the target registry when they are relocated, and by
/// `held_objects_system` while a device holds them. Either way the rigid body (if any)
/// is kept in sync.
#[derive(Clone, PartialEq, Debug, Copy)]
pub struct Transform {
    /// The translation of the entity
    pub translation: Vec3,
    /// The rotation of the entity
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Convenience function to convert the `Transform` into a [`glam::Affine3A`]
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_rotation_translation(self.rotation, self.translation)
    }

    /// Update the translation and rotation from a [`glam::Affine3A`]. Scale is discarded.
    pub fn update_from_affine(&mut self, affine: &Affine3A) {
        let (_, rotation, translation) = affine.to_scale_rotation_translation();
        self.translation = translation;
        self.rotation = rotation;
    }
}
