use glam::{Quat, Vec3};
use rapier3d::na::{self, Isometry3, Point3, Vector3};

#[inline]
/// Build a [`rapier3d::na::Isometry3`] from a glam translation and rotation
pub fn isometry_from_parts(translation: Vec3, rotation: Quat) -> Isometry3<f32> {
    let translation = na::Translation3::new(translation.x, translation.y, translation.z);
    let rotation: na::UnitQuaternion<f32> = na::UnitQuaternion::new_normalize(
        na::Quaternion::new(rotation.w, rotation.x, rotation.y, rotation.z),
    );

    Isometry3::from_parts(translation, rotation)
}

#[inline]
/// Decompose a [`rapier3d::na::Isometry3`] into its rotation and translation components
pub fn decompose_isometry(i: &Isometry3<f32>) -> (Quat, Vec3) {
    let q = i.rotation.quaternion();
    (
        Quat::from_xyzw(q.i, q.j, q.k, q.w),
        glam_vec_from_na(&i.translation.vector),
    )
}

#[inline]
/// Convert a [`glam::Vec3`] into a [`rapier3d::na::Vector3`]
pub fn na_vector_from_glam(v: Vec3) -> Vector3<f32> {
    [v.x, v.y, v.z].into()
}

#[inline]
/// Convert a [`glam::Vec3`] into a [`rapier3d::na::Point3`]
pub fn na_point_from_glam(v: Vec3) -> Point3<f32> {
    Point3::new(v.x, v.y, v.z)
}

#[inline]
/// Convert a [`rapier3d::na::Vector3`] into a [`glam::Vec3`]
pub fn glam_vec_from_na(v: &Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}
