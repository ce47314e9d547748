//! Grab-and-target coordination for VR scenes.
//!
//! A pool of objects can be picked up either by a tracked hand or by a pointing device
//! that hits them with its ray. One member of the pool is the current *target*: picking it
//! up releases everything, shuffles the pool into new places and chooses another target.
//!
//! # Getting started
//! Build a [`Session`] with a [`SessionBuilder`], add the pool with
//! [`Session::add_grabbable`], register devices and call [`Session::start`]. Each frame,
//! feed device samples into [`contexts::InputContext::update_device`], forward hand
//! notifications with [`contexts::InputContext::hand_select`] and
//! [`contexts::InputContext::hand_unselect`], then call [`Session::tick`].
//!
//! Rendering, audio mixing and stepping the physics simulation belong to the host. The
//! session only tells it what changed: layers, panel text, clips to play and body poses.

pub use glam;
pub use hecs;
pub use rapier3d;

pub use grab_error::GrabError;
pub use session::{Session, SessionBuilder};

/// Components are data attached to entities in the session's world
pub mod components;
/// Tunables, and scenes authored in JSON
pub mod config;
/// Contexts are wrappers around state shared with the host or across the whole pool
pub mod contexts;
mod grab_error;
mod session;
/// Systems are functions called each tick to update the session
pub mod systems;
/// Conversions between glam and rapier's nalgebra types
pub mod util;

/// Result type used throughout the crate
pub type GrabResult<T> = std::result::Result<T, GrabError>;
