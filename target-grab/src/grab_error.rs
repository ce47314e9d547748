use thiserror::Error;

use crate::components::DeviceId;

#[derive(Error, Debug)]
pub enum GrabError {
    #[error("Not enough placement slots: {slots} slots for a pool of {pool} objects")]
    NotEnoughSlots { slots: usize, pool: usize },
    #[error("The entity is not a member of the grabbable pool")]
    NotInPool,
    #[error("Device {0:?} has not been registered with the input context")]
    UnknownDevice(DeviceId),
    #[error("No more layers can be registered")]
    TooManyLayers,
    #[error("The entity does not exist")]
    NoSuchEntity(#[from] hecs::NoSuchEntity),
    #[error("There was a problem accessing a component")]
    ComponentError(#[from] hecs::ComponentError),
    #[error("There was a problem parsing the configuration")]
    ConfigError(#[from] serde_json::Error),
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
