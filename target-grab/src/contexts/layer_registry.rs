use std::collections::HashMap;

use crate::{components::LayerId, GrabError, GrabResult};

const MAX_LAYERS: usize = 32;

/// The scene's named layers. Layer 0 is always "Default".
#[derive(Debug, Clone)]
pub struct LayerRegistry {
    layers: HashMap<String, LayerId>,
}

impl Default for LayerRegistry {
    fn default() -> Self {
        let mut layers = HashMap::new();
        layers.insert("Default".to_string(), LayerId::DEFAULT);
        Self { layers }
    }
}

impl LayerRegistry {
    /// Register a layer, or get the id of an existing layer with the same name.
    pub fn register(&mut self, name: &str) -> GrabResult<LayerId> {
        if let Some(id) = self.lookup(name) {
            return Ok(id);
        }
        if self.layers.len() >= MAX_LAYERS {
            return Err(GrabError::TooManyLayers);
        }

        let id = LayerId(self.layers.len() as u8);
        self.layers.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn lookup(&self, name: &str) -> Option<LayerId> {
        self.layers.get(name).copied()
    }
}
