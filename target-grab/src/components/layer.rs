use hecs::Entity;

/// A tag used downstream for collision filtering and highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u8);

impl LayerId {
    pub const DEFAULT: LayerId = LayerId(0);
}

/// Component holding the layer a node is currently on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer(pub LayerId);

impl Default for Layer {
    fn default() -> Self {
        Layer(LayerId::DEFAULT)
    }
}

/// Added to a grabbable when the session starts. Records the object's sub-tree once,
/// depth first with the root at the front, together with each node's original layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSwitch {
    /// Layer applied while held. `None` disables switching for this object.
    pub grabbed_layer: Option<LayerId>,
    pub nodes: Vec<(Entity, LayerId)>,
}
