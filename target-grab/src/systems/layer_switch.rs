use std::collections::{HashMap, HashSet};

use hecs::{Entity, World};
use log::error;

use crate::{
    components::{Layer, LayerId, LayerSwitch, Parent},
    contexts::LayerRegistry,
};

/// Capture `root`'s sub-tree and the layer each node is on right now, and attach the
/// result as a [`LayerSwitch`]. If `grabbed_layer_name` isn't a registered layer, an
/// error is logged and switching stays disabled for this object.
pub fn init_layer_switch(
    world: &mut World,
    layer_registry: &LayerRegistry,
    root: Entity,
    grabbed_layer_name: &str,
) -> LayerSwitch {
    let grabbed_layer = layer_registry.lookup(grabbed_layer_name);
    if grabbed_layer.is_none() {
        error!(
            "[LAYER_SWITCH] Layer '{grabbed_layer_name}' not found, layers will not change when {root:?} is grabbed"
        );
    }

    let mut nodes = Vec::new();
    for node in collect_subtree(world, root) {
        let layer = match world.get::<&Layer>(node) {
            Ok(layer) => layer.0,
            Err(_) => LayerId::DEFAULT,
        };
        if world.get::<&Layer>(node).is_err() {
            let _ = world.insert_one(node, Layer(layer));
        }
        nodes.push((node, layer));
    }

    let layer_switch = LayerSwitch {
        grabbed_layer,
        nodes,
    };
    let _ = world.insert_one(root, layer_switch.clone());
    layer_switch
}

/// Every node under `root` (following [`Parent`] links), depth first, `root` first.
pub fn collect_subtree(world: &World, root: Entity) -> Vec<Entity> {
    let mut children: HashMap<Entity, Vec<Entity>> = HashMap::new();
    for (entity, parent) in world.query::<&Parent>().iter() {
        children.entry(parent.0).or_default().push(entity);
    }

    let mut visited = HashSet::new();
    let mut nodes = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if !visited.insert(node) {
            continue;
        }
        nodes.push(node);
        if let Some(kids) = children.get(&node) {
            stack.extend(kids.iter().rev());
        }
    }
    nodes
}

pub fn apply_grabbed_layer(world: &World, entity: Entity) {
    let Ok(layer_switch) = world.get::<&LayerSwitch>(entity) else {
        return;
    };
    let Some(grabbed_layer) = layer_switch.grabbed_layer else {
        return;
    };
    for (node, _) in &layer_switch.nodes {
        set_layer(world, *node, grabbed_layer);
    }
}

pub fn restore_original_layer(world: &World, entity: Entity) {
    let Ok(layer_switch) = world.get::<&LayerSwitch>(entity) else {
        return;
    };
    if layer_switch.grabbed_layer.is_none() {
        return;
    }
    for (node, original) in &layer_switch.nodes {
        set_layer(world, *node, *original);
    }
}

fn set_layer(world: &World, node: Entity, layer: LayerId) {
    if let Ok(mut current) = world.get::<&mut Layer>(node) {
        current.0 = layer;
    }
}
