use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{contexts::PlacementSlot, GrabResult};

/// How a device's grab button is interpreted when looking for a pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrabButtonMode {
    /// Only the frame the button goes from released to pressed counts
    #[default]
    Press,
    /// Every frame the button is held down counts
    Hold,
}

/// Tunables for grabbing, pointing and target feedback.
///
/// Every field has a default, so a JSON file only needs to name the values it changes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GrabConfig {
    /// Edge or level triggering for device pickups
    pub grab_button_mode: GrabButtonMode,
    /// How far a device's ray reaches, in metres
    pub raycast_distance: f32,
    /// Should held objects stop being pushed around by the physics simulation?
    pub make_kinematic_while_held: bool,
    /// Name of the layer applied to an object's sub-tree while it is held
    pub grabbed_layer_name: String,
    /// Length of the laser drawn from each pointer, in metres
    pub pointer_length: f32,
    /// Text placed in front of the target's name on the display panel
    pub target_text_prefix: String,
}

impl Default for GrabConfig {
    fn default() -> Self {
        Self {
            grab_button_mode: GrabButtonMode::Press,
            raycast_distance: 2.0,
            make_kinematic_while_held: true,
            grabbed_layer_name: "GrabbedObject".to_string(),
            pointer_length: 3.0,
            target_text_prefix: "Target Object: ".to_string(),
        }
    }
}

impl GrabConfig {
    /// Parse a config from a JSON string
    pub fn from_json(json: &str) -> GrabResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file
    pub fn load(path: impl AsRef<Path>) -> GrabResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// A config together with the placement slots authored for a scene.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub config: GrabConfig,
    pub slots: Vec<PlacementSlot>,
}

impl SceneDescription {
    pub fn from_json(json: &str) -> GrabResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> GrabResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GrabError;
    use approx::assert_relative_eq;
    use glam::{Quat, Vec3};

    #[test]
    pub fn test_partial_config_keeps_defaults() {
        let config = GrabConfig::from_json(r#"{ "grab_button_mode": "hold", "raycast_distance": 5.0 }"#)
            .unwrap();
        assert_eq!(config.grab_button_mode, GrabButtonMode::Hold);
        assert_relative_eq!(config.raycast_distance, 5.0);
        assert!(config.make_kinematic_while_held);
        assert_eq!(config.grabbed_layer_name, "GrabbedObject");
        assert_eq!(config.target_text_prefix, "Target Object: ");
    }

    #[test]
    pub fn test_scene_description() {
        let json = r#"{
            "slots": [
                { "name": "Bench", "translation": [1.0, 0.5, -2.0] },
                { "name": "Shelf", "translation": [0.0, 1.5, -2.0], "rotation": [0.0, 0.0, 0.0, 1.0] }
            ]
        }"#;
        let scene = SceneDescription::from_json(json).unwrap();
        assert_eq!(scene.config, GrabConfig::default());
        assert_eq!(scene.slots.len(), 2);
        assert_eq!(scene.slots[0].name, "Bench");
        assert_relative_eq!(scene.slots[0].translation, Vec3::new(1.0, 0.5, -2.0));
        assert_eq!(scene.slots[0].rotation, Quat::IDENTITY);
    }

    #[test]
    pub fn test_bad_config() {
        let result = GrabConfig::from_json(r#"{ "grab_button_mode": "squeeze" }"#);
        assert!(matches!(result, Err(GrabError::ConfigError(_))));
    }
}
