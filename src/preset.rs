//! Named sound combinations: one click starts a whole scene.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetSound {
    pub id: String,
    pub volume: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub sounds: Vec<PresetSound>,
}

impl Preset {
    pub fn from_json(json: &str) -> serde_json::Result<Preset> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn preset(id: &str, name: &str, description: &str, sounds: &[(&str, f32)]) -> Preset {
    Preset {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        sounds: sounds
            .iter()
            .map(|&(id, volume)| PresetSound {
                id: id.to_string(),
                volume,
            })
            .collect(),
    }
}

/// The built-in preset catalog.
pub fn builtin() -> Vec<Preset> {
    vec![
        preset(
            "gentle-rain",
            "Gentle Rain",
            "A soft rain to quiet the mind",
            &[("rain-gentle", 0.8)],
        ),
        preset(
            "cozy-cafe",
            "Cozy Coffee Shop",
            "The real murmur of a coffee shop",
            &[("coffee-shop", 0.7)],
        ),
        preset(
            "rainy-cafe",
            "Rainy Coffee Shop",
            "A warm café with rain on the windows",
            &[("rain-window", 0.6), ("coffee-shop", 0.5)],
        ),
        preset(
            "chill-rain",
            "Chill Rain",
            "Relaxed rain for meditation and focus",
            &[("rain-chill", 0.8)],
        ),
        preset(
            "window-rain",
            "Rain on the Window",
            "Raindrops tapping on the glass",
            &[("rain-window", 0.8)],
        ),
        preset(
            "soft-rain",
            "Soft Rain",
            "Gentle rainfall for a calm room",
            &[("rain-soft", 0.8)],
        ),
        preset(
            "rain-surfaces",
            "Layered Rain",
            "Rain landing on many different surfaces",
            &[("rain-surfaces", 0.8)],
        ),
        preset(
            "forest-storm",
            "Forest Storm",
            "A thunderstorm deep in the woods",
            &[("forest", 0.5), ("thunder", 0.3), ("rain-ambient1", 0.7)],
        ),
        preset(
            "ocean-breeze",
            "Ocean Breeze",
            "Waves with a light wind",
            &[("ocean", 0.8), ("wind", 0.4)],
        ),
        preset(
            "campfire-night",
            "Campfire Night",
            "A quiet night beside the fire",
            &[("fire", 0.7), ("wind", 0.3), ("forest", 0.2)],
        ),
        preset(
            "morning-birds",
            "Morning Birds",
            "Dawn chorus over the forest",
            &[("birds", 0.8), ("forest", 0.5), ("wind", 0.2)],
        ),
        preset(
            "ambient-rain-mix",
            "Ambient Rain Mix",
            "Two rain recordings blended together",
            &[("rain-ambient2", 0.6), ("rain-ambient3", 0.4)],
        ),
        preset(
            "cafe-gentle-rain",
            "Café with Gentle Rain",
            "Coffee-shop warmth under gentle rain",
            &[("coffee-shop", 0.6), ("rain-gentle", 0.5)],
        ),
        preset(
            "cafe-soft-rain",
            "Café with Soft Rain",
            "Coffee-shop warmth under soft rain",
            &[("coffee-shop", 0.7), ("rain-soft", 0.4)],
        ),
        preset(
            "cafe-chill-rain",
            "Café with Chill Rain",
            "An easy rainy afternoon at the café",
            &[("coffee-shop", 0.5), ("rain-chill", 0.6)],
        ),
    ]
}
