//! The built-in sound catalog: every mixable layer the UI offers, its
//! display name, its playback category, and its asset file when one exists
//! (`None` means the sound is always synthesized).

use serde::Serialize;

use crate::audio::recipe::Category;

#[derive(Debug, Clone, Serialize)]
pub struct SoundDef {
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub asset: Option<&'static str>,
}

pub const SOUNDS: &[SoundDef] = &[
    SoundDef {
        id: "rain-gentle",
        name: "Gentle Rain",
        category: Category::RainGentle,
        asset: Some("assets/gentle-rain.wav"),
    },
    SoundDef {
        id: "rain-chill",
        name: "Chill Rain",
        category: Category::RainChill,
        asset: Some("assets/chill-rain.mp3"),
    },
    SoundDef {
        id: "rain-soft",
        name: "Soft Rain",
        category: Category::RainSoft,
        asset: Some("assets/soft-rain.mp3"),
    },
    SoundDef {
        id: "rain-window",
        name: "Rain on the Window",
        category: Category::RainWindow,
        asset: Some("assets/rain-on-window.mp3"),
    },
    SoundDef {
        id: "rain-surfaces",
        name: "Rain on Every Surface",
        category: Category::RainSurfaces,
        asset: Some("assets/rain-on-surfaces.mp3"),
    },
    SoundDef {
        id: "rain-ambient1",
        name: "Ambient Rain I",
        category: Category::RainAmbient1,
        asset: Some("assets/ambient-rain-1.mp3"),
    },
    SoundDef {
        id: "rain-ambient2",
        name: "Ambient Rain II",
        category: Category::RainAmbient2,
        asset: Some("assets/ambient-rain-2.mp3"),
    },
    SoundDef {
        id: "rain-ambient3",
        name: "Ambient Rain III",
        category: Category::RainAmbient3,
        asset: Some("assets/ambient-rain-3.mp3"),
    },
    SoundDef {
        id: "coffee-shop",
        name: "Cozy Coffee Shop",
        category: Category::Coffee,
        asset: Some("assets/coffee-shop.mp3"),
    },
    SoundDef {
        id: "rain",
        name: "Rain",
        category: Category::Rain,
        asset: None,
    },
    SoundDef {
        id: "ocean",
        name: "Ocean Waves",
        category: Category::Ocean,
        asset: None,
    },
    SoundDef {
        id: "wind",
        name: "Wind",
        category: Category::Wind,
        asset: None,
    },
    SoundDef {
        id: "fire",
        name: "Campfire",
        category: Category::Fire,
        asset: None,
    },
    SoundDef {
        id: "forest",
        name: "Forest",
        category: Category::Forest,
        asset: None,
    },
    SoundDef {
        id: "coffee",
        name: "Coffee Shop",
        category: Category::Coffee,
        asset: None,
    },
    SoundDef {
        id: "thunder",
        name: "Thunder",
        category: Category::Thunder,
        asset: None,
    },
    SoundDef {
        id: "birds",
        name: "Birdsong",
        category: Category::Birds,
        asset: None,
    },
];

pub fn find(id: &str) -> Option<&'static SoundDef> {
    SOUNDS.iter().find(|def| def.id == id)
}

/// Category for an identifier; unknown identifiers play as rain.
pub fn category_of(id: &str) -> Category {
    find(id)
        .map(|def| def.category)
        .or_else(|| Category::parse(id))
        .unwrap_or(Category::Rain)
}

pub fn display_name(id: &str) -> &str {
    find(id).map(|def| def.name).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        for (i, def) in SOUNDS.iter().enumerate() {
            assert!(
                SOUNDS.iter().skip(i + 1).all(|other| other.id != def.id),
                "duplicate id {}",
                def.id
            );
        }
    }

    #[test]
    fn categories_match_the_identifier_table() {
        assert_eq!(category_of("rain-gentle"), Category::RainGentle);
        assert_eq!(category_of("coffee-shop"), Category::Coffee);
        assert_eq!(category_of("ocean"), Category::Ocean);
        assert_eq!(category_of("something-unknown"), Category::Rain);
    }

    #[test]
    fn display_names_fall_back_to_the_id() {
        assert_eq!(display_name("ocean"), "Ocean Waves");
        assert_eq!(display_name("mystery"), "mystery");
    }

    #[test]
    fn asset_backed_sounds_point_at_audio_files() {
        for def in SOUNDS {
            if let Some(asset) = def.asset {
                assert!(
                    asset.ends_with(".wav") || asset.ends_with(".mp3"),
                    "{} has an odd asset path {asset}",
                    def.id
                );
            }
        }
    }
}
