//! Sound categories and their procedural synthesis recipes.
//!
//! A category picks the material to play when a sound has no audio asset (or
//! its asset fails to load): one noise color, one or two filter stages, and
//! for the ocean a slow swell modulating the output gain. The exact
//! frequencies are tuning choices; the noise-color and stage shape is what
//! keeps the categories audibly apart.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::filter::{FilterKind, FilterSpec};
use super::synth::NoiseColor;

/// Closed set of playback categories. Several sound identifiers can share a
/// category; the fine-grained rain variants all synthesize as plain rain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Rain,
    Ocean,
    Wind,
    Fire,
    Forest,
    Coffee,
    Thunder,
    Birds,
    RainGentle,
    RainChill,
    RainSoft,
    RainWindow,
    RainSurfaces,
    RainAmbient1,
    RainAmbient2,
    RainAmbient3,
}

/// Slow sub-audio gain modulation (ocean swell).
#[derive(Debug, Clone, Copy)]
pub struct SwellSpec {
    pub rate: f32,
    pub depth: f32,
}

/// One category's synthesis topology.
#[derive(Debug, Clone, Copy)]
pub struct Recipe {
    pub noise: NoiseColor,
    pub stages: &'static [FilterSpec],
    pub swell: Option<SwellSpec>,
}

const RAIN_STAGES: &[FilterSpec] = &[
    FilterSpec { kind: FilterKind::LowPass, cutoff: 3_000.0, q: 0.3 },
    FilterSpec { kind: FilterKind::LowPass, cutoff: 6_000.0, q: 0.2 },
];

const OCEAN_STAGES: &[FilterSpec] = &[
    FilterSpec { kind: FilterKind::LowPass, cutoff: 800.0, q: 0.3 },
];

const WIND_STAGES: &[FilterSpec] = &[
    FilterSpec { kind: FilterKind::LowPass, cutoff: 1_500.0, q: 0.2 },
    FilterSpec { kind: FilterKind::LowPass, cutoff: 3_000.0, q: 0.1 },
];

const FIRE_STAGES: &[FilterSpec] = &[
    FilterSpec { kind: FilterKind::LowPass, cutoff: 1_200.0, q: 0.2 },
    FilterSpec { kind: FilterKind::LowPass, cutoff: 2_500.0, q: 0.1 },
];

const FOREST_STAGES: &[FilterSpec] = &[
    FilterSpec { kind: FilterKind::BandPass, cutoff: 600.0, q: 0.5 },
];

const COFFEE_STAGES: &[FilterSpec] = &[
    FilterSpec { kind: FilterKind::LowPass, cutoff: 1_200.0, q: 0.7 },
];

const THUNDER_STAGES: &[FilterSpec] = &[
    FilterSpec { kind: FilterKind::LowPass, cutoff: 300.0, q: 0.3 },
    FilterSpec { kind: FilterKind::LowPass, cutoff: 600.0, q: 0.2 },
];

const BIRDS_STAGES: &[FilterSpec] = &[
    FilterSpec { kind: FilterKind::BandPass, cutoff: 1_500.0, q: 0.2 },
    FilterSpec { kind: FilterKind::LowPass, cutoff: 4_000.0, q: 0.1 },
];

impl Category {
    /// The base category whose recipe this one plays.
    pub fn family(self) -> Category {
        match self {
            Category::RainGentle
            | Category::RainChill
            | Category::RainSoft
            | Category::RainWindow
            | Category::RainSurfaces
            | Category::RainAmbient1
            | Category::RainAmbient2
            | Category::RainAmbient3 => Category::Rain,
            other => other,
        }
    }

    pub fn recipe(self) -> Recipe {
        match self.family() {
            Category::Rain => Recipe {
                noise: NoiseColor::Pink,
                stages: RAIN_STAGES,
                swell: None,
            },
            Category::Ocean => Recipe {
                noise: NoiseColor::Brown,
                stages: OCEAN_STAGES,
                swell: Some(SwellSpec { rate: 0.05, depth: 0.1 }),
            },
            Category::Wind => Recipe {
                noise: NoiseColor::Brown,
                stages: WIND_STAGES,
                swell: None,
            },
            Category::Fire => Recipe {
                noise: NoiseColor::Brown,
                stages: FIRE_STAGES,
                swell: None,
            },
            Category::Forest => Recipe {
                noise: NoiseColor::Pink,
                stages: FOREST_STAGES,
                swell: None,
            },
            Category::Coffee => Recipe {
                noise: NoiseColor::Brown,
                stages: COFFEE_STAGES,
                swell: None,
            },
            Category::Thunder => Recipe {
                noise: NoiseColor::Brown,
                stages: THUNDER_STAGES,
                swell: None,
            },
            Category::Birds => Recipe {
                noise: NoiseColor::Pink,
                stages: BIRDS_STAGES,
                swell: None,
            },
            // family() never returns a rain variant
            other => unreachable!("{other:?} is not a base category"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Rain => "rain",
            Category::Ocean => "ocean",
            Category::Wind => "wind",
            Category::Fire => "fire",
            Category::Forest => "forest",
            Category::Coffee => "coffee",
            Category::Thunder => "thunder",
            Category::Birds => "birds",
            Category::RainGentle => "rain-gentle",
            Category::RainChill => "rain-chill",
            Category::RainSoft => "rain-soft",
            Category::RainWindow => "rain-window",
            Category::RainSurfaces => "rain-surfaces",
            Category::RainAmbient1 => "rain-ambient1",
            Category::RainAmbient2 => "rain-ambient2",
            Category::RainAmbient3 => "rain-ambient3",
        }
    }

    pub fn parse(s: &str) -> Option<Category> {
        Some(match s {
            "rain" => Category::Rain,
            "ocean" => Category::Ocean,
            "wind" => Category::Wind,
            "fire" => Category::Fire,
            "forest" => Category::Forest,
            "coffee" => Category::Coffee,
            "thunder" => Category::Thunder,
            "birds" => Category::Birds,
            "rain-gentle" => Category::RainGentle,
            "rain-chill" => Category::RainChill,
            "rain-soft" => Category::RainSoft,
            "rain-window" => Category::RainWindow,
            "rain-surfaces" => Category::RainSurfaces,
            "rain-ambient1" => Category::RainAmbient1,
            "rain-ambient2" => Category::RainAmbient2,
            "rain-ambient3" => Category::RainAmbient3,
            _ => return None,
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
