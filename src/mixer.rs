//! The mixing desk the UI drives: per-sound play/volume state mirrored over
//! the engine, the master volume, and preset application.
//!
//! The engine only ever sees effective gain values; the split between a
//! sound's own volume and the master volume lives here. Effective gain is
//! always `clamp(volume) * clamp(master)`.

use std::collections::{HashMap, HashSet};
use std::thread;
use std::time::Duration;

use crate::audio::engine::{AudioEngine, SoundBackend};
use crate::catalog;
use crate::error::EngineError;
use crate::preset::Preset;

/// Volume a sound gets the first time it is started.
pub const DEFAULT_VOLUME: f32 = 0.3;

/// Default master volume.
pub const DEFAULT_MASTER_VOLUME: f32 = 0.6;

/// Pause between stopping the previous scene and starting a preset's sounds,
/// letting teardown finish before new material begins.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Mirrored state for one sound the user has touched.
#[derive(Debug, Clone, Copy)]
pub struct SoundState {
    pub playing: bool,
    pub volume: f32,
}

/// The ambient mixer. Generic over the backend so hosts and tests can swap
/// the audio device out; `Mixer::with_default_engine()` wires the real one.
pub struct Mixer<B = AudioEngine> {
    backend: B,
    states: HashMap<String, SoundState>,
    master: f32,
    settle_delay: Duration,
}

impl Mixer<AudioEngine> {
    pub fn with_default_engine() -> Self {
        Self::new(AudioEngine::new())
    }
}

impl<B: SoundBackend> Mixer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            states: HashMap::new(),
            master: DEFAULT_MASTER_VOLUME,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_playing(&self, id: &str) -> bool {
        self.states.get(id).map(|s| s.playing).unwrap_or(false)
    }

    /// The sound's own volume (before the master multiplier).
    pub fn volume_of(&self, id: &str) -> f32 {
        self.states
            .get(id)
            .map(|s| s.volume)
            .unwrap_or(DEFAULT_VOLUME)
    }

    pub fn master_volume(&self) -> f32 {
        self.master
    }

    pub fn playing_sounds(&self) -> Vec<String> {
        self.states
            .iter()
            .filter(|(_, s)| s.playing)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Start the sound if stopped, stop it if playing.
    pub fn toggle(&mut self, id: &str) -> Result<(), EngineError> {
        if self.is_playing(id) {
            self.backend.stop(id);
            if let Some(state) = self.states.get_mut(id) {
                state.playing = false;
            }
            Ok(())
        } else {
            self.start_with_volume(id, self.volume_of(id))
        }
    }

    /// Set a sound's own volume and push the new effective gain. Also
    /// remembered for sounds that are not currently playing.
    pub fn adjust_volume(&mut self, id: &str, volume: f32) {
        self.backend.set_volume(id, effective(volume, self.master));
        self.states
            .entry(id.to_string())
            .and_modify(|s| s.volume = volume)
            .or_insert(SoundState {
                playing: false,
                volume,
            });
    }

    /// Change the master volume and re-apply the effective gain of every
    /// playing sound; per-sound volumes are untouched.
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master = volume;
        for (id, state) in &self.states {
            if state.playing {
                self.backend.set_volume(id, effective(state.volume, volume));
            }
        }
    }

    pub fn stop_all(&mut self) {
        self.backend.stop_all();
        for state in self.states.values_mut() {
            state.playing = false;
        }
    }

    /// Stop everything, wait for teardown to settle, then start the preset's
    /// sounds at their declared volumes. Each sound is attempted on its own;
    /// one failure never blocks the rest.
    pub fn apply_preset(&mut self, preset: &Preset) {
        self.stop_all();
        if !self.settle_delay.is_zero() {
            thread::sleep(self.settle_delay);
        }
        for sound in &preset.sounds {
            if let Err(err) = self.start_with_volume(&sound.id, sound.volume) {
                log::warn!("preset sound {} failed to start: {err}", sound.id);
            }
        }
    }

    /// A preset is active iff the playing set equals its sound set exactly,
    /// with no extras and nothing missing. Volumes don't matter.
    pub fn is_preset_active(&self, preset: &Preset) -> bool {
        let playing: HashSet<&str> = self
            .states
            .iter()
            .filter(|(_, s)| s.playing)
            .map(|(id, _)| id.as_str())
            .collect();
        let wanted: HashSet<&str> = preset.sounds.iter().map(|s| s.id.as_str()).collect();
        playing == wanted
    }

    fn start_with_volume(&mut self, id: &str, volume: f32) -> Result<(), EngineError> {
        let category = catalog::category_of(id);
        self.backend.start(id, category)?;
        self.backend.set_volume(id, effective(volume, self.master));
        self.states.insert(
            id.to_string(),
            SoundState {
                playing: true,
                volume,
            },
        );
        Ok(())
    }
}

fn effective(volume: f32, master: f32) -> f32 {
    volume.clamp(0.0, 1.0) * master.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::recipe::Category;
    use crate::preset;
    use std::cell::RefCell;

    /// Records engine calls; optionally fails starts for specific ids.
    #[derive(Default)]
    struct FakeBackend {
        active: RefCell<HashMap<String, f32>>,
        failing: Vec<String>,
        started: RefCell<Vec<(String, Category)>>,
    }

    impl FakeBackend {
        fn gain_of(&self, id: &str) -> Option<f32> {
            self.active.borrow().get(id).copied()
        }
    }

    impl SoundBackend for FakeBackend {
        fn start(&self, id: &str, category: Category) -> Result<(), EngineError> {
            if self.failing.iter().any(|f| f == id) {
                return Err(EngineError::AssetLoad {
                    path: id.into(),
                    reason: "forced failure".into(),
                });
            }
            self.started.borrow_mut().push((id.to_string(), category));
            self.active.borrow_mut().insert(id.to_string(), 0.3);
            Ok(())
        }

        fn stop(&self, id: &str) {
            self.active.borrow_mut().remove(id);
        }

        fn set_volume(&self, id: &str, level: f32) {
            if let Some(gain) = self.active.borrow_mut().get_mut(id) {
                *gain = level;
            }
        }

        fn stop_all(&self) {
            self.active.borrow_mut().clear();
        }

        fn is_active(&self, id: &str) -> bool {
            self.active.borrow().contains_key(id)
        }
    }

    fn mixer() -> Mixer<FakeBackend> {
        Mixer::new(FakeBackend::default()).with_settle_delay(Duration::ZERO)
    }

    #[test]
    fn toggle_starts_with_the_default_volume() {
        let mut m = mixer();
        m.toggle("ocean").unwrap();

        assert!(m.is_playing("ocean"));
        assert_eq!(m.volume_of("ocean"), DEFAULT_VOLUME);
        let expected = DEFAULT_VOLUME * DEFAULT_MASTER_VOLUME;
        assert_eq!(m.backend().gain_of("ocean"), Some(expected));
        assert_eq!(
            m.backend().started.borrow()[0],
            ("ocean".to_string(), Category::Ocean)
        );

        m.toggle("ocean").unwrap();
        assert!(!m.is_playing("ocean"));
        assert!(!m.backend().is_active("ocean"));
    }

    #[test]
    fn toggle_remembers_the_previous_volume() {
        let mut m = mixer();
        m.toggle("rain").unwrap();
        m.adjust_volume("rain", 0.9);
        m.toggle("rain").unwrap(); // stop
        m.toggle("rain").unwrap(); // start again
        assert_eq!(m.volume_of("rain"), 0.9);
        assert_eq!(m.backend().gain_of("rain"), Some(0.9 * DEFAULT_MASTER_VOLUME));
    }

    #[test]
    fn effective_gain_is_volume_times_master() {
        let mut m = mixer();
        m.toggle("rain").unwrap();
        m.toggle("fire").unwrap();
        m.adjust_volume("rain", 0.4);
        m.adjust_volume("fire", 0.8);

        m.set_master_volume(0.5);
        assert_eq!(m.backend().gain_of("rain"), Some(0.2));
        assert_eq!(m.backend().gain_of("fire"), Some(0.4));
        // stored per-sound volumes unchanged
        assert_eq!(m.volume_of("rain"), 0.4);
        assert_eq!(m.volume_of("fire"), 0.8);
    }

    #[test]
    fn out_of_range_values_are_clamped_before_the_engine() {
        let mut m = mixer();
        m.toggle("rain").unwrap();
        m.adjust_volume("rain", 1.7);
        assert_eq!(m.backend().gain_of("rain"), Some(DEFAULT_MASTER_VOLUME));
        m.set_master_volume(-0.4);
        assert_eq!(m.backend().gain_of("rain"), Some(0.0));
    }

    #[test]
    fn stop_all_silences_every_sound() {
        let mut m = mixer();
        m.toggle("rain").unwrap();
        m.toggle("birds").unwrap();
        m.stop_all();
        assert!(m.playing_sounds().is_empty());
        assert!(!m.is_playing("rain"));
        assert!(!m.is_playing("birds"));
    }

    #[test]
    fn apply_preset_replaces_the_active_scene() {
        let mut m = mixer();
        m.toggle("thunder").unwrap();
        m.toggle("wind").unwrap();

        let p = preset::builtin()
            .into_iter()
            .find(|p| p.id == "rainy-cafe")
            .unwrap();
        m.apply_preset(&p);

        let mut playing = m.playing_sounds();
        playing.sort();
        assert_eq!(playing, vec!["coffee-shop".to_string(), "rain-window".to_string()]);
        assert!(!m.backend().is_active("thunder"));
        assert!(!m.backend().is_active("wind"));
        // declared volumes times master
        assert_eq!(
            m.backend().gain_of("rain-window"),
            Some(0.6 * DEFAULT_MASTER_VOLUME)
        );
        assert_eq!(
            m.backend().gain_of("coffee-shop"),
            Some(0.5 * DEFAULT_MASTER_VOLUME)
        );
    }

    #[test]
    fn preset_failures_are_isolated_per_sound() {
        let backend = FakeBackend {
            failing: vec!["rain-window".to_string()],
            ..FakeBackend::default()
        };
        let mut m = Mixer::new(backend).with_settle_delay(Duration::ZERO);

        let p = preset::builtin()
            .into_iter()
            .find(|p| p.id == "rainy-cafe")
            .unwrap();
        m.apply_preset(&p);

        assert!(!m.is_playing("rain-window"));
        assert!(m.is_playing("coffee-shop"), "sibling sounds must still start");
    }

    #[test]
    fn preset_activeness_is_exact_set_equality() {
        let mut m = mixer();
        let p = preset::builtin()
            .into_iter()
            .find(|p| p.id == "ocean-breeze")
            .unwrap();

        m.toggle("ocean").unwrap();
        assert!(!m.is_preset_active(&p), "missing a member");

        m.toggle("wind").unwrap();
        assert!(m.is_preset_active(&p));

        m.toggle("fire").unwrap();
        assert!(!m.is_preset_active(&p), "an extra sound breaks it");

        m.toggle("fire").unwrap();
        m.toggle("wind").unwrap();
        assert!(!m.is_preset_active(&p), "a removed member breaks it");
    }

    #[test]
    fn adjusting_an_idle_sound_only_stores_the_volume() {
        let mut m = mixer();
        m.adjust_volume("forest", 0.55);
        assert!(!m.is_playing("forest"));
        assert_eq!(m.volume_of("forest"), 0.55);
        assert_eq!(m.backend().gain_of("forest"), None);
    }
}
