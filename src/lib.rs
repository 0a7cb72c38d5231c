//! zenmix: an ambient sound mixing engine.
//!
//! Independent sound layers (rain, ocean, forest, a coffee shop…) play as
//! looping decoded assets or procedurally synthesized noise, each behind its
//! own gain, all mixed into one output stream. A [`Mixer`] sits on top of
//! the [`AudioEngine`] and owns what a front end needs: per-sound volumes,
//! the master volume, toggling, and preset scenes. The small relaxation
//! widgets (focus timer, tap counter, theme schedule, keyboard shortcuts)
//! live alongside as plain state machines.
//!
//! ```no_run
//! use zenmix::Mixer;
//!
//! let mut mixer = Mixer::with_default_engine();
//! mixer.toggle("ocean")?;
//! mixer.adjust_volume("ocean", 0.5);
//! mixer.set_master_volume(0.8);
//! # Ok::<(), zenmix::EngineError>(())
//! ```

pub mod audio;
pub mod catalog;
pub mod counter;
pub mod error;
pub mod mixer;
pub mod preset;
pub mod shortcuts;
pub mod theme;
pub mod timer;

pub use audio::engine::{AudioEngine, SoundBackend};
pub use audio::recipe::Category;
pub use error::EngineError;
pub use mixer::Mixer;
pub use preset::{Preset, PresetSound};
