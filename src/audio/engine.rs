//! The sound engine: one live voice per sound identifier, mixed in the
//! output callback.
//!
//! The control plane (any thread) owns a registry of sound-id → slot and
//! talks to the audio callback over a bounded command channel. Every start
//! attempt gets a fresh slot id; the attempt only commits its voice to the
//! graph if the registry still lists that slot as the latest for the
//! identifier, so a stop or a newer start issued while material was being
//! resolved wins and the stale voice is discarded before it ever sounds.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use crossbeam_channel::{bounded, Sender};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::library::SoundBank;
use super::recipe::Category;
use super::voice::Voice;
use crate::error::EngineError;

/// Gain every voice starts at; callers re-apply the effective volume right
/// after starting (the original UI does the same).
const INITIAL_GAIN: f32 = 0.3;

const COMMAND_QUEUE_DEPTH: usize = 1024;

/// The engine boundary the mixer (and any host) programs against. Lets
/// tests substitute the audio device.
pub trait SoundBackend {
    fn start(&self, id: &str, category: Category) -> Result<(), EngineError>;
    fn stop(&self, id: &str);
    fn set_volume(&self, id: &str, level: f32);
    fn stop_all(&self);
    fn is_active(&self, id: &str) -> bool;
}

/// Messages from the control plane to the audio callback.
#[derive(Debug)]
pub(crate) enum MixCommand {
    Start { slot: u64, voice: Voice, gain: f32 },
    SetGain { slot: u64, gain: f32 },
    Stop { slot: u64 },
    StopAll,
}

// ─────────────────────── Mix graph (audio thread) ───────────────────────

struct GraphVoice {
    voice: Voice,
    gain: f32,
}

/// Callback-side state: the live voices keyed by slot.
pub(crate) struct MixGraph {
    voices: HashMap<u64, GraphVoice>,
}

impl MixGraph {
    pub fn new() -> Self {
        Self {
            voices: HashMap::new(),
        }
    }

    pub fn apply(&mut self, cmd: MixCommand) {
        match cmd {
            MixCommand::Start { slot, voice, gain } => {
                self.voices.insert(slot, GraphVoice { voice, gain });
            }
            MixCommand::SetGain { slot, gain } => {
                if let Some(v) = self.voices.get_mut(&slot) {
                    v.gain = gain;
                }
                // a gain change for a slot already torn down is fine
            }
            MixCommand::Stop { slot } => {
                // stopping an already-stopped slot is fine too
                self.voices.remove(&slot);
            }
            MixCommand::StopAll => self.voices.clear(),
        }
    }

    /// Sum all voices into the interleaved output buffer.
    pub fn render(&mut self, data: &mut [f32], channels: usize) {
        let frames = data.len() / channels.max(1);
        for frame in 0..frames {
            let mut mixed = 0.0f32;
            for v in self.voices.values_mut() {
                mixed += v.voice.next_sample() * v.gain;
            }
            let mixed = mixed.clamp(-1.0, 1.0);
            for ch in 0..channels {
                data[frame * channels + ch] = mixed;
            }
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.voices.len()
    }
}

// ─────────────────────── Control plane ───────────────────────

struct Output {
    tx: Sender<MixCommand>,
    sample_rate: u32,
    stream: Option<cpal::Stream>,
}

impl Output {
    /// Resume analog: the stream may be paused by the host; kick it before
    /// every start.
    fn resume(&self) {
        if let Some(stream) = &self.stream {
            if let Err(err) = stream.play() {
                log::warn!("could not resume output stream: {err}");
            }
        }
    }
}

enum OutputState {
    Idle,
    Ready(Output),
    Failed,
}

/// The ambient sound engine. Output acquisition is lazy: the device stream
/// is opened on the first start, and an unusable device is reported once;
/// after that, starts degrade to logged no-ops.
pub struct AudioEngine {
    bank: SoundBank,
    registry: Mutex<HashMap<String, u64>>,
    output: Mutex<OutputState>,
    next_slot: AtomicU64,
}

// Safety: the `cpal::Stream` lives inside the output mutex and is only
// touched while holding the lock; the audio callback owns its own state.
unsafe impl Send for AudioEngine {}
unsafe impl Sync for AudioEngine {}

impl AudioEngine {
    pub fn new() -> Self {
        Self::with_bank(SoundBank::with_defaults())
    }

    pub fn with_bank(bank: SoundBank) -> Self {
        Self {
            bank,
            registry: Mutex::new(HashMap::new()),
            output: Mutex::new(OutputState::Idle),
            next_slot: AtomicU64::new(1),
        }
    }

    /// Start (or restart) a sound. An already-active identifier is torn down
    /// first, so at most one voice per id ever plays.
    pub fn start(&self, id: &str, category: Category) -> Result<(), EngineError> {
        let (tx, sample_rate) = {
            let mut output = self.output.lock();
            match &mut *output {
                OutputState::Ready(out) => {
                    out.resume();
                    (out.tx.clone(), out.sample_rate)
                }
                OutputState::Failed => {
                    log::debug!("audio output unavailable, ignoring start of {id}");
                    return Ok(());
                }
                OutputState::Idle => match open_output() {
                    Ok(out) => {
                        let pair = (out.tx.clone(), out.sample_rate);
                        *output = OutputState::Ready(out);
                        pair
                    }
                    Err(err) => {
                        log::error!("{err}");
                        *output = OutputState::Failed;
                        return Err(err);
                    }
                },
            }
        };

        let slot = self.begin(id, &tx);
        let voice = self.resolve_voice(id, category, sample_rate);
        self.commit(id, slot, voice, &tx);
        Ok(())
    }

    /// Stop a sound; a no-op for idle identifiers.
    pub fn stop(&self, id: &str) {
        let slot = self.registry.lock().remove(id);
        if let (Some(slot), Some(tx)) = (slot, self.sender()) {
            send(&tx, MixCommand::Stop { slot });
        }
    }

    /// Apply an effective gain value verbatim; a no-op for idle identifiers.
    /// Callers pass the already master-multiplied level.
    pub fn set_volume(&self, id: &str, level: f32) {
        let slot = self.registry.lock().get(id).copied();
        if let (Some(slot), Some(tx)) = (slot, self.sender()) {
            send(&tx, MixCommand::SetGain { slot, gain: level });
        }
    }

    pub fn stop_all(&self) {
        self.registry.lock().clear();
        if let Some(tx) = self.sender() {
            send(&tx, MixCommand::StopAll);
        }
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.registry.lock().contains_key(id)
    }

    pub fn active_sounds(&self) -> Vec<String> {
        self.registry.lock().keys().cloned().collect()
    }

    pub fn bank(&self) -> &SoundBank {
        &self.bank
    }

    /// Register this attempt as the authoritative one for `id`, tearing down
    /// whatever was there.
    fn begin(&self, id: &str, tx: &Sender<MixCommand>) -> u64 {
        let slot = self.next_slot.fetch_add(1, Ordering::Relaxed);
        let mut registry = self.registry.lock();
        if let Some(prev) = registry.insert(id.to_string(), slot) {
            send(tx, MixCommand::Stop { slot: prev });
        }
        slot
    }

    /// Resolve playback material: the sound's asset if one is configured and
    /// decodes, otherwise the category's procedural recipe.
    fn resolve_voice(&self, id: &str, category: Category, sample_rate: u32) -> Voice {
        match self.bank.resolve(id, category) {
            Some(path) => match self.bank.load(&path) {
                Ok(audio) => Voice::sample(audio, sample_rate),
                Err(err) => {
                    log::warn!("falling back to synthesized {category} for {id}: {err}");
                    Voice::procedural(category.recipe(), sample_rate)
                }
            },
            None => Voice::procedural(category.recipe(), sample_rate),
        }
    }

    /// Hand the voice to the graph, unless this attempt was superseded or
    /// stopped while its material was being resolved.
    fn commit(&self, id: &str, slot: u64, voice: Voice, tx: &Sender<MixCommand>) {
        let registry = self.registry.lock();
        if registry.get(id) == Some(&slot) {
            send(tx, MixCommand::Start { slot, voice, gain: INITIAL_GAIN });
        } else {
            log::debug!("start of {id} superseded before its material resolved");
        }
    }

    fn sender(&self) -> Option<Sender<MixCommand>> {
        match &*self.output.lock() {
            OutputState::Ready(out) => Some(out.tx.clone()),
            _ => None,
        }
    }
}

impl Default for AudioEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SoundBackend for AudioEngine {
    fn start(&self, id: &str, category: Category) -> Result<(), EngineError> {
        AudioEngine::start(self, id, category)
    }

    fn stop(&self, id: &str) {
        AudioEngine::stop(self, id);
    }

    fn set_volume(&self, id: &str, level: f32) {
        AudioEngine::set_volume(self, id, level);
    }

    fn stop_all(&self) {
        AudioEngine::stop_all(self);
    }

    fn is_active(&self, id: &str) -> bool {
        AudioEngine::is_active(self, id)
    }
}

fn send(tx: &Sender<MixCommand>, cmd: MixCommand) {
    if let Err(err) = tx.try_send(cmd) {
        log::warn!("audio command dropped: {err}");
    }
}

fn open_output() -> Result<Output, EngineError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| EngineError::Unavailable("no output device found".into()))?;

    let supported = device
        .default_output_config()
        .map_err(|e| EngineError::Unavailable(format!("no default output config: {e}")))?;

    if supported.sample_format() != SampleFormat::F32 {
        return Err(EngineError::Unavailable(format!(
            "unsupported sample format {:?}",
            supported.sample_format()
        )));
    }

    let sample_rate = supported.sample_rate().0;
    let channels = supported.channels() as usize;

    let config = StreamConfig {
        channels: supported.channels(),
        sample_rate: supported.sample_rate(),
        buffer_size: cpal::BufferSize::Default,
    };

    let (tx, rx) = bounded::<MixCommand>(COMMAND_QUEUE_DEPTH);
    let mut graph = MixGraph::new();

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                while let Ok(cmd) = rx.try_recv() {
                    graph.apply(cmd);
                }
                graph.render(data, channels);
            },
            |err| log::error!("audio stream error: {err}"),
            None,
        )
        .map_err(|e| EngineError::Unavailable(format!("failed to build stream: {e}")))?;

    stream
        .play()
        .map_err(|e| EngineError::Unavailable(format!("failed to start stream: {e}")))?;

    log::info!("audio output ready at {sample_rate} Hz, {channels} channel(s)");

    Ok(Output {
        tx,
        sample_rate,
        stream: Some(stream),
    })
}
