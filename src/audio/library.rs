//! Audio asset access: WAV/MP3 decoding, the process-wide decode cache, and
//! the identifier → asset-path table.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use walkdir::WalkDir;

use super::recipe::Category;
use crate::catalog;
use crate::error::EngineError;

/// A fully decoded asset: mono f32 samples at the file's own rate.
#[derive(Debug)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Maps sound identifiers (and category names) to asset files and caches
/// decoded audio per path. Sounds without an entry synthesize procedurally.
/// Cache entries are immutable and never evicted.
pub struct SoundBank {
    assets: HashMap<String, PathBuf>,
    cache: Mutex<HashMap<PathBuf, Arc<DecodedAudio>>>,
}

impl SoundBank {
    pub fn new() -> Self {
        Self {
            assets: HashMap::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Bank pre-populated with the built-in catalog's asset paths.
    pub fn with_defaults() -> Self {
        let mut bank = Self::new();
        for def in catalog::SOUNDS {
            if let Some(asset) = def.asset {
                bank.register(def.id, asset);
            }
        }
        bank
    }

    pub fn register(&mut self, key: impl Into<String>, path: impl Into<PathBuf>) {
        self.assets.insert(key.into(), path.into());
    }

    /// Asset lookup: the identifier's own entry wins, then the category's.
    pub fn resolve(&self, id: &str, category: Category) -> Option<PathBuf> {
        self.assets
            .get(id)
            .or_else(|| self.assets.get(category.as_str()))
            .cloned()
    }

    pub fn load(&self, path: &Path) -> Result<Arc<DecodedAudio>, EngineError> {
        if let Some(hit) = self.cache.lock().get(path) {
            return Ok(Arc::clone(hit));
        }
        let decoded = Arc::new(decode_file(path)?);
        let mut cache = self.cache.lock();
        let entry = cache
            .entry(path.to_path_buf())
            .or_insert_with(|| decoded);
        Ok(Arc::clone(entry))
    }
}

impl Default for SoundBank {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ─────────────────────── Decoding ───────────────────────

/// Decode an audio file (WAV or MP3) to mono f32 samples + sample rate.
pub fn decode_file(path: &Path) -> Result<DecodedAudio, EngineError> {
    let is_mp3 = path
        .extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("mp3"))
        .unwrap_or(false);
    if is_mp3 {
        decode_mp3(path)
    } else {
        decode_wav(path)
    }
}

fn decode_wav(path: &Path) -> Result<DecodedAudio, EngineError> {
    let reader = hound::WavReader::open(path).map_err(|e| load_err(path, e))?;

    let spec = reader.spec();
    let sample_rate = spec.sample_rate;
    let channels = spec.channels as usize;

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max_val = (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .filter_map(|s| s.ok())
                .map(|s| s as f32 / max_val)
                .collect()
        }
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .filter_map(|s| s.ok())
            .collect(),
    };

    Ok(DecodedAudio {
        samples: downmix(samples, channels),
        sample_rate,
    })
}

fn decode_mp3(path: &Path) -> Result<DecodedAudio, EngineError> {
    let data = std::fs::read(path).map_err(|e| load_err(path, e))?;

    let mut decoder = minimp3::Decoder::new(&data[..]);
    let mut all_samples = Vec::new();
    let mut sample_rate = 44_100;
    let mut channels = 1;

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                sample_rate = frame.sample_rate as u32;
                channels = frame.channels;
                for &sample in &frame.data {
                    all_samples.push(sample as f32 / 32_768.0);
                }
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(load_err(path, format!("{e:?}"))),
        }
    }

    if all_samples.is_empty() {
        return Err(load_err(path, "no audio frames decoded"));
    }

    Ok(DecodedAudio {
        samples: downmix(all_samples, channels),
        sample_rate,
    })
}

fn downmix(samples: Vec<f32>, channels: usize) -> Vec<f32> {
    if channels > 1 {
        samples
            .chunks(channels)
            .map(|chunk| chunk.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    }
}

fn load_err(path: &Path, reason: impl ToString) -> EngineError {
    EngineError::AssetLoad {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

// ─────────────────────── Listing ───────────────────────

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AssetInfo {
    pub name: String,
    pub path: PathBuf,
}

/// List all audio files (WAV and MP3) under a directory recursively.
pub fn scan_assets(dir: &Path) -> Vec<AssetInfo> {
    let mut assets = Vec::new();
    if !dir.exists() {
        return assets;
    }
    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if let Some(ext) = path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if ext_lower == "wav" || ext_lower == "mp3" {
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default();
                assets.push(AssetInfo {
                    name,
                    path: path.to_path_buf(),
                });
            }
        }
    }
    assets
}
