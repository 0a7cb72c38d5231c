//! Live playback voices: the per-sound signal chains the mix graph sums.

use std::sync::Arc;

use rand::Rng;

use super::filter::Biquad;
use super::library::DecodedAudio;
use super::recipe::Recipe;
use super::synth;

/// Length of the generated noise loop.
const NOISE_LOOP_SECS: f32 = 2.0;

/// One active sound instance: either a looping decoded asset or a looping
/// procedural noise chain. Mono; the graph fans the sample out per channel.
#[derive(Debug)]
pub(crate) enum Voice {
    Sample(SampleVoice),
    Procedural(ProceduralVoice),
}

impl Voice {
    pub fn sample(audio: Arc<DecodedAudio>, output_rate: u32) -> Self {
        // Play at the file's own pitch regardless of the device rate
        let rate = audio.sample_rate as f64 / output_rate as f64;
        Voice::Sample(SampleVoice {
            audio,
            position: 0.0,
            rate,
        })
    }

    pub fn procedural(recipe: Recipe, output_rate: u32) -> Self {
        let seed = rand::thread_rng().gen::<u32>();
        let buffer = synth::noise_buffer(recipe.noise, NOISE_LOOP_SECS, output_rate, seed);
        let stages = recipe
            .stages
            .iter()
            .map(|spec| Biquad::from_spec(spec, output_rate as f32))
            .collect();
        let swell = recipe.swell.map(|spec| Swell {
            phase: 0.0,
            step: spec.rate / output_rate as f32,
            depth: spec.depth,
        });
        Voice::Procedural(ProceduralVoice {
            buffer,
            position: 0,
            stages,
            swell,
        })
    }

    pub fn next_sample(&mut self) -> f32 {
        match self {
            Voice::Sample(v) => v.next_sample(),
            Voice::Procedural(v) => v.next_sample(),
        }
    }
}

/// Looping buffer playback with cubic Hermite interpolation; the rate folds
/// the file-rate/device-rate ratio in so any source rate plays at pitch.
#[derive(Debug)]
pub(crate) struct SampleVoice {
    audio: Arc<DecodedAudio>,
    position: f64,
    rate: f64,
}

impl SampleVoice {
    fn next_sample(&mut self) -> f32 {
        let data = &self.audio.samples;
        let len = data.len();
        if len == 0 {
            return 0.0;
        }
        let idx = self.position as usize;
        let frac = (self.position - idx as f64) as f32;
        let i0 = (idx + len - 1) % len;
        let i1 = idx % len;
        let i2 = (idx + 1) % len;
        let i3 = (idx + 2) % len;
        let (y0, y1, y2, y3) = (data[i0], data[i1], data[i2], data[i3]);
        let c0 = y1;
        let c1 = 0.5 * (y2 - y0);
        let c2 = y0 - 2.5 * y1 + 2.0 * y2 - 0.5 * y3;
        let c3 = 0.5 * (y3 - y0) + 1.5 * (y1 - y2);
        let s = ((c3 * frac + c2) * frac + c1) * frac + c0;

        self.position += self.rate;
        let len_f = len as f64;
        if self.position >= len_f {
            self.position -= len_f;
        }
        s
    }

    #[cfg(test)]
    fn position(&self) -> f64 {
        self.position
    }
}

/// Looping noise buffer through its filter stages, optionally swelled.
#[derive(Debug)]
pub(crate) struct ProceduralVoice {
    buffer: Vec<f32>,
    position: usize,
    stages: Vec<Biquad>,
    swell: Option<Swell>,
}

#[derive(Debug)]
struct Swell {
    phase: f32,
    step: f32,
    depth: f32,
}

impl ProceduralVoice {
    fn next_sample(&mut self) -> f32 {
        if self.buffer.is_empty() {
            return 0.0;
        }
        let mut s = self.buffer[self.position];
        self.position = (self.position + 1) % self.buffer.len();
        for stage in &mut self.stages {
            s = stage.process(s);
        }
        if let Some(swell) = &mut self.swell {
            s *= 1.0 + swell.depth * (swell.phase * std::f32::consts::TAU).sin();
            swell.phase += swell.step;
            if swell.phase >= 1.0 {
                swell.phase -= 1.0;
            }
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::recipe::Category;

    fn decoded(samples: Vec<f32>, sample_rate: u32) -> Arc<DecodedAudio> {
        Arc::new(DecodedAudio {
            samples,
            sample_rate,
        })
    }

    #[test]
    fn sample_voice_interpolates_a_constant_exactly() {
        let mut voice = Voice::sample(decoded(vec![0.25; 64], 44_100), 44_100);
        for _ in 0..200 {
            let s = voice.next_sample();
            assert!((s - 0.25).abs() < 1e-6, "got {s}");
        }
    }

    #[test]
    fn sample_voice_loops_past_the_buffer_end() {
        let mut v = SampleVoice {
            audio: decoded(vec![0.1; 100], 44_100),
            position: 0.0,
            rate: 1.0,
        };
        for _ in 0..250 {
            v.next_sample();
        }
        assert!(v.position() < 100.0, "position must wrap, got {}", v.position());
    }

    #[test]
    fn rate_follows_the_source_sample_rate() {
        let half = Voice::sample(decoded(vec![0.0; 10], 22_050), 44_100);
        match half {
            Voice::Sample(v) => assert!((v.rate - 0.5).abs() < 1e-9),
            _ => unreachable!(),
        }
        let double = Voice::sample(decoded(vec![0.0; 10], 88_200), 44_100);
        match double {
            Voice::Sample(v) => assert!((v.rate - 2.0).abs() < 1e-9),
            _ => unreachable!(),
        }
    }

    #[test]
    fn empty_sample_is_silent() {
        let mut voice = Voice::sample(decoded(Vec::new(), 44_100), 44_100);
        assert_eq!(voice.next_sample(), 0.0);
    }

    #[test]
    fn procedural_voice_produces_bounded_audio() {
        let mut voice = Voice::procedural(Category::Rain.recipe(), 44_100);
        let mut peak = 0.0f32;
        for _ in 0..44_100 {
            peak = peak.max(voice.next_sample().abs());
        }
        assert!(peak > 0.0, "rain voice is silent");
        assert!(peak < 4.0, "rain voice blew up: {peak}");
    }

    #[test]
    fn ocean_voice_carries_a_swell() {
        let voice = Voice::procedural(Category::Ocean.recipe(), 44_100);
        match voice {
            Voice::Procedural(v) => assert!(v.swell.is_some()),
            _ => unreachable!(),
        }
    }
}
