use std::f32::consts::PI;

/// Filter stage kinds used by the synthesis recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    LowPass,
    BandPass,
}

/// Static description of one filter stage (cutoff in Hz).
#[derive(Debug, Clone, Copy)]
pub struct FilterSpec {
    pub kind: FilterKind,
    pub cutoff: f32,
    pub q: f32,
}

// ────────────────── Biquad Filter (12 dB/octave) ──────────────────

/// Second-order biquad filter in direct form I.
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Low-pass biquad at the given cutoff frequency and Q.
    pub fn low_pass(cutoff: f32, q: f32, sample_rate: f32) -> Self {
        let omega = 2.0 * PI * cutoff / sample_rate;
        let sin_w = omega.sin();
        let cos_w = omega.cos();
        let alpha = sin_w / (2.0 * q.max(0.01));
        let a0 = 1.0 + alpha;
        Self {
            b0: ((1.0 - cos_w) / 2.0) / a0,
            b1: (1.0 - cos_w) / a0,
            b2: ((1.0 - cos_w) / 2.0) / a0,
            a1: (-2.0 * cos_w) / a0,
            a2: (1.0 - alpha) / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Band-pass biquad (constant 0 dB peak gain) at the given center and Q.
    pub fn band_pass(center: f32, q: f32, sample_rate: f32) -> Self {
        let omega = 2.0 * PI * center / sample_rate;
        let sin_w = omega.sin();
        let cos_w = omega.cos();
        let alpha = sin_w / (2.0 * q.max(0.01));
        let a0 = 1.0 + alpha;
        Self {
            b0: alpha / a0,
            b1: 0.0,
            b2: -alpha / a0,
            a1: (-2.0 * cos_w) / a0,
            a2: (1.0 - alpha) / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    pub fn from_spec(spec: &FilterSpec, sample_rate: f32) -> Self {
        match spec.kind {
            FilterKind::LowPass => Self::low_pass(spec.cutoff, spec.q, sample_rate),
            FilterKind::BandPass => Self::band_pass(spec.cutoff, spec.q, sample_rate),
        }
    }

    pub fn process(&mut self, input: f32) -> f32 {
        let y = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 44_100.0;

    fn rms_of_filtered_sine(filter: &mut Biquad, freq: f32) -> f32 {
        let n = 4_410;
        let mut sum = 0.0f64;
        let mut counted = 0usize;
        for i in 0..n {
            let t = i as f32 / SR;
            let out = filter.process((t * freq * 2.0 * PI).sin());
            // skip the transient while the filter state settles
            if i >= n / 2 {
                sum += (out as f64) * (out as f64);
                counted += 1;
            }
        }
        ((sum / counted as f64) as f32).sqrt()
    }

    #[test]
    fn low_pass_keeps_low_and_rejects_high() {
        let mut lp = Biquad::low_pass(1_000.0, 0.3, SR);
        let low = rms_of_filtered_sine(&mut lp, 100.0);
        let mut lp = Biquad::low_pass(1_000.0, 0.3, SR);
        let high = rms_of_filtered_sine(&mut lp, 8_000.0);
        assert!(low > 0.3, "100 Hz should pass a 1 kHz low-pass, rms {low}");
        assert!(
            low > 5.0 * high,
            "8 kHz should be strongly attenuated: low {low} vs high {high}"
        );
    }

    #[test]
    fn band_pass_favors_center_frequency() {
        let mut bp = Biquad::band_pass(600.0, 0.5, SR);
        let center = rms_of_filtered_sine(&mut bp, 600.0);
        let mut bp = Biquad::band_pass(600.0, 0.5, SR);
        let low = rms_of_filtered_sine(&mut bp, 60.0);
        let mut bp = Biquad::band_pass(600.0, 0.5, SR);
        let high = rms_of_filtered_sine(&mut bp, 6_000.0);
        assert!(center > 2.0 * low, "center {center} vs low {low}");
        assert!(center > 2.0 * high, "center {center} vs high {high}");
    }

    #[test]
    fn impulse_response_decays() {
        let mut lp = Biquad::low_pass(2_000.0, 0.7, SR);
        let first = lp.process(1.0).abs();
        let mut tail = 0.0f32;
        for _ in 0..2_000 {
            tail = lp.process(0.0).abs();
        }
        assert!(first > 0.0);
        assert!(tail < 1e-4, "filter should be stable, tail {tail}");
    }
}
