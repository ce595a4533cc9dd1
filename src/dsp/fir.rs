//! Kaiser-windowed FIR designer (§4.1).
//!
//! Produces linear-phase, symmetric taps for low-pass, high-pass,
//! band-pass, and band-elimination filters. The low-pass prototype is an
//! ideal-sinc response truncated and tapered by a Kaiser window; the
//! other three kinds are obtained by frequency-shifting that prototype
//! with cosine multiplication around the relevant band centre, per §4.1.

use crate::errors::DspError;

/// Which frequency-selective shape to design.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirKind {
    Lpf,
    Hpf,
    Bpf,
    Bef,
}

/// Parameters for [`FirFilter::design`].
#[derive(Debug, Clone, Copy)]
pub struct FirDesign {
    /// Number of taps minus one; must be even (an odd-length, symmetric
    /// filter has a single centre tap).
    pub taps: usize,
    pub kind: FirKind,
    pub sample_rate: f64,
    /// Cutoff for LPF/HPF, low edge for BPF/BEF.
    pub fc_low: f64,
    /// High edge for BPF/BEF; ignored for LPF/HPF.
    pub fc_high: f64,
    /// Desired stop-band attenuation in dB, used to derive the Kaiser
    /// window's beta parameter.
    pub stopband_db: f64,
    /// Overall passband gain (1.0 for unity gain).
    pub gain: f64,
}

impl Default for FirDesign {
    fn default() -> Self {
        Self {
            taps: 64,
            kind: FirKind::Lpf,
            sample_rate: 48_000.0,
            fc_low: 1_000.0,
            fc_high: 2_000.0,
            stopband_db: 40.0,
            gain: 1.0,
        }
    }
}

/// A designed, immutable FIR filter with its own delay line.
#[derive(Debug, Clone)]
pub struct FirFilter {
    taps: Vec<f64>,
    delay: Vec<f64>,
    pos: usize,
}

impl FirFilter {
    /// Design a new filter. `taps` must be even and positive.
    pub fn design(spec: &FirDesign) -> Result<Self, DspError> {
        if spec.taps == 0 || spec.taps % 2 != 0 {
            return Err(DspError::InvalidTapCount(spec.taps));
        }
        let n = spec.taps + 1;
        let beta = kaiser_beta(spec.stopband_db);
        let window = kaiser_window(n, beta);

        let taps = match spec.kind {
            FirKind::Lpf => {
                let fc_norm = (spec.fc_low / spec.sample_rate).clamp(0.0, 0.5);
                let mut h = sinc_lowpass(n, fc_norm);
                apply_window(&mut h, &window);
                normalize_dc_gain(&mut h, spec.gain);
                h
            }
            FirKind::Hpf => {
                let fc_norm = (spec.fc_low / spec.sample_rate).clamp(0.0, 0.5);
                let mut h = sinc_lowpass(n, 0.5 - fc_norm);
                apply_window(&mut h, &window);
                normalize_dc_gain(&mut h, 1.0);
                modulate(&mut h, 0.5); // shift to Nyquist: cos(pi*m) = (-1)^m
                scale(&mut h, spec.gain);
                h
            }
            FirKind::Bpf => {
                let centre = (spec.fc_low + spec.fc_high) / 2.0;
                let half_bw = ((spec.fc_high - spec.fc_low) / 2.0).max(0.0);
                let fc_norm = (half_bw / spec.sample_rate).clamp(0.0, 0.5);
                let mut h = sinc_lowpass(n, fc_norm);
                apply_window(&mut h, &window);
                normalize_dc_gain(&mut h, 1.0);
                modulate(&mut h, centre / spec.sample_rate);
                scale(&mut h, spec.gain);
                h
            }
            FirKind::Bef => {
                let centre = (spec.fc_low + spec.fc_high) / 2.0;
                let half_bw = ((spec.fc_high - spec.fc_low) / 2.0).max(0.0);
                let fc_norm = (half_bw / spec.sample_rate).clamp(0.0, 0.5);
                let mut h = sinc_lowpass(n, fc_norm);
                apply_window(&mut h, &window);
                normalize_dc_gain(&mut h, 1.0);
                modulate(&mut h, centre / spec.sample_rate);
                let mut notch = vec![0.0; n];
                notch[n / 2] = spec.gain;
                for i in 0..n {
                    notch[i] -= h[i] * spec.gain;
                }
                notch
            }
        };

        let len = taps.len();
        Ok(Self {
            taps,
            delay: vec![0.0; len],
            pos: 0,
        })
    }

    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    /// Push one input sample through the filter, returning the output.
    pub fn process(&mut self, x: f64) -> f64 {
        let len = self.delay.len();
        self.delay[self.pos] = x;
        let mut acc = 0.0;
        // taps[0] multiplies the oldest sample, taps[len-1] the newest.
        let mut idx = self.pos;
        for &t in &self.taps {
            acc += t * self.delay[idx];
            idx = if idx == 0 { len - 1 } else { idx - 1 };
        }
        self.pos = (self.pos + 1) % len;
        acc
    }

    pub fn reset(&mut self) {
        self.delay.iter_mut().for_each(|d| *d = 0.0);
        self.pos = 0;
    }
}

fn bessel_i0(x: f64) -> f64 {
    let mut sum = 1.0;
    let mut term = 1.0;
    let half_x_sq = (x / 2.0) * (x / 2.0);
    for k in 1..32 {
        term *= half_x_sq / (k as f64 * k as f64);
        sum += term;
        if term < sum * 1e-16 {
            break;
        }
    }
    sum
}

/// Harris's piece-wise formula for the Kaiser beta parameter, in terms of
/// the desired stop-band attenuation `a_db`.
fn kaiser_beta(a_db: f64) -> f64 {
    if a_db > 50.0 {
        0.1102 * (a_db - 8.7)
    } else if a_db >= 21.0 {
        0.5842 * (a_db - 21.0).powf(0.4) + 0.07886 * (a_db - 21.0)
    } else {
        0.0
    }
}

fn kaiser_window(n: usize, beta: f64) -> Vec<f64> {
    let m = (n - 1) as f64;
    let denom = bessel_i0(beta);
    (0..n)
        .map(|i| {
            let ratio = (2.0 * i as f64 / m) - 1.0;
            let arg = beta * (1.0 - ratio * ratio).max(0.0).sqrt();
            bessel_i0(arg) / denom
        })
        .collect()
}

/// Ideal sinc low-pass impulse response, centred, length `n` (odd).
fn sinc_lowpass(n: usize, fc_norm: f64) -> Vec<f64> {
    let centre = (n - 1) as f64 / 2.0;
    (0..n)
        .map(|i| {
            let m = i as f64 - centre;
            if m.abs() < 1e-12 {
                2.0 * fc_norm
            } else {
                let arg = std::f64::consts::TAU * fc_norm * m;
                arg.sin() / (std::f64::consts::PI * m)
            }
        })
        .collect()
}

fn apply_window(h: &mut [f64], window: &[f64]) {
    for (hi, wi) in h.iter_mut().zip(window.iter()) {
        *hi *= wi;
    }
}

fn normalize_dc_gain(h: &mut [f64], gain: f64) {
    let dc: f64 = h.iter().sum();
    if dc.abs() > 1e-15 {
        let scale = gain / dc;
        for v in h.iter_mut() {
            *v *= scale;
        }
    }
}

fn scale(h: &mut [f64], factor: f64) {
    for v in h.iter_mut() {
        *v *= factor;
    }
}

/// Shift a centred prototype in frequency by multiplying by
/// `cos(2*pi*fc_norm*m)`, where `m` is the sample offset from centre.
fn modulate(h: &mut [f64], fc_norm: f64) {
    let n = h.len();
    let centre = (n - 1) as f64 / 2.0;
    for (i, v) in h.iter_mut().enumerate() {
        let m = i as f64 - centre;
        *v *= (std::f64::consts::TAU * fc_norm * m).cos();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_odd_or_zero_tap_count() {
        let mut spec = FirDesign {
            taps: 1,
            ..Default::default()
        };
        assert!(FirFilter::design(&spec).is_err());
        spec.taps = 0;
        assert!(FirFilter::design(&spec).is_err());
    }

    #[test]
    fn lpf_taps_are_symmetric() {
        let spec = FirDesign {
            taps: 48,
            kind: FirKind::Lpf,
            sample_rate: 48_000.0,
            fc_low: 2_500.0,
            fc_high: 0.0,
            stopband_db: 40.0,
            gain: 1.0,
        };
        let filt = FirFilter::design(&spec).unwrap();
        let h = filt.taps();
        let n = h.len();
        for i in 0..n {
            assert!((h[i] - h[n - 1 - i]).abs() < 1e-12, "tap {i} asymmetric");
        }
    }

    #[test]
    fn bpf_taps_are_symmetric() {
        let spec = FirDesign {
            taps: 48,
            kind: FirKind::Bpf,
            sample_rate: 48_000.0,
            fc_low: 400.0,
            fc_high: 2_500.0,
            stopband_db: 20.0,
            gain: 1.0,
        };
        let filt = FirFilter::design(&spec).unwrap();
        let h = filt.taps();
        let n = h.len();
        for i in 0..n {
            assert!((h[i] - h[n - 1 - i]).abs() < 1e-12, "tap {i} asymmetric");
        }
    }

    #[test]
    fn lpf_converges_on_unit_step() {
        let spec = FirDesign {
            taps: 128,
            kind: FirKind::Lpf,
            sample_rate: 48_000.0,
            fc_low: 50.0,
            fc_high: 0.0,
            stopband_db: 40.0,
            gain: 1.0,
        };
        let mut filt = FirFilter::design(&spec).unwrap();
        let mut last = 0.0;
        for _ in 0..20_000 {
            last = filt.process(1.0);
        }
        assert!((last - 1.0).abs() < 0.01, "step response settled at {last}");
    }
}
