//! Receive-side front end (C6, §4.6): clip, smoothing low-pass, band-pass
//! filter, AGC, and a resonator bank used for both tone detection and
//! best-effort instantaneous-frequency estimation.

use crate::dsp::{FirDesign, FirFilter, FirKind, Resonator};
use crate::errors::DspError;

/// Conditions a raw audio sample before any tone analysis: hard clip,
/// a two-tap average (a cheap first low-pass), then a band-pass FIR
/// covering the full tone range used by this crate.
pub struct FrontEnd {
    previous: f64,
    bandpass: FirFilter,
    agc: Agc,
}

impl FrontEnd {
    pub fn new(sample_rate: f64, narrow: bool) -> Result<Self, DspError> {
        let (fc_low, fc_high) = if narrow {
            (1080.0, 2600.0)
        } else {
            (400.0, 2500.0)
        };
        let bandpass = FirFilter::design(&FirDesign {
            taps: 64,
            kind: FirKind::Bpf,
            sample_rate,
            fc_low,
            fc_high,
            stopband_db: 40.0,
            gain: 1.0,
        })?;
        Ok(Self {
            previous: 0.0,
            bandpass,
            agc: Agc::new(),
        })
    }

    pub fn process(&mut self, x: f32) -> f64 {
        let clipped = (x as f64).clamp(-1.0, 1.0);
        let smoothed = (clipped + self.previous) / 2.0;
        self.previous = clipped;
        let filtered = self.bandpass.process(smoothed);
        self.agc.process(filtered)
    }

    pub fn reset(&mut self) {
        self.previous = 0.0;
        self.bandpass.reset();
        self.agc.reset();
    }
}

/// Peak-follower AGC: fast attack, slow release, normalizing the signal
/// toward unit peak amplitude.
struct Agc {
    envelope: f64,
    attack: f64,
    release: f64,
}

impl Agc {
    fn new() -> Self {
        Self {
            envelope: 1e-6,
            attack: 0.05,
            release: 0.0005,
        }
    }

    fn process(&mut self, x: f64) -> f64 {
        let mag = x.abs();
        if mag > self.envelope {
            self.envelope += self.attack * (mag - self.envelope);
        } else {
            self.envelope += self.release * (mag - self.envelope);
        }
        let envelope = self.envelope.max(1e-6);
        x / envelope
    }

    fn reset(&mut self) {
        self.envelope = 1e-6;
    }
}

/// A bank of resonators spanning a frequency range, used to pick the
/// dominant tone per sample via tracked envelope magnitude — the same
/// technique as the narrow single-tone [`Resonator`], just applied
/// across many centre frequencies at once (§4.6).
pub struct ToneBank {
    bins: Vec<(f64, Resonator)>,
    envelopes: Vec<f64>,
}

impl ToneBank {
    pub fn new(low_hz: f64, high_hz: f64, bins: usize, sample_rate: f64, bw_hz: f64) -> Self {
        let step = (high_hz - low_hz) / (bins.saturating_sub(1).max(1)) as f64;
        let mut tanks = Vec::with_capacity(bins);
        for i in 0..bins {
            let f = low_hz + step * i as f64;
            tanks.push((f, Resonator::new(f, sample_rate, bw_hz)));
        }
        Self {
            envelopes: vec![0.0; tanks.len()],
            bins: tanks,
        }
    }

    /// Push one sample through every bin, returning the centre frequency
    /// of the bin with the largest tracked envelope.
    pub fn dominant_frequency(&mut self, x: f64) -> f64 {
        let mut best_freq = self.bins.first().map(|(f, _)| *f).unwrap_or(0.0);
        let mut best_mag = -1.0;
        for ((freq, tank), env) in self.bins.iter_mut().zip(self.envelopes.iter_mut()) {
            let y = tank.process(x);
            *env = 0.9 * *env + 0.1 * y.abs();
            if *env > best_mag {
                best_mag = *env;
                best_freq = *freq;
            }
        }
        best_freq
    }

    /// Tracked envelope magnitude at the bin nearest `freq_hz`, used by
    /// the VIS automaton to compare two fixed tones directly rather than
    /// taking the bank-wide argmax.
    pub fn envelope_near(&self, freq_hz: f64) -> f64 {
        self.bins
            .iter()
            .zip(self.envelopes.iter())
            .min_by(|((fa, _), _), ((fb, _), _)| {
                (fa - freq_hz).abs().total_cmp(&(fb - freq_hz).abs())
            })
            .map(|(_, env)| *env)
            .unwrap_or(0.0)
    }

    pub fn reset(&mut self) {
        for (_, tank) in &mut self.bins {
            tank.reset();
        }
        for env in &mut self.envelopes {
            *env = 0.0;
        }
    }
}
