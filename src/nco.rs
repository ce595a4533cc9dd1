//! Phase-continuous numerically controlled oscillator (C3, §4.3).
//!
//! Table size `T = 2*fs` gives sub-Hz frequency resolution without
//! interpolation and avoids audible drift across long transmissions
//! (PD290 runs close to five minutes at typical sample rates).

/// A sine-table NCO configured with a base frequency and a gain applied
/// to the per-call command `u`.
#[derive(Clone)]
pub struct Nco {
    table: Vec<f32>,
    table_size: usize,
    sample_rate: f64,
    base_hz: f64,
    gain_hz: f64,
    phase: f64,
}

impl std::fmt::Debug for Nco {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Nco")
            .field("table_size", &self.table_size)
            .field("sample_rate", &self.sample_rate)
            .field("base_hz", &self.base_hz)
            .field("gain_hz", &self.gain_hz)
            .field("phase", &self.phase)
            .finish()
    }
}

impl Nco {
    /// Build an NCO at `sample_rate` Hz whose instantaneous frequency is
    /// `base_hz + gain_hz * u` for a per-sample command `u in [0, 1]`
    /// (§4.3, invariant I2).
    pub fn new(sample_rate: f64, base_hz: f64, gain_hz: f64) -> Self {
        let table_size = (2.0 * sample_rate).round() as usize;
        let table = (0..table_size)
            .map(|i| {
                let phase = std::f64::consts::TAU * i as f64 / table_size as f64;
                phase.sin() as f32
            })
            .collect();
        Self {
            table,
            table_size,
            sample_rate,
            base_hz,
            gain_hz,
            phase: 0.0,
        }
    }

    /// Advance by one sample with command `u` (clamped to `[0, 1]`),
    /// returning the oscillator output.
    pub fn next_sample(&mut self, u: f64) -> f32 {
        let u = u.clamp(0.0, 1.0);
        let freq = self.base_hz + self.gain_hz * u;
        self.advance(freq)
    }

    /// Advance by one sample at an absolute frequency in Hz, bypassing
    /// the `u`-mapping. Used by [`crate::encoder`] after it has already
    /// normalised a commanded frequency to `u` via §4.5.6 — exposed
    /// directly here only for tests and for narrow-mode mappings that
    /// reuse the same table.
    fn advance(&mut self, freq_hz: f64) -> f32 {
        let increment = self.table_size as f64 * freq_hz / self.sample_rate;
        self.phase += increment;
        let t = self.table_size as f64;
        self.phase -= (self.phase / t).floor() * t;
        debug_assert!(self.phase >= 0.0 && self.phase < t);
        self.table[self.phase as usize]
    }

    /// Instantaneous phase, always in `[0, table_size)` (invariant I2).
    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn table_size(&self) -> usize {
        self.table_size
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
