//! Biquad IIR cascade (§4.1): Butterworth or Chebyshev Type I low-pass,
//! built from analog pole placement and a per-section bilinear transform,
//! running as Direct-Form-II-transposed biquads.

use crate::errors::DspError;

/// Pole-placement family for [`BiquadCascade::design`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Butterworth,
    ChebyshevI,
}

/// A single Direct-Form-II-transposed biquad section.
#[derive(Debug, Clone, Copy, Default)]
struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    z1: f64,
    z2: f64,
}

impl Biquad {
    fn process(&mut self, x: f64) -> f64 {
        let y = self.b0 * x + self.z1;
        self.z1 = self.b1 * x - self.a1 * y + self.z2;
        self.z2 = self.b2 * x - self.a2 * y;
        y
    }

    fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

/// A first-order one-pole section, used for odd filter orders.
#[derive(Debug, Clone, Copy, Default)]
struct OnePole {
    b0: f64,
    b1: f64,
    a1: f64,
    z1: f64,
}

impl OnePole {
    fn process(&mut self, x: f64) -> f64 {
        let y = self.b0 * x + self.z1;
        self.z1 = self.b1 * x - self.a1 * y;
        y
    }

    fn reset(&mut self) {
        self.z1 = 0.0;
    }
}

/// Cascaded low-pass biquad/one-pole sections.
#[derive(Debug, Clone)]
pub struct BiquadCascade {
    biquads: Vec<Biquad>,
    one_pole: Option<OnePole>,
}

impl BiquadCascade {
    /// Design a cascade of `order` poles (1..=16) at cutoff `fc` Hz,
    /// sampled at `fs` Hz. `ripple_db` is the passband ripple used only
    /// for [`FilterKind::ChebyshevI`]; it is ignored for Butterworth.
    pub fn design(
        kind: FilterKind,
        order: usize,
        fc: f64,
        fs: f64,
        ripple_db: f64,
    ) -> Result<Self, DspError> {
        if order == 0 || order > 16 {
            return Err(DspError::InvalidFilterOrder(order));
        }

        let pairs = order / 2;
        let has_single = order % 2 == 1;

        let mut biquads = Vec::with_capacity(pairs);
        for k in 0..pairs {
            let (sigma, omega) = pole_for_section(kind, order, k, ripple_db);
            let wn = (sigma * sigma + omega * omega).sqrt();
            let q = wn / (2.0 * sigma.abs());
            biquads.push(lowpass_biquad(fc, fs, q));
        }

        let one_pole = if has_single {
            Some(lowpass_one_pole(fc, fs))
        } else {
            None
        };

        Ok(Self { biquads, one_pole })
    }

    pub fn process(&mut self, x: f64) -> f64 {
        let mut y = x;
        for section in &mut self.biquads {
            y = section.process(y);
        }
        if let Some(op) = &mut self.one_pole {
            y = op.process(y);
        }
        y
    }

    pub fn reset(&mut self) {
        for section in &mut self.biquads {
            section.reset();
        }
        if let Some(op) = &mut self.one_pole {
            op.reset();
        }
    }

    pub fn order(&self) -> usize {
        self.biquads.len() * 2 + self.one_pole.is_some() as usize
    }
}

/// Analog pole location (sigma, omega) for biquad section `k` of an
/// order-`order` normalized low-pass prototype.
fn pole_for_section(kind: FilterKind, order: usize, k: usize, ripple_db: f64) -> (f64, f64) {
    let theta = std::f64::consts::PI * (2 * k + 1) as f64 / (2.0 * order as f64);
    match kind {
        FilterKind::Butterworth => (-theta.sin(), theta.cos()),
        FilterKind::ChebyshevI => {
            let epsilon = (10f64.powf(ripple_db / 10.0) - 1.0).max(1e-12).sqrt();
            let mu = (1.0 / order as f64) * (1.0 / epsilon).asinh();
            (-mu.sinh() * theta.sin(), mu.cosh() * theta.cos())
        }
    }
}

/// RBJ-cookbook-style bilinear transform of a normalized analog low-pass
/// second-order section with quality factor `q`, evaluated at cutoff
/// `fc` and sample rate `fs`.
fn lowpass_biquad(fc: f64, fs: f64, q: f64) -> Biquad {
    let w0 = std::f64::consts::TAU * fc / fs;
    let cos_w0 = w0.cos();
    let sin_w0 = w0.sin();
    let alpha = sin_w0 / (2.0 * q);

    let a0 = 1.0 + alpha;
    let b0 = (1.0 - cos_w0) / 2.0 / a0;
    let b1 = (1.0 - cos_w0) / a0;
    let b2 = (1.0 - cos_w0) / 2.0 / a0;
    let a1 = (-2.0 * cos_w0) / a0;
    let a2 = (1.0 - alpha) / a0;

    Biquad {
        b0,
        b1,
        b2,
        a1,
        a2,
        z1: 0.0,
        z2: 0.0,
    }
}

/// Bilinear-transformed single real pole at normalized frequency 1 rad/s,
/// used for the odd-order remainder section.
fn lowpass_one_pole(fc: f64, fs: f64) -> OnePole {
    let w0 = std::f64::consts::TAU * fc / fs;
    // Matched bilinear transform of H(s) = 1/(s+1).
    let k = (w0 / 2.0).tan();
    let a0 = 1.0 + k;
    let b0 = k / a0;
    let b1 = k / a0;
    let a1 = (k - 1.0) / a0;
    OnePole {
        b0,
        b1,
        a1,
        z1: 0.0,
    }
}
