//! Second-order resonator ("tank") used for per-tone energy estimation
//! (§4.1). This is the narrow IIR band-pass at the heart of the receive
//! resonator bank (C6) and the VIS decoder's four tone channels (C7).

const DENORMAL_FLOOR: f64 = 1e-37;

/// A single resonant tank centred on `f` Hz with bandwidth `bw` Hz.
#[derive(Debug, Clone, Copy)]
pub struct Resonator {
    a0: f64,
    b1: f64,
    b2: f64,
    y1: f64,
    y2: f64,
}

impl Resonator {
    pub fn new(f: f64, fs: f64, bw: f64) -> Self {
        let omega = std::f64::consts::TAU * f / fs;
        let decay = std::f64::consts::PI * bw / fs;
        let a0 = omega.sin() / ((fs / 6.0) / bw);
        let b1 = 2.0 * (-decay).exp() * omega.cos();
        let b2 = -(-2.0 * decay).exp();
        Self {
            a0,
            b1,
            b2,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Push one sample through the tank, returning its output.
    pub fn process(&mut self, x: f64) -> f64 {
        let mut y = self.a0 * x + self.b1 * self.y1 + self.b2 * self.y2;
        if y.abs() < DENORMAL_FLOOR {
            y = 0.0;
        }
        self.y2 = self.y1;
        self.y1 = y;
        y
    }

    pub fn reset(&mut self) {
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}
