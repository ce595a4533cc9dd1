//! DSP primitives (C1): Kaiser-windowed FIR designer, biquad IIR cascade,
//! and the second-order resonator ("tank") used by the receive front end.

pub mod fir;
pub mod iir;
pub mod resonator;

pub use fir::{FirDesign, FirFilter, FirKind};
pub use iir::{BiquadCascade, FilterKind as IirKind};
pub use resonator::Resonator;
