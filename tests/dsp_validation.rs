//! DSP primitive properties (T5-T7), swept with `proptest` across the
//! parameter ranges the receive front end and VIS decoder actually use.

use proptest::prelude::*;
use sstv_core::dsp::{FirDesign, FirFilter, FirKind, Resonator};

proptest! {
    #[test]
    fn given_a_narrow_lpf_when_driven_with_a_unit_step_then_it_converges_within_one_percent(
        fc in 20.0f64..300.0,
        taps in (32usize..128).prop_map(|t| t - t % 2),
    ) {
        let spec = FirDesign {
            taps,
            kind: FirKind::Lpf,
            sample_rate: 48_000.0,
            fc_low: fc,
            fc_high: 0.0,
            stopband_db: 40.0,
            gain: 1.0,
        };
        let mut filt = FirFilter::design(&spec).unwrap();
        let mut last = 0.0;
        for _ in 0..40_000 {
            last = filt.process(1.0);
        }
        prop_assert!((last - 1.0).abs() < 0.01, "step response settled at {last} for fc={fc}");
    }

    #[test]
    fn given_an_fir_design_when_taps_are_generated_then_they_are_numerically_symmetric(
        taps in (16usize..200).prop_map(|t| t - t % 2),
        kind_idx in 0u8..4,
        fc_low in 100.0f64..3000.0,
        fc_high_offset in 50.0f64..2000.0,
    ) {
        let kind = match kind_idx {
            0 => FirKind::Lpf,
            1 => FirKind::Hpf,
            2 => FirKind::Bpf,
            _ => FirKind::Bef,
        };
        let spec = FirDesign {
            taps,
            kind,
            sample_rate: 48_000.0,
            fc_low,
            fc_high: fc_low + fc_high_offset,
            stopband_db: 40.0,
            gain: 1.0,
        };
        let filt = FirFilter::design(&spec).unwrap();
        let h = filt.taps();
        let n = h.len();
        for i in 0..n {
            prop_assert!((h[i] - h[n - 1 - i]).abs() < 1e-9, "tap {i} asymmetric for {kind:?}");
        }
    }

    #[test]
    fn given_a_resonator_when_compared_at_centre_and_ten_bandwidths_off_then_selectivity_exceeds_20db(
        f0 in 800.0f64..2400.0,
        bw in 30.0f64..150.0,
    ) {
        let fs = 48_000.0;
        let mut at_centre = Resonator::new(f0, fs, bw);
        let mut off_centre = Resonator::new(f0, fs, bw);

        let n = 3000;
        let rms_centre = rms_response(&mut at_centre, f0, fs, n);
        let rms_off = rms_response(&mut off_centre, f0 + 10.0 * bw, fs, n);

        let db = 20.0 * (rms_centre / rms_off.max(1e-12)).log10();
        prop_assert!(db > 20.0, "selectivity only {db} dB for f0={f0} bw={bw}");
    }
}

fn rms_response(resonator: &mut Resonator, freq: f64, fs: f64, n: usize) -> f64 {
    let mut acc = 0.0;
    for i in 0..n {
        let t = i as f64 / fs;
        let x = (std::f64::consts::TAU * freq * t).sin();
        let y = resonator.process(x);
        acc += y * y;
    }
    (acc / n as f64).sqrt()
}
