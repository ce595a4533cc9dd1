//! VIS detection under noise (T16) and a faded, noisy single-channel
//! scenario (S5).

mod support;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};
use sstv_core::catalogue::VisDescriptor;
use sstv_core::decoder::SstvDecoder;
use sstv_core::dsp::{FirDesign, FirFilter, FirKind};
use sstv_core::nco::Nco;
use sstv_core::vis::{VisFramer, VisTones};
use sstv_core::ModeId;
use support::add_awgn;

const TONE_BASE_HZ: f64 = 1000.0;
const TONE_GAIN_HZ: f64 = 1000.0;

fn render_tone_sequence(mut framer: VisFramer, fs: f64) -> Vec<f32> {
    let mut nco = Nco::new(fs, TONE_BASE_HZ, TONE_GAIN_HZ);
    let mut out = Vec::new();
    while let Some(freq) = framer.next_frequency() {
        let u = (freq - TONE_BASE_HZ) / TONE_GAIN_HZ;
        out.push(nco.next_sample(u));
    }
    out
}

#[test]
fn given_10db_snr_white_noise_when_decoding_vis_then_at_least_90_percent_of_trials_resolve_per_t16() {
    let fs = 48_000.0;
    let modes = [
        ModeId::Scottie1,
        ModeId::Scottie2,
        ModeId::Martin1,
        ModeId::Martin2,
        ModeId::Pd90,
        ModeId::Pd120,
        ModeId::Robot36,
        ModeId::Sc2_120,
    ];
    let trials_per_mode = 5;
    let mut successes = 0;
    let mut total = 0;

    for (m_idx, &mode_id) in modes.iter().enumerate() {
        let mode = sstv_core::get_mode_info(mode_id);
        let VisDescriptor::Standard { data7 } = mode.vis else { continue };
        let byte = VisDescriptor::standard_byte(data7);
        let clean = render_tone_sequence(VisFramer::standard(byte, fs, VisTones::default()), fs);

        for trial in 0..trials_per_mode {
            total += 1;
            let seed = (m_idx as u64) * 1000 + trial as u64;
            let noisy = add_awgn(&clean, 10.0, seed);

            let mut dec = SstvDecoder::new(fs).unwrap();
            dec.feed(&noisy);
            dec.feed(&vec![0.0f32; (0.05 * fs) as usize]);

            if dec.state().current_mode == Some(mode_id) {
                successes += 1;
            }
        }
    }

    let rate = successes as f64 / total as f64;
    assert!(rate >= 0.90, "VIS detection under 10dB SNR succeeded in only {successes}/{total} trials ({rate:.2})");
}

/// Slow multiplicative envelope approximating a 0.2 Hz Rayleigh fade:
/// two independent low-pass-filtered Gaussian streams combined as
/// in-phase/quadrature components, magnitude taken as the envelope and
/// renormalised to unit mean.
fn rayleigh_fade_envelope(n: usize, fs: f64, fade_hz: f64, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let spec = FirDesign {
        taps: 512,
        kind: FirKind::Lpf,
        sample_rate: fs,
        fc_low: fade_hz,
        fc_high: 0.0,
        stopband_db: 40.0,
        gain: 1.0,
    };
    let mut lpf_i = FirFilter::design(&spec).unwrap();
    let mut lpf_q = FirFilter::design(&spec).unwrap();

    let mut envelope: Vec<f64> = (0..n)
        .map(|_| {
            let i: f64 = lpf_i.process(StandardNormal.sample(&mut rng));
            let q: f64 = lpf_q.process(StandardNormal.sample(&mut rng));
            (i * i + q * q).sqrt()
        })
        .collect();

    let mean: f64 = envelope.iter().sum::<f64>() / n.max(1) as f64;
    if mean > 1e-12 {
        for v in envelope.iter_mut() {
            *v /= mean;
        }
    }
    envelope
}

#[test]
fn given_a_faded_noisy_22050hz_signal_when_decoded_then_vis_resolves_within_2s_per_s5() {
    let fs = 22_050.0;
    let mode = sstv_core::get_mode_info(ModeId::Martin1);
    let VisDescriptor::Standard { data7 } = mode.vis else { panic!("Martin1 should carry a standard VIS code") };
    let byte = VisDescriptor::standard_byte(data7);

    let clean = render_tone_sequence(VisFramer::standard(byte, fs, VisTones::default()), fs);
    let fade = rayleigh_fade_envelope(clean.len(), fs, 0.2, 42);
    let faded: Vec<f32> = clean.iter().zip(fade.iter()).map(|(&s, &e)| (s as f64 * e) as f32).collect();
    let noisy = add_awgn(&faded, 6.0, 7);

    let mut dec = SstvDecoder::new(fs).unwrap();
    let chunk = 512;
    let mut fed = 0usize;
    let deadline = (2.0 * fs) as usize;
    let mut pos = 0;
    while pos < noisy.len() && fed < deadline {
        let end = (pos + chunk).min(noisy.len());
        dec.feed(&noisy[pos..end]);
        fed += end - pos;
        pos = end;
        if dec.state().current_mode.is_some() {
            break;
        }
    }

    assert_eq!(dec.state().current_mode, Some(ModeId::Martin1));
}
