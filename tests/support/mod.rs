//! Deterministic AWGN test helper (backs T16/S5): adds white Gaussian
//! noise at a target SNR using a seeded RNG so failures reproduce.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};

/// Add zero-mean white Gaussian noise to `samples` so the resulting
/// signal sits at `snr_db` relative to the input's own RMS power.
/// `seed` makes the corruption reproducible across runs.
pub fn add_awgn(samples: &[f32], snr_db: f64, seed: u64) -> Vec<f32> {
    let signal_power: f64 = samples.iter().map(|&s| (s as f64).powi(2)).sum::<f64>() / samples.len().max(1) as f64;
    let noise_power = signal_power / 10f64.powf(snr_db / 10.0);
    let noise_std = noise_power.sqrt();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    samples
        .iter()
        .map(|&s| {
            let n: f64 = StandardNormal.sample(&mut rng);
            (s as f64 + n * noise_std) as f32
        })
        .collect()
}
