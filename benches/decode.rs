use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sstv_core::decoder::SstvDecoder;
use sstv_core::encoder::SstvEncoder;
use sstv_core::image::{Image, ImageFormat};
use sstv_core::ModeId;

fn solid_image(mode: &sstv_core::ModeDescriptor, rgb: (u8, u8, u8)) -> Vec<u8> {
    let mut data = vec![0u8; (mode.width * mode.height * 3) as usize];
    for px in data.chunks_mut(3) {
        px[0] = rgb.0;
        px[1] = rgb.1;
        px[2] = rgb.2;
    }
    data
}

/// Pre-render just the VIS segment (preamble + VIS, no body) for a mode,
/// used to benchmark VIS acquisition in isolation from body decoding.
fn render_vis_only(mode_id: ModeId, sample_rate: f64) -> Vec<f32> {
    let mode = sstv_core::get_mode_info(mode_id);
    let mut enc = SstvEncoder::new(mode_id, sample_rate).unwrap();
    let data = solid_image(mode, (0, 0, 0));
    let img = Image::new(
        &data,
        mode.width,
        mode.height,
        (mode.width * 3) as usize,
        ImageFormat::Rgb24,
    )
    .unwrap();
    enc.set_image(img).unwrap();

    let mut buf = vec![0f32; 4096];
    let mut out = Vec::new();
    while out.len() < (2.0 * sample_rate) as usize {
        let n = enc.generate(&mut buf, buf.len());
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    out
}

fn benchmark_vis_acquisition(c: &mut Criterion) {
    let fs = 48_000.0;
    let mut group = c.benchmark_group("vis_acquisition");
    for mode_id in [ModeId::Scottie1, ModeId::Martin1, ModeId::Pd120] {
        let samples = render_vis_only(mode_id, fs);
        group.bench_with_input(
            BenchmarkId::from_parameter(sstv_core::get_mode_info(mode_id).name),
            &samples,
            |b, samples| {
                b.iter(|| {
                    let mut dec = SstvDecoder::new(fs).unwrap();
                    dec.feed(black_box(samples));
                    black_box(dec.state().current_mode)
                })
            },
        );
    }
    group.finish();
}

fn benchmark_front_end_hot_path(c: &mut Criterion) {
    let fs = 48_000.0;
    let mut dec = SstvDecoder::new(fs).unwrap();
    dec.set_mode_hint(ModeId::Martin1);
    let block = vec![0.1f32; 256];
    c.bench_function("feed_256_samples", |b| {
        b.iter(|| dec.feed(black_box(&block)))
    });
}

criterion_group!(benches, benchmark_vis_acquisition, benchmark_front_end_hot_path);
criterion_main!(benches);
