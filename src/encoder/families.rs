//! Per-family line structure and colour-to-frequency mapping (§4.5.3,
//! §4.5.4).
//!
//! [`body_segments`] is the single place that knows, for a given family,
//! how a transmitted line's sync/porch/scan fields are ordered; the
//! durations themselves always come straight from the catalogue's
//! [`LineTiming`](crate::catalogue::LineTiming) rather than being
//! duplicated here.

use crate::catalogue::{Family, ModeDescriptor};
use crate::image::Image;

/// Which derived channel a scan field samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanChannel {
    R,
    G,
    B,
    Y,
    Ry,
    By,
}

/// One field of a transmitted line: either a constant tone (sync/porch)
/// or a pixel scan over a resolved image row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodySegment {
    Fixed(f64),
    Scan { channel: ScanChannel, row: u32 },
}

const SYNC_HZ: f64 = 1200.0;
const PORCH_HZ: f64 = 1500.0;

/// Wide-band luminance/chroma mapping: 1500-2300 Hz (§4.5.4).
pub fn wideband_freq(value: u8) -> f64 {
    1500.0 + (value as f64 / 255.0) * 800.0
}

/// Narrow-band mapping used by the Martin Narrow/Colour-Narrow families:
/// 2044-2300 Hz (§4.5.4).
pub fn narrowband_freq(value: u8) -> f64 {
    2044.0 + (value as f64 / 255.0) * 256.0
}

pub fn is_narrowband(family: Family) -> bool {
    matches!(family, Family::MartinNarrow | Family::MartinColourNarrow)
}

/// BT.601-ish luma/chroma constants, literal per §4.5.4. Not plain
/// Rec.601 (`0.299/0.587/0.114`, no offset) — those coefficients are
/// normative for wire interoperability with other SSTV implementations.
fn rgb_to_y(r: u8, g: u8, b: u8) -> f64 {
    16.0 + 0.256773 * r as f64 + 0.504097 * g as f64 + 0.097900 * b as f64
}

fn rgb_to_ry(r: u8, g: u8, b: u8) -> f64 {
    128.0 + 0.439187 * r as f64 - 0.367766 * g as f64 - 0.071421 * b as f64
}

fn rgb_to_by(r: u8, g: u8, b: u8) -> f64 {
    128.0 - 0.148213 * r as f64 - 0.290974 * g as f64 + 0.439187 * b as f64
}

fn clamp_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Sample the value a scan field should encode at image row `row`,
/// column `col`, using §4.5.4's literal Y/R-Y/B-Y constants.
pub fn sample_channel(image: &Image, row: u32, col: u32, channel: ScanChannel) -> u8 {
    let (r, g, b) = image.sample_rgb(col, row);
    match channel {
        ScanChannel::R => r,
        ScanChannel::G => g,
        ScanChannel::B => b,
        ScanChannel::Y => clamp_u8(rgb_to_y(r, g, b)),
        ScanChannel::Ry => clamp_u8(rgb_to_ry(r, g, b)),
        ScanChannel::By => clamp_u8(rgb_to_by(r, g, b)),
    }
}

/// Resolve which image row(s) transmitted line `line_idx` draws from,
/// duplicating the final row when `image_lines_per_tx_line == 2` and the
/// image height is odd (§9).
fn rows_for_line(mode: &ModeDescriptor, line_idx: u32) -> (u32, u32) {
    let row0 = (line_idx * mode.image_lines_per_tx_line).min(mode.height - 1);
    let row1 = (row0 + 1).min(mode.height - 1);
    (row0, row1)
}

/// Build the ordered field list for transmitted line `line_idx`.
///
/// Scottie's extra first-line sync (§4.2, §4.5.3) is prepended here
/// rather than folded into [`LineTiming`]: it fires once for the whole
/// transmission, not once per line, so it cannot be a per-line duration
/// without breaking invariant I1 (`line_duration_ms` summing the
/// catalogue's own fields).
pub fn body_segments(mode: &ModeDescriptor, line_idx: u32) -> Vec<(BodySegment, f64)> {
    let mut segments = body_segments_for_family(mode, line_idx);
    if line_idx == 0 {
        if let Some(extra_ms) = mode.extra_first_line_sync_ms {
            segments.insert(0, (BodySegment::Fixed(SYNC_HZ), extra_ms));
        }
    }
    segments
}

fn body_segments_for_family(mode: &ModeDescriptor, line_idx: u32) -> Vec<(BodySegment, f64)> {
    let t = &mode.timing;
    let (row0, row1) = rows_for_line(mode, line_idx);
    let scan = |channel: ScanChannel, row: u32| BodySegment::Scan { channel, row };
    let fixed = |hz: f64| BodySegment::Fixed(hz);

    match mode.family {
        Family::Scottie => vec![
            (fixed(PORCH_HZ), t.porches_ms[0]),
            (scan(ScanChannel::G, row0), t.channel_scans_ms[0]),
            (fixed(PORCH_HZ), t.porches_ms[1]),
            (scan(ScanChannel::B, row0), t.channel_scans_ms[1]),
            (fixed(SYNC_HZ), t.sync_ms),
            (fixed(PORCH_HZ), t.porches_ms[2]),
            (scan(ScanChannel::R, row0), t.channel_scans_ms[2]),
        ],
        Family::Martin => vec![
            (fixed(SYNC_HZ), t.sync_ms),
            (fixed(PORCH_HZ), t.porches_ms[0]),
            (scan(ScanChannel::G, row0), t.channel_scans_ms[0]),
            (fixed(PORCH_HZ), t.porches_ms[1]),
            (scan(ScanChannel::B, row0), t.channel_scans_ms[1]),
            (fixed(PORCH_HZ), t.porches_ms[2]),
            (scan(ScanChannel::R, row0), t.channel_scans_ms[2]),
            (fixed(PORCH_HZ), t.porches_ms[3]),
        ],
        Family::Sc2 => vec![
            (fixed(SYNC_HZ), t.sync_ms),
            (fixed(PORCH_HZ), t.porches_ms[0]),
            (scan(ScanChannel::R, row0), t.channel_scans_ms[0]),
            (scan(ScanChannel::G, row0), t.channel_scans_ms[1]),
            (scan(ScanChannel::B, row0), t.channel_scans_ms[2]),
        ],
        Family::Pd => vec![
            (fixed(SYNC_HZ), t.sync_ms),
            (fixed(PORCH_HZ), t.porches_ms[0]),
            (scan(ScanChannel::Y, row0), t.channel_scans_ms[0]),
            (scan(ScanChannel::Ry, row0), t.channel_scans_ms[1]),
            (scan(ScanChannel::By, row0), t.channel_scans_ms[2]),
            (scan(ScanChannel::Y, row1), t.channel_scans_ms[3]),
        ],
        Family::Robot36 => vec![
            (fixed(SYNC_HZ), t.sync_ms),
            (fixed(PORCH_HZ), t.porches_ms[0]),
            (scan(ScanChannel::Y, row0), t.channel_scans_ms[0]),
            (fixed(1500.0), t.porches_ms[1]),
            (fixed(PORCH_HZ), t.porches_ms[2]),
            (
                scan(if line_idx % 2 == 0 { ScanChannel::Ry } else { ScanChannel::By }, row0),
                t.channel_scans_ms[1],
            ),
        ],
        Family::Robot72 => vec![
            (fixed(SYNC_HZ), t.sync_ms),
            (fixed(PORCH_HZ), t.porches_ms[0]),
            (scan(ScanChannel::Y, row0), t.channel_scans_ms[0]),
            (fixed(1500.0), t.porches_ms[1]),
            (fixed(PORCH_HZ), t.porches_ms[2]),
            (scan(ScanChannel::Ry, row0), t.channel_scans_ms[1]),
            (fixed(1500.0), t.porches_ms[3]),
            (fixed(PORCH_HZ), t.porches_ms[4]),
            (scan(ScanChannel::By, row0), t.channel_scans_ms[2]),
        ],
        Family::Robot24 => vec![
            (fixed(SYNC_HZ), t.sync_ms),
            (fixed(PORCH_HZ), t.porches_ms[0]),
            (scan(ScanChannel::Y, row0), t.channel_scans_ms[0]),
            (fixed(PORCH_HZ), t.porches_ms[1]),
            (scan(ScanChannel::Y, row1), t.channel_scans_ms[1]),
            (fixed(PORCH_HZ), t.porches_ms[2]),
            (
                scan(if line_idx % 2 == 0 { ScanChannel::Ry } else { ScanChannel::By }, row0),
                t.channel_scans_ms[2],
            ),
        ],
        Family::Avt => vec![
            (fixed(SYNC_HZ), t.sync_ms),
            (fixed(PORCH_HZ), t.porches_ms[0]),
            (scan(ScanChannel::R, row0), t.channel_scans_ms[0]),
            (fixed(PORCH_HZ), t.porches_ms[1]),
            (scan(ScanChannel::G, row0), t.channel_scans_ms[1]),
            (scan(ScanChannel::B, row0), t.channel_scans_ms[2]),
        ],
        Family::Pasokon => vec![
            (fixed(SYNC_HZ), t.sync_ms),
            (fixed(PORCH_HZ), t.porches_ms[0]),
            (scan(ScanChannel::R, row0), t.channel_scans_ms[0]),
            (fixed(PORCH_HZ), t.porches_ms[1]),
            (scan(ScanChannel::G, row0), t.channel_scans_ms[1]),
            (fixed(PORCH_HZ), t.porches_ms[2]),
            (scan(ScanChannel::B, row0), t.channel_scans_ms[2]),
            (fixed(PORCH_HZ), t.porches_ms[3]),
        ],
        Family::RobotBw => vec![
            (fixed(SYNC_HZ), t.sync_ms),
            (fixed(PORCH_HZ), t.porches_ms[0]),
            (scan(ScanChannel::Y, row0), t.channel_scans_ms[0]),
        ],
        Family::MartinR | Family::MartinL => vec![
            (fixed(SYNC_HZ), t.sync_ms),
            (fixed(PORCH_HZ), t.porches_ms[0]),
            (scan(ScanChannel::Y, row0), t.channel_scans_ms[0]),
            (scan(ScanChannel::Ry, row0), t.channel_scans_ms[1]),
            (scan(ScanChannel::By, row0), t.channel_scans_ms[2]),
        ],
        Family::MartinP | Family::MartinColourNarrow => vec![
            (fixed(SYNC_HZ), t.sync_ms),
            (fixed(PORCH_HZ), t.porches_ms[0]),
            (scan(ScanChannel::Y, row0), t.channel_scans_ms[0]),
            (fixed(PORCH_HZ), t.porches_ms[1]),
            (scan(ScanChannel::Ry, row0), t.channel_scans_ms[1]),
            (fixed(PORCH_HZ), t.porches_ms[2]),
            (scan(ScanChannel::By, row0), t.channel_scans_ms[2]),
            (fixed(PORCH_HZ), t.porches_ms[3]),
            (scan(ScanChannel::Y, row1), t.channel_scans_ms[3]),
        ],
        Family::MartinNarrow => vec![
            (fixed(SYNC_HZ), t.sync_ms),
            (fixed(PORCH_HZ), t.porches_ms[0]),
            (scan(ScanChannel::Y, row0), t.channel_scans_ms[0]),
        ],
    }
}
