//! Receive-side decoding (C6 front end + C7 VIS automaton, §4.6-§4.7):
//! turns an incoming audio stream into a best-effort reconstructed image.
//!
//! Line-level resynchronisation against drifting sync pulses is out of
//! scope (§9): once the VIS has been decoded (or a mode hint supplied),
//! the body decoder tracks nominal line timing the same way the encoder
//! schedules it, rather than re-deriving timing from the received 1200 Hz
//! sync tone on every line.

mod frontend;
mod vis;

use crate::catalogue::{self, ColourEncoding, ModeDescriptor, ModeId};
use crate::errors::{ConfigError, SstvError};
use crate::image::{Image, ImageFormat};
use crate::logging::{DebugLevel, LogCollector};
use crate::vis::VisTones;

use frontend::FrontEnd;
pub use vis::Sensitivity;
use vis::VisDecoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    AwaitingVis,
    Decoding,
    Complete,
}

/// Snapshot of decoder progress, returned by [`SstvDecoder::state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderState {
    pub current_mode: Option<ModeId>,
    pub sync_detected: bool,
    pub image_ready: bool,
    pub current_line: u32,
    pub total_lines: u32,
}

/// Reconstructed output: an owned pixel buffer matching the decoded
/// mode's geometry (§6).
#[derive(Debug, Clone)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl DecodedImage {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width * height * 3) as usize],
        }
    }

    pub fn as_image(&self) -> Image<'_> {
        Image::new(&self.data, self.width, self.height, (self.width * 3) as usize, ImageFormat::Rgb24)
            .expect("decoder always builds a correctly strided buffer")
    }

    fn set_pixel(&mut self, x: u32, y: u32, rgb: (u8, u8, u8)) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y * self.width + x) as usize * 3;
        self.data[idx] = rgb.0;
        self.data[idx + 1] = rgb.1;
        self.data[idx + 2] = rgb.2;
    }
}

fn freq_to_value(freq: f64, narrow: bool) -> u8 {
    let (lo, span) = if narrow { (2044.0, 256.0) } else { (1500.0, 800.0) };
    (((freq - lo) / span).clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Inverse of §4.5.4's literal Y/R-Y/B-Y constants (the standard
/// ITU-R BT.601 YCbCr->RGB matrix inverse, since §4.5.4's forward
/// constants are themselves that matrix).
fn ycc_to_rgb(y: f64, ry: f64, by: f64) -> (u8, u8, u8) {
    let yy = 1.164383 * (y - 16.0);
    let r = (yy + 1.596027 * (ry - 128.0)).round().clamp(0.0, 255.0) as u8;
    let g = (yy - 0.391762 * (by - 128.0) - 0.812968 * (ry - 128.0))
        .round()
        .clamp(0.0, 255.0) as u8;
    let b = (yy + 2.017232 * (by - 128.0)).round().clamp(0.0, 255.0) as u8;
    (r, g, b)
}

/// Decoder-side body reconstruction, driven by nominal mode timing and a
/// resonator-bank frequency estimate (§4.6).
pub struct SstvDecoder {
    sample_rate: f64,
    front_end: FrontEnd,
    vis_decoder: VisDecoder,
    vis_tones: VisTones,
    vis_enabled: bool,
    mode_hint: Option<ModeId>,
    stage: Stage,
    current_mode: Option<&'static ModeDescriptor>,
    image: Option<DecodedImage>,
    line_idx: u32,
    seg_index: usize,
    elapsed_in_seg_ms: f64,
    segments_cache: Vec<(BodyField, f64)>,
    body_tone_bank: Option<frontend::ToneBank>,
    log: LogCollector,
    debug_level: DebugLevel,
}

/// Decode-side mirror of [`crate::encoder`]'s body field plan — kept
/// separate because the decoder has no borrowed [`Image`] to read from;
/// it only needs to know which derived channel and row a field writes
/// into, and assembles RGB lazily once every field in a line is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyField {
    Fixed,
    R(u32),
    G(u32),
    B(u32),
    Y(u32),
    Ry(u32),
    By(u32),
}

fn narrow_family(mode: &ModeDescriptor) -> bool {
    matches!(
        mode.family,
        catalogue::Family::MartinNarrow | catalogue::Family::MartinColourNarrow
    )
}

/// Rebuild the same field ordering `crate::encoder::families::body_segments`
/// uses, expressed in terms of [`BodyField`] rather than a borrowed
/// [`Image`] sample.
fn body_fields(mode: &ModeDescriptor, line_idx: u32) -> Vec<(BodyField, f64)> {
    let mut fields = body_fields_for_family(mode, line_idx);
    if line_idx == 0 {
        if let Some(extra_ms) = mode.extra_first_line_sync_ms {
            fields.insert(0, (BodyField::Fixed, extra_ms));
        }
    }
    fields
}

/// Mirrors [`crate::encoder::families::body_segments`]'s per-family field
/// order, minus the Scottie first-line sync prepended by
/// [`body_fields`].
fn body_fields_for_family(mode: &ModeDescriptor, line_idx: u32) -> Vec<(BodyField, f64)> {
    let t = &mode.timing;
    let row0 = (line_idx * mode.image_lines_per_tx_line).min(mode.height.saturating_sub(1));
    let row1 = (row0 + 1).min(mode.height.saturating_sub(1));
    use catalogue::Family::*;
    match mode.family {
        Scottie => vec![
            (BodyField::Fixed, t.porches_ms[0]),
            (BodyField::G(row0), t.channel_scans_ms[0]),
            (BodyField::Fixed, t.porches_ms[1]),
            (BodyField::B(row0), t.channel_scans_ms[1]),
            (BodyField::Fixed, t.sync_ms),
            (BodyField::Fixed, t.porches_ms[2]),
            (BodyField::R(row0), t.channel_scans_ms[2]),
        ],
        Martin => vec![
            (BodyField::Fixed, t.sync_ms),
            (BodyField::Fixed, t.porches_ms[0]),
            (BodyField::G(row0), t.channel_scans_ms[0]),
            (BodyField::Fixed, t.porches_ms[1]),
            (BodyField::B(row0), t.channel_scans_ms[1]),
            (BodyField::Fixed, t.porches_ms[2]),
            (BodyField::R(row0), t.channel_scans_ms[2]),
            (BodyField::Fixed, t.porches_ms[3]),
        ],
        Sc2 => vec![
            (BodyField::Fixed, t.sync_ms),
            (BodyField::Fixed, t.porches_ms[0]),
            (BodyField::R(row0), t.channel_scans_ms[0]),
            (BodyField::G(row0), t.channel_scans_ms[1]),
            (BodyField::B(row0), t.channel_scans_ms[2]),
        ],
        Pd => vec![
            (BodyField::Fixed, t.sync_ms),
            (BodyField::Fixed, t.porches_ms[0]),
            (BodyField::Y(row0), t.channel_scans_ms[0]),
            (BodyField::Ry(row0), t.channel_scans_ms[1]),
            (BodyField::By(row0), t.channel_scans_ms[2]),
            (BodyField::Y(row1), t.channel_scans_ms[3]),
        ],
        Robot36 => vec![
            (BodyField::Fixed, t.sync_ms),
            (BodyField::Fixed, t.porches_ms[0]),
            (BodyField::Y(row0), t.channel_scans_ms[0]),
            (BodyField::Fixed, t.porches_ms[1]),
            (BodyField::Fixed, t.porches_ms[2]),
            (
                if line_idx % 2 == 0 { BodyField::Ry(row0) } else { BodyField::By(row0) },
                t.channel_scans_ms[1],
            ),
        ],
        Robot72 => vec![
            (BodyField::Fixed, t.sync_ms),
            (BodyField::Fixed, t.porches_ms[0]),
            (BodyField::Y(row0), t.channel_scans_ms[0]),
            (BodyField::Fixed, t.porches_ms[1]),
            (BodyField::Fixed, t.porches_ms[2]),
            (BodyField::Ry(row0), t.channel_scans_ms[1]),
            (BodyField::Fixed, t.porches_ms[3]),
            (BodyField::Fixed, t.porches_ms[4]),
            (BodyField::By(row0), t.channel_scans_ms[2]),
        ],
        Robot24 => vec![
            (BodyField::Fixed, t.sync_ms),
            (BodyField::Fixed, t.porches_ms[0]),
            (BodyField::Y(row0), t.channel_scans_ms[0]),
            (BodyField::Fixed, t.porches_ms[1]),
            (BodyField::Y(row1), t.channel_scans_ms[1]),
            (BodyField::Fixed, t.porches_ms[2]),
            (
                if line_idx % 2 == 0 { BodyField::Ry(row0) } else { BodyField::By(row0) },
                t.channel_scans_ms[2],
            ),
        ],
        Avt => vec![
            (BodyField::Fixed, t.sync_ms),
            (BodyField::Fixed, t.porches_ms[0]),
            (BodyField::R(row0), t.channel_scans_ms[0]),
            (BodyField::Fixed, t.porches_ms[1]),
            (BodyField::G(row0), t.channel_scans_ms[1]),
            (BodyField::B(row0), t.channel_scans_ms[2]),
        ],
        Pasokon => vec![
            (BodyField::Fixed, t.sync_ms),
            (BodyField::Fixed, t.porches_ms[0]),
            (BodyField::R(row0), t.channel_scans_ms[0]),
            (BodyField::Fixed, t.porches_ms[1]),
            (BodyField::G(row0), t.channel_scans_ms[1]),
            (BodyField::Fixed, t.porches_ms[2]),
            (BodyField::B(row0), t.channel_scans_ms[2]),
            (BodyField::Fixed, t.porches_ms[3]),
        ],
        RobotBw => vec![
            (BodyField::Fixed, t.sync_ms),
            (BodyField::Fixed, t.porches_ms[0]),
            (BodyField::Y(row0), t.channel_scans_ms[0]),
        ],
        MartinR | MartinL => vec![
            (BodyField::Fixed, t.sync_ms),
            (BodyField::Fixed, t.porches_ms[0]),
            (BodyField::Y(row0), t.channel_scans_ms[0]),
            (BodyField::Ry(row0), t.channel_scans_ms[1]),
            (BodyField::By(row0), t.channel_scans_ms[2]),
        ],
        MartinP | MartinColourNarrow => vec![
            (BodyField::Fixed, t.sync_ms),
            (BodyField::Fixed, t.porches_ms[0]),
            (BodyField::Y(row0), t.channel_scans_ms[0]),
            (BodyField::Fixed, t.porches_ms[1]),
            (BodyField::Ry(row0), t.channel_scans_ms[1]),
            (BodyField::Fixed, t.porches_ms[2]),
            (BodyField::By(row0), t.channel_scans_ms[2]),
            (BodyField::Fixed, t.porches_ms[3]),
            (BodyField::Y(row1), t.channel_scans_ms[3]),
        ],
        MartinNarrow => vec![
            (BodyField::Fixed, t.sync_ms),
            (BodyField::Fixed, t.porches_ms[0]),
            (BodyField::Y(row0), t.channel_scans_ms[0]),
        ],
    }
}

impl SstvDecoder {
    pub fn new(sample_rate: f64) -> Result<Self, SstvError> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(ConfigError::InvalidSampleRate { rate: sample_rate }.into());
        }
        Ok(Self {
            sample_rate,
            front_end: FrontEnd::new(sample_rate, false).map_err(SstvError::Dsp)?,
            vis_decoder: VisDecoder::new(sample_rate, Sensitivity::MediumLow),
            vis_tones: VisTones::default(),
            vis_enabled: true,
            mode_hint: None,
            stage: Stage::AwaitingVis,
            current_mode: None,
            image: None,
            line_idx: 0,
            seg_index: 0,
            elapsed_in_seg_ms: 0.0,
            segments_cache: Vec::new(),
            body_tone_bank: None,
            log: LogCollector::default(),
            debug_level: DebugLevel::default(),
        })
    }

    pub fn set_debug_level(&mut self, level: DebugLevel) {
        self.debug_level = level;
    }

    pub fn log_entries(&self) -> impl Iterator<Item = &str> {
        self.log.entries()
    }

    /// Skip VIS detection entirely and decode body data as `mode_id`
    /// immediately (§6 — useful when the mode is already known out of
    /// band, e.g. for the narrow families that never transmit a VIS).
    pub fn set_mode_hint(&mut self, mode_id: ModeId) {
        self.mode_hint = Some(mode_id);
        self.begin_mode(catalogue::get_mode_info(mode_id));
    }

    pub fn set_vis_enabled(&mut self, enabled: bool) {
        self.vis_enabled = enabled;
    }

    pub fn set_vis_tones(&mut self, tones: VisTones) {
        self.vis_tones = tones;
    }

    pub fn set_sensitivity(&mut self, level: u8) {
        self.vis_decoder.set_sensitivity(Sensitivity::from_level(level));
    }

    fn begin_mode(&mut self, mode: &'static ModeDescriptor) {
        let narrow = narrow_family(mode);
        if let Ok(fe) = FrontEnd::new(self.sample_rate, narrow) {
            self.front_end = fe;
        }
        self.current_mode = Some(mode);
        self.image = Some(DecodedImage::new(mode.width, mode.height));
        self.line_idx = 0;
        self.seg_index = 0;
        self.elapsed_in_seg_ms = 0.0;
        self.segments_cache = body_fields(mode, 0);
        self.body_tone_bank = Some(if narrow {
            frontend::ToneBank::new(2044.0, 2300.0, 24, self.sample_rate, 30.0)
        } else {
            frontend::ToneBank::new(1500.0, 2300.0, 32, self.sample_rate, 40.0)
        });
        self.stage = Stage::Decoding;
        if self.debug_level >= DebugLevel::Summary {
            self.log.log(format!("decoding as {}", mode.name));
        }
    }

    /// Feed a block of conditioned audio samples.
    pub fn feed(&mut self, samples: &[f32]) {
        for &s in samples {
            self.feed_one(s);
        }
    }

    fn feed_one(&mut self, x: f32) {
        let conditioned = self.front_end.process(x);

        match self.stage {
            Stage::AwaitingVis => {
                if !self.vis_enabled {
                    return;
                }
                if let Some(outcome) = self.vis_decoder.feed(conditioned) {
                    if let Some(mode) = resolve_mode(&outcome) {
                        if self.debug_level >= DebugLevel::Verbose {
                            self.log.log(format!(
                                "VIS decoded: byte1=0x{:02X} byte2={:?} parity_ok=({}, {})",
                                outcome.byte1, outcome.byte2, outcome.parity1_ok, outcome.parity2_ok
                            ));
                        }
                        self.begin_mode(mode);
                    } else {
                        self.vis_decoder.reset();
                        if self.debug_level >= DebugLevel::Summary {
                            self.log.log(format!(
                                "VIS byte 0x{:02X} matched no catalogued mode",
                                outcome.byte1
                            ));
                        }
                    }
                }
            }
            Stage::Decoding => self.feed_body(conditioned),
            Stage::Complete => {}
        }
    }

    fn feed_body(&mut self, conditioned: f64) {
        let Some(mode) = self.current_mode else { return };
        if self.line_idx >= mode.line_count {
            self.stage = Stage::Complete;
            if self.debug_level >= DebugLevel::Summary {
                self.log.log("decode complete".to_string());
            }
            return;
        }
        let Some(bank) = self.body_tone_bank.as_mut() else { return };
        let freq = bank.dominant_frequency(conditioned);

        let (field, duration_ms) = self.segments_cache[self.seg_index];
        let ms_per_sample = 1000.0 / self.sample_rate;
        let frac = if duration_ms > 0.0 {
            (self.elapsed_in_seg_ms / duration_ms).clamp(0.0, 1.0)
        } else {
            0.0
        };

        if !matches!(field, BodyField::Fixed) {
            let value = freq_to_value(freq, narrow_family(mode));
            let col = ((frac * mode.width as f64) as u32).min(mode.width.saturating_sub(1));
            self.write_field(mode, field, col, value);
        }

        self.elapsed_in_seg_ms += ms_per_sample;
        if self.elapsed_in_seg_ms >= duration_ms {
            self.elapsed_in_seg_ms -= duration_ms;
            self.seg_index += 1;
            if self.seg_index >= self.segments_cache.len() {
                self.line_idx += 1;
                self.seg_index = 0;
                if self.line_idx < mode.line_count {
                    self.segments_cache = body_fields(mode, self.line_idx);
                }
            }
        }
    }

    fn write_field(&mut self, mode: &ModeDescriptor, field: BodyField, col: u32, value: u8) {
        let Some(image) = self.image.as_mut() else { return };
        match mode.colour {
            ColourEncoding::RgbSequential | ColourEncoding::YCbCrSequential => match field {
                BodyField::R(row) => {
                    let (_, g, b) = rgb_at(image, col, row);
                    image.set_pixel(col, row, (value, g, b));
                }
                BodyField::G(row) => {
                    let (r, _, b) = rgb_at(image, col, row);
                    image.set_pixel(col, row, (r, value, b));
                }
                BodyField::B(row) => {
                    let (r, g, _) = rgb_at(image, col, row);
                    image.set_pixel(col, row, (r, g, value));
                }
                _ => {}
            },
            ColourEncoding::LuminanceOnly => {
                if let BodyField::Y(row) = field {
                    image.set_pixel(col, row, (value, value, value));
                }
            }
            ColourEncoding::YThenRyBy | ColourEncoding::YThenAlternatingChroma => match field {
                BodyField::Y(row) => {
                    let (r, g, b) = rgb_at(image, col, row);
                    let (nr, ng, nb) = ycc_to_rgb(value as f64, (r as i32 - g as i32 + 128).clamp(0, 255) as f64, (b as i32 - g as i32 + 128).clamp(0, 255) as f64);
                    image.set_pixel(col, row, (nr, ng, nb));
                }
                BodyField::Ry(row) => {
                    let (_, g, b) = rgb_at(image, col, row);
                    let y = g as f64;
                    let (nr, ng, nb) = ycc_to_rgb(y, value as f64, (b as i32 - g as i32 + 128).clamp(0, 255) as f64);
                    image.set_pixel(col, row, (nr, ng, nb));
                }
                BodyField::By(row) => {
                    let (r, g, _) = rgb_at(image, col, row);
                    let y = g as f64;
                    let (nr, ng, nb) = ycc_to_rgb(y, (r as i32 - g as i32 + 128).clamp(0, 255) as f64, value as f64);
                    image.set_pixel(col, row, (nr, ng, nb));
                }
                _ => {}
            },
        }
    }

    /// Number of conditioned samples (before bit-level timing) already
    /// consumed is not tracked on the public API — only line progress is
    /// (§6).
    pub fn state(&self) -> DecoderState {
        let sync_detected =
            self.current_mode.is_some() || (self.stage == Stage::AwaitingVis && self.vis_decoder.acquiring());
        DecoderState {
            current_mode: self.current_mode.map(|m| m.id),
            sync_detected,
            image_ready: self.stage == Stage::Complete,
            current_line: self.line_idx,
            total_lines: self.current_mode.map(|m| m.line_count).unwrap_or(0),
        }
    }

    pub fn image(&self) -> Option<Image<'_>> {
        self.image.as_ref().map(DecodedImage::as_image)
    }

    pub fn reset(&mut self) {
        self.front_end.reset();
        self.vis_decoder.reset();
        self.mode_hint = None;
        self.stage = Stage::AwaitingVis;
        self.current_mode = None;
        self.image = None;
        self.line_idx = 0;
        self.seg_index = 0;
        self.elapsed_in_seg_ms = 0.0;
        self.segments_cache.clear();
        self.body_tone_bank = None;
    }
}

fn rgb_at(image: &DecodedImage, x: u32, y: u32) -> (u8, u8, u8) {
    image.as_image().sample_rgb(x, y)
}

fn resolve_mode(outcome: &vis::VisOutcome) -> Option<&'static ModeDescriptor> {
    catalogue::all_modes().iter().find(|m| match m.vis {
        catalogue::VisDescriptor::Standard { data7 } => {
            outcome.byte2.is_none() && catalogue::VisDescriptor::standard_byte(data7) == outcome.byte1
        }
        catalogue::VisDescriptor::Extended { second_byte } => {
            outcome.byte1 == catalogue::EXTENDED_VIS_PREFIX && outcome.byte2 == Some(second_byte)
        }
        catalogue::VisDescriptor::None => false,
    })
}
