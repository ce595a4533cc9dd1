//! Transmit-side encoding (C5, §4.5): turns a [`ModeDescriptor`] and an
//! [`Image`] into a stream of audio samples.
//!
//! Generation runs through four stages in order — preamble (§4.5.1, via
//! [`crate::preamble::PreambleScheduler`]), VIS (§4.4, via
//! [`crate::vis::VisFramer`]), body (§4.5.3, this module's
//! [`BodyScheduler`]), then complete — either stage can be skipped
//! (preamble/VIS independently disabled, or the mode carries no VIS at
//! all).
//!
//! The body scheduler (§4.5.5) accumulates fractional sample durations
//! the same way [`crate::vis::VisFramer`] does, so cumulative line timing
//! never drifts regardless of sample rate.

mod families;

use crate::catalogue::{ModeDescriptor, ModeId, VisDescriptor};
use crate::errors::{ConfigError, SstvError};
use crate::image::Image;
use crate::logging::{DebugLevel, LogCollector};
use crate::nco::Nco;
use crate::preamble::PreambleScheduler;
use crate::vis::{VisFramer, VisTones};

use families::{body_segments, is_narrowband, sample_channel, narrowband_freq, wideband_freq, BodySegment};

/// NCO command range covering every tone this crate ever synthesizes
/// (VIS leader/break/data tones, sync/porch tones, and the full
/// wide-band and narrow-band scan ranges), matching §4.5.6's literal
/// `u = (f - 1100)/1200` mapping.
const NCO_BASE_HZ: f64 = 1100.0;
const NCO_GAIN_HZ: f64 = 1200.0;

fn commanded_u(freq_hz: f64) -> f64 {
    (freq_hz - NCO_BASE_HZ) / NCO_GAIN_HZ
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Preamble,
    Vis,
    Body,
    Done,
}

struct BodyScheduler {
    mode: &'static ModeDescriptor,
    ms_per_sample: f64,
    line_idx: u32,
    segments: Vec<(BodySegment, f64)>,
    seg_index: usize,
    elapsed_in_seg_ms: f64,
}

impl BodyScheduler {
    fn new(mode: &'static ModeDescriptor, sample_rate: f64) -> Self {
        let segments = body_segments(mode, 0);
        Self {
            mode,
            ms_per_sample: 1000.0 / sample_rate,
            line_idx: 0,
            segments,
            seg_index: 0,
            elapsed_in_seg_ms: 0.0,
        }
    }

    fn is_done(&self) -> bool {
        self.line_idx >= self.mode.line_count
    }

    fn current_line(&self) -> u32 {
        self.line_idx
    }

    fn next_frequency(&mut self, image: &Image) -> Option<f64> {
        if self.is_done() {
            return None;
        }
        let (segment, duration_ms) = self.segments[self.seg_index];
        let frac = if duration_ms > 0.0 {
            (self.elapsed_in_seg_ms / duration_ms).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let freq = match segment {
            BodySegment::Fixed(hz) => hz,
            BodySegment::Scan { channel, row } => {
                let col = ((frac * self.mode.width as f64) as u32).min(self.mode.width - 1);
                let value = sample_channel(image, row, col, channel);
                if is_narrowband(self.mode.family) {
                    narrowband_freq(value)
                } else {
                    wideband_freq(value)
                }
            }
        };

        self.elapsed_in_seg_ms += self.ms_per_sample;
        if self.elapsed_in_seg_ms >= duration_ms {
            self.elapsed_in_seg_ms -= duration_ms;
            self.seg_index += 1;
            if self.seg_index >= self.segments.len() {
                self.line_idx += 1;
                self.seg_index = 0;
                self.elapsed_in_seg_ms = 0.0;
                if !self.is_done() {
                    self.segments = body_segments(self.mode, self.line_idx);
                }
            }
        }
        Some(freq)
    }
}

/// Transmit-side SSTV encoder: owns a mode, a sample rate, and (once
/// set) a borrowed image; drives an internal sample-by-sample state
/// machine through VIS preamble (if enabled) and line-by-line image body
/// (§6).
pub struct SstvEncoder<'a> {
    mode: &'static ModeDescriptor,
    sample_rate: f64,
    image: Option<Image<'a>>,
    vis_enabled: bool,
    preamble_enabled: bool,
    vis_tones: VisTones,
    phase: Phase,
    nco: Nco,
    preamble: Option<PreambleScheduler>,
    vis_framer: Option<VisFramer>,
    body: BodyScheduler,
    samples_emitted: u64,
    log: LogCollector,
    debug_level: DebugLevel,
}

impl<'a> SstvEncoder<'a> {
    /// Construct an encoder for `mode_id` at `sample_rate` Hz (§4.3,
    /// invariant I2 — `sample_rate` must be positive and finite).
    pub fn new(mode_id: ModeId, sample_rate: f64) -> Result<Self, SstvError> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(ConfigError::InvalidSampleRate { rate: sample_rate }.into());
        }
        let mode = crate::catalogue::get_mode_info(mode_id);
        Ok(Self {
            mode,
            sample_rate,
            image: None,
            vis_enabled: true,
            preamble_enabled: true,
            vis_tones: VisTones::default(),
            phase: Phase::Preamble,
            nco: Nco::new(sample_rate, NCO_BASE_HZ, NCO_GAIN_HZ),
            preamble: PreambleScheduler::for_style(mode.preamble, sample_rate),
            vis_framer: VisFramer::for_mode(mode, sample_rate, VisTones::default()),
            body: BodyScheduler::new(mode, sample_rate),
            samples_emitted: 0,
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

    /// Attach (or replace) the source image. Dimensions must exactly
    /// match the mode's catalogued width/height (§6).
    pub fn set_image(&mut self, image: Image<'a>) -> Result<(), SstvError> {
        if image.width() != self.mode.width || image.height() != self.mode.height {
            return Err(ConfigError::ImageSizeMismatch {
                expected_w: self.mode.width,
                expected_h: self.mode.height,
                actual_w: image.width(),
                actual_h: image.height(),
            }
            .into());
        }
        if self.debug_level >= DebugLevel::Summary {
            self.log.log(format!(
                "image attached: {}x{} for {}",
                image.width(),
                image.height(),
                self.mode.name
            ));
        }
        self.image = Some(image);
        Ok(())
    }

    /// Enable or disable the VIS preamble. Has no effect once generation
    /// has started past the VIS phase. Narrow-family modes never emit a
    /// VIS regardless of this setting (§9).
    pub fn set_vis_enabled(&mut self, enabled: bool) {
        self.vis_enabled = enabled;
    }

    /// Enable or disable the §4.5.1 calling-tone preamble emitted before
    /// VIS. Has no effect on the VIS stage itself, or once generation
    /// has moved past the preamble.
    pub fn set_preamble_enabled(&mut self, enabled: bool) {
        self.preamble_enabled = enabled;
    }

    pub fn set_vis_tones(&mut self, tones: VisTones) {
        self.vis_tones = tones;
        self.vis_framer = VisFramer::for_mode(self.mode, self.sample_rate, tones);
    }

    /// Fill `buf` (up to `max_n` samples) with generated audio, returning
    /// the number of samples written. Returns `0` once generation is
    /// complete; this is not an error (§7).
    pub fn generate(&mut self, buf: &mut [f32], max_n: usize) -> usize {
        let n = buf.len().min(max_n);
        let mut written = 0;

        while written < n {
            let freq = match self.phase {
                Phase::Preamble => {
                    if !self.preamble_enabled {
                        self.phase = Phase::Vis;
                        continue;
                    }
                    match &mut self.preamble {
                        Some(scheduler) => match scheduler.next_frequency() {
                            Some(f) => f,
                            None => {
                                self.phase = Phase::Vis;
                                continue;
                            }
                        },
                        None => {
                            self.phase = Phase::Vis;
                            continue;
                        }
                    }
                }
                Phase::Vis => {
                    if !self.vis_enabled {
                        self.phase = Phase::Body;
                        continue;
                    }
                    match &mut self.vis_framer {
                        Some(framer) => match framer.next_frequency() {
                            Some(f) => f,
                            None => {
                                self.phase = Phase::Body;
                                continue;
                            }
                        },
                        None => {
                            self.phase = Phase::Body;
                            continue;
                        }
                    }
                }
                Phase::Body => {
                    let Some(image) = self.image.as_ref() else {
                        break;
                    };
                    match self.body.next_frequency(image) {
                        Some(f) => f,
                        None => {
                            self.phase = Phase::Done;
                            if self.debug_level >= DebugLevel::Summary {
                                self.log.log(format!(
                                    "encode complete: {} samples",
                                    self.samples_emitted
                                ));
                            }
                            break;
                        }
                    }
                }
                Phase::Done => break,
            };

            buf[written] = self.nco.next_sample(commanded_u(freq));
            written += 1;
            self.samples_emitted += 1;
        }

        written
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Fraction of the body complete, in `[0, 1]` (0 while still in the
    /// VIS phase, 1 once complete).
    pub fn progress(&self) -> f64 {
        if self.mode.line_count == 0 {
            return 1.0;
        }
        (self.body.current_line() as f64 / self.mode.line_count as f64).clamp(0.0, 1.0)
    }

    /// Reset the encoder to its initial state, keeping the attached
    /// image and settings.
    pub fn reset(&mut self) {
        self.phase = Phase::Preamble;
        self.nco.reset();
        self.preamble = PreambleScheduler::for_style(self.mode.preamble, self.sample_rate);
        self.vis_framer = VisFramer::for_mode(self.mode, self.sample_rate, self.vis_tones);
        self.body = BodyScheduler::new(self.mode, self.sample_rate);
        self.samples_emitted = 0;
    }

    /// Predicted total sample count for the whole transmission at the
    /// current settings (§4.5.7): preamble (if enabled) plus VIS (if
    /// enabled and the mode carries one) plus the nominal body duration.
    /// A pure query; does not reflect mid-stream fractional-sample
    /// rounding exactly (invariant I4 bounds the true count to within
    /// one sample per line of this estimate).
    pub fn total_samples(&self) -> u64 {
        let preamble_ms = if self.preamble_enabled {
            self.preamble
                .as_ref()
                .map(|p| p.total_duration_ms())
                .unwrap_or(0.0)
        } else {
            0.0
        };
        let vis_ms = if self.vis_enabled {
            match self.mode.vis {
                VisDescriptor::None => 0.0,
                VisDescriptor::Standard { .. } => 910.0,
                VisDescriptor::Extended { .. } => 1210.0,
            }
        } else {
            0.0
        };
        let header_samples = ((preamble_ms + vis_ms) / 1000.0 * self.sample_rate).round();
        let body_samples = (self.mode.body_duration_sec() * self.sample_rate).round();
        (header_samples + body_samples) as u64
    }
}
