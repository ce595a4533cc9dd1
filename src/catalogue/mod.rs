//! Mode catalogue (C2, §4.2): a static table of per-mode line geometry,
//! timing, VIS identifiers, and family tag.
//!
//! The catalogue is process-wide immutable (§9 "Global state"); there is
//! no other global state in the crate. Each [`ModeDescriptor`] is built
//! once by [`all_modes`] and is otherwise just data — the transmit
//! scheduler (C5) and the VIS decoder (C7) are the only consumers.

mod table;

use std::sync::OnceLock;

/// Which historical family a mode belongs to; families share a line
/// scheduler in `crate::encoder::families`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Family {
    Robot24,
    Robot36,
    Robot72,
    Avt,
    Scottie,
    Martin,
    Sc2,
    Pd,
    Pasokon,
    MartinR,
    MartinP,
    MartinL,
    RobotBw,
    MartinNarrow,
    MartinColourNarrow,
}

/// How a line's colour channels are laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ColourEncoding {
    RgbSequential,
    YCbCrSequential,
    YThenRyBy,
    YThenAlternatingChroma,
    LuminanceOnly,
}

/// VIS preamble style (§4.5.1): standard 8-tone 800 ms, narrow 4-tone
/// 400 ms, or omitted entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PreambleStyle {
    Standard800,
    Narrow400,
    None,
}

/// First byte of every extended (16-bit) VIS word (§3).
pub const EXTENDED_VIS_PREFIX: u8 = 0x23;

/// A mode's VIS identifier, absent, standard 8-bit, or extended 16-bit
/// (§3, §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum VisDescriptor {
    /// Not transmitted; used by the narrow (MN/MC) families (§9).
    None,
    /// 7-bit mode identifier; the transmitted byte appends a parity bit
    /// computed by [`VisDescriptor::standard_byte`].
    Standard { data7: u8 },
    /// Second payload byte of the 16-bit extended form; the first
    /// payload is always [`EXTENDED_VIS_PREFIX`]. Each payload carries
    /// its own separately-transmitted odd-parity bit (§4.4), computed by
    /// [`odd_parity_bit`].
    Extended { second_byte: u8 },
}

impl VisDescriptor {
    /// The standard 8-bit code's transmitted byte: 7 id bits plus an
    /// even-parity bit in position 7 (chosen so the full byte's bit
    /// population is even — this matches every one of the normative
    /// codes in spec §6 except one transcription outlier; see
    /// DESIGN.md).
    pub fn standard_byte(data7: u8) -> u8 {
        let parity = if (data7 & 0x7F).count_ones() % 2 == 1 {
            1u8
        } else {
            0u8
        };
        (data7 & 0x7F) | (parity << 7)
    }
}

/// Odd-parity bit for a full 8-bit extended-VIS payload, transmitted as
/// its own 30 ms tone after the payload (§4.4): 1 if the payload's
/// population count is even, 0 otherwise, so the 9 transmitted bits
/// always have an odd population count.
pub fn odd_parity_bit(byte: u8) -> u8 {
    if byte.count_ones() % 2 == 0 {
        1
    } else {
        0
    }
}

/// Sync/porch/scan timing for one transmitted line (§3, invariant I1).
///
/// `line_duration_ms` is deliberately *not* a stored field: it is always
/// the sum of `sync_ms`, every entry of `porches_ms`, and every entry of
/// `channel_scans_ms`, computed by [`LineTiming::line_duration_ms`]. This
/// makes I1 true by construction rather than by a second, independently
/// maintained field that could drift out of sync.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LineTiming {
    pub sync_ms: f64,
    pub porches_ms: Vec<f64>,
    pub channel_scans_ms: Vec<f64>,
}

impl LineTiming {
    pub fn line_duration_ms(&self) -> f64 {
        self.sync_ms + self.porches_ms.iter().sum::<f64>() + self.channel_scans_ms.iter().sum::<f64>()
    }
}

/// Immutable per-mode record (§3).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ModeDescriptor {
    pub id: ModeId,
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    pub family: Family,
    pub colour: ColourEncoding,
    pub vis: VisDescriptor,
    pub preamble: PreambleStyle,
    /// Image rows consumed per transmitted line: 1 for full-rate
    /// families, 2 for PD/MartinP/MartinColourNarrow/Robot24 dual-line
    /// packing (§3, §9).
    pub image_lines_per_tx_line: u32,
    pub timing: LineTiming,
    /// Number of transmitted lines (not image rows — see
    /// `image_lines_per_tx_line`).
    pub line_count: u32,
    /// Scottie-family quirk (§4.2): an additional 9 ms 1200 Hz sync
    /// pulse emitted once, before the first transmitted line only.
    pub extra_first_line_sync_ms: Option<f64>,
}

impl ModeDescriptor {
    /// Total nominal line duration, milliseconds (I1).
    pub fn line_duration_ms(&self) -> f64 {
        self.timing.line_duration_ms()
    }

    /// Total nominal body duration (excluding preamble/VIS), seconds.
    pub fn body_duration_sec(&self) -> f64 {
        let lines_sec = self.line_duration_ms() * self.line_count as f64 / 1000.0;
        let extra_sec = self.extra_first_line_sync_ms.unwrap_or(0.0) / 1000.0;
        lines_sec + extra_sec
    }

    /// Number of image rows this mode expects (`line_count *
    /// image_lines_per_tx_line`, capped to `height`).
    pub fn image_rows_consumed(&self) -> u32 {
        self.height
    }
}

/// Stable identifier for every catalogued mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[allow(non_camel_case_types)]
pub enum ModeId {
    Robot24,
    Robot36,
    Robot72,
    Avt90,
    Scottie1,
    Scottie2,
    ScottieDx,
    Martin1,
    Martin2,
    Sc2_60,
    Sc2_120,
    Sc2_180,
    Pd50,
    Pd90,
    Pd120,
    Pd160,
    Pd180,
    Pd240,
    Pd290,
    PasokonP3,
    PasokonP5,
    PasokonP7,
    Bw8,
    Bw12,
    Mr90,
    Mr115,
    Mr140,
    Mr175,
    Mp73,
    Mp115,
    Mp140,
    Mp175,
    Ml180,
    Ml240,
    Ml280,
    Ml320,
    Mn73,
    Mn110,
    Mn140,
    Mc110,
    Mc140,
}

static CATALOGUE: OnceLock<Vec<ModeDescriptor>> = OnceLock::new();

/// The full mode catalogue, built once and shared for the life of the
/// process.
pub fn all_modes() -> &'static [ModeDescriptor] {
    CATALOGUE.get_or_init(table::build).as_slice()
}

/// Look up a single mode by identifier.
pub fn get_mode_info(id: ModeId) -> &'static ModeDescriptor {
    all_modes()
        .iter()
        .find(|m| m.id == id)
        .expect("catalogue always contains every ModeId variant")
}

/// Case-insensitive lookup by display name (§6).
pub fn find_mode_by_name(name: &str) -> Option<&'static ModeDescriptor> {
    all_modes()
        .iter()
        .find(|m| m.name.eq_ignore_ascii_case(name))
}
