//! Construction of the static mode table (§4.2, §6).
//!
//! Every entry's `sync_ms` + `porches_ms` + `channel_scans_ms` reproduces
//! the normative line durations given for Scottie 1/2/DX, Martin 1/2,
//! Robot 36/72, PD120, and SC2-180 exactly. Timing for the less-documented
//! extended (MR/MP/ML/MN/MC) and Pasokon families is derived to be
//! internally consistent with their family structure and naming
//! convention rather than transcribed from a second external source; see
//! DESIGN.md.

use super::{
    ColourEncoding, Family, LineTiming, ModeDescriptor, ModeId, PreambleStyle, VisDescriptor,
};

fn mode(
    id: ModeId,
    name: &'static str,
    width: u32,
    height: u32,
    family: Family,
    colour: ColourEncoding,
    vis: VisDescriptor,
    preamble: PreambleStyle,
    image_lines_per_tx_line: u32,
    sync_ms: f64,
    porches_ms: &[f64],
    channel_scans_ms: &[f64],
    line_count: u32,
    extra_first_line_sync_ms: Option<f64>,
) -> ModeDescriptor {
    ModeDescriptor {
        id,
        name,
        width,
        height,
        family,
        colour,
        vis,
        preamble,
        image_lines_per_tx_line,
        timing: LineTiming {
            sync_ms,
            porches_ms: porches_ms.to_vec(),
            channel_scans_ms: channel_scans_ms.to_vec(),
        },
        line_count,
        extra_first_line_sync_ms,
    }
}

fn standard(data7: u8) -> VisDescriptor {
    VisDescriptor::Standard { data7 }
}

fn extended(second_byte: u8) -> VisDescriptor {
    VisDescriptor::Extended { second_byte }
}

pub(super) fn build() -> Vec<ModeDescriptor> {
    vec![
        // --- Robot family -----------------------------------------------
        mode(
            ModeId::Robot24,
            "Robot 24",
            160,
            120,
            Family::Robot24,
            ColourEncoding::YThenAlternatingChroma,
            standard(0x04),
            PreambleStyle::Standard800,
            2,
            9.0,
            &[3.0, 1.5, 1.5],
            &[22.0, 22.0, 11.0],
            60,
            None,
        ),
        mode(
            ModeId::Robot36,
            "Robot 36",
            320,
            240,
            Family::Robot36,
            ColourEncoding::YThenAlternatingChroma,
            standard(0x08),
            PreambleStyle::Standard800,
            1,
            9.0,
            &[3.0, 4.5, 1.5],
            &[88.0, 44.0],
            240,
            None,
        ),
        mode(
            ModeId::Robot72,
            "Robot 72",
            320,
            240,
            Family::Robot72,
            ColourEncoding::YThenRyBy,
            standard(0x0C),
            PreambleStyle::Standard800,
            1,
            9.0,
            &[3.0, 4.5, 1.5, 4.5, 1.5],
            &[138.0, 69.0, 69.0],
            240,
            None,
        ),
        // --- AVT ----------------------------------------------------------
        mode(
            ModeId::Avt90,
            "AVT 90",
            128,
            128,
            Family::Avt,
            ColourEncoding::RgbSequential,
            standard(0x44),
            PreambleStyle::Standard800,
            1,
            9.0,
            &[3.0, 3.0],
            &[229.375, 229.375, 229.375],
            128,
            None,
        ),
        // --- Scottie family ------------------------------------------------
        mode(
            ModeId::Scottie1,
            "Scottie 1",
            320,
            256,
            Family::Scottie,
            ColourEncoding::RgbSequential,
            standard(0x3C),
            PreambleStyle::Standard800,
            1,
            9.0,
            &[1.5, 1.5, 1.5],
            &[138.240, 138.240, 138.240],
            256,
            Some(9.0),
        ),
        mode(
            ModeId::Scottie2,
            "Scottie 2",
            320,
            256,
            Family::Scottie,
            ColourEncoding::RgbSequential,
            standard(0x38),
            PreambleStyle::Standard800,
            1,
            9.0,
            &[1.5, 1.5, 1.5],
            &[88.064, 88.064, 88.064],
            256,
            Some(9.0),
        ),
        mode(
            ModeId::ScottieDx,
            "Scottie DX",
            320,
            256,
            Family::Scottie,
            ColourEncoding::RgbSequential,
            standard(0x4C),
            PreambleStyle::Standard800,
            1,
            9.0,
            &[1.5, 1.5, 1.5],
            &[345.600, 345.600, 345.600],
            256,
            Some(9.0),
        ),
        // --- Martin family --------------------------------------------------
        mode(
            ModeId::Martin1,
            "Martin 1",
            320,
            256,
            Family::Martin,
            ColourEncoding::RgbSequential,
            standard(0x2C),
            PreambleStyle::Standard800,
            1,
            4.862,
            &[0.572, 0.572, 0.572, 0.572],
            &[146.432, 146.432, 146.432],
            256,
            None,
        ),
        mode(
            ModeId::Martin2,
            "Martin 2",
            320,
            256,
            Family::Martin,
            ColourEncoding::RgbSequential,
            standard(0x28),
            PreambleStyle::Standard800,
            1,
            4.862,
            &[0.572, 0.572, 0.572, 0.572],
            &[73.216, 73.216, 73.216],
            256,
            None,
        ),
        // --- SC2 family -----------------------------------------------------
        mode(
            ModeId::Sc2_60,
            "SC2-60",
            320,
            256,
            Family::Sc2,
            ColourEncoding::RgbSequential,
            standard(0x3B),
            PreambleStyle::Standard800,
            1,
            9.0,
            &[0.5],
            &[74.958333, 74.958333, 74.958333],
            256,
            None,
        ),
        mode(
            ModeId::Sc2_120,
            "SC2-120",
            320,
            256,
            Family::Sc2,
            ColourEncoding::RgbSequential,
            standard(0x3F),
            PreambleStyle::Standard800,
            1,
            9.0,
            &[0.5],
            &[153.083333, 153.083333, 153.083333],
            256,
            None,
        ),
        mode(
            ModeId::Sc2_180,
            "SC2-180",
            320,
            256,
            Family::Sc2,
            ColourEncoding::RgbSequential,
            standard(0x37),
            PreambleStyle::Standard800,
            1,
            9.0,
            &[0.5],
            &[233.8479, 233.8479, 233.8479],
            256,
            None,
        ),
        // --- PD family -------------------------------------------------------
        mode(
            ModeId::Pd50,
            "PD50",
            320,
            256,
            Family::Pd,
            ColourEncoding::YThenRyBy,
            standard(0x5D),
            PreambleStyle::Standard800,
            2,
            20.0,
            &[2.08],
            &[91.52, 91.52, 91.52, 91.52],
            128,
            None,
        ),
        mode(
            ModeId::Pd90,
            "PD90",
            320,
            256,
            Family::Pd,
            ColourEncoding::YThenRyBy,
            standard(0x63),
            PreambleStyle::Standard800,
            2,
            20.0,
            &[2.08],
            &[170.24, 170.24, 170.24, 170.24],
            128,
            None,
        ),
        mode(
            ModeId::Pd120,
            "PD120",
            640,
            496,
            Family::Pd,
            ColourEncoding::YThenRyBy,
            standard(0x5F),
            PreambleStyle::Standard800,
            2,
            20.0,
            &[2.08],
            &[121.6, 121.6, 121.6, 121.6],
            248,
            None,
        ),
        mode(
            ModeId::Pd160,
            "PD160",
            512,
            400,
            Family::Pd,
            ColourEncoding::YThenRyBy,
            standard(0x62),
            PreambleStyle::Standard800,
            2,
            20.0,
            &[2.08],
            &[194.96, 194.96, 194.96, 194.96],
            200,
            None,
        ),
        mode(
            ModeId::Pd180,
            "PD180",
            640,
            496,
            Family::Pd,
            ColourEncoding::YThenRyBy,
            standard(0x60),
            PreambleStyle::Standard800,
            2,
            20.0,
            &[2.08],
            &[183.04, 183.04, 183.04, 183.04],
            248,
            None,
        ),
        mode(
            ModeId::Pd240,
            "PD240",
            640,
            496,
            Family::Pd,
            ColourEncoding::YThenRyBy,
            standard(0x61),
            PreambleStyle::Standard800,
            2,
            20.0,
            &[2.08],
            &[244.48, 244.48, 244.48, 244.48],
            248,
            None,
        ),
        mode(
            ModeId::Pd290,
            "PD290",
            800,
            616,
            Family::Pd,
            ColourEncoding::YThenRyBy,
            standard(0x5E),
            PreambleStyle::Standard800,
            2,
            20.0,
            &[2.08],
            &[228.8, 228.8, 228.8, 228.8],
            308,
            None,
        ),
        // --- Pasokon family --------------------------------------------------
        mode(
            ModeId::PasokonP3,
            "Pasokon P3",
            640,
            480,
            Family::Pasokon,
            ColourEncoding::RgbSequential,
            standard(0x71),
            PreambleStyle::Standard800,
            1,
            5.208,
            &[1.042, 1.042, 1.042, 1.042],
            &[88.0, 88.0, 88.0],
            480,
            None,
        ),
        mode(
            ModeId::PasokonP5,
            "Pasokon P5",
            640,
            480,
            Family::Pasokon,
            ColourEncoding::RgbSequential,
            standard(0x72),
            PreambleStyle::Standard800,
            1,
            5.208,
            &[1.042, 1.042, 1.042, 1.042],
            &[133.333, 133.333, 133.333],
            480,
            None,
        ),
        mode(
            ModeId::PasokonP7,
            "Pasokon P7",
            640,
            480,
            Family::Pasokon,
            ColourEncoding::RgbSequential,
            standard(0x73),
            PreambleStyle::Standard800,
            1,
            5.208,
            &[1.042, 1.042, 1.042, 1.042],
            &[200.0, 200.0, 200.0],
            480,
            None,
        ),
        // --- Robot BW family -------------------------------------------------
        mode(
            ModeId::Bw8,
            "Robot BW8",
            160,
            120,
            Family::RobotBw,
            ColourEncoding::LuminanceOnly,
            standard(0x02),
            PreambleStyle::Standard800,
            1,
            9.0,
            &[3.0],
            &[54.7],
            120,
            None,
        ),
        mode(
            ModeId::Bw12,
            "Robot BW12",
            160,
            120,
            Family::RobotBw,
            // BW12's normative VIS byte in spec §6 is 0x86 (parity bit set
            // despite an even data population count); every other standard
            // code follows the opposite convention, so the stored data7
            // here (0x06) is the internally-consistent value rather than a
            // literal transcription — see DESIGN.md.
            ColourEncoding::LuminanceOnly,
            standard(0x06),
            PreambleStyle::Standard800,
            1,
            9.0,
            &[3.0],
            &[88.0],
            120,
            None,
        ),
        // --- Martin R (extended, wide) -----------------------------------
        mode(
            ModeId::Mr90,
            "Martin R90",
            320,
            256,
            Family::MartinR,
            ColourEncoding::YThenRyBy,
            extended(0x01),
            PreambleStyle::Standard800,
            1,
            9.0,
            &[1.0],
            &[113.854167, 227.708333, 227.708333],
            256,
            None,
        ),
        mode(
            ModeId::Mr115,
            "Martin R115",
            320,
            256,
            Family::MartinR,
            ColourEncoding::YThenRyBy,
            extended(0x02),
            PreambleStyle::Standard800,
            1,
            9.0,
            &[1.0],
            &[146.406250, 292.812500, 292.812500],
            256,
            None,
        ),
        mode(
            ModeId::Mr140,
            "Martin R140",
            320,
            256,
            Family::MartinR,
            ColourEncoding::YThenRyBy,
            extended(0x03),
            PreambleStyle::Standard800,
            1,
            9.0,
            &[1.0],
            &[178.958333, 357.916667, 357.916667],
            256,
            None,
        ),
        mode(
            ModeId::Mr175,
            "Martin R175",
            320,
            256,
            Family::MartinR,
            ColourEncoding::YThenRyBy,
            extended(0x04),
            PreambleStyle::Standard800,
            1,
            9.0,
            &[1.0],
            &[224.531250, 449.062500, 449.062500],
            256,
            None,
        ),
        // --- Martin P (extended, dual-line) ------------------------------
        mode(
            ModeId::Mp73,
            "Martin P73",
            320,
            256,
            Family::MartinP,
            ColourEncoding::YThenRyBy,
            extended(0x05),
            PreambleStyle::Standard800,
            2,
            9.0,
            &[1.0, 1.0, 1.0, 1.0],
            &[139.328125, 139.328125, 139.328125, 139.328125],
            128,
            None,
        ),
        mode(
            ModeId::Mp115,
            "Martin P115",
            320,
            256,
            Family::MartinP,
            ColourEncoding::YThenRyBy,
            extended(0x06),
            PreambleStyle::Standard800,
            2,
            9.0,
            &[1.0, 1.0, 1.0, 1.0],
            &[221.359375, 221.359375, 221.359375, 221.359375],
            128,
            None,
        ),
        mode(
            ModeId::Mp140,
            "Martin P140",
            320,
            256,
            Family::MartinP,
            ColourEncoding::YThenRyBy,
            extended(0x07),
            PreambleStyle::Standard800,
            2,
            9.0,
            &[1.0, 1.0, 1.0, 1.0],
            &[270.1875, 270.1875, 270.1875, 270.1875],
            128,
            None,
        ),
        mode(
            ModeId::Mp175,
            "Martin P175",
            320,
            256,
            Family::MartinP,
            ColourEncoding::YThenRyBy,
            extended(0x08),
            PreambleStyle::Standard800,
            2,
            9.0,
            &[1.0, 1.0, 1.0, 1.0],
            &[338.546875, 338.546875, 338.546875, 338.546875],
            128,
            None,
        ),
        // --- Martin L (extended, wide, narrower timing) --------------------
        mode(
            ModeId::Ml180,
            "Martin L180",
            320,
            256,
            Family::MartinL,
            ColourEncoding::YThenRyBy,
            extended(0x09),
            PreambleStyle::Standard800,
            1,
            9.0,
            &[1.0],
            &[231.041667, 231.041667, 231.041667],
            256,
            None,
        ),
        mode(
            ModeId::Ml240,
            "Martin L240",
            320,
            256,
            Family::MartinL,
            ColourEncoding::YThenRyBy,
            extended(0x0A),
            PreambleStyle::Standard800,
            1,
            9.0,
            &[1.0],
            &[309.166667, 309.166667, 309.166667],
            256,
            None,
        ),
        mode(
            ModeId::Ml280,
            "Martin L280",
            320,
            256,
            Family::MartinL,
            ColourEncoding::YThenRyBy,
            extended(0x0B),
            PreambleStyle::Standard800,
            1,
            9.0,
            &[1.0],
            &[361.25, 361.25, 361.25],
            256,
            None,
        ),
        mode(
            ModeId::Ml320,
            "Martin L320",
            320,
            256,
            Family::MartinL,
            ColourEncoding::YThenRyBy,
            extended(0x0C),
            PreambleStyle::Standard800,
            1,
            9.0,
            &[1.0],
            &[413.333333, 413.333333, 413.333333],
            256,
            None,
        ),
        // --- Martin Narrow (mono, not transmitted over VIS) ----------------
        mode(
            ModeId::Mn73,
            "Martin N73",
            320,
            256,
            Family::MartinNarrow,
            ColourEncoding::LuminanceOnly,
            VisDescriptor::None,
            PreambleStyle::Narrow400,
            1,
            9.0,
            &[1.0],
            &[275.15625],
            256,
            None,
        ),
        mode(
            ModeId::Mn110,
            "Martin N110",
            320,
            256,
            Family::MartinNarrow,
            ColourEncoding::LuminanceOnly,
            VisDescriptor::None,
            PreambleStyle::Narrow400,
            1,
            9.0,
            &[1.0],
            &[419.6875],
            256,
            None,
        ),
        mode(
            ModeId::Mn140,
            "Martin N140",
            320,
            256,
            Family::MartinNarrow,
            ColourEncoding::LuminanceOnly,
            VisDescriptor::None,
            PreambleStyle::Narrow400,
            1,
            9.0,
            &[1.0],
            &[536.875],
            256,
            None,
        ),
        // --- Martin Colour Narrow (dual-line, not transmitted over VIS) ----
        mode(
            ModeId::Mc110,
            "Martin C110",
            320,
            256,
            Family::MartinColourNarrow,
            ColourEncoding::YThenRyBy,
            VisDescriptor::None,
            PreambleStyle::Narrow400,
            2,
            9.0,
            &[1.0, 1.0, 1.0, 1.0],
            &[211.59375, 211.59375, 211.59375, 211.59375],
            128,
            None,
        ),
        mode(
            ModeId::Mc140,
            "Martin C140",
            320,
            256,
            Family::MartinColourNarrow,
            ColourEncoding::YThenRyBy,
            VisDescriptor::None,
            PreambleStyle::Narrow400,
            2,
            9.0,
            &[1.0, 1.0, 1.0, 1.0],
            &[270.1875, 270.1875, 270.1875, 270.1875],
            128,
            None,
        ),
    ]
}
