//! VIS decode automaton (C7, §4.7): a finite-state machine driven one
//! sample at a time, detecting the leader/break/leader preamble and then
//! timing-sampling the following data bits.
//!
//! Parity is reconstructed and exposed on [`VisOutcome`] but never vetoes
//! a lookup — a corrupted parity bit is logged, not treated as a decode
//! failure (§4.7).

use crate::catalogue::EXTENDED_VIS_PREFIX;
use crate::dsp::Resonator;

const LEADER_HZ: f64 = 1900.0;
const BREAK_HZ: f64 = 1200.0;
const BIT_MS: f64 = 30.0;
const LEADER_MS: f64 = 300.0;
const BIT_RESONATOR_BW_HZ: f64 = 80.0;
const SYNC_RESONATOR_BW_HZ: f64 = 100.0;

/// Detection sensitivity: higher levels require a larger energy ratio
/// between tones before a transition is accepted, trading robustness to
/// noise for a higher chance of missing a weak signal (§4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Sensitivity {
    Low,
    MediumLow,
    MediumHigh,
    High,
}

impl Sensitivity {
    fn ratio(self) -> f64 {
        match self {
            Sensitivity::Low => 1.2,
            Sensitivity::MediumLow => 1.5,
            Sensitivity::MediumHigh => 2.0,
            Sensitivity::High => 3.0,
        }
    }

    /// Map the `{0,1,2,3}` level table onto a [`Sensitivity`] value.
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Sensitivity::Low,
            1 => Sensitivity::MediumLow,
            2 => Sensitivity::MediumHigh,
            _ => Sensitivity::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Idle,
    SeenLeader1,
    SeenBreak,
    AwaitStartBit { countdown: u64 },
    ReadBit { byte_idx: u8, bit_idx: u8, countdown: u64, high_votes: u32, total_votes: u32 },
    ReadParity { byte_idx: u8, countdown: u64, high_votes: u32, total_votes: u32 },
    ReadStopBit { countdown: u64 },
    Done,
}

/// Result of a completed VIS decode: the raw byte(s) as received, plus
/// the parity bit(s) actually observed (for logging — never vetoes the
/// lookup).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisOutcome {
    pub byte1: u8,
    pub byte2: Option<u8>,
    pub parity1_ok: bool,
    pub parity2_ok: bool,
}

/// Sample-driven VIS decoder. Feed it conditioned front-end samples
/// (§4.6); it surfaces a [`VisOutcome`] exactly once, the instant the
/// stop bit window ends.
pub struct VisDecoder {
    leader: Resonator,
    break_tank: Resonator,
    bit0: Resonator,
    bit1: Resonator,
    leader_env: f64,
    break_env: f64,
    bit0_env: f64,
    bit1_env: f64,
    samples_per_ms: f64,
    stage: Stage,
    sensitivity: Sensitivity,
    byte1: u8,
    byte2: u8,
    parity1_ok_cache: bool,
    parity2_ok_cache: bool,
}

impl VisDecoder {
    pub fn new(sample_rate: f64, sensitivity: Sensitivity) -> Self {
        Self {
            leader: Resonator::new(LEADER_HZ, sample_rate, SYNC_RESONATOR_BW_HZ),
            break_tank: Resonator::new(BREAK_HZ, sample_rate, SYNC_RESONATOR_BW_HZ),
            bit0: Resonator::new(1100.0, sample_rate, BIT_RESONATOR_BW_HZ),
            bit1: Resonator::new(1300.0, sample_rate, BIT_RESONATOR_BW_HZ),
            leader_env: 0.0,
            break_env: 0.0,
            bit0_env: 0.0,
            bit1_env: 0.0,
            samples_per_ms: sample_rate / 1000.0,
            stage: Stage::Idle,
            sensitivity,
            byte1: 0,
            byte2: 0,
            parity1_ok_cache: false,
            parity2_ok_cache: false,
        }
    }

    pub fn set_sensitivity(&mut self, sensitivity: Sensitivity) {
        self.sensitivity = sensitivity;
    }

    pub fn reset(&mut self) {
        self.leader.reset();
        self.break_tank.reset();
        self.bit0.reset();
        self.bit1.reset();
        self.leader_env = 0.0;
        self.break_env = 0.0;
        self.bit0_env = 0.0;
        self.bit1_env = 0.0;
        self.stage = Stage::Idle;
        self.byte1 = 0;
        self.byte2 = 0;
        self.parity1_ok_cache = false;
        self.parity2_ok_cache = false;
    }

    fn track(env: f64, y: f64) -> f64 {
        0.95 * env + 0.05 * y.abs()
    }

    fn bit_duration_samples(&self) -> u64 {
        (BIT_MS * self.samples_per_ms).round() as u64
    }

    /// Feed one conditioned sample; returns `Some` exactly once, when the
    /// stop bit completes.
    pub fn feed(&mut self, x: f64) -> Option<VisOutcome> {
        self.leader_env = Self::track(self.leader_env, self.leader.process(x));
        self.break_env = Self::track(self.break_env, self.break_tank.process(x));
        self.bit0_env = Self::track(self.bit0_env, self.bit0.process(x));
        self.bit1_env = Self::track(self.bit1_env, self.bit1.process(x));

        let ratio = self.sensitivity.ratio();

        match self.stage {
            Stage::Idle => {
                if self.leader_env > self.break_env * ratio && self.leader_env > 1e-4 {
                    self.stage = Stage::SeenLeader1;
                }
                None
            }
            Stage::SeenLeader1 => {
                if self.break_env > self.leader_env * ratio {
                    self.stage = Stage::SeenBreak;
                }
                None
            }
            Stage::SeenBreak => {
                if self.leader_env > self.break_env * ratio {
                    let half_leader = (LEADER_MS / 2.0 * self.samples_per_ms).round() as u64;
                    self.stage = Stage::AwaitStartBit { countdown: half_leader };
                }
                None
            }
            Stage::AwaitStartBit { countdown } => {
                if countdown == 0 {
                    self.stage = Stage::ReadBit {
                        byte_idx: 1,
                        bit_idx: 0,
                        countdown: self.bit_duration_samples(),
                        high_votes: 0,
                        total_votes: 0,
                    };
                } else {
                    self.stage = Stage::AwaitStartBit { countdown: countdown - 1 };
                }
                None
            }
            Stage::ReadBit { byte_idx, bit_idx, countdown, high_votes, total_votes } => {
                let high_votes = if self.bit1_env > self.bit0_env { high_votes + 1 } else { high_votes };
                let total_votes = total_votes + 1;
                if countdown == 0 {
                    let bit = if high_votes * 2 >= total_votes { 1u8 } else { 0u8 };
                    let target = if byte_idx == 1 { &mut self.byte1 } else { &mut self.byte2 };
                    *target |= bit << bit_idx;

                    if bit_idx == 7 {
                        if byte_idx == 1 && self.byte1 == EXTENDED_VIS_PREFIX {
                            self.stage = Stage::ReadParity {
                                byte_idx: 1,
                                countdown: self.bit_duration_samples(),
                                high_votes: 0,
                                total_votes: 0,
                            };
                        } else if byte_idx == 1 {
                            let data7 = self.byte1 & 0x7F;
                            self.parity1_ok_cache =
                                crate::catalogue::VisDescriptor::standard_byte(data7) == self.byte1;
                            self.stage = Stage::ReadStopBit { countdown: self.bit_duration_samples() };
                        } else {
                            self.stage = Stage::ReadParity {
                                byte_idx: 2,
                                countdown: self.bit_duration_samples(),
                                high_votes: 0,
                                total_votes: 0,
                            };
                        }
                    } else {
                        self.stage = Stage::ReadBit {
                            byte_idx,
                            bit_idx: bit_idx + 1,
                            countdown: self.bit_duration_samples(),
                            high_votes: 0,
                            total_votes: 0,
                        };
                    }
                } else {
                    self.stage = Stage::ReadBit {
                        byte_idx,
                        bit_idx,
                        countdown: countdown - 1,
                        high_votes,
                        total_votes,
                    };
                }
                None
            }
            Stage::ReadParity { byte_idx, countdown, high_votes, total_votes } => {
                let high_votes = if self.bit1_env > self.bit0_env { high_votes + 1 } else { high_votes };
                let total_votes = total_votes + 1;
                if countdown == 0 {
                    let parity_bit = if high_votes * 2 >= total_votes { 1u8 } else { 0u8 };
                    let observed_byte = if byte_idx == 1 { self.byte1 } else { self.byte2 };
                    let expected = crate::catalogue::odd_parity_bit(observed_byte);
                    let ok = parity_bit == expected;

                    if byte_idx == 1 {
                        self.parity1_ok_cache = ok;
                        self.stage = Stage::ReadBit {
                            byte_idx: 2,
                            bit_idx: 0,
                            countdown: self.bit_duration_samples(),
                            high_votes: 0,
                            total_votes: 0,
                        };
                    } else {
                        self.parity2_ok_cache = ok;
                        self.stage = Stage::ReadStopBit { countdown: self.bit_duration_samples() };
                    }
                } else {
                    self.stage = Stage::ReadParity { byte_idx, countdown: countdown - 1, high_votes, total_votes };
                }
                None
            }
            Stage::ReadStopBit { countdown } => {
                if countdown == 0 {
                    self.stage = Stage::Done;
                    let is_extended = self.byte1 == EXTENDED_VIS_PREFIX;
                    let outcome = VisOutcome {
                        byte1: self.byte1,
                        byte2: if is_extended { Some(self.byte2) } else { None },
                        parity1_ok: self.parity1_ok_cache,
                        parity2_ok: if is_extended { self.parity2_ok_cache } else { true },
                    };
                    Some(outcome)
                } else {
                    self.stage = Stage::ReadStopBit { countdown: countdown - 1 };
                    None
                }
            }
            Stage::Done => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.stage, Stage::Done)
    }

    /// True from the start bit onward (§4.7, S6: `sync_detected` must rise
    /// during the start bit, not only once the whole word is in).
    pub fn acquiring(&self) -> bool {
        !matches!(self.stage, Stage::Idle | Stage::SeenLeader1 | Stage::SeenBreak)
    }
}
