//! SSTV core library
//!
//! Bidirectional conversion between raster images and the analog audio
//! waveforms of Slow-Scan Television. The crate is split into the same
//! leaf-first components the specification names: DSP primitives at the
//! bottom, the mode catalogue and NCO above those, then the transmit
//! segment scheduler and receive front end/VIS decoder built on top.
//!
//! This crate does not read or write WAV files, decode image codecs, or
//! drive an audio device — those are left to callers, per the scope
//! note in the module docs on [`encoder`] and [`decoder`].

pub mod catalogue;
pub mod decoder;
pub mod dsp;
pub mod encoder;
pub mod errors;
pub mod image;
pub mod logging;
pub mod nco;
pub mod preamble;
pub mod vis;

pub use catalogue::{all_modes as get_all_modes, find_mode_by_name, get_mode_info, ModeDescriptor, ModeId};
pub use decoder::{DecodedImage, DecoderState, SstvDecoder};
pub use encoder::SstvEncoder;
pub use errors::{ConfigError, DspError, SstvError};
pub use image::{Image, ImageFormat};
