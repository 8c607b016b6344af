//! Audio assembly: WAV parsing, silence, and the final container.

pub mod wav;

pub use wav::{AudioFormat, WavError, encode_wav, make_silence, parse_wav};
