//! Audio decode, resample, and preview helpers.

mod decode;
mod preview;
mod resample;

pub use decode::{DecodedRecording, decode_recording};
pub use preview::waveform_preview;
pub use resample::resample;
