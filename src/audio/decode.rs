//! Audio decoding using symphonia.

use crate::error::{Error, Result};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// A decoded mono recording.
#[derive(Debug, Clone)]
pub struct DecodedRecording {
    /// Samples as mono f32 in range [-1.0, 1.0].
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Duration in seconds.
    pub duration_secs: f32,
}

/// Decode an audio file to mono f32 samples.
///
/// Supports WAV, FLAC, MP3, and AAC. Stereo and multichannel sources are
/// mixed down to mono, since every downstream signal is single-channel.
pub fn decode_recording(path: &Path) -> Result<DecodedRecording> {
    let file = File::open(path).map_err(|e| Error::AudioOpen {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::AudioOpen {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::NoAudioTracks {
            path: path.to_path_buf(),
        })?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| Error::AudioDecode {
            path: path.to_path_buf(),
            source: "missing sample rate".into(),
        })?;
    let channels = track
        .codec_params
        .channels
        .map_or(1, symphonia::core::audio::Channels::count);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| Error::AudioDecode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(Error::AudioDecode {
                    path: path.to_path_buf(),
                    source: Box::new(e),
                });
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder.decode(&packet).map_err(|e| Error::AudioDecode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        downmix_into(&decoded, channels, &mut samples);
    }

    #[allow(clippy::cast_precision_loss)]
    let duration_secs = samples.len() as f32 / sample_rate as f32;

    Ok(DecodedRecording {
        samples,
        sample_rate,
        duration_secs,
    })
}

/// Append decoded samples to the output buffer, mixing to mono.
fn downmix_into(buffer: &AudioBufferRef, channels: usize, output: &mut Vec<f32>) {
    match buffer {
        AudioBufferRef::F32(buf) => {
            if channels == 1 {
                output.extend(buf.chan(0));
            } else {
                let frames = buf.frames();
                for i in 0..frames {
                    let mut sum = 0.0f32;
                    for ch in 0..channels {
                        sum += buf.chan(ch)[i];
                    }
                    #[allow(clippy::cast_precision_loss)]
                    output.push(sum / channels as f32);
                }
            }
        }
        AudioBufferRef::S16(buf) => {
            const I16_NORM: f32 = 32768.0;
            if channels == 1 {
                output.extend(buf.chan(0).iter().map(|&s| f32::from(s) / I16_NORM));
            } else {
                let frames = buf.frames();
                for i in 0..frames {
                    let mut sum = 0.0f32;
                    for ch in 0..channels {
                        sum += f32::from(buf.chan(ch)[i]) / I16_NORM;
                    }
                    #[allow(clippy::cast_precision_loss)]
                    output.push(sum / channels as f32);
                }
            }
        }
        AudioBufferRef::S32(buf) => {
            const I32_NORM: f32 = 2_147_483_648.0;
            if channels == 1 {
                #[allow(clippy::cast_precision_loss)]
                output.extend(buf.chan(0).iter().map(|&s| s as f32 / I32_NORM));
            } else {
                let frames = buf.frames();
                for i in 0..frames {
                    let mut sum = 0.0f32;
                    for ch in 0..channels {
                        #[allow(clippy::cast_precision_loss)]
                        {
                            sum += buf.chan(ch)[i] as f32 / I32_NORM;
                        }
                    }
                    #[allow(clippy::cast_precision_loss)]
                    output.push(sum / channels as f32);
                }
            }
        }
        _ => {
            // Unsupported sample format, skip
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn write_test_wav(path: &Path, sample_rate: u32, secs: f32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
        let n = (secs * sample_rate as f32) as usize;
        for i in 0..n {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f32 / sample_rate as f32;
            #[allow(clippy::cast_possible_truncation)]
            let sample = ((t * 220.0 * std::f32::consts::TAU).sin() * 8000.0) as i16;
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_decode_wav_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_test_wav(&path, 16_000, 2.0);

        let decoded = decode_recording(&path).unwrap();
        assert_eq!(decoded.sample_rate, 16_000);
        assert!((decoded.duration_secs - 2.0).abs() < 0.1);
        assert!(decoded.samples.iter().any(|s| s.abs() > 0.1));
    }

    #[test]
    fn test_decode_missing_file_fails() {
        let result = decode_recording(Path::new("/nonexistent/input.wav"));
        assert!(result.is_err());
    }
}
