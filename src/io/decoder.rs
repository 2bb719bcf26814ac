//! Audio decoding using Symphonia
//!
//! Reads the first audio track of a file, averages all channels to mono and
//! normalizes the samples according to the source format (see
//! [`SourceFormat`]).

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::PipelineError;
use crate::io::sample_buffer::SampleBuffer;
use crate::preprocessing::channel_mixer::mix_to_mono;
use crate::preprocessing::normalization::{normalize_s16, normalize_u8, SourceFormat};

/// Result of decoding one file
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Mono, normalized samples at the file's sample rate
    pub buffer: SampleBuffer,
    /// Sample format declared by the container
    pub format: SourceFormat,
    /// Channel count before mono reduction
    pub channels: usize,
}

/// Bit width and signedness of a decoded buffer, mapped to a source format
fn declared_format(decoded: &AudioBufferRef<'_>) -> Result<SourceFormat, PipelineError> {
    let (bits, signed) = match decoded {
        AudioBufferRef::U8(_) => (8, false),
        AudioBufferRef::U16(_) => (16, false),
        AudioBufferRef::U24(_) => (24, false),
        AudioBufferRef::U32(_) => (32, false),
        AudioBufferRef::S8(_) => (8, true),
        AudioBufferRef::S16(_) => (16, true),
        AudioBufferRef::S24(_) => (24, true),
        AudioBufferRef::S32(_) => (32, true),
        AudioBufferRef::F32(_) | AudioBufferRef::F64(_) => {
            return Err(PipelineError::DecodeError(
                "Floating-point source samples are not supported".to_string(),
            ))
        }
    };
    SourceFormat::from_container(bits, signed)
}

/// Normalized channel planes of one decoded packet
fn normalized_planes(decoded: &AudioBufferRef<'_>) -> Vec<Vec<f32>> {
    let channels = decoded.spec().channels.count();
    match decoded {
        AudioBufferRef::U8(buf) => (0..channels).map(|ch| normalize_u8(buf.chan(ch))).collect(),
        AudioBufferRef::S16(buf) => (0..channels).map(|ch| normalize_s16(buf.chan(ch))).collect(),
        // Rejected by declared_format before we get here
        _ => Vec::new(),
    }
}

/// Decode audio file to a mono, normalized sample buffer
///
/// # Arguments
///
/// * `path` - Path to audio file (unsigned 8-bit or signed 16-bit PCM)
///
/// # Returns
///
/// Decoded buffer together with the detected source format and channel count
///
/// # Errors
///
/// Returns `PipelineError::DecodeError` if the file cannot be opened or
/// probed, has no audio track, declares no sample rate, or uses a sample
/// format other than U8/S16.
pub fn decode_audio<P: AsRef<Path>>(path: P) -> Result<DecodedAudio, PipelineError> {
    let path = path.as_ref();
    log::debug!("Decoding audio file: {}", path.display());

    let src = File::open(path).map_err(|e| {
        PipelineError::DecodeError(format!("Cannot open {}: {}", path.display(), e))
    })?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts: FormatOptions = Default::default();

    let probed = symphonia::default::get_probe().format(&hint, mss, &fmt_opts, &meta_opts)?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| PipelineError::DecodeError("No supported audio tracks found".to_string()))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .filter(|&sr| sr > 0)
        .ok_or_else(|| PipelineError::DecodeError("Track has no sample rate".to_string()))?;
    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut source_format: Option<SourceFormat> = None;
    let mut channels = 0usize;
    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(msg)) => {
                log::warn!("Skipping corrupted packet in {}: {}", path.display(), msg);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let packet_format = declared_format(&decoded)?;
        match source_format {
            None => source_format = Some(packet_format),
            Some(known) if known != packet_format => {
                return Err(PipelineError::DecodeError(format!(
                    "Sample format changed mid-stream: {:?} -> {:?}",
                    known, packet_format
                )))
            }
            Some(_) => {}
        }

        let planes = normalized_planes(&decoded);
        channels = planes.len();
        samples.extend(mix_to_mono(&planes)?);
    }

    let format = source_format.ok_or_else(|| {
        PipelineError::DecodeError(format!("No audio decoded from {}", path.display()))
    })?;

    log::debug!(
        "Decoded {} frames ({:?}, {} channels) at {} Hz",
        samples.len(),
        format,
        channels,
        sample_rate
    );

    Ok(DecodedAudio {
        buffer: SampleBuffer::new(samples, sample_rate),
        format,
        channels,
    })
}
