//! WAV dump of recorded loopback input.
//!
//! Samples are written as 32-bit float mono, exactly as captured.

use crate::Result;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::{Seek, Write};
use std::path::Path;

fn mono_float_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    }
}

fn write_samples<W: Write + Seek>(writer: &mut WavWriter<W>, samples: &[f32]) -> Result<()> {
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    Ok(())
}

/// Write mono samples to a WAV file.
pub fn write_wav_mono(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let mut writer = WavWriter::create(path, mono_float_spec(sample_rate))?;
    write_samples(&mut writer, samples)?;
    writer.finalize()?;
    Ok(())
}

/// Encode mono samples to an in-memory WAV file.
pub fn encode_wav_mono(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let cursor = std::io::Cursor::new(&mut buffer);
        let mut writer = WavWriter::new(cursor, mono_float_spec(sample_rate))?;
        write_samples(&mut writer, samples)?;
        // Finalize writes the header sizes
        writer.finalize()?;
    }
    Ok(buffer)
}
