use std::path::Path;

/// Write mono f32 samples to a 32-bit float WAV file.
pub fn write_wav(path: impl AsRef<Path>, samples: &[f32], sample_rate: u32) -> hound::Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_hound() {
        let path = std::env::temp_dir().join(format!("strumkit-wav-{}.wav", std::process::id()));
        let samples = [0.0f32, 0.25, -0.5, 1.0];
        write_wav(&path, &samples, 8_000).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 8_000);
        let read: Vec<f32> = reader.samples::<f32>().filter_map(Result::ok).collect();
        assert_eq!(read, samples);

        let _ = std::fs::remove_file(&path);
    }
}
