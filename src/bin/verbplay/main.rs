//! verbplay - schedule a short phrase and play it through the reverb.
//!
//! Run with: cargo run --bin verbplay
//!
//! Demonstrates the intended threading split: the cpal callback owns the
//! mixer and pulls blocks on the audio thread, while the main thread keeps
//! only cancellation handles and uses one to drop a note mid-phrase.

use std::time::Duration;

use color_eyre::eyre::eyre;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use tailverb::dsp::{MixCurve, ReverbSettings};
use tailverb::synth::{NoteExpression, ScheduledMixer, ScheduledNote};
use tailverb::voices::{NoiseVoice, ReverbSend, ToneVoice};
use tailverb::MAX_BLOCK_SIZE;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no audio output device available"))?;
    let config = device.default_output_config()?;
    if config.sample_format() != cpal::SampleFormat::F32 {
        return Err(eyre!(
            "unsupported sample format {:?} (expected f32)",
            config.sample_format()
        ));
    }
    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    let reverb = ReverbSettings {
        wet: 0.4,
        dry: 0.6,
        velocity_affects_mix: true,
        mix_velocity_curve: MixCurve::EaseOut,
        enable_modulation: true,
        ..Default::default()
    };

    let bpm = 96.0;
    let phrase: [(u8, f64, f64, u8); 4] = [
        (60, 0.0, 1.5, 110), // C4
        (64, 2.0, 1.5, 96),  // E4
        (67, 4.0, 1.5, 84),  // G4
        (72, 6.0, 2.5, 120), // C5, cancelled below before it plays
    ];

    let mut mixer = ScheduledMixer::new();
    let mut handles = Vec::new();
    for &(pitch, start, length, velocity) in &phrase {
        let note = NoteExpression::from_beats(pitch, start, length, velocity, bpm, sample_rate);
        let voice = ReverbSend::new(
            ToneVoice::new(&note, sample_rate),
            reverb,
            sample_rate,
            note.velocity_norm(),
        );
        handles.push(mixer.schedule(ScheduledNote::new(note, voice)));
    }

    // A noise hit on the off-beat, dry
    let hit = NoteExpression::from_beats(40, 1.0, 0.25, 90, bpm, sample_rate);
    mixer.schedule(ScheduledNote::new(hit, NoiseVoice::new(&hit, sample_rate)));

    let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];
    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            for chunk in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                let frames = chunk.len() / channels;
                mixer.read(&mut mono, 0, frames);
                for (frame, &sample) in chunk.chunks_mut(channels).zip(&mono) {
                    frame.fill(sample);
                }
            }
        },
        |err| eprintln!("stream error: {err}"),
        None,
    )?;
    stream.play()?;

    println!("playing at {} Hz, {} channel(s)...", sample_rate, channels);

    // The last note starts at beat 6 (~3.75s at 96 BPM); cancelling at 3s
    // exercises the pending -> cancelled path from outside the audio thread
    std::thread::sleep(Duration::from_secs(3));
    if let Some(last) = handles.last() {
        last.cancel();
        println!("cancelled the final note before it started");
    }
    std::thread::sleep(Duration::from_secs(4));

    Ok(())
}
