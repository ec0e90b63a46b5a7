//! End-to-end tests for the note scheduling state machine: cancellation
//! ordering, cross-thread hand-off, and a full phrase rendered through
//! the reverb send.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tailverb::dsp::ReverbSettings;
use tailverb::synth::{
    NoteExpression, NoteState, ScheduledMixer, ScheduledNote, SignalSource,
};
use tailverb::voices::{ReverbSend, ToneVoice};

const SAMPLE_RATE: f32 = 44_100.0;

/// Voice that records how many times it was asked to render.
struct CountingVoice {
    renders: Arc<AtomicUsize>,
    remaining: usize,
}

impl CountingVoice {
    fn new(total_samples: usize) -> (Self, Arc<AtomicUsize>) {
        let renders = Arc::new(AtomicUsize::new(0));
        (
            Self {
                renders: Arc::clone(&renders),
                remaining: total_samples,
            },
            renders,
        )
    }
}

impl SignalSource for CountingVoice {
    fn render(&mut self, out: &mut [f32], offset: usize, count: usize) -> usize {
        if self.remaining == 0 {
            return 0;
        }
        self.renders.fetch_add(1, Ordering::SeqCst);
        let frames = count.min(self.remaining);
        out[offset..offset + frames].fill(0.1);
        self.remaining -= frames;
        frames
    }

    fn is_done(&self) -> bool {
        self.remaining == 0
    }
}

#[test]
fn cancel_before_scheduled_skips_note() {
    let mut mixer = ScheduledMixer::new();
    let (voice, renders) = CountingVoice::new(1_000);
    let event = ScheduledNote::new(NoteExpression::new(60, 0, 1_000, 100), voice);
    let handle = event.handle();
    mixer.schedule(event);

    handle.cancel();

    let mut out = vec![0.0; 256];
    mixer.read(&mut out, 0, 256);

    assert_eq!(renders.load(Ordering::SeqCst), 0);
    assert_eq!(handle.state(), NoteState::Cancelled);
    assert!(out.iter().all(|&s| s == 0.0));
}

#[test]
fn cancel_active_voice_stops_rendering() {
    let mut mixer = ScheduledMixer::new();
    let (voice, renders) = CountingVoice::new(1_000_000);
    let handle = mixer.schedule(ScheduledNote::new(
        NoteExpression::new(60, 0, 1_000_000, 100),
        voice,
    ));

    let mut out = vec![0.0; 256];
    mixer.read(&mut out, 0, 256);
    assert_eq!(renders.load(Ordering::SeqCst), 1);
    assert_eq!(handle.state(), NoteState::Active);

    handle.cancel();
    mixer.read(&mut out, 0, 256);

    assert_eq!(
        renders.load(Ordering::SeqCst),
        1,
        "render count must not grow after cancellation"
    );
}

#[test]
fn double_cancel_and_cancel_after_done_are_noops() {
    let mut mixer = ScheduledMixer::new();
    let (voice, _) = CountingVoice::new(100);
    let handle = mixer.schedule(ScheduledNote::new(
        NoteExpression::new(60, 0, 100, 100),
        voice,
    ));

    let mut out = vec![0.0; 256];
    mixer.read(&mut out, 0, 256);
    assert_eq!(handle.state(), NoteState::Done);

    handle.cancel();
    handle.cancel();
    assert_eq!(handle.state(), NoteState::Done, "done notes stay done");
}

#[test]
fn notes_activate_at_their_scheduled_sample() {
    let mut mixer = ScheduledMixer::new();
    let start = 1_000u64;
    let (voice, renders) = CountingVoice::new(500);
    mixer.schedule(ScheduledNote::new(
        NoteExpression::new(60, start, 500, 100),
        voice,
    ));

    let mut out = vec![0.0; 256];

    // Three blocks before the start sample: nothing renders
    for _ in 0..3 {
        mixer.read(&mut out, 0, 256);
        assert_eq!(renders.load(Ordering::SeqCst), 0);
    }

    // Fourth block spans samples 768..1024; the note begins at 1000,
    // i.e. at intra-block offset 232
    mixer.read(&mut out, 0, 256);
    assert_eq!(renders.load(Ordering::SeqCst), 1);
    assert!(out[..232].iter().all(|&s| s == 0.0));
    assert!(out[232..].iter().all(|&s| (s - 0.1).abs() < 1e-6));
}

#[cfg(feature = "rtrb")]
#[test]
fn notes_scheduled_from_another_thread_are_picked_up() {
    let (mut tx, rx) = rtrb::RingBuffer::<ScheduledNote>::new(16);
    let mut mixer = ScheduledMixer::with_queue(rx);

    let producer = std::thread::spawn(move || {
        for i in 0..4u64 {
            let note = NoteExpression::new(60, i * 512, 256, 100);
            let voice = ToneVoice::new(&note, SAMPLE_RATE);
            tx.push(ScheduledNote::new(note, voice))
                .unwrap_or_else(|_| panic!("queue full"));
        }
    });
    producer.join().unwrap();

    let mut out = vec![0.0; 512];
    let mut energy = 0.0;
    for _ in 0..8 {
        mixer.read(&mut out, 0, 512);
        energy += out.iter().map(|s| s * s).sum::<f32>();
    }

    assert!(energy > 0.0, "queued notes must reach the mix");
    assert_eq!(mixer.cursor(), 4_096);
}

#[test]
fn phrase_through_reverb_send_renders_clean_audio() {
    let settings = ReverbSettings {
        wet: 0.4,
        dry: 0.6,
        velocity_affects_mix: true,
        enable_modulation: true,
        ..Default::default()
    };

    let mut mixer = ScheduledMixer::new();
    for (i, &pitch) in [60u8, 64, 67].iter().enumerate() {
        let note = NoteExpression::new(pitch, i as u64 * 4_410, 8_820, 100);
        let voice = ReverbSend::new(
            ToneVoice::new(&note, SAMPLE_RATE),
            settings,
            SAMPLE_RATE,
            note.velocity_norm(),
        );
        mixer.schedule(ScheduledNote::new(note, voice));
    }

    // Render two seconds; notes overlap, then every tail decays
    let mut out = vec![0.0; 512];
    let mut peak = 0.0f32;
    for _ in 0..(2.0 * SAMPLE_RATE / 512.0) as usize {
        mixer.read(&mut out, 0, 512);
        for &s in &out {
            assert!(s.is_finite(), "mix must stay finite");
            peak = peak.max(s.abs());
        }
    }

    assert!(peak > 0.01, "phrase should be audible, peak {}", peak);
    assert!(peak < 4.0, "mix should not blow up, peak {}", peak);
    assert_eq!(mixer.active_voices(), 0, "all sends should retire");
}
