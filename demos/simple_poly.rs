//! Drive the engine through the lock-free message queue, the same way an
//! audio callback would.
//!
//! Run with: cargo run --example simple_poly

use rtrb::RingBuffer;
use tablesynth::{AudioBuffer, SynthConfig, SynthEngine, SynthMessage, Waveform};

fn main() -> tablesynth::Result<()> {
    println!("=== Simple Polyphony Example ===\n");

    let sample_rate = 48_000.0;
    let block_size = 256;

    let mut engine = SynthEngine::new(SynthConfig::default())?;
    engine.prepare(sample_rate, block_size)?;

    let params = engine.params();
    params.set_waveform(Waveform::Sawtooth);
    params.set_cutoff(0.6);
    params.set_resonance(0.3);

    let (mut tx, mut rx) = RingBuffer::<SynthMessage>::new(64);
    let mut block = AudioBuffer::new(2, block_size);

    println!("Playing C minor chord:");
    for note in [60, 63, 67] {
        println!("  Note On: {note}");
        let _ = tx.push(SynthMessage::NoteOn {
            note,
            velocity: 0.9,
        });
    }

    for i in 0..8 {
        engine.render_live(&mut rx, &mut block, sample_rate);
        println!(
            "  block {i}: peak {:.4}, {} voices",
            block.peak(),
            engine.active_voices()
        );
    }

    println!("\nReleasing:");
    for note in [60, 63, 67] {
        let _ = tx.push(SynthMessage::NoteOff { note });
    }

    for i in 0..4 {
        engine.render_live(&mut rx, &mut block, sample_rate);
        println!(
            "  block {i}: peak {:.4}, {} voices",
            block.peak(),
            engine.active_voices()
        );
    }

    Ok(())
}
