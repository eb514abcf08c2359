//! Example: Sweeping a filter cutoff from a control thread
//!
//! A sawtooth-ish sum of sines runs through a low-pass filter on the "audio"
//! thread (here just the main thread, rendering offline). A second thread
//! sweeps the cutoff by name through a `Controller`, and the RMS of each
//! 64-frame block is printed so the sweep is visible without a sound card.
//!
//! Run with: cargo run --example cutoff_sweep

use std::thread;
use std::time::Duration;

use resona::nodes::{LowPassFilter, Sine};
use resona::{create_block, create_sound, Generator, Param, ProcessContext, StereoSample};

// =============================================================================
// A bright test signal: the first few partials of a sawtooth
// =============================================================================

struct Partials {
    partials: Vec<Sine>,
}

impl Partials {
    fn new(ctx: &ProcessContext, fundamental: f32, count: usize) -> Self {
        let partials = (1..=count)
            .map(|k| Sine::new(ctx, fundamental * k as f32).with_amplitude(0.3 / k as f32))
            .collect();
        Self { partials }
    }
}

impl Generator for Partials {
    fn next_sample(&mut self) -> StereoSample {
        self.partials
            .iter_mut()
            .fold(StereoSample::SILENCE, |acc, p| acc + p.next_sample())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let ctx = ProcessContext::new(48_000);
    let mut sound = create_sound(create_block(
        Partials::new(&ctx, 110.0, 24),
        LowPassFilter::new(&ctx, 150.0, 0.05)?,
    ));
    let mut control = sound.controller(16).ok_or("sound has no modifier")?;

    println!("methods: {:?}", control.methods().signatures());

    let sweep = thread::spawn(move || {
        let mut cutoff = 150.0;
        while cutoff < 12_000.0 {
            if let Err(e) = control.invoke("SetCutoff", Param::Float(cutoff)) {
                eprintln!("sweep: {e}");
            }
            cutoff *= 1.5;
            thread::sleep(Duration::from_millis(5));
        }
    });

    while !sweep.is_finished() {
        let mut energy = 0.0f32;
        for _ in 0..64 {
            let s = sound.next_sample();
            energy += s.left * s.left;
        }

        let cutoff = match sound.modifier() {
            Some(resona::ModifierNode::LowPass(lpf)) => lpf.cutoff(),
            _ => 0.0,
        };
        let rms = (energy / 64.0).sqrt();
        println!("cutoff {cutoff:>8.1} Hz  rms {rms:.4}  {}", "#".repeat((rms * 200.0) as usize));

        thread::sleep(Duration::from_micros(1_333));
    }

    sweep.join().map_err(|_| "sweep thread panicked")?;
    Ok(())
}
