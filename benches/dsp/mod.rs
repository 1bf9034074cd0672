//! Benchmarks for low-level DSP primitives.

mod amplify;
mod delay;
mod filter;
mod oscillator;
mod wavetable;

pub use amplify::bench_amplify;
pub use delay::bench_delay;
pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
pub use wavetable::bench_wavetable;
