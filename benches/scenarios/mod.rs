//! Scenario benchmarks.
//!
//! These model what the audio callback actually does: a pool of voices
//! summed into a block, then the whole engine with its effect chain.

mod engine;
mod voices;

pub use engine::bench_engine;
pub use voices::bench_voices;
