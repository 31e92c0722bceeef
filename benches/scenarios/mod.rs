//! Real-world scenario benchmarks.
//!
//! These model what the audio callback actually does: single voices with
//! their full chain and the polyphonic renderer with every slot busy.

mod voices;

pub use voices::bench_voices;
