//! Reusable DMG-flavored APU synthesis building blocks.
//!
//! These mirror the NES-oriented primitives this workspace's other
//! example systems build their APUs from (a length counter, an
//! envelope, a sweep unit, waveform generators) but with DMG's actual
//! register semantics: a down-counting length counter seeded from
//! `max - data`, a triggered (not free-running) envelope, and a sweep
//! unit that only channel 1 has. Concrete register wiring ($FF10-$FF26,
//! wave RAM, the frame sequencer driven by the Timer) lives in the
//! `swiftboy` crate's `apu` module, which composes these parts.

pub mod envelope;
pub mod length_counter;
pub mod noise;
pub mod pulse;
pub mod sweep;
pub mod wave;

pub use envelope::{Direction as EnvelopeDirection, Envelope};
pub use length_counter::LengthCounter;
pub use noise::NoiseChannel;
pub use pulse::PulseChannel;
pub use sweep::{Sweep, SweepDirection};
pub use wave::{VolumeShift, WaveChannel};
