//! Length counter shared by all four channels.
//!
//! The DMG's length counter is a down-counter seeded from `max - data`
//! rather than an up-counter, and its max differs by channel (64 for
//! pulse/noise, 256 for wave) — generalized here via the `max` given
//! at construction instead of hard-coding the NES's fixed lookup table.

#[derive(Debug, Clone)]
pub struct LengthCounter {
    max: u16,
    counter: u16,
    enabled: bool,
}

impl LengthCounter {
    pub fn new(max: u16) -> Self {
        Self {
            max,
            counter: 0,
            enabled: false,
        }
    }

    /// Decode the length-data bits of NRx1 (or NR31 for the wave
    /// channel, which uses the full byte).
    pub fn load(&mut self, data: u16) {
        self.counter = self.max - (data % (self.max + 1));
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Trigger-time reload: if the counter is already at zero it wraps
    /// to the full max, per the documented quirk.
    pub fn trigger(&mut self) {
        if self.counter == 0 {
            self.counter = self.max;
        }
    }

    /// Clock at the frame sequencer's 256 Hz taps. Returns `true` the
    /// instant the counter reaches zero (the caller should disable the
    /// owning channel).
    pub fn clock(&mut self) -> bool {
        if !self.enabled || self.counter == 0 {
            return false;
        }
        self.counter -= 1;
        self.counter == 0
    }

    pub fn counter(&self) -> u16 {
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_subtracts_from_max() {
        let mut lc = LengthCounter::new(64);
        lc.load(10);
        assert_eq!(lc.counter(), 54);
    }

    #[test]
    fn wave_channel_uses_256_max() {
        let mut lc = LengthCounter::new(256);
        lc.load(0);
        assert_eq!(lc.counter(), 256);
    }

    #[test]
    fn clock_disables_channel_on_reaching_zero() {
        let mut lc = LengthCounter::new(64);
        lc.set_enabled(true);
        lc.load(63); // counter = 1
        assert!(lc.clock());
        assert_eq!(lc.counter(), 0);
    }

    #[test]
    fn disabled_counter_does_not_tick() {
        let mut lc = LengthCounter::new(64);
        lc.load(10);
        assert!(!lc.clock());
        assert_eq!(lc.counter(), 54);
    }

    #[test]
    fn trigger_reloads_max_when_counter_already_zero() {
        let mut lc = LengthCounter::new(64);
        lc.load(64); // counter = 0
        lc.trigger();
        assert_eq!(lc.counter(), 64);
    }
}
