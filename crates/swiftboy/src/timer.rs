//! DIV/TIMA/TMA/TAC and the 512 Hz pulse that drives the APU frame
//! sequencer.

/// Signals the bus should forward to the APU and interrupt controller
/// after a `Timer::tick`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerEvents {
    pub timer_interrupt: bool,
    pub frame_sequencer_tick: bool,
}

#[derive(Debug)]
pub struct Timer {
    div_accumulator: u32,
    div: u8,
    tima: u8,
    tma: u8,
    tac: u8,
    tima_accumulator: u32,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            div_accumulator: 0,
            div: 0,
            tima: 0x00,
            tma: 0x00,
            tac: 0xF8,
            tima_accumulator: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn read_div(&self) -> u8 {
        self.div
    }

    /// A write of any value resets DIV and its accumulator.
    pub fn write_div(&mut self) {
        self.div = 0;
        self.div_accumulator = 0;
    }

    pub fn read_tima(&self) -> u8 {
        self.tima
    }
    pub fn write_tima(&mut self, val: u8) {
        self.tima = val;
    }

    pub fn read_tma(&self) -> u8 {
        self.tma
    }
    pub fn write_tma(&mut self, val: u8) {
        self.tma = val;
    }

    pub fn read_tac(&self) -> u8 {
        self.tac | 0xF8
    }

    /// Writes that change the two rate-select bits reset TIMA's
    /// accumulator and reload TIMA from TMA (conservative behavior per
    /// the spec's documented open question).
    pub fn write_tac(&mut self, val: u8) {
        let new_tac = val & 0x07;
        if new_tac & 0x03 != self.tac & 0x03 {
            self.tima_accumulator = 0;
            self.tima = self.tma;
        }
        self.tac = new_tac;
    }

    fn enabled(&self) -> bool {
        self.tac & 0x04 != 0
    }

    fn tima_period(&self) -> u32 {
        match self.tac & 0x03 {
            0b00 => 256,
            0b01 => 4,
            0b10 => 16,
            0b11 => 64,
            _ => unreachable!(),
        }
    }

    /// Advance by `ticks` M-cycles. DIV's exposed byte increments once
    /// every 64 M-cycles (this core's documented approximation of the
    /// 16-bit internal divider); the APU frame sequencer pulses
    /// whenever that causes DIV's bit 4 to fall from 1 to 0.
    pub fn tick(&mut self, ticks: u32) -> TimerEvents {
        let mut events = TimerEvents::default();

        self.div_accumulator += ticks;
        while self.div_accumulator >= 64 {
            self.div_accumulator -= 64;
            let before_bit4 = self.div & 0x10 != 0;
            self.div = self.div.wrapping_add(1);
            let after_bit4 = self.div & 0x10 != 0;
            if before_bit4 && !after_bit4 {
                events.frame_sequencer_tick = true;
            }
        }

        if self.enabled() {
            self.tima_accumulator += ticks;
            let period = self.tima_period();
            while self.tima_accumulator >= period {
                self.tima_accumulator -= period;
                let (result, overflow) = self.tima.overflowing_add(1);
                if overflow {
                    self.tima = self.tma;
                    events.timer_interrupt = true;
                } else {
                    self.tima = result;
                }
            }
        }

        events
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn div_increments_every_64_ticks() {
        let mut timer = Timer::new();
        timer.tick(63);
        assert_eq!(timer.read_div(), 0);
        timer.tick(1);
        assert_eq!(timer.read_div(), 1);
    }

    #[test]
    fn write_div_resets_to_zero() {
        let mut timer = Timer::new();
        timer.tick(640);
        assert_ne!(timer.read_div(), 0);
        timer.write_div();
        assert_eq!(timer.read_div(), 0);
    }

    #[test]
    fn tima_rate_01_increments_every_four_ticks() {
        let mut timer = Timer::new();
        timer.write_tac(0x05); // enable + rate 01
        timer.write_tima(0);
        let events = timer.tick(4);
        assert_eq!(timer.read_tima(), 1);
        assert!(!events.timer_interrupt);
    }

    #[test]
    fn tima_overflow_reloads_from_tma_and_raises_interrupt() {
        let mut timer = Timer::new();
        timer.write_tac(0x05);
        timer.write_tma(0x10);
        timer.write_tima(0xFF);
        let events = timer.tick(4);
        assert_eq!(timer.read_tima(), 0x10);
        assert!(events.timer_interrupt);
    }

    #[test]
    fn disabled_timer_never_increments_tima() {
        let mut timer = Timer::new();
        timer.write_tac(0x01); // rate bits set but enable bit clear
        timer.write_tima(0);
        timer.tick(1000);
        assert_eq!(timer.read_tima(), 0);
    }

    #[test]
    fn rate_change_resets_accumulator_and_reloads_tima() {
        let mut timer = Timer::new();
        timer.write_tac(0x06); // enable + rate 10 (16 ticks)
        timer.write_tma(0x55);
        timer.tick(10); // partial progress toward next increment
        timer.write_tac(0x07); // rate change to 11
        assert_eq!(timer.read_tima(), 0x55);
    }

    #[test]
    fn frame_sequencer_pulses_on_bit_four_falling_edge() {
        let mut timer = Timer::new();
        // DIV byte goes 0 -> 16 crosses bit 4 rising, not falling; drive
        // it past 31 -> 32 for a rising-then-falling cycle check instead:
        // simplest falling edge is 0x1F -> 0x20 is rising; 0x10 -> 0x11 no
        // change. Falling edge happens 0x1F->0x20? no. Use 16 ticks steps:
        // div goes 0..15 (bit4=0) then 16 (bit4=1) ... 31(bit4=1) then 32(bit4=0: falling).
        let mut saw_pulse = false;
        for _ in 0..40 {
            if timer.tick(64).frame_sequencer_tick {
                saw_pulse = true;
            }
        }
        assert!(saw_pulse);
    }
}
