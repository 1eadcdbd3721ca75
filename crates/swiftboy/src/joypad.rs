//! Joypad: active-low 4-bit select matrix plus press-edge interrupt
//! detection.

/// A polled snapshot of all 8 buttons, supplied by the frontend each
/// time it wants the joypad's view of input updated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoypadState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub a: bool,
    pub b: bool,
    pub select: bool,
    pub start: bool,
}

#[derive(Debug)]
pub struct Joypad {
    state: JoypadState,
    select_actions: bool,
    select_directions: bool,
    interrupt_pending: bool,
}

impl Joypad {
    pub fn new() -> Self {
        Self {
            state: JoypadState::default(),
            select_actions: false,
            select_directions: false,
            interrupt_pending: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Replace the polled button snapshot. A press edge (false -> true)
    /// on any button arms the joypad interrupt, checked on the next
    /// `tick`.
    pub fn set_state(&mut self, new_state: JoypadState) {
        let pressed_edge = (!self.state.up && new_state.up)
            || (!self.state.down && new_state.down)
            || (!self.state.left && new_state.left)
            || (!self.state.right && new_state.right)
            || (!self.state.a && new_state.a)
            || (!self.state.b && new_state.b)
            || (!self.state.select && new_state.select)
            || (!self.state.start && new_state.start);
        if pressed_edge {
            self.interrupt_pending = true;
        }
        self.state = new_state;
    }

    /// Writes to `$FF00` only affect bits 4-5 (the select lines); bits
    /// 0-3 are read-only from the CPU's perspective.
    pub fn write_select(&mut self, val: u8) {
        self.select_directions = val & 0x10 == 0;
        self.select_actions = val & 0x20 == 0;
    }

    pub fn read(&self) -> u8 {
        let mut lower = 0x0F;
        if self.select_directions {
            if self.state.right {
                lower &= !0x01;
            }
            if self.state.left {
                lower &= !0x02;
            }
            if self.state.up {
                lower &= !0x04;
            }
            if self.state.down {
                lower &= !0x08;
            }
        }
        if self.select_actions {
            if self.state.a {
                lower &= !0x01;
            }
            if self.state.b {
                lower &= !0x02;
            }
            if self.state.select {
                lower &= !0x04;
            }
            if self.state.start {
                lower &= !0x08;
            }
        }

        let select_bits = (!self.select_directions as u8) << 4 | (!self.select_actions as u8) << 5;
        0xC0 | select_bits | lower
    }

    /// Returns true exactly once when a press edge was observed since
    /// the last call, for the bus to forward into the interrupt
    /// controller.
    pub fn take_interrupt(&mut self) -> bool {
        std::mem::take(&mut self.interrupt_pending)
    }
}

impl Default for Joypad {
    fn default() -> Self {
        Self::new()
    }
}
