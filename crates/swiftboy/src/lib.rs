//! `SwiftBoy`: a cycle-conscious DMG (Game Boy) emulation core.
//!
//! Ties the LR35902 interpreter from `swiftboy-support` to this crate's
//! concrete bus, cartridge/MBC1, PPU scanline machine, APU register
//! file, timer, interrupt controller, DMA controller, and joypad, and
//! drives them through the round-robin instruction loop: execute one
//! instruction, advance Timer, then PPU (which gates DMA), then
//! Joypad, sampling interrupts at the next instruction boundary.

pub mod apu;
pub mod bus;
pub mod cartridge;
pub mod dma;
pub mod error;
pub mod interrupt;
pub mod joypad;
pub mod ppu;
pub mod timer;

use swiftboy_support::cpu_lr35902::CpuLr35902;
use swiftboy_support::types::Frame;
use swiftboy_support::MountPointInfo;

use bus::Bus;
use cartridge::Cartridge;
pub use error::SwiftBoyError;
pub use joypad::JoypadState;

pub struct SwiftBoy {
    cpu: CpuLr35902<Bus>,
}

impl SwiftBoy {
    pub fn new() -> Self {
        let mut cpu = CpuLr35902::new(Bus::new());
        cpu.reset();
        Self { cpu }
    }

    pub fn load_cartridge(&mut self, rom: Vec<u8>) -> Result<(), SwiftBoyError> {
        let cartridge = Cartridge::from_bytes(rom)?;
        self.cpu.memory.load_cartridge(cartridge);
        Ok(())
    }

    /// Restore the canonical post-boot-ROM state without unloading the
    /// cartridge.
    pub fn reset(&mut self) {
        self.cpu.memory.reset();
        self.cpu.reset();
    }

    /// Execute exactly one instruction (or service one pending
    /// interrupt), then advance Timer, PPU, DMA, and Joypad by the
    /// resulting tick count. Returns a completed frame if this step
    /// crossed into VBlank.
    pub fn step_instruction(&mut self) -> Result<Option<Frame>, SwiftBoyError> {
        let ticks = self.cpu.execute_one()?;
        let events = self.cpu.memory.tick(ticks);
        Ok(events.frame)
    }

    /// Run instructions until a completed frame is published.
    pub fn run_frame(&mut self) -> Result<Frame, SwiftBoyError> {
        loop {
            if let Some(frame) = self.step_instruction()? {
                return Ok(frame);
            }
        }
    }

    pub fn set_buttons(&mut self, state: JoypadState) {
        self.cpu.memory.set_joypad_state(state);
    }

    pub fn take_serial_output(&mut self) -> Vec<u8> {
        self.cpu.memory.take_serial_output()
    }

    pub fn cartridge_loaded(&self) -> bool {
        self.cpu.memory.cartridge().is_some()
    }
}

impl Default for SwiftBoy {
    fn default() -> Self {
        Self::new()
    }
}

impl swiftboy_support::Cpu for SwiftBoy {
    type Error = SwiftBoyError;

    fn reset(&mut self) {
        SwiftBoy::reset(self)
    }

    fn execute_one(&mut self) -> Result<u32, Self::Error> {
        Ok(self.cpu.execute_one()?)
    }
}

impl swiftboy_support::System for SwiftBoy {
    type Error = SwiftBoyError;

    fn reset(&mut self) {
        SwiftBoy::reset(self)
    }

    fn step_frame(&mut self) -> Result<Frame, Self::Error> {
        self.run_frame()
    }

    fn mount_points(&self) -> Vec<MountPointInfo> {
        vec![MountPointInfo {
            id: "Cartridge".to_string(),
            name: "Cartridge Slot".to_string(),
            extensions: vec!["gb".to_string(), "gbc".to_string()],
            required: true,
        }]
    }

    fn mount(&mut self, mount_point_id: &str, data: &[u8]) -> Result<(), Self::Error> {
        if mount_point_id != "Cartridge" {
            return Err(SwiftBoyError::NoCartridge);
        }
        self.load_cartridge(data.to_vec())
    }

    fn unmount(&mut self, mount_point_id: &str) -> Result<(), Self::Error> {
        if mount_point_id == "Cartridge" {
            self.cpu.memory = Bus::new();
        }
        Ok(())
    }

    fn is_mounted(&self, mount_point_id: &str) -> bool {
        mount_point_id == "Cartridge" && self.cartridge_loaded()
    }
}
