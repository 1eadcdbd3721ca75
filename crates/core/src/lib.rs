//! System-agnostic plumbing shared by Sharp-LR35902-class emulator cores.
//!
//! This crate holds the parts of a retro-console emulator that do not
//! know anything about a *specific* machine: a generic CPU interpreter
//! trait, the Sharp LR35902 instruction interpreter itself (generic over
//! a memory-bus trait), reusable DMG-shaped APU synthesis building
//! blocks, tile/palette decoding helpers, and a small logging facade.
//! The concrete Game Boy wiring (cartridge, bus, PPU scanline machine,
//! timer, interrupts, DMA, joypad) lives in the `swiftboy` crate.

pub mod apu;
pub mod cpu_lr35902;
pub mod logging;
pub mod ppu;

pub mod types {
    //! Shared value types passed across the core/frontend boundary.

    /// An indexed-color frame buffer.
    ///
    /// Pixel values are palette indices, not RGB — the DMG PPU only ever
    /// produces 2-bit shade indices; mapping those to a displayable color
    /// is a frontend concern (the consumer supplies the palette).
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Frame {
        pub width: u32,
        pub height: u32,
        pub pixels: Vec<u8>,
    }

    use serde::{Deserialize, Serialize};

    impl Frame {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                pixels: vec![0; (width * height) as usize],
            }
        }
    }
}

/// A CPU-like component that can be stepped one instruction at a time.
pub trait Cpu {
    type Error: std::error::Error + Send + Sync + 'static;

    fn reset(&mut self);

    /// Execute exactly one instruction and return the number of
    /// M-cycles it consumed.
    fn execute_one(&mut self) -> Result<u32, Self::Error>;
}

/// Description of a mount point (media slot) that a system supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPointInfo {
    /// Unique identifier for this mount point (e.g. "Cartridge").
    pub id: String,
    /// User-facing name for display.
    pub name: String,
    /// File extensions accepted by this mount point.
    pub extensions: Vec<String>,
    /// Whether this mount point is required for the system to function.
    pub required: bool,
}

/// A high-level system trait tying components together for a frontend.
///
/// Save-state serialization is out of scope: there is no
/// `save_state`/`load_state` pair here.
pub trait System {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Reset to the post-boot-ROM power-on state.
    fn reset(&mut self);

    /// Run until a frame is produced and return it.
    fn step_frame(&mut self) -> Result<types::Frame, Self::Error>;

    fn mount_points(&self) -> Vec<MountPointInfo>;
    fn mount(&mut self, mount_point_id: &str, data: &[u8]) -> Result<(), Self::Error>;
    fn unmount(&mut self, mount_point_id: &str) -> Result<(), Self::Error>;
    fn is_mounted(&self, mount_point_id: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_initialization() {
        let f = types::Frame::new(10, 10);
        assert_eq!(f.pixels.len(), 100);
        assert_eq!(f.width, 10);
        assert_eq!(f.height, 10);
    }

    #[test]
    fn mount_point_info_fields() {
        let mp = MountPointInfo {
            id: "Cartridge".to_string(),
            name: "Cartridge Slot".to_string(),
            extensions: vec!["gb".to_string(), "gbc".to_string()],
            required: true,
        };
        assert_eq!(mp.id, "Cartridge");
        assert_eq!(mp.extensions.len(), 2);
        assert!(mp.required);
    }
}
