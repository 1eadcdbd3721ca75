//! Reusable PPU building blocks: indexed palettes and tile decoding.
//! The scanline state machine itself (mode timing, OAM scan, access
//! gating) is system-specific and lives in the `swiftboy` crate.

pub mod palette;
pub mod tile;

pub use palette::{IndexedPalette, RamPalette, DMG_SHADES};
pub use tile::{GameBoy2BppDecoder, TileDecoder};
