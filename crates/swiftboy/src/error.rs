//! Top-level error type, composed from each component's own error enum.

use thiserror::Error;

use crate::cartridge::CartridgeError;
use swiftboy_support::cpu_lr35902::CpuError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SwiftBoyError {
    #[error("CPU error: {0}")]
    Cpu(#[from] CpuError),
    #[error("cartridge error: {0}")]
    Cartridge(#[from] CartridgeError),
    #[error("no cartridge loaded")]
    NoCartridge,
}
