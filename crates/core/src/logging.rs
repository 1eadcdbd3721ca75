//! Centralized logging configuration for the emulator core.
//!
//! A unified, category-gated logging system so hot paths (CPU step, PPU
//! dot) can check a relaxed atomic load instead of paying for a
//! formatted message when logging is disabled.
//!
//! # Architecture
//!
//! - **LogConfig**: thread-safe global configuration using atomic loads
//! - **LogLevel**: hierarchical log levels (Off < Error < Warn < Info < Debug < Trace)
//! - **LogCategory**: per-component categories (Cpu, Bus, Timer, Ppu, Apu, Dma, Interrupt, Cartridge)
//!
//! # Usage
//!
//! ```rust
//! use swiftboy_support::logging::{LogConfig, LogLevel, LogCategory};
//!
//! LogConfig::global().set_level(LogCategory::Cpu, LogLevel::Debug);
//!
//! if LogConfig::global().should_log(LogCategory::Cpu, LogLevel::Info) {
//!     eprintln!("cpu: something happened");
//! }
//! ```

use std::sync::atomic::{AtomicU8, Ordering};

/// Log level for controlling verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    /// Parse a log level from a string (case-insensitive), accepting
    /// the numeric level as well (used by `--log-level`).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "0" => Some(LogLevel::Off),
            "error" | "err" | "1" => Some(LogLevel::Error),
            "warn" | "warning" | "2" => Some(LogLevel::Warn),
            "info" | "3" => Some(LogLevel::Info),
            "debug" | "4" => Some(LogLevel::Debug),
            "trace" | "5" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    fn to_u8(self) -> u8 {
        self as u8
    }

    fn from_u8(val: u8) -> Self {
        match val {
            0 => LogLevel::Off,
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            5 => LogLevel::Trace,
            _ => LogLevel::Off,
        }
    }
}

/// Log category for the components this core actually has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    /// CPU execution (instruction dispatch, PC tracing, interrupt dispatch)
    Cpu,
    /// Memory bus decode and DMA gate denials
    Bus,
    /// Timer (DIV/TIMA rate changes, overflow)
    Timer,
    /// PPU (mode transitions, STAT/LY, rendering)
    Ppu,
    /// APU (register writes, frame sequencer, channel triggers)
    Apu,
    /// OAM DMA transfers
    Dma,
    /// Interrupt controller (raise/service)
    Interrupt,
    /// Cartridge/MBC (bank switches, header parse)
    Cartridge,
}

const CATEGORY_COUNT: usize = 8;

fn category_index(category: LogCategory) -> usize {
    match category {
        LogCategory::Cpu => 0,
        LogCategory::Bus => 1,
        LogCategory::Timer => 2,
        LogCategory::Ppu => 3,
        LogCategory::Apu => 4,
        LogCategory::Dma => 5,
        LogCategory::Interrupt => 6,
        LogCategory::Cartridge => 7,
    }
}

/// Global logging configuration.
pub struct LogConfig {
    global_level: AtomicU8,
    category_levels: [AtomicU8; CATEGORY_COUNT],
}

impl LogConfig {
    const fn new() -> Self {
        const OFF: AtomicU8 = AtomicU8::new(LogLevel::Off as u8);
        Self {
            global_level: AtomicU8::new(LogLevel::Off as u8),
            category_levels: [OFF; CATEGORY_COUNT],
        }
    }

    /// Get the global singleton instance.
    pub fn global() -> &'static Self {
        static INSTANCE: LogConfig = LogConfig::new();
        &INSTANCE
    }

    pub fn set_global_level(&self, level: LogLevel) {
        self.global_level.store(level.to_u8(), Ordering::Relaxed);
    }

    pub fn get_global_level(&self) -> LogLevel {
        LogLevel::from_u8(self.global_level.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, category: LogCategory, level: LogLevel) {
        self.category_levels[category_index(category)].store(level.to_u8(), Ordering::Relaxed);
    }

    pub fn get_level(&self, category: LogCategory) -> LogLevel {
        LogLevel::from_u8(self.category_levels[category_index(category)].load(Ordering::Relaxed))
    }

    /// A category with no level set falls back to the global level.
    pub fn should_log(&self, category: LogCategory, level: LogLevel) -> bool {
        let category_level = self.get_level(category);
        if category_level != LogLevel::Off {
            level <= category_level
        } else {
            level <= self.get_global_level()
        }
    }

    pub fn reset(&self) {
        self.set_global_level(LogLevel::Off);
        for idx in 0..CATEGORY_COUNT {
            self.category_levels[idx].store(LogLevel::Off as u8, Ordering::Relaxed);
        }
    }
}

/// Log a message if `category` is enabled at `level` or above.
#[macro_export]
macro_rules! log {
    ($category:expr, $level:expr, $($arg:tt)*) => {
        if $crate::logging::LogConfig::global().should_log($category, $level) {
            eprintln!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_parsing() {
        assert_eq!(LogLevel::from_str("off"), Some(LogLevel::Off));
        assert_eq!(LogLevel::from_str("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_str("5"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_str("bogus"), None);
    }

    #[test]
    fn log_level_ordering() {
        assert!(LogLevel::Off < LogLevel::Error);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn category_level_overrides_global() {
        let config = LogConfig::new();
        config.set_global_level(LogLevel::Error);
        config.set_level(LogCategory::Cpu, LogLevel::Debug);

        assert!(config.should_log(LogCategory::Cpu, LogLevel::Debug));
        assert!(!config.should_log(LogCategory::Bus, LogLevel::Warn));
        assert!(config.should_log(LogCategory::Bus, LogLevel::Error));
    }

    #[test]
    fn reset_clears_everything() {
        let config = LogConfig::new();
        config.set_global_level(LogLevel::Trace);
        config.set_level(LogCategory::Ppu, LogLevel::Debug);

        config.reset();

        assert_eq!(config.get_global_level(), LogLevel::Off);
        assert_eq!(config.get_level(LogCategory::Ppu), LogLevel::Off);
    }
}
