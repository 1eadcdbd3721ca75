//! Cartridge image parsing and bank-controller dispatch.
//!
//! `Mapper` currently has two variants, `NoMapper` and `MBC1`. Other
//! controllers (HuC1, MBC2, MBC3, MBC5) are not implemented.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartridgeError {
    #[error("ROM image too small: header declares {expected} bytes, file has {actual}")]
    RomTooSmall { expected: usize, actual: usize },
    #[error("unsupported mapper code ${0:02X}")]
    UnsupportedMapper(u8),
    #[error("unsupported RAM size code ${0:02X}")]
    UnsupportedRamSize(u8),
}

/// Parsed cartridge header fields, kept around for display/debugging.
/// Carried as `serde`-able ambient data, not as save-state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartridgeInfo {
    pub title: String,
    pub mapper_code: u8,
    pub rom_size: usize,
    pub ram_size: usize,
}

fn ram_size_from_code(code: u8) -> Result<usize, CartridgeError> {
    match code {
        0x00 => Ok(0),
        0x02 => Ok(8 * 1024),
        0x03 => Ok(32 * 1024),
        0x04 => Ok(128 * 1024),
        0x05 => Ok(64 * 1024),
        _ => Err(CartridgeError::UnsupportedRamSize(code)),
    }
}

fn parse_title(rom: &[u8]) -> String {
    let bytes = &rom[0x0134..0x0144];
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BankingMode {
    Simple,
    Advanced,
}

#[derive(Debug)]
struct NoMapper {
    rom: Vec<u8>,
    ram: Vec<u8>,
}

impl NoMapper {
    fn read_rom(&self, addr: u16) -> u8 {
        self.rom.get(addr as usize).copied().unwrap_or(0xFF)
    }
    fn write_rom(&mut self, _addr: u16, _val: u8) {}
    fn read_ram(&self, addr: u16) -> u8 {
        let offset = (addr - 0xA000) as usize;
        self.ram.get(offset).copied().unwrap_or(0xFF)
    }
    fn write_ram(&mut self, addr: u16, val: u8) {
        let offset = (addr - 0xA000) as usize;
        if let Some(slot) = self.ram.get_mut(offset) {
            *slot = val;
        }
    }
}

#[derive(Debug)]
struct Mbc1 {
    rom: Vec<u8>,
    ram: Vec<u8>,
    ram_enabled: bool,
    rom_bank_low5: u8,
    bank2: u8,
    banking_mode: BankingMode,
}

impl Mbc1 {
    fn new(rom: Vec<u8>, ram: Vec<u8>) -> Self {
        Self {
            rom,
            ram,
            ram_enabled: false,
            rom_bank_low5: 1,
            bank2: 0,
            banking_mode: BankingMode::Simple,
        }
    }

    fn rom_bank_count(&self) -> usize {
        (self.rom.len() / 0x4000).max(1)
    }

    fn ram_bank_count(&self) -> usize {
        (self.ram.len() / 0x2000).max(1)
    }

    fn lower_bank(&self) -> usize {
        match self.banking_mode {
            BankingMode::Advanced => ((self.bank2 as usize) << 5) % self.rom_bank_count(),
            BankingMode::Simple => 0,
        }
    }

    fn upper_bank(&self) -> usize {
        let combined = ((self.bank2 as usize) << 5) | (self.rom_bank_low5 as usize);
        combined % self.rom_bank_count()
    }

    fn ram_bank(&self) -> usize {
        match self.banking_mode {
            BankingMode::Advanced => (self.bank2 as usize) % self.ram_bank_count(),
            BankingMode::Simple => 0,
        }
    }

    fn read_rom(&self, addr: u16) -> u8 {
        let (bank, local) = if addr < 0x4000 {
            (self.lower_bank(), addr as usize)
        } else {
            (self.upper_bank(), (addr - 0x4000) as usize)
        };
        let offset = bank * 0x4000 + local;
        self.rom.get(offset).copied().unwrap_or(0xFF)
    }

    fn write_rom(&mut self, addr: u16, val: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enabled = (val & 0x0F) == 0x0A,
            0x2000..=0x3FFF => {
                let bank = val & 0x1F;
                self.rom_bank_low5 = if bank == 0 { 1 } else { bank };
            }
            0x4000..=0x5FFF => self.bank2 = val & 0x03,
            0x6000..=0x7FFF => {
                self.banking_mode = if val & 0x01 != 0 {
                    BankingMode::Advanced
                } else {
                    BankingMode::Simple
                };
            }
            _ => {}
        }
    }

    fn read_ram(&self, addr: u16) -> u8 {
        if !self.ram_enabled || self.ram.is_empty() {
            return 0xFF;
        }
        let offset = self.ram_bank() * 0x2000 + (addr - 0xA000) as usize;
        self.ram.get(offset).copied().unwrap_or(0xFF)
    }

    fn write_ram(&mut self, addr: u16, val: u8) {
        if !self.ram_enabled || self.ram.is_empty() {
            return;
        }
        let offset = self.ram_bank() * 0x2000 + (addr - 0xA000) as usize;
        if let Some(slot) = self.ram.get_mut(offset) {
            *slot = val;
        }
    }
}

#[derive(Debug)]
enum Mapper {
    NoMapper(NoMapper),
    Mbc1(Mbc1),
}

#[derive(Debug)]
pub struct Cartridge {
    mapper: Mapper,
    info: CartridgeInfo,
}

impl Cartridge {
    /// Parse a raw cartridge image, validate its header against the
    /// file's actual length, and construct the matching mapper.
    pub fn from_bytes(rom: Vec<u8>) -> Result<Self, CartridgeError> {
        if rom.len() < 0x0150 {
            return Err(CartridgeError::RomTooSmall {
                expected: 0x0150,
                actual: rom.len(),
            });
        }

        let mapper_code = rom[0x0147];
        let rom_size_code = rom[0x0148];
        let ram_size_code = rom[0x0149];

        let declared_rom_size = 0x8000usize << rom_size_code;
        if rom.len() < declared_rom_size {
            return Err(CartridgeError::RomTooSmall {
                expected: declared_rom_size,
                actual: rom.len(),
            });
        }
        let ram_size = ram_size_from_code(ram_size_code)?;

        let info = CartridgeInfo {
            title: parse_title(&rom),
            mapper_code,
            rom_size: declared_rom_size,
            ram_size,
        };

        let ram = vec![0u8; ram_size];
        let mapper = match mapper_code {
            0x00 => Mapper::NoMapper(NoMapper { rom, ram }),
            0x01 | 0x02 | 0x03 => Mapper::Mbc1(Mbc1::new(rom, ram)),
            other => return Err(CartridgeError::UnsupportedMapper(other)),
        };

        Ok(Self { mapper, info })
    }

    pub fn info(&self) -> &CartridgeInfo {
        &self.info
    }

    pub fn read_rom(&self, addr: u16) -> u8 {
        match &self.mapper {
            Mapper::NoMapper(m) => m.read_rom(addr),
            Mapper::Mbc1(m) => m.read_rom(addr),
        }
    }

    pub fn write_rom(&mut self, addr: u16, val: u8) {
        match &mut self.mapper {
            Mapper::NoMapper(m) => m.write_rom(addr, val),
            Mapper::Mbc1(m) => m.write_rom(addr, val),
        }
    }

    pub fn read_ram(&self, addr: u16) -> u8 {
        match &self.mapper {
            Mapper::NoMapper(m) => m.read_ram(addr),
            Mapper::Mbc1(m) => m.read_ram(addr),
        }
    }

    pub fn write_ram(&mut self, addr: u16, val: u8) {
        match &mut self.mapper {
            Mapper::NoMapper(m) => m.write_ram(addr, val),
            Mapper::Mbc1(m) => m.write_ram(addr, val),
        }
    }

    /// `(rom_ok, ram_ok)`: whether the declared header sizes are
    /// internally consistent with a loaded image of `rom_len`/`ram_len`.
    pub fn sanity_check(&self, rom_len: usize, ram_len: usize) -> (bool, bool) {
        (
            rom_len >= self.info.rom_size,
            ram_len >= self.info.ram_size,
        )
    }
}

fn build_test_rom(mapper_code: u8, rom_size_code: u8, ram_size_code: u8) -> Vec<u8> {
    let size = 0x8000usize << rom_size_code;
    let mut rom = vec![0u8; size.max(0x0150)];
    rom[0x0147] = mapper_code;
    rom[0x0148] = rom_size_code;
    rom[0x0149] = ram_size_code;
    rom
}
