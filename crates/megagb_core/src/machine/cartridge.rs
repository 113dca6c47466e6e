mod controller;
mod mbc1;
mod mbc2;
mod mbc3;
mod mbc5;
mod rom_only;

use std::fmt;

pub use controller::{Controller, MemoryController};
pub(crate) use controller::power_on_fill;
pub use mbc1::Mbc1;
pub use mbc2::Mbc2;
pub use mbc3::Mbc3;
pub use mbc5::Mbc5;
pub use rom_only::RomOnly;

use crate::CoreError;

pub const ROM_BANK_SIZE: usize = 0x4000;
pub const RAM_BANK_SIZE: usize = 0x2000;

const TITLE_START: usize = 0x0134;
const TITLE_END: usize = 0x0143;
const TYPE_ADDR: usize = 0x0147;
const ROM_SIZE_ADDR: usize = 0x0148;
const RAM_SIZE_ADDR: usize = 0x0149;
const HEADER_CHECKSUM_ADDR: usize = 0x014D;
const GLOBAL_CHECKSUM_ADDR: usize = 0x014E;
/// Smallest image that still contains a complete header.
pub const HEADER_END: usize = 0x0150;

/// Cartridge hardware family selected by the header type byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControllerKind {
    RomOnly,
    Mbc1,
    Mbc2,
    Mbc3,
    Mbc5,
}

impl ControllerKind {
    /// Decode header byte 0x0147 into the controller family and whether the
    /// cartridge carries a battery.
    pub fn from_type_byte(code: u8) -> Result<(Self, bool), CoreError> {
        let kind = match code {
            0x00 => ControllerKind::RomOnly,
            0x01..=0x03 => ControllerKind::Mbc1,
            0x05 | 0x06 => ControllerKind::Mbc2,
            0x0F..=0x13 => ControllerKind::Mbc3,
            0x19..=0x1E => ControllerKind::Mbc5,
            _ => return Err(CoreError::UnsupportedCartridgeType(code)),
        };
        let battery = matches!(code, 0x03 | 0x06 | 0x0F | 0x10 | 0x13 | 0x1B | 0x1E);
        Ok((kind, battery))
    }
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControllerKind::RomOnly => "ROM only",
            ControllerKind::Mbc1 => "MBC1",
            ControllerKind::Mbc2 => "MBC2",
            ControllerKind::Mbc3 => "MBC3",
            ControllerKind::Mbc5 => "MBC5",
        };
        f.write_str(name)
    }
}

/// Declared ROM size (header byte 0x0148).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RomSize {
    Kb32,
    Kb64,
    Kb128,
    Kb256,
    Kb512,
    Mb1,
    Mb2,
    Mb4,
    Mb8,
}

impl RomSize {
    pub fn from_code(code: u8) -> Result<Self, CoreError> {
        Ok(match code {
            0x00 => RomSize::Kb32,
            0x01 => RomSize::Kb64,
            0x02 => RomSize::Kb128,
            0x03 => RomSize::Kb256,
            0x04 => RomSize::Kb512,
            0x05 => RomSize::Mb1,
            0x06 => RomSize::Mb2,
            0x07 => RomSize::Mb4,
            0x08 => RomSize::Mb8,
            _ => return Err(CoreError::UnsupportedRomSize(code)),
        })
    }

    #[inline]
    pub fn bytes(self) -> usize {
        0x8000 << (self as usize)
    }

    /// Number of 16KB banks.
    #[inline]
    pub fn banks(self) -> usize {
        self.bytes() / ROM_BANK_SIZE
    }
}

impl fmt::Display for RomSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kb = self.bytes() / 1024;
        if kb >= 1024 {
            write!(f, "{}MB", kb / 1024)
        } else {
            write!(f, "{kb}KB")
        }
    }
}

/// Declared external RAM size (header byte 0x0149).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RamSize {
    None,
    Kb2,
    Kb8,
    Kb32,
    Kb128,
    Kb64,
}

impl RamSize {
    pub fn from_code(code: u8) -> Result<Self, CoreError> {
        Ok(match code {
            0x00 => RamSize::None,
            0x01 => RamSize::Kb2,
            0x02 => RamSize::Kb8,
            0x03 => RamSize::Kb32,
            0x04 => RamSize::Kb128,
            0x05 => RamSize::Kb64,
            _ => return Err(CoreError::UnsupportedRamSize(code)),
        })
    }

    pub fn bytes(self) -> usize {
        match self {
            RamSize::None => 0,
            RamSize::Kb2 => 0x800,
            RamSize::Kb8 => 0x2000,
            RamSize::Kb32 => 0x8000,
            RamSize::Kb128 => 0x2_0000,
            RamSize::Kb64 => 0x1_0000,
        }
    }
}

/// Metadata parsed from the cartridge header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartridgeHeader {
    pub title: String,
    pub cartridge_type: u8,
    pub controller: ControllerKind,
    pub battery: bool,
    pub rom_size: RomSize,
    pub ram_size: RamSize,
    pub header_checksum: u8,
    pub global_checksum: u16,
}

impl CartridgeHeader {
    pub fn parse(rom: &[u8]) -> Result<Self, CoreError> {
        if rom.len() < HEADER_END {
            return Err(CoreError::RomTooSmall(rom.len()));
        }

        let title = rom[TITLE_START..=TITLE_END]
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' })
            .collect::<String>()
            .trim_end()
            .to_string();

        let cartridge_type = rom[TYPE_ADDR];
        let (controller, battery) = ControllerKind::from_type_byte(cartridge_type)?;

        Ok(Self {
            title,
            cartridge_type,
            controller,
            battery,
            rom_size: RomSize::from_code(rom[ROM_SIZE_ADDR])?,
            ram_size: RamSize::from_code(rom[RAM_SIZE_ADDR])?,
            header_checksum: rom[HEADER_CHECKSUM_ADDR],
            global_checksum: u16::from_be_bytes([
                rom[GLOBAL_CHECKSUM_ADDR],
                rom[GLOBAL_CHECKSUM_ADDR + 1],
            ]),
        })
    }
}

/// Checksum over 0x0134..=0x014C as computed by the boot ROM.
pub fn header_checksum(rom: &[u8]) -> u8 {
    rom.get(TITLE_START..HEADER_CHECKSUM_ADDR)
        .unwrap_or(&[])
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_sub(b).wrapping_sub(1))
}

/// Immutable cartridge image plus its parsed header.
#[derive(Clone, Debug)]
pub struct Cartridge {
    header: CartridgeHeader,
    rom: Vec<u8>,
}

impl Cartridge {
    pub fn from_bytes(rom: Vec<u8>) -> Result<Self, CoreError> {
        let header = CartridgeHeader::parse(&rom)?;
        if rom.len() < header.rom_size.bytes() {
            log::warn!(
                "ROM image is {} bytes but the header declares {}; missing banks read 0xFF",
                rom.len(),
                header.rom_size
            );
        }
        Ok(Self { header, rom })
    }

    #[inline]
    pub fn header(&self) -> &CartridgeHeader {
        &self.header
    }

    #[inline]
    pub fn rom(&self) -> &[u8] {
        &self.rom
    }

    /// Byte at an image offset; offsets past the end read 0xFF.
    #[inline]
    pub fn read(&self, offset: usize) -> u8 {
        self.rom.get(offset).copied().unwrap_or(0xFF)
    }

    pub fn verify_checksum(&self) -> Result<(), CoreError> {
        let computed = header_checksum(&self.rom);
        if computed == self.header.header_checksum {
            Ok(())
        } else {
            Err(CoreError::HeaderChecksum {
                expected: self.header.header_checksum,
                computed,
            })
        }
    }
}
