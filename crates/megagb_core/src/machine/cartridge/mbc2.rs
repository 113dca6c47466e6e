//! MBC2: up to 256KB of ROM in 16 banks and 512 half-byte cells of RAM
//! built into the controller.

use super::controller::power_on_fill;
use super::{ControllerKind, MemoryController, RomSize};
use crate::CoreError;

/// Built-in RAM cells. Only the low nibble of each cell exists on hardware.
pub const MBC2_RAM_CELLS: usize = 512;

#[derive(Clone, Debug)]
pub struct Mbc2 {
    rom_size: RomSize,
    rom_bank: u8,
    ram_enabled: bool,
    ram: Vec<u8>,
}

impl Mbc2 {
    /// Bank 1 mapped, RAM disabled, RAM filled with seeded noise.
    pub fn allocate(rom_size: RomSize, ram_seed: u64) -> Self {
        Self {
            rom_size,
            rom_bank: 1,
            ram_enabled: false,
            ram: power_on_fill(MBC2_RAM_CELLS, ram_seed),
        }
    }

    #[inline]
    pub fn ram_enabled(&self) -> bool {
        self.ram_enabled
    }

    fn switch_bank(&mut self, value: u8) {
        let requested = value & 0x0F;
        let bank = match self.rom_size {
            RomSize::Kb32 => {
                log::warn!("MBC2 bank switch to {requested} ignored on a 32KB ROM");
                return;
            }
            RomSize::Kb64 => requested & 0b011,
            RomSize::Kb128 => requested & 0b111,
            RomSize::Kb256 => requested,
            larger => {
                log::warn!(
                    "MBC2 can address 256KB; banks beyond that in this {larger} ROM are unreachable"
                );
                requested
            }
        };
        self.rom_bank = if bank == 0 { 1 } else { bank };
        log::debug!("MBC2 ROM bank -> {}", self.rom_bank);
    }

    #[inline]
    fn cell(addr: u16) -> usize {
        addr as usize & (MBC2_RAM_CELLS - 1)
    }
}

impl MemoryController for Mbc2 {
    fn kind(&self) -> ControllerKind {
        ControllerKind::Mbc2
    }

    fn rom_bank(&self) -> usize {
        self.rom_bank as usize
    }

    /// Bit 8 of the address selects the register: set for the ROM bank,
    /// clear for RAM enable.
    fn intercept_control_write(&mut self, addr: u16, value: u8) -> Result<(), CoreError> {
        match addr {
            0x0000..=0x3FFF if addr & 0x0100 != 0 => self.switch_bank(value),
            0x0000..=0x3FFF => {
                self.ram_enabled = value == 0x0A;
                log::debug!("MBC2 RAM enabled = {}", self.ram_enabled);
            }
            _ => {
                return Err(CoreError::UndefinedControlRegister {
                    controller: ControllerKind::Mbc2,
                    addr,
                    value,
                })
            }
        }
        Ok(())
    }

    fn read_external_ram(&self, addr: u16) -> u8 {
        if !self.ram_enabled {
            log::warn!("MBC2 RAM read at 0x{addr:04X} while RAM is disabled");
        }
        self.peek_external_ram(addr)
    }

    fn write_external_ram(&mut self, addr: u16, value: u8) {
        if !self.ram_enabled {
            log::warn!("MBC2 RAM write at 0x{addr:04X} while RAM is disabled");
        }
        if let Some(cell) = self.ram.get_mut(Self::cell(addr)) {
            *cell = value;
        }
    }

    fn peek_external_ram(&self, addr: u16) -> u8 {
        self.ram.get(Self::cell(addr)).copied().unwrap_or(0xFF)
    }

    fn ram(&self) -> &[u8] {
        &self.ram
    }

    fn ram_mut(&mut self) -> &mut [u8] {
        &mut self.ram
    }

    fn release(&mut self) {
        self.ram = Vec::new();
        self.ram_enabled = false;
    }
}
