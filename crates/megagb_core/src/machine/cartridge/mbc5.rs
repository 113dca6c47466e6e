use super::controller::banked_ram_index;
use super::{ControllerKind, MemoryController, RamSize, RomSize};
use crate::CoreError;

/// MBC5 banking state: 9-bit ROM bank (bank 0 is selectable) and a 4-bit
/// RAM bank.
#[derive(Clone, Debug)]
pub struct Mbc5 {
    rom_banks: usize,
    ram: Vec<u8>,
    ram_enabled: bool,
    bank_low8: u8,
    bank_high1: u8,
    ram_bank: u8,
}

impl Mbc5 {
    pub fn allocate(rom_size: RomSize, ram_size: RamSize) -> Self {
        Self {
            rom_banks: rom_size.banks(),
            ram: vec![0xFF; ram_size.bytes()],
            ram_enabled: false,
            bank_low8: 1,
            bank_high1: 0,
            ram_bank: 0,
        }
    }
}

impl MemoryController for Mbc5 {
    fn kind(&self) -> ControllerKind {
        ControllerKind::Mbc5
    }

    fn rom_bank(&self) -> usize {
        (((self.bank_high1 as usize) << 8) | self.bank_low8 as usize) % self.rom_banks
    }

    fn intercept_control_write(&mut self, addr: u16, value: u8) -> Result<(), CoreError> {
        match addr {
            0x0000..=0x1FFF => self.ram_enabled = value & 0x0F == 0x0A,
            0x2000..=0x2FFF => self.bank_low8 = value,
            0x3000..=0x3FFF => self.bank_high1 = value & 0x01,
            0x4000..=0x5FFF => self.ram_bank = value & 0x0F,
            0x6000..=0x7FFF => {}
            _ => {
                return Err(CoreError::UndefinedControlRegister {
                    controller: ControllerKind::Mbc5,
                    addr,
                    value,
                })
            }
        }
        Ok(())
    }

    fn read_external_ram(&self, addr: u16) -> u8 {
        if !self.ram_enabled {
            return 0xFF;
        }
        banked_ram_index(self.ram.len(), self.ram_bank as usize, addr).map_or(0xFF, |i| self.ram[i])
    }

    fn write_external_ram(&mut self, addr: u16, value: u8) {
        if !self.ram_enabled {
            return;
        }
        if let Some(i) = banked_ram_index(self.ram.len(), self.ram_bank as usize, addr) {
            self.ram[i] = value;
        }
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
