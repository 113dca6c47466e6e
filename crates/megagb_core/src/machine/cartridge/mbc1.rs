use super::controller::banked_ram_index;
use super::{ControllerKind, MemoryController, RamSize, RomSize};
use crate::CoreError;

/// MBC1 banking state.
///
/// A 5-bit bank register plus a 2-bit secondary register form the ROM bank
/// for 0x4000..=0x7FFF. In mode 1 the secondary register also selects the
/// RAM bank; in mode 0 RAM bank 0 is always used.
#[derive(Clone, Debug)]
pub struct Mbc1 {
    rom_banks: usize,
    ram: Vec<u8>,
    ram_enabled: bool,
    bank_low5: u8,
    bank_high2: u8,
    mode: u8,
}

impl Mbc1 {
    pub fn allocate(rom_size: RomSize, ram_size: RamSize) -> Self {
        Self {
            rom_banks: rom_size.banks(),
            ram: vec![0xFF; ram_size.bytes()],
            ram_enabled: false,
            bank_low5: 1,
            bank_high2: 0,
            mode: 0,
        }
    }

    fn ram_index(&self, addr: u16) -> Option<usize> {
        let bank = if self.mode == 1 { self.bank_high2 as usize } else { 0 };
        banked_ram_index(self.ram.len(), bank, addr)
    }
}

impl MemoryController for Mbc1 {
    fn kind(&self) -> ControllerKind {
        ControllerKind::Mbc1
    }

    fn rom_bank(&self) -> usize {
        let low = match self.bank_low5 & 0x1F {
            0 => 1,
            n => n,
        } as usize;
        (low | (self.bank_high2 as usize) << 5) % self.rom_banks
    }

    fn intercept_control_write(&mut self, addr: u16, value: u8) -> Result<(), CoreError> {
        match addr {
            0x0000..=0x1FFF => {
                self.ram_enabled = value & 0x0F == 0x0A;
                log::debug!("MBC1 RAM enabled = {}", self.ram_enabled);
            }
            0x2000..=0x3FFF => {
                self.bank_low5 = match value & 0x1F {
                    0 => 1,
                    n => n,
                };
                log::debug!("MBC1 ROM bank -> {}", self.rom_bank());
            }
            0x4000..=0x5FFF => self.bank_high2 = value & 0x03,
            0x6000..=0x7FFF => self.mode = value & 0x01,
            _ => {
                return Err(CoreError::UndefinedControlRegister {
                    controller: ControllerKind::Mbc1,
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
        self.ram_index(addr).map_or(0xFF, |i| self.ram[i])
    }

    fn write_external_ram(&mut self, addr: u16, value: u8) {
        if !self.ram_enabled {
            return;
        }
        if let Some(i) = self.ram_index(addr) {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rom_bank_register_skips_bank_zero_and_wraps() {
        let mut mbc = Mbc1::allocate(RomSize::Kb256, RamSize::None);
        assert_eq!(mbc.rom_bank(), 1);
        mbc.intercept_control_write(0x2000, 0x00).unwrap();
        assert_eq!(mbc.rom_bank(), 1);
        mbc.intercept_control_write(0x2000, 0x0A).unwrap();
        assert_eq!(mbc.rom_bank(), 10);
        // 16 banks: bank 0x12 wraps to 2.
        mbc.intercept_control_write(0x3FFF, 0x12).unwrap();
        assert_eq!(mbc.rom_bank(), 2);
        assert_eq!(mbc.map_rom(0x4000), 2 * 0x4000);
        assert_eq!(mbc.map_rom(0x0123), 0x0123);
    }

    #[test]
    fn secondary_register_extends_rom_bank() {
        let mut mbc = Mbc1::allocate(RomSize::Mb2, RamSize::None);
        mbc.intercept_control_write(0x2000, 0x01).unwrap();
        mbc.intercept_control_write(0x4000, 0x02).unwrap();
        assert_eq!(mbc.rom_bank(), 0x41);
    }

    #[test]
    fn ram_requires_enable_and_follows_mode() {
        let mut mbc = Mbc1::allocate(RomSize::Kb512, RamSize::Kb32);
        mbc.write_external_ram(0xA000, 0x11);
        assert_eq!(mbc.read_external_ram(0xA000), 0xFF);

        mbc.intercept_control_write(0x0000, 0x0A).unwrap();
        mbc.write_external_ram(0xA000, 0x11);
        assert_eq!(mbc.read_external_ram(0xA000), 0x11);

        // Mode 1 with bank 2 selected uses a different RAM bank.
        mbc.intercept_control_write(0x4000, 0x02).unwrap();
        mbc.intercept_control_write(0x6000, 0x01).unwrap();
        assert_eq!(mbc.read_external_ram(0xA000), 0xFF);
        mbc.write_external_ram(0xA000, 0x22);
        assert_eq!(mbc.ram()[2 * 0x2000], 0x22);

        // Back to mode 0: bank 0 again.
        mbc.intercept_control_write(0x6000, 0x00).unwrap();
        assert_eq!(mbc.read_external_ram(0xA000), 0x11);
    }

    #[test]
    fn ram_enable_checks_low_nibble() {
        let mut mbc = Mbc1::allocate(RomSize::Kb64, RamSize::Kb8);
        mbc.intercept_control_write(0x1000, 0x3A).unwrap();
        mbc.write_external_ram(0xA123, 0x5A);
        assert_eq!(mbc.read_external_ram(0xA123), 0x5A);
        mbc.intercept_control_write(0x1000, 0x00).unwrap();
        assert_eq!(mbc.read_external_ram(0xA123), 0xFF);
    }
}
