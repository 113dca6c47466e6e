use super::controller::banked_ram_index;
use super::{ControllerKind, MemoryController, RamSize};
use crate::CoreError;

/// Cartridge without a banking controller: 32KB of ROM mapped directly and
/// optionally up to 8KB of RAM that is always accessible.
#[derive(Clone, Debug)]
pub struct RomOnly {
    ram: Vec<u8>,
}

impl RomOnly {
    pub fn allocate(ram_size: RamSize) -> Self {
        let bytes = ram_size.bytes().min(super::RAM_BANK_SIZE);
        Self {
            ram: vec![0xFF; bytes],
        }
    }
}

impl MemoryController for RomOnly {
    fn kind(&self) -> ControllerKind {
        ControllerKind::RomOnly
    }

    fn rom_bank(&self) -> usize {
        1
    }

    fn intercept_control_write(&mut self, addr: u16, value: u8) -> Result<(), CoreError> {
        log::debug!("ignoring write 0x{value:02X} to 0x{addr:04X} on a ROM-only cartridge");
        Ok(())
    }

    fn read_external_ram(&self, addr: u16) -> u8 {
        banked_ram_index(self.ram.len(), 0, addr).map_or(0xFF, |i| self.ram[i])
    }

    fn write_external_ram(&mut self, addr: u16, value: u8) {
        if let Some(i) = banked_ram_index(self.ram.len(), 0, addr) {
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
    }
}
