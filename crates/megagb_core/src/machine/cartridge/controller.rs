use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::{CartridgeHeader, ControllerKind, Mbc1, Mbc2, Mbc3, Mbc5, RomOnly, ROM_BANK_SIZE};
use crate::CoreError;

/// Capability set shared by every bank-switching controller.
///
/// Decoding and masking depend only on the controller's own state and the
/// declared sizes. A controller never sees CPU registers and never raises
/// interrupts.
pub trait MemoryController {
    fn kind(&self) -> ControllerKind;

    /// Bank currently mapped at 0x4000..=0x7FFF.
    fn rom_bank(&self) -> usize;

    /// Translate a ROM-window address (0x0000..=0x7FFF) into an offset in
    /// the cartridge image.
    fn map_rom(&self, addr: u16) -> usize {
        let bank = if addr < 0x4000 { 0 } else { self.rom_bank() };
        bank * ROM_BANK_SIZE + (addr as usize & (ROM_BANK_SIZE - 1))
    }

    /// Handle a store into the ROM window. Nothing is ever written to ROM;
    /// the value updates banking registers or is rejected.
    fn intercept_control_write(&mut self, addr: u16, value: u8) -> Result<(), CoreError>;

    fn read_external_ram(&self, addr: u16) -> u8;

    fn write_external_ram(&mut self, addr: u16, value: u8);

    /// Read external RAM without logging or other observable effects.
    fn peek_external_ram(&self, addr: u16) -> u8 {
        self.read_external_ram(addr)
    }

    /// Backing RAM in bank order, as persisted for battery saves.
    fn ram(&self) -> &[u8];

    fn ram_mut(&mut self) -> &mut [u8];

    /// Free controller resources. Calling it again is a no-op.
    fn release(&mut self);
}

/// The active controller of a session.
#[derive(Clone, Debug)]
pub enum Controller {
    RomOnly(RomOnly),
    Mbc1(Mbc1),
    Mbc2(Mbc2),
    Mbc3(Mbc3),
    Mbc5(Mbc5),
}

impl Controller {
    /// Instantiate the controller variant the header asks for.
    pub fn allocate(header: &CartridgeHeader, ram_seed: u64) -> Self {
        let controller = match header.controller {
            ControllerKind::RomOnly => Controller::RomOnly(RomOnly::allocate(header.ram_size)),
            ControllerKind::Mbc1 => {
                Controller::Mbc1(Mbc1::allocate(header.rom_size, header.ram_size))
            }
            ControllerKind::Mbc2 => Controller::Mbc2(Mbc2::allocate(header.rom_size, ram_seed)),
            ControllerKind::Mbc3 => {
                Controller::Mbc3(Mbc3::allocate(header.rom_size, header.ram_size))
            }
            ControllerKind::Mbc5 => {
                Controller::Mbc5(Mbc5::allocate(header.rom_size, header.ram_size))
            }
        };
        log::debug!(
            "allocated {} controller (ROM {}, {} bytes RAM)",
            header.controller,
            header.rom_size,
            controller.ram().len()
        );
        controller
    }

    fn inner(&self) -> &dyn MemoryController {
        match self {
            Controller::RomOnly(c) => c,
            Controller::Mbc1(c) => c,
            Controller::Mbc2(c) => c,
            Controller::Mbc3(c) => c,
            Controller::Mbc5(c) => c,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn MemoryController {
        match self {
            Controller::RomOnly(c) => c,
            Controller::Mbc1(c) => c,
            Controller::Mbc2(c) => c,
            Controller::Mbc3(c) => c,
            Controller::Mbc5(c) => c,
        }
    }
}

impl MemoryController for Controller {
    fn kind(&self) -> ControllerKind {
        self.inner().kind()
    }

    fn rom_bank(&self) -> usize {
        self.inner().rom_bank()
    }

    fn map_rom(&self, addr: u16) -> usize {
        self.inner().map_rom(addr)
    }

    fn intercept_control_write(&mut self, addr: u16, value: u8) -> Result<(), CoreError> {
        self.inner_mut().intercept_control_write(addr, value)
    }

    fn read_external_ram(&self, addr: u16) -> u8 {
        self.inner().read_external_ram(addr)
    }

    fn write_external_ram(&mut self, addr: u16, value: u8) {
        self.inner_mut().write_external_ram(addr, value)
    }

    fn peek_external_ram(&self, addr: u16) -> u8 {
        self.inner().peek_external_ram(addr)
    }

    fn ram(&self) -> &[u8] {
        self.inner().ram()
    }

    fn ram_mut(&mut self) -> &mut [u8] {
        self.inner_mut().ram_mut()
    }

    fn release(&mut self) {
        self.inner_mut().release()
    }
}

/// Deterministic stand-in for RAM contents that hardware leaves undefined
/// at power-on.
pub(crate) fn power_on_fill(len: usize, seed: u64) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    StdRng::seed_from_u64(seed).fill_bytes(&mut bytes);
    bytes
}

/// Index into a banked RAM array, mirroring when the declared RAM is
/// smaller than one bank.
pub(super) fn banked_ram_index(ram_len: usize, bank: usize, addr: u16) -> Option<usize> {
    if ram_len == 0 {
        return None;
    }
    Some((bank * super::RAM_BANK_SIZE + (addr as usize & (super::RAM_BANK_SIZE - 1))) % ram_len)
}
