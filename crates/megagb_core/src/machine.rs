mod bus;
mod cartridge;
mod context;
pub mod interrupts;

#[cfg(test)]
mod tests;

pub use bus::MemoryBus;
pub use cartridge::{
    header_checksum, Cartridge, CartridgeHeader, Controller, ControllerKind, Mbc1, Mbc2, Mbc3, Mbc5,
    MemoryController, RamSize, RomOnly, RomSize, RAM_BANK_SIZE, ROM_BANK_SIZE,
};
pub use context::EmulationContext;
pub use interrupts::Interrupts;
