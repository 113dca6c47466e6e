use std::ops::Range;

use super::cartridge::{power_on_fill, Cartridge, Controller, MemoryController};
use super::interrupts::{Interrupts, IE_ADDR, IF_ADDR, P1_ADDR};
use crate::cpu::Bus;
use crate::CoreError;

const WRAM: Range<usize> = 0xC000..0xE000;
const HRAM: Range<usize> = 0xFF80..0xFFFF;

// Keeps the WRAM/HRAM noise independent of the MBC2 RAM noise.
const INTERNAL_RAM_SEED_SALT: u64 = 0x5EED_0000_0000_0001;

/// Post-boot values of I/O registers that software commonly inspects.
const DMG_IO_DEFAULTS: &[(u16, u8)] = &[
    (P1_ADDR, 0xCF),
    (0xFF02, 0x7E),
    (0xFF04, 0xAB),
    (0xFF07, 0xF8),
    (0xFF10, 0x80),
    (0xFF11, 0xBF),
    (0xFF12, 0xF3),
    (0xFF14, 0xBF),
    (0xFF16, 0x3F),
    (0xFF19, 0xBF),
    (0xFF1A, 0x7F),
    (0xFF1B, 0xFF),
    (0xFF1C, 0x9F),
    (0xFF1E, 0xBF),
    (0xFF20, 0xFF),
    (0xFF23, 0xBF),
    (0xFF24, 0x77),
    (0xFF25, 0xF3),
    (0xFF26, 0xF1),
    (0xFF40, 0x91),
    (0xFF41, 0x85),
    (0xFF46, 0xFF),
    (0xFF47, 0xFC),
];

/// The 16-bit address space seen by the CPU.
///
/// ROM windows and the external RAM window are routed to the active
/// controller; everything else is flat storage with no translation. Echo RAM
/// is not mirrored onto WRAM.
pub struct MemoryBus {
    cartridge: Cartridge,
    controller: Option<Controller>,
    memory: Box<[u8; 0x10000]>,
    // Only the low five bits exist; reads OR in the unused upper bits.
    if_reg: u8,
    ie_reg: u8,
    fault: Option<CoreError>,
}

impl MemoryBus {
    /// Build the bus around a cartridge and allocate its controller.
    pub fn new(cartridge: Cartridge, ram_seed: u64) -> Self {
        let controller = Controller::allocate(cartridge.header(), ram_seed);
        let mut bus = Self {
            cartridge,
            controller: Some(controller),
            memory: Box::new([0; 0x10000]),
            if_reg: 0x01,
            ie_reg: 0x00,
            fault: None,
        };
        bus.apply_dmg_initial_state(ram_seed);
        bus
    }

    fn apply_dmg_initial_state(&mut self, ram_seed: u64) {
        let seed = ram_seed ^ INTERNAL_RAM_SEED_SALT;
        let noise = power_on_fill(WRAM.len() + HRAM.len(), seed);
        let (wram, hram) = noise.split_at(WRAM.len());
        self.memory[WRAM].copy_from_slice(wram);
        self.memory[HRAM].copy_from_slice(hram);

        for &(addr, value) in DMG_IO_DEFAULTS {
            self.memory[addr as usize] = value;
        }
    }

    #[inline]
    pub fn cartridge(&self) -> &Cartridge {
        &self.cartridge
    }

    #[inline]
    pub fn controller(&self) -> Option<&Controller> {
        self.controller.as_ref()
    }

    #[inline]
    pub fn controller_mut(&mut self) -> Option<&mut Controller> {
        self.controller.as_mut()
    }

    /// Release the active controller. Afterwards ROM-window reads return
    /// 0xFF and ROM-window writes are fatal. Releasing twice is a no-op.
    pub fn release_controller(&mut self) {
        if let Some(mut controller) = self.controller.take() {
            controller.release();
            log::debug!("released {} controller", controller.kind());
        }
    }

    /// Read without side effects, for diagnostics.
    pub fn peek(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF => match &self.controller {
                Some(controller) => self.cartridge.read(controller.map_rom(addr)),
                None => 0xFF,
            },
            0xA000..=0xBFFF => self
                .controller
                .as_ref()
                .map_or(0xFF, |controller| controller.peek_external_ram(addr)),
            IF_ADDR => self.if_reg | 0xE0,
            IE_ADDR => self.ie_reg,
            _ => self.memory[addr as usize],
        }
    }

    #[inline]
    pub fn interrupt_flags(&self) -> Interrupts {
        Interrupts::from_bits_truncate(self.if_reg)
    }

    #[inline]
    pub fn interrupt_enable(&self) -> Interrupts {
        Interrupts::from_bits_truncate(self.ie_reg)
    }

    /// Raise interrupt request lines in IF.
    pub fn request_interrupt(&mut self, lines: Interrupts) {
        self.if_reg |= lines.bits();
    }

    /// Latch a fatal condition for the CPU to pick up. The first fault of a
    /// step wins.
    fn raise(&mut self, fault: CoreError) {
        log::error!("{fault}");
        if self.fault.is_none() {
            self.fault = Some(fault);
        }
    }
}

impl Bus for MemoryBus {
    fn read8(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF | 0xA000..=0xBFFF => match &self.controller {
                Some(controller) if addr < 0x8000 => self.cartridge.read(controller.map_rom(addr)),
                Some(controller) => controller.read_external_ram(addr),
                None => {
                    log::warn!("read from 0x{addr:04X} after the memory controller was released");
                    0xFF
                }
            },
            _ => self.peek(addr),
        }
    }

    fn write8(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x7FFF => {
                let result = match self.controller.as_mut() {
                    Some(controller) => controller.intercept_control_write(addr, value),
                    None => Err(CoreError::ControllerReleased { addr }),
                };
                if let Err(fault) = result {
                    self.raise(fault);
                }
            }
            0xA000..=0xBFFF => match self.controller.as_mut() {
                Some(controller) => controller.write_external_ram(addr, value),
                None => {
                    log::warn!("write to 0x{addr:04X} after the memory controller was released")
                }
            },
            IF_ADDR => self.if_reg = value & Interrupts::all().bits(),
            IE_ADDR => self.ie_reg = value,
            _ => self.memory[addr as usize] = value,
        }
    }

    fn take_fault(&mut self) -> Option<CoreError> {
        self.fault.take()
    }
}
