use super::bus::MemoryBus;
use super::cartridge::{Cartridge, MemoryController};
use super::interrupts::Interrupts;
use crate::cpu::{Cpu, CpuState, Registers};
use crate::{debug, CoreConfig, CoreError};

/// One emulation session: CPU, bus, active controller and the cartridge
/// image, plus the running machine-cycle counter.
///
/// Dropping the context releases the controller.
pub struct EmulationContext {
    cpu: Cpu,
    bus: MemoryBus,
    config: CoreConfig,
    cycles: u64,
}

impl EmulationContext {
    /// Validate the cartridge and allocate the controller it declares.
    pub fn new(cartridge: Cartridge, config: CoreConfig) -> Result<Self, CoreError> {
        if let Err(err) = cartridge.verify_checksum() {
            if config.verify_header {
                return Err(err);
            }
            log::warn!("{err}; continuing because header verification is disabled");
        }

        let header = cartridge.header();
        log::info!(
            "loaded \"{}\": {} (type 0x{:02X}), ROM {}, battery={}",
            header.title,
            header.controller,
            header.cartridge_type,
            header.rom_size,
            header.battery,
        );

        let bus = MemoryBus::new(cartridge, config.ram_seed);
        Ok(Self {
            cpu: Cpu::new(),
            bus,
            config,
            cycles: 0,
        })
    }

    /// Execute one CPU step and return the machine cycles it took.
    pub fn step(&mut self) -> Result<u32, CoreError> {
        if self.config.trace_instructions && self.cpu.state() == CpuState::Running {
            log::trace!("{}", debug::trace_line(&self.cpu.regs, &self.bus));
        }
        let cycles = self.cpu.step(&mut self.bus)?;
        self.cycles += cycles as u64;
        Ok(cycles)
    }

    /// Step until at least `budget` machine cycles have elapsed. Returns the
    /// cycles actually consumed.
    pub fn run_for(&mut self, budget: u64) -> Result<u64, CoreError> {
        let start = self.cycles;
        while self.cycles - start < budget {
            self.step()?;
        }
        Ok(self.cycles - start)
    }

    /// Total machine cycles executed this session.
    #[inline]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    #[inline]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    #[inline]
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    #[inline]
    pub fn registers(&self) -> &Registers {
        &self.cpu.regs
    }

    #[inline]
    pub fn bus(&self) -> &MemoryBus {
        &self.bus
    }

    #[inline]
    pub fn bus_mut(&mut self) -> &mut MemoryBus {
        &mut self.bus
    }

    #[inline]
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Raise interrupt lines on behalf of a peripheral.
    pub fn request_interrupt(&mut self, lines: Interrupts) {
        self.bus.request_interrupt(lines);
    }

    /// Snapshot of battery-backed RAM, or `None` when the cartridge has no
    /// battery or no RAM (or the controller is released).
    pub fn battery_ram(&self) -> Option<Vec<u8>> {
        if !self.bus.cartridge().header().battery {
            return None;
        }
        let ram = self.bus.controller()?.ram();
        (!ram.is_empty()).then(|| ram.to_vec())
    }

    /// Restore battery-backed RAM from a blob produced by [`battery_ram`].
    ///
    /// [`battery_ram`]: Self::battery_ram
    pub fn load_battery_ram(&mut self, data: &[u8]) -> Result<(), CoreError> {
        let header = self.bus.cartridge().header();
        let battery = header.battery;
        let kind = header.controller;
        let controller = self
            .bus
            .controller_mut()
            .ok_or(CoreError::ControllerReleased { addr: 0xA000 })?;
        if !battery || controller.ram().is_empty() {
            return Err(CoreError::NoBatteryRam { controller: kind });
        }
        let ram = controller.ram_mut();
        if ram.len() != data.len() {
            return Err(CoreError::BatteryRamSize {
                expected: ram.len(),
                actual: data.len(),
            });
        }
        ram.copy_from_slice(data);
        log::debug!("restored {} bytes of battery RAM", data.len());
        Ok(())
    }

    /// End the session's use of the controller. Idempotent.
    pub fn release(&mut self) {
        self.bus.release_controller();
    }
}

impl Drop for EmulationContext {
    fn drop(&mut self) {
        self.release();
    }
}
