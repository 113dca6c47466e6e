use super::controller::banked_ram_index;
use super::{ControllerKind, MemoryController, RamSize, RomSize};
use crate::CoreError;

const RTC_FIRST: u8 = 0x08;
const RTC_LAST: u8 = 0x0C;
const RTC_REGISTERS: usize = (RTC_LAST - RTC_FIRST + 1) as usize;

/// MBC3 banking state.
///
/// The clock registers (seconds, minutes, hours, day low, day high/flags)
/// are plain storage: they never tick on their own. Writes go to the live
/// set, reads come from the set captured by the last latch.
#[derive(Clone, Debug)]
pub struct Mbc3 {
    rom_banks: usize,
    ram: Vec<u8>,
    ram_enabled: bool,
    rom_bank: u8,
    select: u8,
    rtc: [u8; RTC_REGISTERS],
    rtc_latched: [u8; RTC_REGISTERS],
    latch_armed: bool,
}

impl Mbc3 {
    pub fn allocate(rom_size: RomSize, ram_size: RamSize) -> Self {
        Self {
            rom_banks: rom_size.banks(),
            ram: vec![0xFF; ram_size.bytes()],
            ram_enabled: false,
            rom_bank: 1,
            select: 0,
            rtc: [0; RTC_REGISTERS],
            rtc_latched: [0; RTC_REGISTERS],
            latch_armed: false,
        }
    }

    fn latch(&mut self, value: u8) {
        if self.latch_armed && value == 0x01 {
            self.rtc_latched = self.rtc;
            log::debug!("MBC3 clock latched: {:02X?}", self.rtc_latched);
        }
        self.latch_armed = value == 0x00;
    }
}

impl MemoryController for Mbc3 {
    fn kind(&self) -> ControllerKind {
        ControllerKind::Mbc3
    }

    fn rom_bank(&self) -> usize {
        self.rom_bank as usize % self.rom_banks
    }

    fn intercept_control_write(&mut self, addr: u16, value: u8) -> Result<(), CoreError> {
        match addr {
            0x0000..=0x1FFF => self.ram_enabled = value & 0x0F == 0x0A,
            0x2000..=0x3FFF => {
                self.rom_bank = match value & 0x7F {
                    0 => 1,
                    n => n,
                };
                log::debug!("MBC3 ROM bank -> {}", self.rom_bank);
            }
            0x4000..=0x5FFF => self.select = value,
            0x6000..=0x7FFF => self.latch(value),
            _ => {
                return Err(CoreError::UndefinedControlRegister {
                    controller: ControllerKind::Mbc3,
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
        match self.select {
            0x00..=0x03 => banked_ram_index(self.ram.len(), self.select as usize, addr)
                .map_or(0xFF, |i| self.ram[i]),
            RTC_FIRST..=RTC_LAST => self.rtc_latched[(self.select - RTC_FIRST) as usize],
            _ => 0xFF,
        }
    }

    fn write_external_ram(&mut self, addr: u16, value: u8) {
        if !self.ram_enabled {
            return;
        }
        match self.select {
            0x00..=0x03 => {
                if let Some(i) = banked_ram_index(self.ram.len(), self.select as usize, addr) {
                    self.ram[i] = value;
                }
            }
            RTC_FIRST..=RTC_LAST => self.rtc[(self.select - RTC_FIRST) as usize] = value,
            _ => {}
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
