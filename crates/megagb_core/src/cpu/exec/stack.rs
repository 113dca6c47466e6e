use super::Outcome;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    // Index 3 is AF here, not SP.
    pub(super) fn exec_push<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Outcome {
        let value = match (opcode >> 4) & 0x03 {
            3 => self.regs.af(),
            index => self.regs.pair(index),
        };
        self.push_u16(bus, value);
        Outcome::Base
    }

    pub(super) fn exec_pop<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Outcome {
        let value = self.pop_u16(bus);
        match (opcode >> 4) & 0x03 {
            3 => self.regs.set_af(value),
            index => self.regs.set_pair(index, value),
        }
        Outcome::Base
    }
}
