use super::Outcome;
use crate::cpu::{alu, Bus, Cpu};

impl Cpu {
    pub(super) fn exec_inc8<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Outcome {
        let index = (opcode >> 3) & 0x07;
        let out = alu::inc8(self.read_reg8(bus, index), self.regs.f());
        self.write_reg8(bus, index, out.value);
        self.regs.set_f(out.flags);
        Outcome::Base
    }

    pub(super) fn exec_dec8<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Outcome {
        let index = (opcode >> 3) & 0x07;
        let out = alu::dec8(self.read_reg8(bus, index), self.regs.f());
        self.write_reg8(bus, index, out.value);
        self.regs.set_f(out.flags);
        Outcome::Base
    }

    // 16-bit INC/DEC leave the flags alone.
    pub(super) fn exec_inc16(&mut self, opcode: u8) -> Outcome {
        let index = opcode >> 4;
        self.regs.set_pair(index, self.regs.pair(index).wrapping_add(1));
        Outcome::Base
    }

    pub(super) fn exec_dec16(&mut self, opcode: u8) -> Outcome {
        let index = opcode >> 4;
        self.regs.set_pair(index, self.regs.pair(index).wrapping_sub(1));
        Outcome::Base
    }
}
