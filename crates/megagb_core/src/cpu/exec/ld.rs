use super::Outcome;
use crate::cpu::{alu, Bus, Cpu, Operand};

impl Cpu {
    pub(super) fn exec_ld_rr_d16(&mut self, opcode: u8, operand: Operand) -> Outcome {
        self.regs.set_pair(opcode >> 4, operand.word());
        Outcome::Base
    }

    pub(super) fn exec_ld_r_d8<B: Bus>(
        &mut self,
        bus: &mut B,
        opcode: u8,
        operand: Operand,
    ) -> Outcome {
        self.write_reg8(bus, (opcode >> 3) & 0x07, operand.byte());
        Outcome::Base
    }

    pub(super) fn exec_ld_r_r<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Outcome {
        debug_assert!(opcode != 0x76);
        let value = self.read_reg8(bus, opcode & 0x07);
        self.write_reg8(bus, (opcode >> 3) & 0x07, value);
        Outcome::Base
    }

    /// Address for (BC), (DE), (HL+) and (HL-), applying the HL step.
    fn indirect_addr(&mut self, opcode: u8) -> u16 {
        match opcode >> 4 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            _ => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    pub(super) fn exec_ld_indirect_a<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Outcome {
        let addr = self.indirect_addr(opcode);
        bus.write8(addr, self.regs.a);
        Outcome::Base
    }

    pub(super) fn exec_ld_a_indirect<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Outcome {
        let addr = self.indirect_addr(opcode);
        self.regs.a = bus.read8(addr);
        Outcome::Base
    }

    /// LDH (a8),A / LDH A,(a8) / LD (a16),A / LD A,(a16). The operand is
    /// already a full address.
    pub(super) fn exec_ld_a_direct<B: Bus>(
        &mut self,
        bus: &mut B,
        opcode: u8,
        operand: Operand,
    ) -> Outcome {
        let addr = operand.word();
        if opcode & 0x10 == 0 {
            bus.write8(addr, self.regs.a);
        } else {
            self.regs.a = bus.read8(addr);
        }
        Outcome::Base
    }

    pub(super) fn exec_ldh_c<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Outcome {
        let addr = 0xFF00 | self.regs.c as u16;
        if opcode == 0xE2 {
            bus.write8(addr, self.regs.a);
        } else {
            self.regs.a = bus.read8(addr);
        }
        Outcome::Base
    }

    pub(super) fn exec_ld_a16_sp<B: Bus>(&mut self, bus: &mut B, operand: Operand) -> Outcome {
        let addr = operand.word();
        let [hi, lo] = self.regs.sp.to_be_bytes();
        bus.write8(addr, lo);
        bus.write8(addr.wrapping_add(1), hi);
        Outcome::Base
    }

    pub(super) fn exec_ld_hl_sp_r8(&mut self, operand: Operand) -> Outcome {
        let (value, flags) = alu::add16_signed(self.regs.sp, operand.offset());
        self.regs.set_hl(value);
        self.regs.set_f(flags);
        Outcome::Base
    }

    pub(super) fn exec_ld_sp_hl(&mut self) -> Outcome {
        self.regs.sp = self.regs.hl();
        Outcome::Base
    }
}
