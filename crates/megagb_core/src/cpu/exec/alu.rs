use super::Outcome;
use crate::cpu::{alu, Cpu, Flag, Operand};

impl Cpu {
    /// ADD/ADC/SUB/SBC/AND/XOR/OR/CP selected by bits 3-5 of the opcode.
    pub(super) fn exec_alu_a(&mut self, group: u8, value: u8) -> Outcome {
        let a = self.regs.a;
        let carry = self.get_flag(Flag::C);
        let out = match group & 0x07 {
            0 => alu::add8(a, value, false),
            1 => alu::add8(a, value, carry),
            2 => alu::sub8(a, value, false),
            3 => alu::sub8(a, value, carry),
            4 => alu::and8(a, value),
            5 => alu::xor8(a, value),
            6 => alu::or8(a, value),
            _ => alu::sub8(a, value, false),
        };
        // CP only compares.
        if group & 0x07 != 7 {
            self.regs.a = out.value;
        }
        self.regs.set_f(out.flags);
        Outcome::Base
    }

    pub(super) fn exec_add_hl_rr(&mut self, opcode: u8) -> Outcome {
        let (value, flags) = alu::add16(self.regs.hl(), self.regs.pair(opcode >> 4), self.regs.f());
        self.regs.set_hl(value);
        self.regs.set_f(flags);
        Outcome::Base
    }

    pub(super) fn exec_add_sp_r8(&mut self, operand: Operand) -> Outcome {
        let (value, flags) = alu::add16_signed(self.regs.sp, operand.offset());
        self.regs.sp = value;
        self.regs.set_f(flags);
        Outcome::Base
    }

    /// RLCA/RRCA/RLA/RRA: like their CB forms but Z is always cleared.
    pub(super) fn exec_rotate_a(&mut self, opcode: u8) -> Outcome {
        use crate::cpu::opcodes::CbOp;

        let op = match opcode {
            0x07 => CbOp::Rlc,
            0x0F => CbOp::Rrc,
            0x17 => CbOp::Rl,
            _ => CbOp::Rr,
        };
        let out = alu::shift(op, self.regs.a, self.get_flag(Flag::C));
        self.regs.a = out.value;
        self.regs.set_f(out.flags & !Flag::Z.mask());
        Outcome::Base
    }

    pub(super) fn exec_daa(&mut self) -> Outcome {
        let out = alu::daa(self.regs.a, self.regs.f());
        self.regs.a = out.value;
        self.regs.set_f(out.flags);
        Outcome::Base
    }

    pub(super) fn exec_cpl(&mut self) -> Outcome {
        self.regs.a = !self.regs.a;
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, true);
        Outcome::Base
    }

    pub(super) fn exec_scf(&mut self) -> Outcome {
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, true);
        Outcome::Base
    }

    pub(super) fn exec_ccf(&mut self) -> Outcome {
        let carry = self.get_flag(Flag::C);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, !carry);
        Outcome::Base
    }
}
