mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;

use super::{Bus, Cpu, Operand};

/// Which cost the step loop charges for an executed opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Outcome {
    /// The table's base cost.
    Base,
    /// A conditional branch was taken.
    Taken,
    /// Cost decided by the executor (CB-prefixed instructions).
    Cycles(u8),
}

impl Outcome {
    #[inline]
    fn branch(taken: bool) -> Self {
        if taken {
            Outcome::Taken
        } else {
            Outcome::Base
        }
    }
}

impl Cpu {
    /// Execute one decoded, legal opcode. PC already points past the whole
    /// instruction.
    pub(super) fn exec_opcode<B: Bus>(
        &mut self,
        bus: &mut B,
        opcode: u8,
        operand: Operand,
    ) -> Outcome {
        match opcode {
            0x00 => Outcome::Base,

            // 16-bit loads and arithmetic.
            0x01 | 0x11 | 0x21 | 0x31 => self.exec_ld_rr_d16(opcode, operand),
            0x03 | 0x13 | 0x23 | 0x33 => self.exec_inc16(opcode),
            0x0B | 0x1B | 0x2B | 0x3B => self.exec_dec16(opcode),
            0x09 | 0x19 | 0x29 | 0x39 => self.exec_add_hl_rr(opcode),
            0x08 => self.exec_ld_a16_sp(bus, operand),
            0xE8 => self.exec_add_sp_r8(operand),
            0xF8 => self.exec_ld_hl_sp_r8(operand),
            0xF9 => self.exec_ld_sp_hl(),

            // 8-bit INC/DEC, including (HL).
            0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => self.exec_inc8(bus, opcode),
            0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => self.exec_dec8(bus, opcode),

            // LD r,d8 and LD (HL),d8.
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
                self.exec_ld_r_d8(bus, opcode, operand)
            }

            // Indirect accumulator transfers.
            0x02 | 0x12 | 0x22 | 0x32 => self.exec_ld_indirect_a(bus, opcode),
            0x0A | 0x1A | 0x2A | 0x3A => self.exec_ld_a_indirect(bus, opcode),
            0xE0 | 0xF0 | 0xEA | 0xFA => self.exec_ld_a_direct(bus, opcode, operand),
            0xE2 | 0xF2 => self.exec_ldh_c(bus, opcode),

            // Accumulator rotates and flag operations.
            0x07 | 0x0F | 0x17 | 0x1F => self.exec_rotate_a(opcode),
            0x27 => self.exec_daa(),
            0x2F => self.exec_cpl(),
            0x37 => self.exec_scf(),
            0x3F => self.exec_ccf(),

            0x10 => self.exec_stop(),
            0x76 => self.exec_halt(),
            0xF3 => self.exec_di(),
            0xFB => self.exec_ei(),

            // LD r,r' over the whole block except HALT.
            0x40..=0x7F => self.exec_ld_r_r(bus, opcode),

            // ALU A,r and ALU A,d8.
            0x80..=0xBF => {
                let value = self.read_reg8(bus, opcode & 0x07);
                self.exec_alu_a((opcode >> 3) & 0x07, value)
            }
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
                self.exec_alu_a((opcode >> 3) & 0x07, operand.byte())
            }

            // Control flow.
            0x18 => self.exec_jr(operand, true),
            0x20 | 0x28 | 0x30 | 0x38 => self.exec_jr(operand, self.cc_condition(opcode)),
            0xC3 => self.exec_jp(operand, true),
            0xC2 | 0xCA | 0xD2 | 0xDA => self.exec_jp(operand, self.cc_condition(opcode)),
            0xE9 => self.exec_jp_hl(),
            0xCD => self.exec_call(bus, operand, true),
            0xC4 | 0xCC | 0xD4 | 0xDC => self.exec_call(bus, operand, self.cc_condition(opcode)),
            0xC9 => self.exec_ret(bus),
            0xC0 | 0xC8 | 0xD0 | 0xD8 => self.exec_ret_cc(bus, opcode),
            0xD9 => self.exec_reti(bus),
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => self.exec_rst(bus, opcode),

            // Stack.
            0xC1 | 0xD1 | 0xE1 | 0xF1 => self.exec_pop(bus, opcode),
            0xC5 | 0xD5 | 0xE5 | 0xF5 => self.exec_push(bus, opcode),

            0xCB => self.exec_cb(bus, operand.byte()),

            // Holes in the opcode map are rejected by the step loop before
            // execution.
            _ => Outcome::Base,
        }
    }
}
