use super::Outcome;
use crate::cpu::{Bus, Cpu, Operand};

impl Cpu {
    /// JR relative to the address of the next instruction.
    pub(super) fn exec_jr(&mut self, operand: Operand, taken: bool) -> Outcome {
        if taken {
            self.regs.pc = self.regs.pc.wrapping_add(operand.offset() as i16 as u16);
        }
        Outcome::branch(taken)
    }

    pub(super) fn exec_jp(&mut self, operand: Operand, taken: bool) -> Outcome {
        if taken {
            self.regs.pc = operand.word();
        }
        Outcome::branch(taken)
    }

    pub(super) fn exec_jp_hl(&mut self) -> Outcome {
        self.regs.pc = self.regs.hl();
        Outcome::Base
    }

    pub(super) fn exec_call<B: Bus>(
        &mut self,
        bus: &mut B,
        operand: Operand,
        taken: bool,
    ) -> Outcome {
        if taken {
            let ret = self.regs.pc;
            self.push_u16(bus, ret);
            self.regs.pc = operand.word();
        }
        Outcome::branch(taken)
    }

    pub(super) fn exec_ret<B: Bus>(&mut self, bus: &mut B) -> Outcome {
        self.regs.pc = self.pop_u16(bus);
        Outcome::Base
    }

    pub(super) fn exec_ret_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Outcome {
        let taken = self.cc_condition(opcode);
        if taken {
            self.regs.pc = self.pop_u16(bus);
        }
        Outcome::branch(taken)
    }

    /// RETI enables interrupts immediately, unlike EI.
    pub(super) fn exec_reti<B: Bus>(&mut self, bus: &mut B) -> Outcome {
        self.regs.pc = self.pop_u16(bus);
        self.ime = true;
        self.ime_enable_pending = false;
        self.ime_enable_delay = false;
        Outcome::Base
    }

    pub(super) fn exec_rst<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Outcome {
        let ret = self.regs.pc;
        self.push_u16(bus, ret);
        self.regs.pc = (opcode & 0x38) as u16;
        Outcome::Base
    }
}
