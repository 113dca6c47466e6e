use super::exec::Outcome;
use super::opcodes::{CbOp, CB_OPCODES};
use super::{alu, Bus, Cpu, Flag};

impl Cpu {
    /// Execute the CB-prefixed instruction selected by `byte`.
    pub(super) fn exec_cb<B: Bus>(&mut self, bus: &mut B, byte: u8) -> Outcome {
        let info = CB_OPCODES[byte as usize];
        let value = self.read_reg8(bus, info.reg);

        match info.op {
            CbOp::Bit(bit) => {
                // Z reflects the tested bit, N cleared, H set, C unchanged.
                self.set_flag(Flag::Z, value & (1 << bit) == 0);
                self.set_flag(Flag::N, false);
                self.set_flag(Flag::H, true);
            }
            CbOp::Res(bit) => self.write_reg8(bus, info.reg, value & !(1 << bit)),
            CbOp::Set(bit) => self.write_reg8(bus, info.reg, value | (1 << bit)),
            op => {
                let out = alu::shift(op, value, self.get_flag(Flag::C));
                self.write_reg8(bus, info.reg, out.value);
                self.regs.set_f(out.flags);
            }
        }

        Outcome::Cycles(info.cycles)
    }
}
