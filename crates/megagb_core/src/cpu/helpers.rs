use super::opcodes::OperandKind;
use super::{Bus, Cpu, Flag};

/// Operand decoded from the bytes following an opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    None,
    Byte(u8),
    /// Immediate word or resolved address (A8 operands are already offset
    /// into the 0xFF00 page).
    Word(u16),
    Offset(i8),
}

impl Operand {
    /// Decode the operand of the instruction at `pc`.
    ///
    /// Reads only through `read` and never touches PC, so the same code
    /// serves the executor and side-effect-free disassembly.
    pub fn decode(kind: OperandKind, pc: u16, mut read: impl FnMut(u16) -> u8) -> Self {
        match kind {
            OperandKind::Implied => Operand::None,
            OperandKind::D8 => Operand::Byte(imm8(pc, &mut read)),
            OperandKind::D16 | OperandKind::A16 => Operand::Word(imm16(pc, &mut read)),
            OperandKind::A8 => Operand::Word(high_page(pc, &mut read)),
            OperandKind::R8 => Operand::Offset(rel8(pc, &mut read)),
        }
    }

    #[inline]
    pub fn byte(self) -> u8 {
        match self {
            Operand::Byte(v) => v,
            Operand::Word(v) => v as u8,
            Operand::Offset(v) => v as u8,
            Operand::None => 0,
        }
    }

    #[inline]
    pub fn word(self) -> u16 {
        match self {
            Operand::Word(v) => v,
            Operand::Byte(v) => v as u16,
            Operand::Offset(v) => v as i16 as u16,
            Operand::None => 0,
        }
    }

    #[inline]
    pub fn offset(self) -> i8 {
        match self {
            Operand::Offset(v) => v,
            other => other.byte() as i8,
        }
    }
}

#[inline]
fn imm8(pc: u16, read: &mut impl FnMut(u16) -> u8) -> u8 {
    read(pc.wrapping_add(1))
}

#[inline]
fn imm16(pc: u16, read: &mut impl FnMut(u16) -> u8) -> u16 {
    let lo = read(pc.wrapping_add(1));
    let hi = read(pc.wrapping_add(2));
    u16::from_le_bytes([lo, hi])
}

#[inline]
fn rel8(pc: u16, read: &mut impl FnMut(u16) -> u8) -> i8 {
    imm8(pc, read) as i8
}

#[inline]
fn high_page(pc: u16, read: &mut impl FnMut(u16) -> u8) -> u16 {
    0xFF00 | imm8(pc, read) as u16
}

impl Cpu {
    /// Read an 8-bit operand by its 3-bit encoding (6 is (HL)).
    pub(super) fn read_reg8<B: Bus>(&self, bus: &mut B, index: u8) -> u8 {
        match index & 0x07 {
            0 => self.regs.b,
            1 => self.regs.c,
            2 => self.regs.d,
            3 => self.regs.e,
            4 => self.regs.h,
            5 => self.regs.l,
            6 => bus.read8(self.regs.hl()),
            _ => self.regs.a,
        }
    }

    pub(super) fn write_reg8<B: Bus>(&mut self, bus: &mut B, index: u8, value: u8) {
        match index & 0x07 {
            0 => self.regs.b = value,
            1 => self.regs.c = value,
            2 => self.regs.d = value,
            3 => self.regs.e = value,
            4 => self.regs.h = value,
            5 => self.regs.l = value,
            6 => bus.write8(self.regs.hl(), value),
            _ => self.regs.a = value,
        }
    }

    pub(super) fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, lo);
    }

    pub(super) fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = bus.read8(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let hi = bus.read8(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        u16::from_le_bytes([lo, hi])
    }

    /// Branch condition encoded in bits 3-4 of JR/JP/CALL/RET cc.
    #[inline]
    pub(super) fn cc_condition(&self, opcode: u8) -> bool {
        match (opcode >> 3) & 0x03 {
            0 => !self.get_flag(Flag::Z),
            1 => self.get_flag(Flag::Z),
            2 => !self.get_flag(Flag::C),
            _ => self.get_flag(Flag::C),
        }
    }
}
