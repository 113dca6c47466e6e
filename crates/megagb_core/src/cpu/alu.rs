//! Pure arithmetic/logic helpers.
//!
//! Every function returns the result together with the complete new flag
//! nibble. Flags an instruction does not touch are threaded through from the
//! caller's current F, so the executor can apply the outcome with a single
//! `set_f`.

use super::opcodes::CbOp;
use super::Flag;

const Z: u8 = Flag::Z.mask();
const N: u8 = Flag::N.mask();
const H: u8 = Flag::H.mask();
const C: u8 = Flag::C.mask();

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AluOut {
    pub value: u8,
    pub flags: u8,
}

#[inline]
const fn pack(z: bool, n: bool, h: bool, c: bool) -> u8 {
    (if z { Z } else { 0 })
        | (if n { N } else { 0 })
        | (if h { H } else { 0 })
        | (if c { C } else { 0 })
}

/// ADD/ADC. Z from the result, N cleared, H on carry out of bit 3, C on
/// carry out of bit 7.
pub(crate) fn add8(a: u8, b: u8, carry_in: bool) -> AluOut {
    let carry = carry_in as u16;
    let half = (a & 0x0F) as u16 + (b & 0x0F) as u16 + carry;
    let full = a as u16 + b as u16 + carry;
    let value = full as u8;
    AluOut {
        value,
        flags: pack(value == 0, false, half > 0x0F, full > 0xFF),
    }
}

/// SUB/SBC/CP. N set, H on borrow from bit 4, C on borrow from bit 8.
pub(crate) fn sub8(a: u8, b: u8, carry_in: bool) -> AluOut {
    let carry = carry_in as i16;
    let half = (a & 0x0F) as i16 - (b & 0x0F) as i16 - carry;
    let full = a as i16 - b as i16 - carry;
    let value = full as u8;
    AluOut {
        value,
        flags: pack(value == 0, true, half < 0, full < 0),
    }
}

pub(crate) fn and8(a: u8, b: u8) -> AluOut {
    let value = a & b;
    AluOut {
        value,
        flags: pack(value == 0, false, true, false),
    }
}

pub(crate) fn or8(a: u8, b: u8) -> AluOut {
    let value = a | b;
    AluOut {
        value,
        flags: pack(value == 0, false, false, false),
    }
}

pub(crate) fn xor8(a: u8, b: u8) -> AluOut {
    let value = a ^ b;
    AluOut {
        value,
        flags: pack(value == 0, false, false, false),
    }
}

/// INC r / INC (HL). C is preserved.
pub(crate) fn inc8(value: u8, f: u8) -> AluOut {
    let result = value.wrapping_add(1);
    AluOut {
        value: result,
        flags: pack(result == 0, false, value & 0x0F == 0x0F, false) | (f & C),
    }
}

/// DEC r / DEC (HL). C is preserved.
pub(crate) fn dec8(value: u8, f: u8) -> AluOut {
    let result = value.wrapping_sub(1);
    AluOut {
        value: result,
        flags: pack(result == 0, true, value & 0x0F == 0x00, false) | (f & C),
    }
}

/// ADD HL,rr. Z is preserved, N cleared, H from bit 11, C from bit 15.
pub(crate) fn add16(hl: u16, value: u16, f: u8) -> (u16, u8) {
    let h = (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF;
    let c = hl as u32 + value as u32 > 0xFFFF;
    (hl.wrapping_add(value), (f & Z) | pack(false, false, h, c))
}

/// ADD SP,e and LD HL,SP+e. Z and N cleared; H and C come from the
/// unsigned addition of the low byte.
pub(crate) fn add16_signed(base: u16, offset: i8) -> (u16, u8) {
    let imm = offset as i16 as u16;
    let h = (base & 0x000F) + (imm & 0x000F) > 0x000F;
    let c = (base & 0x00FF) + (imm & 0x00FF) > 0x00FF;
    (base.wrapping_add(imm), pack(false, false, h, c))
}

/// Decimal adjust after a BCD addition or subtraction. N is preserved.
pub(crate) fn daa(a: u8, f: u8) -> AluOut {
    let subtract = f & N != 0;
    let mut adjust = 0u8;
    let mut carry = f & C != 0;

    if f & H != 0 || (!subtract && a & 0x0F > 0x09) {
        adjust |= 0x06;
    }
    if carry || (!subtract && a > 0x99) {
        adjust |= 0x60;
        carry = true;
    }

    let value = if subtract {
        a.wrapping_sub(adjust)
    } else {
        a.wrapping_add(adjust)
    };

    AluOut {
        value,
        flags: pack(value == 0, subtract, false, carry),
    }
}

/// Rotate and shift group of the CB table. Z from the result, N and H
/// cleared, C from the bit shifted out (SWAP clears it).
pub(crate) fn shift(op: CbOp, value: u8, carry_in: bool) -> AluOut {
    let (result, carry) = match op {
        CbOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
        CbOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
        CbOp::Rl => ((value << 1) | carry_in as u8, value & 0x80 != 0),
        CbOp::Rr => ((value >> 1) | ((carry_in as u8) << 7), value & 0x01 != 0),
        CbOp::Sla => (value << 1, value & 0x80 != 0),
        CbOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
        CbOp::Swap => (value.rotate_left(4), false),
        CbOp::Srl => (value >> 1, value & 0x01 != 0),
        CbOp::Bit(_) | CbOp::Res(_) | CbOp::Set(_) => (value, carry_in),
    };
    AluOut {
        value: result,
        flags: pack(result == 0, false, false, carry),
    }
}
