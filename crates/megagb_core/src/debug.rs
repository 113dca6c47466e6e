//! Read-only diagnostics: disassembly and register dumps.
//!
//! Everything here reads through [`MemoryBus::peek`] or a caller-supplied
//! reader and never changes emulator state.

use std::fmt;

use crate::cpu::opcodes::{OperandKind, CB_OPCODES, OPCODES};
use crate::cpu::{Operand, Registers};
use crate::MemoryBus;

/// One decoded instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub addr: u16,
    pub bytes: Vec<u8>,
    pub text: String,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self
            .bytes
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "0x{:04X}: {:<8} {}", self.addr, bytes, self.text)
    }
}

/// Disassemble the instruction at `addr` on the bus.
pub fn disassemble(bus: &MemoryBus, addr: u16) -> Instruction {
    disassemble_with(addr, |a| bus.peek(a))
}

/// Disassemble using an arbitrary byte reader.
pub fn disassemble_with(addr: u16, mut read: impl FnMut(u16) -> u8) -> Instruction {
    let opcode = read(addr);
    let info = &OPCODES[opcode as usize];

    if !info.legal {
        return Instruction {
            addr,
            bytes: vec![opcode],
            text: format!("ILLEGAL 0x{opcode:02X}"),
        };
    }

    let bytes = (0..info.length())
        .map(|i| read(addr.wrapping_add(i)))
        .collect::<Vec<_>>();

    if opcode == 0xCB {
        let cb = CB_OPCODES[bytes[1] as usize];
        return Instruction {
            addr,
            bytes,
            text: cb.mnemonic(),
        };
    }

    let operand = Operand::decode(info.operand, addr, &mut read);
    Instruction {
        addr,
        bytes,
        text: render(info.mnemonic, info.operand, operand),
    }
}

fn render(mnemonic: &str, kind: OperandKind, operand: Operand) -> String {
    let Some(token) = kind.placeholder() else {
        return mnemonic.to_string();
    };
    match operand {
        Operand::Byte(v) => mnemonic.replace(token, &format!("0x{v:02X}")),
        Operand::Word(v) => mnemonic.replace(token, &format!("0x{v:04X}")),
        Operand::Offset(v) => {
            // "SP+r8" should read "SP+5" / "SP-3", not "SP++5".
            let signed = format!("{v:+}");
            mnemonic.replace("+r8", &signed).replace(token, &signed)
        }
        Operand::None => mnemonic.to_string(),
    }
}

/// Flags in the `[Z1 N0 H1 C1]` form.
pub fn format_flags(f: u8) -> String {
    format!(
        "[Z{} N{} H{} C{}]",
        (f >> 7) & 1,
        (f >> 6) & 1,
        (f >> 5) & 1,
        (f >> 4) & 1
    )
}

pub fn format_registers(regs: &Registers) -> String {
    format!(
        "AF=0x{:04X} BC=0x{:04X} DE=0x{:04X} HL=0x{:04X} SP=0x{:04X} PC=0x{:04X} {}",
        regs.af(),
        regs.bc(),
        regs.de(),
        regs.hl(),
        regs.sp,
        regs.pc,
        format_flags(regs.f())
    )
}

/// Single trace line for the instruction about to execute at PC.
pub fn trace_line(regs: &Registers, bus: &MemoryBus) -> String {
    let instruction = disassemble(bus, regs.pc);
    format!(
        "[0x{:04X}]{} {:<16} {}",
        regs.pc,
        format_flags(regs.f()),
        instruction.text,
        format_registers(regs)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disasm(bytes: &[u8]) -> Instruction {
        disassemble_with(0x0100, |addr| {
            bytes
                .get(addr.wrapping_sub(0x0100) as usize)
                .copied()
                .unwrap_or(0x00)
        })
    }

    #[test]
    fn disassembles_known_sequences() {
        assert_eq!(disasm(&[0x00]).text, "NOP");
        assert_eq!(disasm(&[0x3E, 0x12]).text, "LD A,0x12");
        assert_eq!(disasm(&[0x21, 0x34, 0x12]).text, "LD HL,0x1234");
        assert_eq!(disasm(&[0xC3, 0x50, 0x01]).text, "JP 0x0150");
        assert_eq!(disasm(&[0xE0, 0x40]).text, "LDH (0xFF40),A");
        assert_eq!(disasm(&[0x20, 0xFE]).text, "JR NZ,-2");
        assert_eq!(disasm(&[0xF8, 0x05]).text, "LD HL,SP+5");
        assert_eq!(disasm(&[0xE8, 0xFD]).text, "ADD SP,-3");
        assert_eq!(disasm(&[0xCB, 0x7C]).text, "BIT 7,H");
        assert_eq!(disasm(&[0x10, 0x00]).text, "STOP");
        assert_eq!(disasm(&[0xD3]).text, "ILLEGAL 0xD3");
    }

    #[test]
    fn instruction_reports_raw_bytes() {
        let insn = disasm(&[0xFA, 0x00, 0xC0]);
        assert_eq!(insn.bytes, vec![0xFA, 0x00, 0xC0]);
        assert_eq!(insn.to_string(), "0x0100: FA 00 C0 LD A,(0xC000)");
    }

    #[test]
    fn flags_and_registers_render() {
        assert_eq!(format_flags(0xB0), "[Z1 N0 H1 C1]");
        assert_eq!(format_flags(0x40), "[Z0 N1 H0 C0]");

        let mut regs = Registers::default();
        regs.set_af(0x01B0);
        regs.set_hl(0x014D);
        regs.sp = 0xFFFE;
        regs.pc = 0x0100;
        assert_eq!(
            format_registers(&regs),
            "AF=0x01B0 BC=0x0000 DE=0x0000 HL=0x014D SP=0xFFFE PC=0x0100 [Z1 N0 H1 C1]"
        );
    }
}
