//! Static instruction tables shared by the executor and the disassembler.
//!
//! Costs are in machine cycles. Mnemonics carry a placeholder (`d8`, `d16`,
//! `a8`, `a16`, `r8`) where the decoded operand is substituted for display.

/// How the bytes after an opcode are interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandKind {
    Implied,
    /// Immediate byte.
    D8,
    /// Immediate little-endian word.
    D16,
    /// Offset into the 0xFF00 page.
    A8,
    /// Absolute little-endian address.
    A16,
    /// Signed relative offset.
    R8,
}

impl OperandKind {
    /// Encoded instruction length, opcode included.
    #[inline]
    pub const fn length(self) -> u16 {
        match self {
            OperandKind::Implied => 1,
            OperandKind::D8 | OperandKind::A8 | OperandKind::R8 => 2,
            OperandKind::D16 | OperandKind::A16 => 3,
        }
    }

    pub const fn placeholder(self) -> Option<&'static str> {
        match self {
            OperandKind::Implied => None,
            OperandKind::D8 => Some("d8"),
            OperandKind::D16 => Some("d16"),
            OperandKind::A8 => Some("a8"),
            OperandKind::A16 => Some("a16"),
            OperandKind::R8 => Some("r8"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpInfo {
    pub mnemonic: &'static str,
    pub operand: OperandKind,
    /// Cost when no branch is taken (or for unconditional instructions).
    pub cycles: u8,
    /// Cost of a taken conditional branch; equal to `cycles` otherwise.
    pub taken: u8,
    pub legal: bool,
}

impl OpInfo {
    const fn op(mnemonic: &'static str, operand: OperandKind, cycles: u8) -> Self {
        Self {
            mnemonic,
            operand,
            cycles,
            taken: cycles,
            legal: true,
        }
    }

    const fn branch(mnemonic: &'static str, operand: OperandKind, cycles: u8, taken: u8) -> Self {
        Self {
            mnemonic,
            operand,
            cycles,
            taken,
            legal: true,
        }
    }

    pub const ILLEGAL: Self = Self {
        mnemonic: "ILLEGAL",
        operand: OperandKind::Implied,
        cycles: 0,
        taken: 0,
        legal: false,
    };

    #[inline]
    pub const fn length(&self) -> u16 {
        self.operand.length()
    }
}

use OperandKind::{Implied as I, A16, A8, D16, D8, R8};

const fn op(mnemonic: &'static str, operand: OperandKind, cycles: u8) -> OpInfo {
    OpInfo::op(mnemonic, operand, cycles)
}

const fn br(mnemonic: &'static str, operand: OperandKind, cycles: u8, taken: u8) -> OpInfo {
    OpInfo::branch(mnemonic, operand, cycles, taken)
}

const XX: OpInfo = OpInfo::ILLEGAL;

/// Primary opcode table.
///
/// 0xCB is listed with the cost of the prefix fetch alone; the executor
/// charges the matching [`CB_OPCODES`] entry instead, which includes it.
#[rustfmt::skip]
pub static OPCODES: [OpInfo; 256] = [
    // 0x00
    op("NOP", I, 1), op("LD BC,d16", D16, 3), op("LD (BC),A", I, 2), op("INC BC", I, 2),
    op("INC B", I, 1), op("DEC B", I, 1), op("LD B,d8", D8, 2), op("RLCA", I, 1),
    op("LD (a16),SP", A16, 5), op("ADD HL,BC", I, 2), op("LD A,(BC)", I, 2), op("DEC BC", I, 2),
    op("INC C", I, 1), op("DEC C", I, 1), op("LD C,d8", D8, 2), op("RRCA", I, 1),
    // 0x10
    op("STOP", D8, 1), op("LD DE,d16", D16, 3), op("LD (DE),A", I, 2), op("INC DE", I, 2),
    op("INC D", I, 1), op("DEC D", I, 1), op("LD D,d8", D8, 2), op("RLA", I, 1),
    op("JR r8", R8, 3), op("ADD HL,DE", I, 2), op("LD A,(DE)", I, 2), op("DEC DE", I, 2),
    op("INC E", I, 1), op("DEC E", I, 1), op("LD E,d8", D8, 2), op("RRA", I, 1),
    // 0x20
    br("JR NZ,r8", R8, 2, 3), op("LD HL,d16", D16, 3), op("LD (HL+),A", I, 2), op("INC HL", I, 2),
    op("INC H", I, 1), op("DEC H", I, 1), op("LD H,d8", D8, 2), op("DAA", I, 1),
    br("JR Z,r8", R8, 2, 3), op("ADD HL,HL", I, 2), op("LD A,(HL+)", I, 2), op("DEC HL", I, 2),
    op("INC L", I, 1), op("DEC L", I, 1), op("LD L,d8", D8, 2), op("CPL", I, 1),
    // 0x30
    br("JR NC,r8", R8, 2, 3), op("LD SP,d16", D16, 3), op("LD (HL-),A", I, 2), op("INC SP", I, 2),
    op("INC (HL)", I, 3), op("DEC (HL)", I, 3), op("LD (HL),d8", D8, 3), op("SCF", I, 1),
    br("JR C,r8", R8, 2, 3), op("ADD HL,SP", I, 2), op("LD A,(HL-)", I, 2), op("DEC SP", I, 2),
    op("INC A", I, 1), op("DEC A", I, 1), op("LD A,d8", D8, 2), op("CCF", I, 1),
    // 0x40
    op("LD B,B", I, 1), op("LD B,C", I, 1), op("LD B,D", I, 1), op("LD B,E", I, 1),
    op("LD B,H", I, 1), op("LD B,L", I, 1), op("LD B,(HL)", I, 2), op("LD B,A", I, 1),
    op("LD C,B", I, 1), op("LD C,C", I, 1), op("LD C,D", I, 1), op("LD C,E", I, 1),
    op("LD C,H", I, 1), op("LD C,L", I, 1), op("LD C,(HL)", I, 2), op("LD C,A", I, 1),
    // 0x50
    op("LD D,B", I, 1), op("LD D,C", I, 1), op("LD D,D", I, 1), op("LD D,E", I, 1),
    op("LD D,H", I, 1), op("LD D,L", I, 1), op("LD D,(HL)", I, 2), op("LD D,A", I, 1),
    op("LD E,B", I, 1), op("LD E,C", I, 1), op("LD E,D", I, 1), op("LD E,E", I, 1),
    op("LD E,H", I, 1), op("LD E,L", I, 1), op("LD E,(HL)", I, 2), op("LD E,A", I, 1),
    // 0x60
    op("LD H,B", I, 1), op("LD H,C", I, 1), op("LD H,D", I, 1), op("LD H,E", I, 1),
    op("LD H,H", I, 1), op("LD H,L", I, 1), op("LD H,(HL)", I, 2), op("LD H,A", I, 1),
    op("LD L,B", I, 1), op("LD L,C", I, 1), op("LD L,D", I, 1), op("LD L,E", I, 1),
    op("LD L,H", I, 1), op("LD L,L", I, 1), op("LD L,(HL)", I, 2), op("LD L,A", I, 1),
    // 0x70
    op("LD (HL),B", I, 2), op("LD (HL),C", I, 2), op("LD (HL),D", I, 2), op("LD (HL),E", I, 2),
    op("LD (HL),H", I, 2), op("LD (HL),L", I, 2), op("HALT", I, 1), op("LD (HL),A", I, 2),
    op("LD A,B", I, 1), op("LD A,C", I, 1), op("LD A,D", I, 1), op("LD A,E", I, 1),
    op("LD A,H", I, 1), op("LD A,L", I, 1), op("LD A,(HL)", I, 2), op("LD A,A", I, 1),
    // 0x80
    op("ADD A,B", I, 1), op("ADD A,C", I, 1), op("ADD A,D", I, 1), op("ADD A,E", I, 1),
    op("ADD A,H", I, 1), op("ADD A,L", I, 1), op("ADD A,(HL)", I, 2), op("ADD A,A", I, 1),
    op("ADC A,B", I, 1), op("ADC A,C", I, 1), op("ADC A,D", I, 1), op("ADC A,E", I, 1),
    op("ADC A,H", I, 1), op("ADC A,L", I, 1), op("ADC A,(HL)", I, 2), op("ADC A,A", I, 1),
    // 0x90
    op("SUB B", I, 1), op("SUB C", I, 1), op("SUB D", I, 1), op("SUB E", I, 1),
    op("SUB H", I, 1), op("SUB L", I, 1), op("SUB (HL)", I, 2), op("SUB A", I, 1),
    op("SBC A,B", I, 1), op("SBC A,C", I, 1), op("SBC A,D", I, 1), op("SBC A,E", I, 1),
    op("SBC A,H", I, 1), op("SBC A,L", I, 1), op("SBC A,(HL)", I, 2), op("SBC A,A", I, 1),
    // 0xA0
    op("AND B", I, 1), op("AND C", I, 1), op("AND D", I, 1), op("AND E", I, 1),
    op("AND H", I, 1), op("AND L", I, 1), op("AND (HL)", I, 2), op("AND A", I, 1),
    op("XOR B", I, 1), op("XOR C", I, 1), op("XOR D", I, 1), op("XOR E", I, 1),
    op("XOR H", I, 1), op("XOR L", I, 1), op("XOR (HL)", I, 2), op("XOR A", I, 1),
    // 0xB0
    op("OR B", I, 1), op("OR C", I, 1), op("OR D", I, 1), op("OR E", I, 1),
    op("OR H", I, 1), op("OR L", I, 1), op("OR (HL)", I, 2), op("OR A", I, 1),
    op("CP B", I, 1), op("CP C", I, 1), op("CP D", I, 1), op("CP E", I, 1),
    op("CP H", I, 1), op("CP L", I, 1), op("CP (HL)", I, 2), op("CP A", I, 1),
    // 0xC0
    br("RET NZ", I, 2, 5), op("POP BC", I, 3), br("JP NZ,a16", A16, 3, 4), op("JP a16", A16, 4),
    br("CALL NZ,a16", A16, 3, 6), op("PUSH BC", I, 4), op("ADD A,d8", D8, 2), op("RST 00H", I, 4),
    br("RET Z", I, 2, 5), op("RET", I, 4), br("JP Z,a16", A16, 3, 4), op("PREFIX CB", D8, 1),
    br("CALL Z,a16", A16, 3, 6), op("CALL a16", A16, 6), op("ADC A,d8", D8, 2), op("RST 08H", I, 4),
    // 0xD0
    br("RET NC", I, 2, 5), op("POP DE", I, 3), br("JP NC,a16", A16, 3, 4), XX,
    br("CALL NC,a16", A16, 3, 6), op("PUSH DE", I, 4), op("SUB d8", D8, 2), op("RST 10H", I, 4),
    br("RET C", I, 2, 5), op("RETI", I, 4), br("JP C,a16", A16, 3, 4), XX,
    br("CALL C,a16", A16, 3, 6), XX, op("SBC A,d8", D8, 2), op("RST 18H", I, 4),
    // 0xE0
    op("LDH (a8),A", A8, 3), op("POP HL", I, 3), op("LD (C),A", I, 2), XX,
    XX, op("PUSH HL", I, 4), op("AND d8", D8, 2), op("RST 20H", I, 4),
    op("ADD SP,r8", R8, 4), op("JP HL", I, 1), op("LD (a16),A", A16, 4), XX,
    XX, XX, op("XOR d8", D8, 2), op("RST 28H", I, 4),
    // 0xF0
    op("LDH A,(a8)", A8, 3), op("POP AF", I, 3), op("LD A,(C)", I, 2), op("DI", I, 1),
    XX, op("PUSH AF", I, 4), op("OR d8", D8, 2), op("RST 30H", I, 4),
    op("LD HL,SP+r8", R8, 3), op("LD SP,HL", I, 2), op("LD A,(a16)", A16, 4), op("EI", I, 1),
    XX, XX, op("CP d8", D8, 2), op("RST 38H", I, 4),
];

/// Operation encoded by a CB-prefixed opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CbOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
    Bit(u8),
    Res(u8),
    Set(u8),
}

impl CbOp {
    pub const fn name(self) -> &'static str {
        match self {
            CbOp::Rlc => "RLC",
            CbOp::Rrc => "RRC",
            CbOp::Rl => "RL",
            CbOp::Rr => "RR",
            CbOp::Sla => "SLA",
            CbOp::Sra => "SRA",
            CbOp::Swap => "SWAP",
            CbOp::Srl => "SRL",
            CbOp::Bit(_) => "BIT",
            CbOp::Res(_) => "RES",
            CbOp::Set(_) => "SET",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CbInfo {
    pub op: CbOp,
    /// Operand register index (0=B .. 5=L, 6=(HL), 7=A).
    pub reg: u8,
    /// Total cost including the 0xCB prefix.
    pub cycles: u8,
}

impl CbInfo {
    const fn decode(byte: u8) -> Self {
        let x = byte >> 6;
        let y = (byte >> 3) & 0x07;
        let reg = byte & 0x07;
        let op = match x {
            0 => match y {
                0 => CbOp::Rlc,
                1 => CbOp::Rrc,
                2 => CbOp::Rl,
                3 => CbOp::Rr,
                4 => CbOp::Sla,
                5 => CbOp::Sra,
                6 => CbOp::Swap,
                _ => CbOp::Srl,
            },
            1 => CbOp::Bit(y),
            2 => CbOp::Res(y),
            _ => CbOp::Set(y),
        };
        let cycles = match (reg, x) {
            (6, 1) => 3,
            (6, _) => 4,
            _ => 2,
        };
        Self { op, reg, cycles }
    }

    pub fn mnemonic(&self) -> String {
        let reg = REG8_NAMES[self.reg as usize];
        match self.op {
            CbOp::Bit(n) | CbOp::Res(n) | CbOp::Set(n) => {
                format!("{} {},{}", self.op.name(), n, reg)
            }
            _ => format!("{} {}", self.op.name(), reg),
        }
    }
}

/// CB-prefixed table, indexed by the byte following 0xCB.
pub static CB_OPCODES: [CbInfo; 256] = {
    let mut table = [CbInfo {
        op: CbOp::Rlc,
        reg: 0,
        cycles: 0,
    }; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = CbInfo::decode(i as u8);
        i += 1;
    }
    table
};

/// Display names of the 3-bit register operand encoding.
pub const REG8_NAMES: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];
