use thiserror::Error;

use crate::machine::ControllerKind;

/// Fatal conditions raised by the core.
///
/// None of these are recoverable for the running session: once the CPU
/// surfaces one it enters [`CpuState::Terminated`](crate::CpuState) and the
/// driving loop decides whether to abort, snapshot or report it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("illegal opcode 0x{opcode:02X} at PC=0x{pc:04X} (F=0x{flags:02X})")]
    IllegalOpcode { opcode: u8, pc: u16, flags: u8 },

    #[error("{controller} has no register at 0x{addr:04X} (wrote 0x{value:02X})")]
    UndefinedControlRegister {
        controller: ControllerKind,
        addr: u16,
        value: u8,
    },

    #[error("memory controller accessed after release (0x{addr:04X})")]
    ControllerReleased { addr: u16 },

    #[error("CPU has terminated; no further steps are possible")]
    Terminated,

    #[error("unsupported cartridge type 0x{0:02X}")]
    UnsupportedCartridgeType(u8),

    #[error("unsupported ROM size code 0x{0:02X}")]
    UnsupportedRomSize(u8),

    #[error("unsupported RAM size code 0x{0:02X}")]
    UnsupportedRamSize(u8),

    #[error("ROM image of {0} bytes is too small to hold a cartridge header")]
    RomTooSmall(usize),

    #[error("header checksum mismatch: header says 0x{expected:02X}, computed 0x{computed:02X}")]
    HeaderChecksum { expected: u8, computed: u8 },

    #[error("{controller} has no battery-backed RAM")]
    NoBatteryRam { controller: ControllerKind },

    #[error("battery RAM blob is {actual} bytes, expected {expected}")]
    BatteryRamSize { expected: usize, actual: usize },
}
