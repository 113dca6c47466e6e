pub mod config;
pub mod cpu;
pub mod debug;
pub mod error;
pub mod machine;

pub use config::CoreConfig;
pub use cpu::{Bus, Cpu, CpuState, Flag, Registers};
pub use error::CoreError;
pub use machine::{
    Cartridge, CartridgeHeader, ControllerKind, EmulationContext, Interrupts, MemoryBus,
    RamSize, RomSize,
};

/// Duration of one machine cycle in clock ticks.
pub const TICKS_PER_MACHINE_CYCLE: u32 = 4;
/// Machine cycles in one DMG frame (70224 clock ticks).
pub const MACHINE_CYCLES_PER_FRAME: u64 = 17_556;
