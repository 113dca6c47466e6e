mod alu;
mod bus;
mod cb;
mod exec;
mod helpers;
mod init;
mod interrupts;
pub mod opcodes;
mod regs;
mod step;


pub use bus::Bus;
pub use helpers::Operand;
pub use regs::{Flag, Registers};

/// Execution state of the CPU between steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CpuState {
    Running,
    /// Idle after HALT until IE & IF becomes non-zero.
    Halted,
    /// Idle after STOP until a joypad line goes low.
    Stopped,
    /// A fatal error was raised. Every further step fails.
    Terminated,
}

/// LR35902 execution engine.
///
/// The CPU owns only its register file and interrupt bookkeeping. Memory is
/// reached exclusively through a [`Bus`], so address translation and bank
/// switching never leak into instruction semantics.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub regs: Registers,
    /// Interrupt master enable.
    pub ime: bool,
    state: CpuState,
    // EI takes effect after the following instruction: the first step after
    // EI moves `pending` into `delay`, the second one sets IME.
    ime_enable_pending: bool,
    ime_enable_delay: bool,
}

impl Cpu {
    #[inline]
    pub fn state(&self) -> CpuState {
        self.state
    }

    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.state == CpuState::Terminated
    }
}
