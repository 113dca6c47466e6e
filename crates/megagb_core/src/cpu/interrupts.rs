use super::{Bus, Cpu, CpuState};
use crate::machine::interrupts::{Interrupts, IE_ADDR, IF_ADDR};

/// Machine cycles charged for an interrupt dispatch.
pub const INTERRUPT_DISPATCH_CYCLES: u32 = 5;

impl Cpu {
    /// Requested and enabled interrupt lines (IE & IF).
    pub(super) fn pending_interrupts<B: Bus>(&self, bus: &mut B) -> Interrupts {
        let enabled = Interrupts::from_bits_truncate(bus.read8(IE_ADDR));
        let requested = Interrupts::from_bits_truncate(bus.read8(IF_ADDR));
        enabled & requested
    }

    /// Apply the delayed IME change requested by EI.
    #[inline]
    pub(super) fn apply_ime_delay(&mut self) {
        if self.ime_enable_delay {
            self.ime = true;
            self.ime_enable_delay = false;
        } else if self.ime_enable_pending {
            self.ime_enable_pending = false;
            self.ime_enable_delay = true;
        }
    }

    /// Dispatch the highest-priority pending interrupt if IME is set.
    ///
    /// Returns the cycles charged, or `None` when nothing was dispatched.
    pub(super) fn service_interrupt<B: Bus>(&mut self, bus: &mut B) -> Option<u32> {
        if !self.ime || self.state == CpuState::Stopped {
            return None;
        }
        let line = self.pending_interrupts(bus).highest_priority()?;

        self.ime = false;
        self.state = CpuState::Running;

        let pc = self.regs.pc;
        self.push_u16(bus, pc);

        let requested = Interrupts::from_bits_truncate(bus.read8(IF_ADDR));
        bus.write8(IF_ADDR, (requested - line).bits());

        let vector = line.vector();
        log::debug!(
            "interrupt {:?}: vector=0x{:04X} pc=0x{:04X} sp=0x{:04X}",
            line,
            vector,
            pc,
            self.regs.sp,
        );
        self.regs.pc = vector;

        Some(INTERRUPT_DISPATCH_CYCLES)
    }
}
