use super::exec::Outcome;
use super::opcodes::OPCODES;
use super::{Bus, Cpu, CpuState, Operand};
use crate::machine::interrupts::{Interrupts, P1_ADDR};
use crate::CoreError;

/// Cost of one idle step while halted or stopped.
const IDLE_CYCLES: u32 = 1;

impl Cpu {
    /// Execute one instruction (or one idle cycle) and return the machine
    /// cycles it consumed, interrupt dispatch included.
    ///
    /// Any fault latched on the bus during the step terminates the CPU and
    /// is returned in place of the cycle count.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, CoreError> {
        let result = self.step_inner(bus);

        if let Some(fault) = bus.take_fault() {
            log::error!(
                "fatal bus fault: {fault} (PC=0x{:04X} SP=0x{:04X} AF=0x{:04X})",
                self.regs.pc,
                self.regs.sp,
                self.regs.af(),
            );
            self.terminate();
            return Err(fault);
        }

        result
    }

    fn step_inner<B: Bus>(&mut self, bus: &mut B) -> Result<u32, CoreError> {
        match self.state {
            CpuState::Terminated => return Err(CoreError::Terminated),
            CpuState::Stopped => {
                if !self.stop_released(bus) {
                    return Ok(IDLE_CYCLES);
                }
                log::debug!("leaving STOP at PC=0x{:04X}", self.regs.pc);
                self.state = CpuState::Running;
            }
            CpuState::Halted => {
                if self.pending_interrupts(bus).is_empty() {
                    return Ok(IDLE_CYCLES);
                }
                self.state = CpuState::Running;
                // With IME clear the CPU resumes without dispatching.
                if let Some(cycles) = self.service_interrupt(bus) {
                    return Ok(cycles);
                }
            }
            CpuState::Running => {}
        }

        let pc = self.regs.pc;
        let opcode = bus.read8(pc);
        let info = &OPCODES[opcode as usize];

        if !info.legal {
            log::error!(
                "illegal opcode 0x{opcode:02X} at PC=0x{pc:04X} SP=0x{:04X} AF=0x{:04X} BC=0x{:04X} DE=0x{:04X} HL=0x{:04X}",
                self.regs.sp,
                self.regs.af(),
                self.regs.bc(),
                self.regs.de(),
                self.regs.hl(),
            );
            self.terminate();
            return Err(CoreError::IllegalOpcode {
                opcode,
                pc,
                flags: self.regs.f(),
            });
        }

        let operand = Operand::decode(info.operand, pc, |addr| bus.read8(addr));
        self.regs.pc = pc.wrapping_add(info.length());

        let mut cycles = match self.exec_opcode(bus, opcode, operand) {
            Outcome::Base => info.cycles,
            Outcome::Taken => info.taken,
            Outcome::Cycles(cycles) => cycles,
        } as u32;

        self.apply_ime_delay();

        if let Some(dispatch) = self.service_interrupt(bus) {
            cycles += dispatch;
        }

        Ok(cycles)
    }

    /// STOP ends when a joypad line reads low or a joypad interrupt is
    /// pending.
    fn stop_released<B: Bus>(&self, bus: &mut B) -> bool {
        let p1 = bus.read8(P1_ADDR);
        p1 & 0x0F != 0x0F || self.pending_interrupts(bus).contains(Interrupts::JOYPAD)
    }
}
