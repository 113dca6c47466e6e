use super::Outcome;
use crate::cpu::{Cpu, CpuState};

impl Cpu {
    pub(super) fn exec_halt(&mut self) -> Outcome {
        self.state = CpuState::Halted;
        Outcome::Base
    }

    /// STOP is two bytes long; the padding byte was consumed by decode.
    pub(super) fn exec_stop(&mut self) -> Outcome {
        self.state = CpuState::Stopped;
        Outcome::Base
    }

    pub(super) fn exec_di(&mut self) -> Outcome {
        self.ime = false;
        self.ime_enable_pending = false;
        self.ime_enable_delay = false;
        Outcome::Base
    }

    pub(super) fn exec_ei(&mut self) -> Outcome {
        self.ime_enable_pending = true;
        Outcome::Base
    }
}
