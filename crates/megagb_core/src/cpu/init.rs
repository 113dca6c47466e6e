use super::{Cpu, CpuState, Registers};

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// CPU in the DMG post-boot state, ready to execute at 0x0100.
    pub fn new() -> Self {
        let mut cpu = Self {
            regs: Registers::default(),
            ime: false,
            state: CpuState::Running,
            ime_enable_pending: false,
            ime_enable_delay: false,
        };
        cpu.apply_dmg_boot_state();
        cpu
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn apply_dmg_boot_state(&mut self) {
        let regs = &mut self.regs;
        regs.set_af(0x01B0);
        regs.set_bc(0x0013);
        regs.set_de(0x00D8);
        regs.set_hl(0x014D);
        regs.sp = 0xFFFE;
        regs.pc = 0x0100;
    }

    /// Every later step returns [`CoreError::Terminated`](crate::CoreError).
    pub(crate) fn terminate(&mut self) {
        self.state = CpuState::Terminated;
    }
}
