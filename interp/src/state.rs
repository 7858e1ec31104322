use crate::instructions::Register;

/// Bits of the FLAGS register
pub const FLAG_HALTED: i32 = 1;

/// Register file of the machine. Every run starts from `MachineState::default()` (all zero).
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct MachineState {
    pub regs: [i32; Register::COUNT],
}

impl MachineState {
    pub fn new() -> MachineState {
        MachineState::default()
    }

    #[inline(always)]
    pub fn read(&self, reg: Register) -> i32 {
        self.regs[reg.index()]
    }

    #[inline(always)]
    pub fn write(&mut self, reg: Register, val: i32) {
        self.regs[reg.index()] = val;
    }

    #[inline(always)]
    pub fn pc(&self) -> usize {
        self.regs[Register::Pc.index()] as usize
    }

    #[inline(always)]
    pub fn advance_pc(&mut self) {
        self.regs[Register::Pc.index()] += 1;
    }

    #[inline(always)]
    pub fn halted(&self) -> bool {
        self.regs[Register::Flags.index()] & FLAG_HALTED != 0
    }

    #[inline(always)]
    pub fn should_run(&self) -> bool {
        !self.halted()
    }

    pub fn acc(&self) -> i32 {
        self.read(Register::Acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed() {
        let state = MachineState::new();
        assert_eq!(state.regs, [0; Register::COUNT]);
        assert!(state.should_run());
    }

    #[test]
    fn halted_flag() {
        let mut state = MachineState::new();
        state.write(Register::Flags, FLAG_HALTED | 0x10);
        assert!(state.halted());
        state.write(Register::Flags, 0x10);
        assert!(!state.halted());
    }
}
