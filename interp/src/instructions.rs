use modular_bitfield::{bitfield, specifiers::*, BitfieldSpecifier};

/// Closed opcode set. The discriminant doubles as the index into dispatch tables.
#[derive(BitfieldSpecifier, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[bits = 8]
pub enum Opcode {
    Add = 0,
    Sub = 1,
    Mul = 2,
    Div = 3,
    Halt = 4,
}

impl Opcode {
    pub const COUNT: usize = 5;

    pub const ALL: [Opcode; Opcode::COUNT] = [
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Div,
        Opcode::Halt,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        OPCODE_NAMES[self.index()]
    }
}

pub const OPCODE_NAMES: [&'static str; Opcode::COUNT] = [
    "OP_ADD",
    "OP_SUB",
    "OP_MUL",
    "OP_DIV",
    "OP_HALT",
];

#[derive(BitfieldSpecifier, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[bits = 8]
pub enum Register {
    Pc = 0,
    Flags = 1,
    Acc = 2,
}

impl Register {
    pub const COUNT: usize = 3;

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        REG_NAMES[self.index()]
    }
}

pub const REG_NAMES: [&'static str; Register::COUNT] = [
    "PC",
    "FLAGS",
    "ACC",
];

/// A single 32-bit instruction.
///
/// Byte 0 is the opcode, bytes 1 and 2 the destination and source registers and
/// byte 3 an unsigned immediate. The raw encoding can carry bytes outside the
/// opcode/register enumerations; `Program::new` rejects those before anything
/// executes, so the plain getters are only used on validated instructions.
#[bitfield(bits = 32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub op: Opcode,
    pub dest: Register,
    pub src: Register,
    pub imm: B8,
}

impl Into<u32> for Instruction {
    fn into(self) -> u32 {
        u32::from_le_bytes(self.into_bytes())
    }
}

impl From<u32> for Instruction {
    fn from(word: u32) -> Self {
        Instruction::from_bytes(word.to_le_bytes())
    }
}

impl Instruction {
    /// `dest = op(src, imm)`
    pub fn arith(op: Opcode, dest: Register, src: Register, imm: u8) -> Instruction {
        Instruction::new()
            .with_op(op)
            .with_dest(dest)
            .with_src(src)
            .with_imm(imm)
    }

    /// HALT with all-zero operands
    pub fn halt() -> Instruction {
        Instruction::from_bytes([Opcode::Halt as u8, 0, 0, 0])
    }

    /// Provides a string representation of the instruction (as disassembly).
    /// Out-of-range fields are shown as raw bytes instead of panicking.
    pub fn disassemble(self) -> String {
        let bytes = self.into_bytes();
        let reg = |r: Result<Register, _>, raw: u8| match r {
            Ok(r) => r.name().to_owned(),
            Err(_) => format!("r?{:#04x}", raw),
        };

        match self.op_or_err() {
            Ok(Opcode::Halt) => Opcode::Halt.name().to_owned(),
            Ok(op) => format!(
                "{} = {}({}, {})",
                reg(self.dest_or_err(), bytes[1]),
                op.name(),
                reg(self.src_or_err(), bytes[2]),
                self.imm()
            ),
            Err(_) => format!(".word {:#010x}", u32::from_le_bytes(bytes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_layout() {
        let insn = Instruction::arith(Opcode::Div, Register::Acc, Register::Flags, 9);
        assert_eq!(insn.into_bytes(), [3, 2, 1, 9]);

        let word: u32 = insn.into();
        assert_eq!(Instruction::from(word), insn);
    }

    #[test]
    fn halt_is_all_zero_operands() {
        let insn = Instruction::halt();
        assert_eq!(insn.op(), Opcode::Halt);
        assert_eq!(insn.dest(), Register::Pc);
        assert_eq!(insn.src(), Register::Pc);
        assert_eq!(insn.imm(), 0);
    }

    #[test]
    fn out_of_range_fields_decode_as_errors() {
        let insn = Instruction::from_bytes([Opcode::COUNT as u8, Register::COUNT as u8, 0xff, 1]);
        assert!(insn.op_or_err().is_err());
        assert!(insn.dest_or_err().is_err());
        assert!(insn.src_or_err().is_err());
    }

    #[test]
    fn disassembly() {
        let insn = Instruction::arith(Opcode::Add, Register::Acc, Register::Acc, 7);
        assert_eq!(insn.disassemble(), "ACC = OP_ADD(ACC, 7)");
        assert_eq!(Instruction::halt().disassemble(), "OP_HALT");

        let bad = Instruction::from_bytes([0x20, 2, 2, 0]);
        assert_eq!(bad.disassemble(), ".word 0x00020220");

        let bad_reg = Instruction::from_bytes([0, 7, 2, 1]);
        assert_eq!(bad_reg.disassemble(), "r?0x07 = OP_ADD(ACC, 1)");
    }

    #[test]
    fn table_indices_follow_declaration_order() {
        for (i, op) in Opcode::ALL.iter().enumerate() {
            assert_eq!(op.index(), i);
        }
        assert_eq!(Opcode::Halt.name(), "OP_HALT");
        assert_eq!(Register::Acc.name(), "ACC");
    }
}
