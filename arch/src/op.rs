use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    TryFromPrimitive,
    IntoPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[repr(u8)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Op {
    // I/O
    ReadInt = 0x10,
    ReadString = 0x11,
    Write = 0x12,
    WriteNl = 0x13,
    WriteString = 0x14,
    WriteStringNl = 0x15,

    // Load / Store
    Load = 0x20,
    Store = 0x21,

    // Arithmetic
    Add = 0x30,
    Subtract = 0x31,
    Divide = 0x32,
    Multiply = 0x33,
    Mod = 0x34,
    Pow = 0x35,

    // Control
    Branch = 0x40,
    #[strum(to_string = "BRANCHNEG")]
    BranchNeg = 0x41,
    #[strum(to_string = "BRANCHZERO")]
    BranchZero = 0x42,
    Halt = 0x43,
    Dump = 0x44,
    Noop = 0x45,
}

impl Op {
    pub fn opcode(self) -> u8 {
        self.into()
    }

    /// Whether the operand field is meaningful for this op.
    pub fn has_operand(&self) -> bool {
        use Op::*;
        !matches!(self, Halt | Dump | Noop)
    }
}
