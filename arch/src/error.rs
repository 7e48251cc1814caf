use thiserror::Error;

use crate::{fmt_word, op::Op, Word};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Memory capacity exceeded: code and data meet at 0x{0:02X}")]
    MemoryCapacityExceeded(usize),

    #[error("Address out of range: 0x{0:X}")]
    AddressOutOfRange(usize),

    #[error("Word out of range: {0}")]
    WordOutOfRange(i64),

    #[error("Invalid instruction: {}", fmt_word(*.0))]
    InvalidInstruction(Word),

    #[error("Cannot parse `{1}` as a word at line {0}")]
    ParseWord(usize, String),

    #[error("Program too long: more than {0} words")]
    ProgramTooLong(usize),

    #[error("String too long: {0} characters (at most 255)")]
    StringTooLong(usize),

    #[error("Division by zero")]
    DivideByZero,

    #[error("Arithmetic overflow: {0}")]
    Overflow(i64),

    #[error("`{0}` is not an arithmetic operation")]
    NotArithmetic(Op),
}
