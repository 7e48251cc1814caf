use arch::{fmt_signed, fmt_word, Word};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Machine(#[from] arch::Error),

    #[error("Instruction pointer out of memory: 0x{0:X}")]
    PointerOutOfRange(usize),

    #[error("Input exhausted")]
    InputExhausted,

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read file: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Invalid program file: {0}")]
    ProgramFile(String, #[source] arch::Error),

    #[error("Invalid dump config: {0}")]
    DumpConfig(String, #[source] serde_yaml::Error),
}

/// A fatal runtime error with the machine state at the moment it happened.
#[derive(Error, Debug)]
#[error("{error} at 0x{addr:02X} (word {}, accumulator {})", fmt_word(*.word), fmt_signed(*.acc))]
pub struct Fault {
    #[source]
    pub error: Error,
    /// Address of the offending instruction
    pub addr: usize,
    pub word: Word,
    pub acc: Word,
}
