use std::fmt;

use color_print::cformat;

use crate::{error::Error, op::Op, Word};

/// A decoded instruction: `word = opcode * 0x100 + operand`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inst {
    pub op: Op,
    pub operand: u8,
}

impl Inst {
    pub fn new(op: Op, operand: u8) -> Self {
        Inst { op, operand }
    }

    pub fn to_word(self) -> Word {
        Word::from(self.op.opcode()) * 0x100 + Word::from(self.operand)
    }

    pub fn from_word(word: Word) -> Result<Inst, Error> {
        let opcode = word / 0x100;
        let operand = word % 0x100;
        let op = u8::try_from(opcode)
            .ok()
            .and_then(|code| Op::try_from(code).ok())
            .ok_or(Error::InvalidInstruction(word))?;
        // opcode is non-negative here, so is the remainder
        Ok(Inst::new(op, operand as u8))
    }

    pub fn cformat(&self) -> String {
        if self.op.has_operand() {
            cformat!("<r>{:<16}</><y>0x{:02X}</>", self.op.to_string(), self.operand)
        } else {
            cformat!("<r>{:<16}</>", self.op.to_string())
        }
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.op.has_operand() {
            write!(f, "{} 0x{:02X}", self.op.to_string(), self.operand)
        } else {
            write!(f, "{}", self.op)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode() {
        assert_eq!(Inst::new(Op::Load, 0xFE).to_word(), 0x20FE);
        assert_eq!(Inst::new(Op::ReadInt, 0x00).to_word(), 0x1000);
        assert_eq!(Inst::new(Op::Halt, 0).to_word(), 0x4300);
    }

    #[test]
    fn decode() {
        assert_eq!(Inst::from_word(0x21FD), Ok(Inst::new(Op::Store, 0xFD)));
        assert_eq!(Inst::from_word(0x4207), Ok(Inst::new(Op::BranchZero, 0x07)));
        assert_eq!(Inst::from_word(0), Err(Error::InvalidInstruction(0)));
        assert_eq!(Inst::from_word(0x0005), Err(Error::InvalidInstruction(5)));
        assert_eq!(Inst::from_word(-0x2001), Err(Error::InvalidInstruction(-0x2001)));
        assert_eq!(Inst::from_word(0x9900), Err(Error::InvalidInstruction(0x9900)));
    }

    #[test]
    fn display() {
        assert_eq!(Inst::new(Op::Add, 0x0A).to_string(), "ADD 0x0A");
        assert_eq!(Inst::new(Op::Noop, 0).to_string(), "NOOP");
    }
}
