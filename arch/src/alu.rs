use crate::{error::Error, op::Op, Word, WORD_MAX, WORD_MIN};

/// Apply an arithmetic op to the accumulator and a memory operand.
///
/// Results outside `WORD_MIN..=WORD_MAX` are an error, as is a zero divisor
/// for `Divide` and `Mod`. `Pow` is computed in floating point and truncated
/// toward zero.
pub fn alu(op: Op, acc: Word, operand: Word) -> Result<Word, Error> {
    let (a, b) = (i64::from(acc), i64::from(operand));
    let result = match op {
        Op::Add => a + b,
        Op::Subtract => a - b,
        Op::Multiply => a * b,
        Op::Divide => {
            if b == 0 {
                return Err(Error::DivideByZero);
            }
            a / b
        }
        Op::Mod => {
            if b == 0 {
                return Err(Error::DivideByZero);
            }
            a % b
        }
        Op::Pow => {
            let p = (acc as f64).powf(operand as f64);
            if !p.is_finite() || p.abs() >= (WORD_MAX as f64) + 1.0 {
                return Err(Error::Overflow(p as i64));
            }
            p.trunc() as i64
        }
        _ => return Err(Error::NotArithmetic(op)),
    };
    if result < i64::from(WORD_MIN) || result > i64::from(WORD_MAX) {
        return Err(Error::Overflow(result));
    }
    Ok(result as Word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic() {
        assert_eq!(alu(Op::Add, 3, 8), Ok(11));
        assert_eq!(alu(Op::Subtract, 3, 8), Ok(-5));
        assert_eq!(alu(Op::Multiply, -4, 5), Ok(-20));
        assert_eq!(alu(Op::Divide, 7, 2), Ok(3));
        assert_eq!(alu(Op::Divide, -7, 2), Ok(-3));
        assert_eq!(alu(Op::Mod, 7, 3), Ok(1));
        assert_eq!(alu(Op::Mod, -7, 3), Ok(-1));
    }

    #[test]
    fn pow_truncates() {
        assert_eq!(alu(Op::Pow, 2, 10), Ok(1024));
        assert_eq!(alu(Op::Pow, -3, 3), Ok(-27));
        assert_eq!(alu(Op::Pow, 5, 0), Ok(1));
        assert_eq!(alu(Op::Pow, 2, -1), Ok(0));
        assert!(matches!(alu(Op::Pow, 0, -1), Err(Error::Overflow(_))));
        assert!(matches!(alu(Op::Pow, 2, 16), Err(Error::Overflow(_))));
        assert_eq!(alu(Op::Pow, 2, 15), Ok(0x8000));
    }

    #[test]
    fn faults() {
        assert_eq!(alu(Op::Divide, 1, 0), Err(Error::DivideByZero));
        assert_eq!(alu(Op::Mod, 1, 0), Err(Error::DivideByZero));
        assert_eq!(alu(Op::Add, 0xFFFF, 1), Err(Error::Overflow(0x10000)));
        assert_eq!(alu(Op::Subtract, -0xFFFF, 1), Err(Error::Overflow(-0x10000)));
        assert_eq!(alu(Op::Multiply, 0x100, 0x100), Err(Error::Overflow(0x10000)));
        assert_eq!(alu(Op::Load, 1, 1), Err(Error::NotArithmetic(Op::Load)));
    }
}
