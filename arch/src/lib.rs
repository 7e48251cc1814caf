pub mod alu;
pub mod error;
pub mod inst;
pub mod mem;
pub mod op;
pub mod text;

pub use error::Error;
pub use inst::Inst;
pub use mem::Memory;
pub use op::Op;

/// A memory cell. Instructions and data share the same representation.
pub type Word = i32;

pub const WORD_MAX: Word = 0xFFFF;
pub const WORD_MIN: Word = -0xFFFF;

/// Number of addressable words.
pub const MEM_SIZE: usize = 256;

/// Four hex digits, with a leading `-` for negative words.
pub fn fmt_word(word: Word) -> String {
    if word < 0 {
        format!("-{:04X}", word.unsigned_abs())
    } else {
        format!("{:04X}", word)
    }
}

/// Four hex digits, always signed. Used by memory dumps.
pub fn fmt_signed(word: Word) -> String {
    let sign = if word < 0 { '-' } else { '+' };
    format!("{}{:04X}", sign, word.unsigned_abs())
}

/// Parse a hex word as written by [`fmt_word`]. Range is checked.
pub fn parse_word(s: &str) -> Option<Word> {
    let s = s.trim();
    let (neg, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let value = i64::from_str_radix(digits, 16).ok()?;
    let value = if neg { -value } else { value };
    if (WORD_MIN as i64..=WORD_MAX as i64).contains(&value) {
        Some(value as Word)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_format() {
        assert_eq!(fmt_word(0x2010), "2010");
        assert_eq!(fmt_word(11), "000B");
        assert_eq!(fmt_word(-5), "-0005");
        assert_eq!(fmt_signed(11), "+000B");
        assert_eq!(fmt_signed(-0xFFFF), "-FFFF");
    }

    #[test]
    fn word_parse() {
        assert_eq!(parse_word("000b"), Some(11));
        assert_eq!(parse_word(" -0005 "), Some(-5));
        assert_eq!(parse_word("+FFFF"), Some(0xFFFF));
        assert_eq!(parse_word("10000"), None);
        assert_eq!(parse_word("xyz"), None);
        assert_eq!(parse_word(""), None);
        assert_eq!(parse_word("-"), None);
    }
}
