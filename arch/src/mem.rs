use std::io::{self, Write};

use crate::{error::Error, fmt_signed, fmt_word, parse_word, Word, MEM_SIZE, WORD_MAX, WORD_MIN};

/// Flat word memory with two cursors: instructions grow upward from 0,
/// variables and constants grow downward from `MEM_SIZE - 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    words: [Word; MEM_SIZE],
    // number of cells taken from each end
    code: usize,
    data: usize,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

// Cursors
impl Memory {
    pub fn new() -> Self {
        Memory {
            words: [0; MEM_SIZE],
            code: 0,
            data: 0,
        }
    }

    /// Address the next instruction will be written to.
    pub fn instruction_counter(&self) -> usize {
        self.code
    }

    /// Address the next constant or variable will be placed at, or `None`
    /// once the data area has grown past address 0.
    pub fn data_counter(&self) -> Option<usize> {
        (MEM_SIZE - 1).checked_sub(self.data)
    }

    fn ensure_free(&self) -> Result<(), Error> {
        if self.code + self.data >= MEM_SIZE {
            return Err(Error::MemoryCapacityExceeded(self.code));
        }
        Ok(())
    }

    pub fn write_instruction(&mut self, word: Word) -> Result<usize, Error> {
        self.ensure_free()?;
        let addr = self.code;
        self.set(addr, word)?;
        self.code += 1;
        Ok(addr)
    }

    pub fn write_constant(&mut self, word: Word) -> Result<usize, Error> {
        let addr = self.allocate_variable()?;
        self.set(addr, word)?;
        Ok(addr)
    }

    /// Reserve a data cell without writing it.
    pub fn allocate_variable(&mut self) -> Result<usize, Error> {
        self.ensure_free()?;
        let addr = MEM_SIZE - 1 - self.data;
        self.data += 1;
        Ok(addr)
    }

    pub fn clear(&mut self) {
        *self = Memory::new();
    }
}

// Access
impl Memory {
    pub fn get(&self, addr: usize) -> Result<Word, Error> {
        self.words
            .get(addr)
            .copied()
            .ok_or(Error::AddressOutOfRange(addr))
    }

    pub fn set(&mut self, addr: usize, word: Word) -> Result<(), Error> {
        if !(WORD_MIN..=WORD_MAX).contains(&word) {
            return Err(Error::WordOutOfRange(i64::from(word)));
        }
        let cell = self
            .words
            .get_mut(addr)
            .ok_or(Error::AddressOutOfRange(addr))?;
        *cell = word;
        Ok(())
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }
}

// Program text: one `fmt_word` per line, addresses 0..MEM_SIZE in order.
impl Memory {
    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for word in self.words.iter() {
            writeln!(out, "{}", fmt_word(*word))?;
        }
        Ok(())
    }

    pub fn to_text(&self) -> String {
        let mut buf = Vec::new();
        // writing into a Vec cannot fail
        let _ = self.write_text(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Parse program text. Blank lines are skipped; missing trailing words
    /// are left zero.
    pub fn parse_text(text: &str) -> Result<Memory, Error> {
        let mut mem = Memory::new();
        let mut addr = 0;
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if addr >= MEM_SIZE {
                return Err(Error::ProgramTooLong(MEM_SIZE));
            }
            let word = parse_word(line).ok_or_else(|| Error::ParseWord(idx + 1, line.to_string()))?;
            mem.words[addr] = word;
            addr += 1;
        }
        Ok(mem)
    }

    /// 16x16 grid of signed hex words with row and column headers.
    pub fn dump_grid(&self) -> String {
        let mut out = String::from("    ");
        for col in 0..16 {
            out.push_str(&format!("{:>6X}", col));
        }
        out.push('\n');
        for (row, chunk) in self.words.chunks(16).enumerate() {
            out.push_str(&format!("{:02X}  ", row * 16));
            for word in chunk {
                out.push_str(&format!(" {}", fmt_signed(*word)));
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursors() {
        let mut mem = Memory::new();
        assert_eq!(mem.write_instruction(0x2010), Ok(0));
        assert_eq!(mem.write_instruction(0x4300), Ok(1));
        assert_eq!(mem.instruction_counter(), 2);
        assert_eq!(mem.write_constant(5), Ok(255));
        assert_eq!(mem.allocate_variable(), Ok(254));
        assert_eq!(mem.data_counter(), Some(253));
        assert_eq!(mem.get(255), Ok(5));
        assert_eq!(mem.get(254), Ok(0));
        assert_eq!(mem.get(1), Ok(0x4300));
    }

    #[test]
    fn capacity() {
        let mut mem = Memory::new();
        for _ in 0..200 {
            mem.write_instruction(0x4500).unwrap();
        }
        for _ in 0..56 {
            mem.allocate_variable().unwrap();
        }
        assert_eq!(mem.data_counter(), Some(199));
        assert_eq!(
            mem.write_instruction(0x4500),
            Err(Error::MemoryCapacityExceeded(200))
        );
        assert_eq!(
            mem.allocate_variable(),
            Err(Error::MemoryCapacityExceeded(200))
        );
    }

    #[test]
    fn bounds() {
        let mut mem = Memory::new();
        assert_eq!(mem.get(256), Err(Error::AddressOutOfRange(256)));
        assert_eq!(mem.set(256, 1), Err(Error::AddressOutOfRange(256)));
        assert_eq!(mem.set(0, 0x10000), Err(Error::WordOutOfRange(0x10000)));
    }

    #[test]
    fn clear() {
        let mut mem = Memory::new();
        mem.write_instruction(0x4300).unwrap();
        mem.write_constant(7).unwrap();
        mem.clear();
        assert_eq!(mem, Memory::new());
        assert_eq!(mem.instruction_counter(), 0);
        assert_eq!(mem.data_counter(), Some(255));
    }

    #[test]
    fn text() {
        let mut mem = Memory::new();
        mem.write_instruction(0x10FF).unwrap();
        mem.write_instruction(0x4300).unwrap();
        mem.write_constant(11).unwrap();
        let text = mem.to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 256);
        assert_eq!(lines[0], "10FF");
        assert_eq!(lines[1], "4300");
        assert_eq!(lines[2], "0000");
        assert_eq!(lines[255], "000B");
        let back = Memory::parse_text(&text).unwrap();
        assert_eq!(back.words(), mem.words());
    }

    #[test]
    fn text_errors() {
        assert_eq!(
            Memory::parse_text("4300\nzz\n"),
            Err(Error::ParseWord(2, "zz".to_string()))
        );
        let long = "0000\n".repeat(257);
        assert_eq!(
            Memory::parse_text(&long),
            Err(Error::ProgramTooLong(256))
        );
        let short = Memory::parse_text("4300\n\n-0001").unwrap();
        assert_eq!(short.get(0), Ok(0x4300));
        assert_eq!(short.get(1), Ok(-1));
        assert_eq!(short.get(2), Ok(0));
    }

    #[test]
    fn grid() {
        let mut mem = Memory::new();
        mem.set(0x11, -3).unwrap();
        let grid = mem.dump_grid();
        let lines: Vec<&str> = grid.lines().collect();
        assert_eq!(lines.len(), 17);
        assert!(lines[2].starts_with("10  "));
        assert!(lines[2].contains("+0000 -0003"));
    }
}
