//! Packed strings.
//!
//! A string of `len` characters occupies the byte stream `[len, c0, c1, ...]`
//! packed two bytes per word, high byte first, starting at the string's
//! address. The header word is therefore `len * 0x100 + c0`. Characters
//! outside Latin-1 are stored as `?`.

use crate::{error::Error, mem::Memory, Word};

const MAX_LEN: usize = 0xFF;

/// Number of words a string of `len` characters occupies.
pub fn packed_len(len: usize) -> usize {
    (len + 2) / 2
}

pub fn pack(mem: &mut Memory, addr: usize, s: &str) -> Result<(), Error> {
    let bytes: Vec<u8> = s
        .chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect();
    if bytes.len() > MAX_LEN {
        return Err(Error::StringTooLong(bytes.len()));
    }
    let last = addr + packed_len(bytes.len()) - 1;
    if last >= mem.words().len() {
        return Err(Error::AddressOutOfRange(last));
    }

    let mut stream = Vec::with_capacity(bytes.len() + 1);
    stream.push(bytes.len() as u8);
    stream.extend(bytes);
    for (offset, pair) in stream.chunks(2).enumerate() {
        let hi = Word::from(pair[0]);
        let lo = pair.get(1).copied().map(Word::from).unwrap_or(0);
        mem.set(addr + offset, hi * 0x100 + lo)?;
    }
    Ok(())
}

pub fn unpack(mem: &Memory, addr: usize) -> Result<String, Error> {
    let header = mem.get(addr)?;
    let len = ((header >> 8) & 0xFF) as usize;
    let mut out = String::with_capacity(len);
    for idx in 1..=len {
        let word = mem.get(addr + idx / 2)?;
        let byte = (if idx % 2 == 0 { word >> 8 } else { word }) & 0xFF;
        out.push(char::from(byte as u8));
    }
    Ok(out)
}
