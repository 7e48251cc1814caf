use std::io::Read;

use arch::alu::alu;
use arch::{fmt_signed, fmt_word, parse_word, text, Inst, Memory, Op, Word};

use crate::console::Console;
use crate::error::{Error, Fault};
use crate::hooks::Hook;

pub struct State {
    mem: Memory,
    acc: Word,
    pc: usize,
    ir: Word,
    halted: bool,
}

/// How a run ended without a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// `HALT` executed after this many steps.
    Halted(u64),
    /// Step limit reached.
    StepLimit(u64),
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    pub fn new() -> Self {
        Self::with_memory(Memory::new())
    }

    pub fn with_memory(mem: Memory) -> Self {
        State {
            mem,
            acc: 0,
            pc: 0,
            ir: 0,
            halted: false,
        }
    }

    pub fn load_program_file(&mut self, fname: &str) -> Result<(), Error> {
        let mut file =
            std::fs::File::open(fname).map_err(|e| Error::FileOpen(fname.to_string(), e))?;
        let mut text = String::new();
        file.read_to_string(&mut text)
            .map_err(|e| Error::FileRead(fname.to_string(), e))?;
        let mem = Memory::parse_text(&text).map_err(|e| Error::ProgramFile(fname.to_string(), e))?;
        *self = Self::with_memory(mem);
        Ok(())
    }

    pub fn is_terminated(&self) -> bool {
        self.halted
    }

    pub fn acc(&self) -> Word {
        self.acc
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Word of the instruction executed last.
    pub fn ir(&self) -> Word {
        self.ir
    }

    pub fn memory(&self) -> &Memory {
        &self.mem
    }

    /// Cell content; 0 outside memory.
    pub fn get(&self, addr: usize) -> Word {
        self.mem.get(addr).unwrap_or(0)
    }
}

// Execution
impl State {
    /// Fetch and execute one instruction. Returns its address and word.
    pub fn exec<C: Console + ?Sized>(&mut self, console: &mut C) -> Result<(usize, Word), Fault> {
        let addr = self.pc;
        let word = self.mem.get(addr).map_err(|_| Fault {
            error: Error::PointerOutOfRange(addr),
            addr,
            word: 0,
            acc: self.acc,
        })?;
        self.ir = word;
        self.pc += 1;
        self.step(word, console).map_err(|error| Fault {
            error,
            addr,
            word,
            acc: self.acc,
        })?;
        Ok((addr, word))
    }

    fn step<C: Console + ?Sized>(&mut self, word: Word, console: &mut C) -> Result<(), Error> {
        let inst = Inst::from_word(word)?;
        let operand = usize::from(inst.operand);
        match inst.op {
            Op::ReadInt => {
                let value = Self::read_int(console)?;
                self.mem.set(operand, value)?;
            }
            Op::ReadString => {
                let line = console.read_line("? ").ok_or(Error::InputExhausted)?;
                text::pack(&mut self.mem, operand, &line)?;
            }
            Op::Write => console.write(&fmt_word(self.mem.get(operand)?)),
            Op::WriteNl => console.write(&format!("{}\n", fmt_word(self.mem.get(operand)?))),
            Op::WriteString => console.write(&text::unpack(&self.mem, operand)?),
            Op::WriteStringNl => {
                console.write(&format!("{}\n", text::unpack(&self.mem, operand)?))
            }
            Op::Load => self.acc = self.mem.get(operand)?,
            Op::Store => self.mem.set(operand, self.acc)?,
            Op::Add | Op::Subtract | Op::Multiply | Op::Divide | Op::Mod | Op::Pow => {
                self.acc = alu(inst.op, self.acc, self.mem.get(operand)?)?;
            }
            Op::Branch => self.pc = operand,
            Op::BranchNeg => {
                if self.acc < 0 {
                    self.pc = operand;
                }
            }
            Op::BranchZero => {
                if self.acc == 0 {
                    self.pc = operand;
                }
            }
            Op::Halt => self.halted = true,
            Op::Dump => console.write(&self.dump()),
            Op::Noop => {}
        }
        Ok(())
    }

    // Re-prompt until a hex word in range is entered.
    fn read_int<C: Console + ?Sized>(console: &mut C) -> Result<Word, Error> {
        loop {
            let line = console.read_line("? ").ok_or(Error::InputExhausted)?;
            match parse_word(&line) {
                Some(value) => return Ok(value),
                None => console.write(&format!(
                    "*** Invalid input `{}`: enter a hex word ***\n",
                    line.trim()
                )),
            }
        }
    }

    /// Run until `HALT`, a fault, or `tmax` steps. Hooks see every step.
    pub fn run<C: Console + ?Sized>(
        &mut self,
        console: &mut C,
        hooks: &mut [Box<dyn Hook>],
        tmax: Option<u64>,
    ) -> Result<Exit, Fault> {
        for hook in hooks.iter_mut() {
            hook.init(self);
        }
        let mut time = 0;
        while !self.halted {
            if tmax.is_some_and(|t| time >= t) {
                return Ok(Exit::StepLimit(time));
            }
            let (addr, word) = self.exec(console)?;
            for hook in hooks.iter_mut() {
                hook.exec(time, addr, word, self);
            }
            time += 1;
        }
        Ok(Exit::Halted(time))
    }

    /// Registers followed by the full memory grid.
    pub fn dump(&self) -> String {
        let (opcode, operand) = (self.ir / 0x100, self.ir % 0x100);
        let mut out = String::from("REGISTERS:\n");
        out.push_str(&format!("{:<24}{}\n", "accumulator", fmt_signed(self.acc)));
        out.push_str(&format!("{:<24}{:>5}\n", "instructionPointer", format!("{:02X}", self.pc)));
        out.push_str(&format!("{:<24}{}\n", "instructionRegister", fmt_signed(self.ir)));
        out.push_str(&format!("{:<24}{:>5}\n", "opcode", format!("{:02X}", opcode)));
        out.push_str(&format!("{:<24}{:>5}\n", "operand", format!("{:02X}", operand)));
        out.push_str("\nMEMORY:\n");
        out.push_str(&self.mem.dump_grid());
        out
    }
}
