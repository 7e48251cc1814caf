use std::collections::HashMap;

use arch::{fmt_word, Inst, Memory, Op, Word, WORD_MAX};
use color_print::cprintln;
use indexmap::IndexMap;

use crate::block::BlockStack;
use crate::error::{Diag, Error};
use crate::expr::{is_constant, is_identifier};
use crate::stmt::{parse_line_number, Stmt};
use crate::symbol::{Kind, SymbolTable, VarType};

/// Where a pending jump should land once every line is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The first instruction of the given line.
    Line(String),
    /// The first instruction of the line declared right after the given one.
    After(String),
}

/// A branch whose operand is resolved by the fixup pass.
#[derive(Debug, Clone)]
pub struct Fixup {
    pub target: Target,
    /// Target as written in the source, for diagnostics.
    pub token: String,
    line_idx: usize,
    raw: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// State of one compilation. Build a fresh one per program.
pub struct Compiler {
    file: String,
    pub(crate) mem: Memory,
    pub(crate) symbols: SymbolTable,
    pub(crate) blocks: BlockStack,
    pub(crate) fixups: IndexMap<usize, Fixup>,
    diags: Vec<Diag>,
    // position of the statement being compiled
    line_idx: usize,
    raw: String,
    pub(crate) ended: bool,
    fatal: bool,
}

/// Result of a compilation. The memory image is only meant to be written
/// out when `is_ok()`.
pub struct Compilation {
    pub memory: Memory,
    pub symbols: SymbolTable,
    pub diags: Vec<Diag>,
}

pub fn compile(file: &str, source: &str) -> Compilation {
    let mut compiler = Compiler::new(file);
    for (idx, raw) in source.lines().enumerate() {
        if compiler.compile_line(idx, raw) == Flow::Stop {
            break;
        }
    }
    compiler.finish()
}

impl Compiler {
    pub fn new(file: &str) -> Self {
        Compiler {
            file: file.to_string(),
            mem: Memory::new(),
            symbols: SymbolTable::new(),
            blocks: BlockStack::new(),
            fixups: IndexMap::new(),
            diags: Vec::new(),
            line_idx: 0,
            raw: String::new(),
            ended: false,
            fatal: false,
        }
    }

    /// Compile one source line. Errors are recorded and compilation goes on
    /// with the next line, unless memory is exhausted or `end` was reached.
    pub fn compile_line(&mut self, idx: usize, raw: &str) -> Flow {
        if self.ended || self.fatal {
            return Flow::Stop;
        }
        let words: Vec<&str> = raw.split_whitespace().collect();
        if words.is_empty() {
            return Flow::Continue;
        }
        self.line_idx = idx;
        self.raw = raw.to_string();

        if let Err(error) = self.statement(&words) {
            self.fatal = error.is_fatal();
            self.report(error);
        }
        if self.ended || self.fatal {
            Flow::Stop
        } else {
            Flow::Continue
        }
    }

    fn statement(&mut self, words: &[&str]) -> Result<(), Error> {
        let (head, rest) = words
            .split_first()
            .ok_or(Error::MissingToken("line number"))?;
        let line = parse_line_number(head).ok_or_else(|| Error::InvalidLineName(head.to_string()))?;
        let location = self.mem.instruction_counter();
        self.symbols.add(&line, Kind::Line, location, None)?;
        let stmt = Stmt::parse(rest)?;
        self.generate(&line, stmt)
    }

    fn report(&mut self, error: Error) {
        self.diags
            .push(Diag::new(&self.file, self.line_idx, &self.raw, error));
    }

    /// Close the program: implicit `end` at end of input, then the fixup pass.
    pub fn finish(mut self) -> Compilation {
        if !self.ended && !self.fatal {
            if let Err(error) = self.end() {
                self.fatal = error.is_fatal();
                self.report(error);
            }
        }
        if !self.fatal {
            self.fixup();
        }
        Compilation {
            memory: self.mem,
            symbols: self.symbols,
            diags: self.diags,
        }
    }

    /// Emit `HALT` and require every block to be closed.
    pub(crate) fn end(&mut self) -> Result<(), Error> {
        self.ended = true;
        self.emit(Op::Halt, 0)?;
        match self.blocks.innermost() {
            Some(block) => Err(Error::UnclosedBlock(block.kind())),
            None => Ok(()),
        }
    }

    fn fixup(&mut self) {
        let fixups = std::mem::take(&mut self.fixups);
        for (addr, fixup) in fixups {
            let resolved = match &fixup.target {
                Target::Line(line) => self
                    .symbols
                    .lookup(line, &[Kind::Line])
                    .map_err(|_| Error::NotALine(fixup.token.clone())),
                Target::After(line) => self.symbols.next_line_after(line),
            }
            .map(|symbol| symbol.location)
            .and_then(|location| self.patch(addr, location));
            if let Err(error) = resolved {
                self.diags
                    .push(Diag::new(&self.file, fixup.line_idx, &fixup.raw, error));
            }
        }
    }
}

// Code emission
impl Compiler {
    pub(crate) fn emit(&mut self, op: Op, operand: usize) -> Result<usize, Error> {
        let operand = u8::try_from(operand).map_err(|_| arch::Error::AddressOutOfRange(operand))?;
        Ok(self.mem.write_instruction(Inst::new(op, operand).to_word())?)
    }

    /// Emit a branch whose operand is filled in by the fixup pass.
    pub(crate) fn emit_fixup(&mut self, op: Op, target: Target, token: &str) -> Result<usize, Error> {
        let addr = self.emit(op, 0)?;
        self.fixups.insert(
            addr,
            Fixup {
                target,
                token: token.to_string(),
                line_idx: self.line_idx,
                raw: self.raw.clone(),
            },
        );
        Ok(addr)
    }

    /// Add `target` into the (zero) operand of the instruction at `addr`.
    pub(crate) fn patch(&mut self, addr: usize, target: usize) -> Result<(), Error> {
        let word = self.mem.get(addr)?;
        self.mem.set(addr, word + target as Word)?;
        Ok(())
    }

    /// Address of a literal, declaring it as a constant on first use.
    pub(crate) fn constant(&mut self, literal: &str) -> Result<usize, Error> {
        let value = literal
            .parse::<u32>()
            .ok()
            .filter(|v| *v <= WORD_MAX as u32)
            .ok_or_else(|| Error::ConstantOutOfRange(literal.to_string()))?;
        let name = value.to_string();
        if let Ok(symbol) = self.symbols.lookup(&name, &[Kind::Constant]) {
            return Ok(symbol.location);
        }
        let location = self.mem.write_constant(value as Word)?;
        self.symbols
            .add(&name, Kind::Constant, location, Some(VarType::Int))?;
        Ok(location)
    }

    /// Address and type of a variable or constant operand.
    pub(crate) fn operand(&mut self, name: &str) -> Result<(usize, VarType), Error> {
        if is_constant(name) {
            return Ok((self.constant(name)?, VarType::Int));
        }
        if !is_identifier(name) {
            return Err(Error::UnexpectedToken(name.to_string()));
        }
        let symbol = self
            .symbols
            .lookup(name, &[Kind::Variable, Kind::Constant])
            .map_err(|_| Error::VariableNotDeclared(name.to_string()))?;
        let var_type = symbol
            .var_type
            .ok_or_else(|| Error::NotAVariable(name.to_string()))?;
        Ok((symbol.location, var_type))
    }

    /// Address of an assignable variable.
    pub(crate) fn variable(&self, name: &str) -> Result<usize, Error> {
        if is_constant(name) {
            return Err(Error::NotAVariable(name.to_string()));
        }
        if !is_identifier(name) {
            return Err(Error::InvalidVariableName(name.to_string()));
        }
        self.symbols
            .lookup(name, &[Kind::Variable])
            .map(|symbol| symbol.location)
            .map_err(|_| Error::VariableNotDeclared(name.to_string()))
    }
}

impl Compilation {
    pub fn is_ok(&self) -> bool {
        self.diags.is_empty()
    }

    /// The runnable memory image, if compilation succeeded.
    pub fn program(&self) -> Option<&Memory> {
        if self.is_ok() {
            Some(&self.memory)
        } else {
            None
        }
    }

    pub fn print_diags(&self) {
        for diag in &self.diags {
            diag.print();
        }
    }

    /// List emitted instructions and the data area with symbol names.
    pub fn print_listing(&self) {
        let names: HashMap<usize, &str> = self
            .symbols
            .iter()
            .filter(|s| s.kind != Kind::Line)
            .map(|s| (s.location, s.name.as_str()))
            .collect();
        let words = self.memory.words();
        let code_end = self.memory.instruction_counter();
        for (addr, word) in words.iter().enumerate().take(code_end) {
            let inst = match Inst::from_word(*word) {
                Ok(inst) => inst.cformat(),
                Err(_) => "????".to_string(),
            };
            cprintln!("[<b>{:02X}</>] {}  {}", addr, fmt_word(*word), inst);
        }
        println!("------------------------------------");
        let data_start = self.memory.data_counter().map(|d| d + 1).unwrap_or(0);
        for (addr, word) in words.iter().enumerate().skip(data_start.max(code_end)) {
            let name = names.get(&addr).copied().unwrap_or("");
            cprintln!("[<b>{:02X}</>] {}  <c>{}</>", addr, fmt_word(*word), name);
        }
    }
}
