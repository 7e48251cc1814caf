use std::fmt;

use color_print::cprintln;
use thiserror::Error;

use crate::block::BlockKind;
use crate::symbol::Kind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid line number: `{0}`")]
    InvalidLineName(String),

    #[error("Unexpected token: `{0}`")]
    UnexpectedToken(String),

    #[error("Unexpected tokens: `{}`", .0.join(" "))]
    UnexpectedTokens(Vec<String>),

    #[error("Missing {0}")]
    MissingToken(&'static str),

    #[error("Invalid variable name: `{0}`")]
    InvalidVariableName(String),

    #[error("Variable `{0}` already declared")]
    VariableAlreadyDeclared(String),

    #[error("Variable `{0}` not declared")]
    VariableNotDeclared(String),

    #[error("`{0}` is not a variable")]
    NotAVariable(String),

    #[error("Line `{0}` is not defined")]
    NotALine(String),

    #[error("No line follows line `{0}`")]
    NoLineAfter(String),

    #[error("Invalid condition: `{0}`")]
    InvalidCondition(String),

    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    #[error("Constant out of range: `{0}`")]
    ConstantOutOfRange(String),

    #[error("Unclosed `{0}` block")]
    UnclosedBlock(BlockKind),

    #[error("`{0}` without a matching block")]
    NoBlock(String),

    #[error("Duplicate symbol: {1} `{0}`")]
    DuplicateSymbol(String, Kind),

    #[error("Unknown symbol: `{0}` (looked up as {})", kinds(.1))]
    UnknownSymbol(String, Vec<Kind>),

    #[error(transparent)]
    Memory(#[from] arch::Error),

    // Driver errors
    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read input: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),

    #[error("Invalid config file: {0}")]
    Config(String, #[source] serde_yaml::Error),

    #[error("Compilation failed: {0} error(s)")]
    CompilationFailed(usize),
}

fn kinds(kinds: &[Kind]) -> String {
    kinds
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(" or ")
}

impl Error {
    /// Errors after which no further line can be compiled.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Memory(arch::Error::MemoryCapacityExceeded(_)))
    }

    /// The source token this error points at, if any.
    pub fn token(&self) -> Option<&str> {
        match self {
            Error::InvalidLineName(t)
            | Error::UnexpectedToken(t)
            | Error::InvalidVariableName(t)
            | Error::VariableAlreadyDeclared(t)
            | Error::VariableNotDeclared(t)
            | Error::NotAVariable(t)
            | Error::NotALine(t)
            | Error::NoLineAfter(t)
            | Error::InvalidCondition(t)
            | Error::ConstantOutOfRange(t)
            | Error::NoBlock(t)
            | Error::DuplicateSymbol(t, _)
            | Error::UnknownSymbol(t, _) => Some(t),
            Error::UnexpectedTokens(ts) => ts.first().map(|t| t.as_str()),
            _ => None,
        }
    }
}

/// A compile error pinned to a source position.
#[derive(Debug)]
pub struct Diag {
    pub file: String,
    /// 1-based line of the source file
    pub line: usize,
    /// 1-based column of the offending token
    pub col: usize,
    pub raw: String,
    pub error: Error,
}

impl Diag {
    pub fn new(file: &str, line_idx: usize, raw: &str, error: Error) -> Self {
        let col = error.token().map(|t| column(raw, t)).unwrap_or(1);
        Diag {
            file: file.to_string(),
            line: line_idx + 1,
            col,
            raw: raw.to_string(),
            error,
        }
    }

    pub fn print(&self) {
        cprintln!("<red,bold>error</>: {}", self.error);
        cprintln!(
            "     <blue>--></> <underline>{}:{}:{}</>",
            self.file,
            self.line,
            self.col
        );
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", self.line, self.raw);
        cprintln!(
            "      <blue>|</> {}<r,s>^</>",
            " ".repeat(self.col.saturating_sub(1))
        );
    }
}

impl fmt::Display for Diag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}: {}", self.file, self.line, self.col, self.error)
    }
}

// Prefer a whole word equal to the token, then any occurrence of it.
fn column(raw: &str, token: &str) -> usize {
    let mut start = None;
    for (idx, c) in raw.char_indices() {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(idx),
            (true, Some(s)) => {
                if &raw[s..idx] == token {
                    return s + 1;
                }
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        if &raw[s..] == token {
            return s + 1;
        }
    }
    raw.find(token).map(|idx| idx + 1).unwrap_or(1)
}
