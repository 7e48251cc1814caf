//! Infix expressions: tokenizing, shunting-yard conversion to postfix, and
//! code generation from postfix into a chain of temporaries.

use std::collections::HashSet;
use std::fmt;

use arch::Op;
use once_cell::sync::Lazy;
use strum::{Display, EnumString, IntoEnumIterator};

use crate::compiler::Compiler;
use crate::error::Error;
use crate::stmt::{Cond, Keyword};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum Operator {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "%")]
    Mod,
    #[strum(serialize = "^")]
    Pow,
}

impl Operator {
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div | Operator::Mod => 2,
            Operator::Pow => 3,
        }
    }

    pub fn op(self) -> Op {
        match self {
            Operator::Add => Op::Add,
            Operator::Sub => Op::Subtract,
            Operator::Mul => Op::Multiply,
            Operator::Div => Op::Divide,
            Operator::Mod => Op::Mod,
            Operator::Pow => Op::Pow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Operand(String),
    Operator(Operator),
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Operand(name) => write!(f, "{}", name),
            Token::Operator(op) => write!(f, "{}", op),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

static RESERVED: Lazy<HashSet<String>> = Lazy::new(|| {
    let mut words: HashSet<String> = Keyword::iter().map(|k| k.to_string()).collect();
    words.extend(Cond::iter().map(|c| c.to_string()));
    words.extend(["goto", "+", "-", "*", "/", "%", "^", "="].map(String::from));
    words
});

pub fn is_reserved(s: &str) -> bool {
    RESERVED.contains(s)
}

/// A numeric literal: decimal digits only.
pub fn is_constant(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !is_reserved(s)
}

/// Whitespace is dropped first, so `a b` reads as the single operand `ab`.
pub fn tokenize(infix: &str) -> Result<Vec<Token>, Error> {
    let mut tokens = Vec::new();
    let mut operand = String::new();
    for c in infix.chars().filter(|c| !c.is_whitespace()) {
        if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
            operand.push(c);
            continue;
        }
        if !operand.is_empty() {
            tokens.push(Token::Operand(std::mem::take(&mut operand)));
        }
        let token = match c {
            '(' => Token::LParen,
            ')' => Token::RParen,
            _ => c
                .to_string()
                .parse::<Operator>()
                .map(Token::Operator)
                .map_err(|_| Error::UnexpectedToken(c.to_string()))?,
        };
        tokens.push(token);
    }
    if !operand.is_empty() {
        tokens.push(Token::Operand(operand));
    }
    Ok(tokens)
}

pub fn to_postfix(infix: &str) -> Result<Vec<Token>, Error> {
    let mut out = Vec::new();
    let mut stack: Vec<Token> = Vec::new();
    for token in tokenize(infix)? {
        match token {
            Token::Operand(_) => out.push(token),
            Token::LParen => stack.push(token),
            Token::RParen => loop {
                match stack.pop() {
                    Some(Token::LParen) => break,
                    Some(t) => out.push(t),
                    None => return Err(Error::InvalidExpression("unbalanced `)`".to_string())),
                }
            },
            Token::Operator(op) => {
                // equal precedence pops first: left associative
                while let Some(&Token::Operator(top)) = stack.last() {
                    if top.precedence() < op.precedence() {
                        break;
                    }
                    stack.pop();
                    out.push(Token::Operator(top));
                }
                stack.push(Token::Operator(op));
            }
        }
    }
    while let Some(token) = stack.pop() {
        if token == Token::LParen {
            return Err(Error::InvalidExpression("unbalanced `(`".to_string()));
        }
        out.push(token);
    }
    Ok(out)
}

impl Compiler {
    /// Convert to postfix and declare every literal operand as a constant.
    pub fn convert_to_postfix(&mut self, infix: &str) -> Result<Vec<Token>, Error> {
        let postfix = to_postfix(infix)?;
        for token in &postfix {
            if let Token::Operand(name) = token {
                if is_constant(name) {
                    self.constant(name)?;
                }
            }
        }
        Ok(postfix)
    }

    /// Emit `LOAD x; <op> y; STORE tmp` per operator, then load the result
    /// into the accumulator.
    pub fn evaluate_postfix(&mut self, postfix: &[Token]) -> Result<(), Error> {
        let mut stack: Vec<usize> = Vec::new();
        for token in postfix {
            match token {
                Token::Operand(name) => stack.push(self.operand(name)?.0),
                Token::Operator(op) => {
                    let missing = || Error::InvalidExpression(format!("missing operand for `{}`", op));
                    let y = stack.pop().ok_or_else(missing)?;
                    let x = stack.pop().ok_or_else(missing)?;
                    let temp = self.mem.allocate_variable()?;
                    self.emit(Op::Load, x)?;
                    self.emit(op.op(), y)?;
                    self.emit(Op::Store, temp)?;
                    stack.push(temp);
                }
                Token::LParen | Token::RParen => {
                    return Err(Error::InvalidExpression("unbalanced parenthesis".to_string()))
                }
            }
        }
        match stack.as_slice() {
            [result] => {
                self.emit(Op::Load, *result)?;
                Ok(())
            }
            [] => Err(Error::MissingToken("expression")),
            _ => Err(Error::InvalidExpression("missing operator".to_string())),
        }
    }

    /// Compile an infix expression so its value ends up in the accumulator.
    pub fn expression(&mut self, infix: &str) -> Result<(), Error> {
        let postfix = self.convert_to_postfix(infix)?;
        self.evaluate_postfix(&postfix)
    }
}
