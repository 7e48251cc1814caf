use arch::Op;
use strum::{Display, EnumIter, EnumString};

use crate::block::{Block, BlockKind};
use crate::compiler::{Compiler, Target};
use crate::error::Error;
use crate::expr::{is_constant, is_identifier};
use crate::symbol::{Kind, VarType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, EnumIter, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Keyword {
    Int,
    Input,
    Let,
    Print,
    Goto,
    Ifg,
    If,
    While,
    Else,
    Endif,
    Endwhile,
    End,
    Noop,
    Dump,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, EnumIter, Display)]
pub enum Cond {
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">=")]
    Ge,
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    Ne,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub lhs: String,
    pub cond: Cond,
    pub rhs: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Comment,
    Int(Vec<String>),
    Input(Vec<String>),
    Let { var: String, expr: String },
    Print(Vec<String>),
    Goto(String),
    IfGoto { condition: Condition, line: String },
    If(Condition),
    While(Condition),
    Else,
    Endif,
    Endwhile,
    End,
    Noop,
    Dump,
}

/// Canonical name of a line number token (`007` and `7` are the same line).
pub fn parse_line_number(token: &str) -> Option<String> {
    if !is_constant(token) {
        return None;
    }
    token.parse::<u32>().ok().map(|n| n.to_string())
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Exactly `n` arguments.
fn arity<'a>(args: &[&'a str], n: usize, missing: &'static str) -> Result<Vec<&'a str>, Error> {
    if args.len() < n {
        return Err(Error::MissingToken(missing));
    }
    if args.len() > n {
        return Err(Error::UnexpectedTokens(owned(&args[n..])));
    }
    Ok(args.to_vec())
}

/// At least one argument.
fn names(args: &[&str], missing: &'static str) -> Result<Vec<String>, Error> {
    if args.is_empty() {
        return Err(Error::MissingToken(missing));
    }
    Ok(owned(args))
}

fn condition(lhs: &str, cond: &str, rhs: &str) -> Result<Condition, Error> {
    let cond = cond
        .parse::<Cond>()
        .map_err(|_| Error::InvalidCondition(cond.to_string()))?;
    Ok(Condition {
        lhs: lhs.to_string(),
        cond,
        rhs: rhs.to_string(),
    })
}

fn expect(found: &str, want: &str) -> Result<(), Error> {
    if found != want {
        return Err(Error::UnexpectedToken(found.to_string()));
    }
    Ok(())
}

impl Stmt {
    /// Parse the tokens that follow the line number.
    pub fn parse(words: &[&str]) -> Result<Stmt, Error> {
        let (head, args) = words
            .split_first()
            .ok_or(Error::MissingToken("statement"))?;
        if head.starts_with("//") {
            return Ok(Stmt::Comment);
        }
        let keyword = head
            .parse::<Keyword>()
            .map_err(|_| Error::UnexpectedToken(head.to_string()))?;

        match keyword {
            Keyword::Int => Ok(Stmt::Int(names(args, "variable name")?)),
            Keyword::Input => Ok(Stmt::Input(names(args, "variable name")?)),
            Keyword::Print => Ok(Stmt::Print(names(args, "variable name")?)),
            Keyword::Let => {
                let var = args.first().ok_or(Error::MissingToken("variable name"))?;
                let eq = args.get(1).ok_or(Error::MissingToken("`=`"))?;
                expect(eq, "=")?;
                let expr = args[2..].concat();
                if expr.is_empty() {
                    return Err(Error::MissingToken("expression"));
                }
                Ok(Stmt::Let {
                    var: var.to_string(),
                    expr,
                })
            }
            Keyword::Goto => {
                let args = arity(args, 1, "line number")?;
                Ok(Stmt::Goto(args[0].to_string()))
            }
            Keyword::Ifg => Self::if_goto(args),
            Keyword::If if args.get(3) == Some(&"goto") => Self::if_goto(args),
            Keyword::If => {
                let args = arity(args, 3, "condition")?;
                Ok(Stmt::If(condition(args[0], args[1], args[2])?))
            }
            Keyword::While => {
                let args = arity(args, 3, "condition")?;
                Ok(Stmt::While(condition(args[0], args[1], args[2])?))
            }
            Keyword::Else => arity(args, 0, "").map(|_| Stmt::Else),
            Keyword::Endif => arity(args, 0, "").map(|_| Stmt::Endif),
            Keyword::Endwhile => arity(args, 0, "").map(|_| Stmt::Endwhile),
            Keyword::End => arity(args, 0, "").map(|_| Stmt::End),
            Keyword::Noop => arity(args, 0, "").map(|_| Stmt::Noop),
            Keyword::Dump => arity(args, 0, "").map(|_| Stmt::Dump),
        }
    }

    // op1 COND op2 goto line
    fn if_goto(args: &[&str]) -> Result<Stmt, Error> {
        let args = arity(args, 5, "condition or target line")?;
        expect(args[3], "goto")?;
        Ok(Stmt::IfGoto {
            condition: condition(args[0], args[1], args[2])?,
            line: args[4].to_string(),
        })
    }
}

// Code generation
impl Compiler {
    /// Emit code for one statement of line `line`.
    pub fn generate(&mut self, line: &str, stmt: Stmt) -> Result<(), Error> {
        match stmt {
            Stmt::Comment => {}
            Stmt::Int(vars) => {
                for var in vars {
                    if !is_identifier(&var) {
                        return Err(Error::InvalidVariableName(var));
                    }
                    if self.symbols.exists(&var, Kind::Variable) {
                        return Err(Error::VariableAlreadyDeclared(var));
                    }
                    let location = self.mem.allocate_variable()?;
                    self.symbols
                        .add(&var, Kind::Variable, location, Some(VarType::Int))?;
                }
            }
            Stmt::Input(vars) => {
                for var in vars {
                    let location = self.variable(&var)?;
                    self.emit(Op::ReadInt, location)?;
                }
            }
            Stmt::Let { var, expr } => {
                let location = self.variable(&var)?;
                self.expression(&expr)?;
                self.emit(Op::Store, location)?;
            }
            Stmt::Print(vars) => {
                for var in vars {
                    let (location, var_type) = self.operand(&var)?;
                    match var_type {
                        VarType::Int => self.emit(Op::WriteNl, location)?,
                    };
                }
            }
            Stmt::Goto(target) => {
                let dest = parse_line_number(&target).ok_or_else(|| Error::NotALine(target.clone()))?;
                self.emit_fixup(Op::Branch, Target::Line(dest), &target)?;
            }
            Stmt::IfGoto { condition, line: target } => {
                let dest = parse_line_number(&target).ok_or_else(|| Error::NotALine(target.clone()))?;
                self.jump_condition(line, &condition, dest, &target)?;
            }
            Stmt::If(condition) => {
                let branch_to_end = self.block_condition(&condition)?;
                self.blocks.push(Block::If { branch_to_end });
            }
            Stmt::While(condition) => {
                let loop_start = self.mem.instruction_counter();
                let branch_to_end = self.block_condition(&condition)?;
                self.blocks.push(Block::While {
                    loop_start,
                    branch_to_end,
                });
            }
            Stmt::Else => {
                let block = self.blocks.pop_kind(BlockKind::If, "else")?;
                let branch = self.emit(Op::Branch, 0)?;
                self.blocks.push(Block::If {
                    branch_to_end: branch,
                });
                self.patch(block.branch_to_end(), branch + 1)?;
            }
            Stmt::Endif => {
                let block = self.blocks.pop_kind(BlockKind::If, "endif")?;
                let here = self.mem.instruction_counter();
                self.patch(block.branch_to_end(), here)?;
            }
            Stmt::Endwhile => {
                let block = self.blocks.pop_kind(BlockKind::While, "endwhile")?;
                if let Block::While {
                    loop_start,
                    branch_to_end,
                } = block
                {
                    let branch = self.emit(Op::Branch, loop_start)?;
                    self.patch(branch_to_end, branch + 1)?;
                }
            }
            Stmt::End => self.end()?,
            Stmt::Noop => {
                self.emit(Op::Noop, 0)?;
            }
            Stmt::Dump => {
                self.emit(Op::Dump, 0)?;
            }
        }
        Ok(())
    }

    /// `LOAD a; SUBTRACT b` for the condition's operands.
    fn compare(&mut self, a: &str, b: &str) -> Result<(), Error> {
        let (a, _) = self.operand(a)?;
        let (b, _) = self.operand(b)?;
        self.emit(Op::Load, a)?;
        self.emit(Op::Subtract, b)?;
        Ok(())
    }

    /// Jump to `dest` when the condition holds; targets are fixed up later.
    fn jump_condition(&mut self, line: &str, c: &Condition, dest: String, token: &str) -> Result<(), Error> {
        let (x, y) = (c.lhs.as_str(), c.rhs.as_str());
        let target = || Target::Line(dest.clone());
        match c.cond {
            Cond::Lt => {
                self.compare(x, y)?;
                self.emit_fixup(Op::BranchNeg, target(), token)?;
            }
            Cond::Gt => {
                self.compare(y, x)?;
                self.emit_fixup(Op::BranchNeg, target(), token)?;
            }
            Cond::Le => {
                self.compare(x, y)?;
                self.emit_fixup(Op::BranchNeg, target(), token)?;
                self.emit_fixup(Op::BranchZero, target(), token)?;
            }
            Cond::Ge => {
                self.compare(y, x)?;
                self.emit_fixup(Op::BranchNeg, target(), token)?;
                self.emit_fixup(Op::BranchZero, target(), token)?;
            }
            Cond::Eq => {
                self.compare(x, y)?;
                self.emit_fixup(Op::BranchZero, target(), token)?;
            }
            Cond::Ne => {
                self.compare(x, y)?;
                self.emit_fixup(Op::BranchZero, Target::After(line.to_string()), line)?;
                self.emit_fixup(Op::Branch, target(), token)?;
            }
        }
        Ok(())
    }

    /// Fall into the body when the condition holds. Returns the address of
    /// the branch that leaves the block, to be patched when it closes.
    fn block_condition(&mut self, c: &Condition) -> Result<usize, Error> {
        let (x, y) = (c.lhs.as_str(), c.rhs.as_str());
        match c.cond {
            Cond::Lt => {
                self.compare(x, y)?;
                self.skip_then_exit(Op::BranchNeg)
            }
            Cond::Gt => {
                self.compare(y, x)?;
                self.skip_then_exit(Op::BranchNeg)
            }
            Cond::Le => {
                self.compare(y, x)?;
                self.emit(Op::BranchNeg, 0)
            }
            Cond::Ge => {
                self.compare(x, y)?;
                self.emit(Op::BranchNeg, 0)
            }
            Cond::Eq => {
                self.compare(x, y)?;
                self.skip_then_exit(Op::BranchZero)
            }
            Cond::Ne => {
                self.compare(x, y)?;
                self.emit(Op::BranchZero, 0)
            }
        }
    }

    // `op` over an unconditional exit branch, into the body
    fn skip_then_exit(&mut self, op: Op) -> Result<usize, Error> {
        let skip = self.mem.instruction_counter();
        self.emit(op, skip + 2)?;
        self.emit(Op::Branch, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Result<Stmt, Error> {
        let words: Vec<&str> = src.split_whitespace().collect();
        Stmt::parse(&words)
    }

    #[test]
    fn statements() {
        assert_eq!(parse("int a b").unwrap(), Stmt::Int(vec!["a".into(), "b".into()]));
        assert_eq!(
            parse("let x = a + b * (c - 1)").unwrap(),
            Stmt::Let {
                var: "x".into(),
                expr: "a+b*(c-1)".into()
            }
        );
        assert_eq!(parse("goto 10").unwrap(), Stmt::Goto("10".into()));
        assert_eq!(parse("// anything at all").unwrap(), Stmt::Comment);
        assert_eq!(parse("endwhile").unwrap(), Stmt::Endwhile);
        assert_eq!(
            parse("while i <= n").unwrap(),
            Stmt::While(Condition {
                lhs: "i".into(),
                cond: Cond::Le,
                rhs: "n".into()
            })
        );
    }

    #[test]
    fn if_forms() {
        let jump = Stmt::IfGoto {
            condition: Condition {
                lhs: "a".into(),
                cond: Cond::Ne,
                rhs: "0".into(),
            },
            line: "40".into(),
        };
        assert_eq!(parse("ifg a != 0 goto 40").unwrap(), jump);
        assert_eq!(parse("if a != 0 goto 40").unwrap(), jump);
        assert!(matches!(parse("if a < b"), Ok(Stmt::If(_))));
    }

    #[test]
    fn errors() {
        assert!(matches!(parse("frobnicate x"), Err(Error::UnexpectedToken(t)) if t == "frobnicate"));
        assert!(matches!(parse("end now"), Err(Error::UnexpectedTokens(t)) if t == vec!["now"]));
        assert!(matches!(parse("goto"), Err(Error::MissingToken(_))));
        assert!(matches!(parse("goto 1 2"), Err(Error::UnexpectedTokens(_))));
        assert!(matches!(parse("int"), Err(Error::MissingToken(_))));
        assert!(matches!(parse("let x 5"), Err(Error::UnexpectedToken(t)) if t == "5"));
        assert!(matches!(parse("let x ="), Err(Error::MissingToken("expression"))));
        assert!(matches!(parse("if a <> b"), Err(Error::InvalidCondition(t)) if t == "<>"));
        assert!(matches!(parse("ifg a < b got 10"), Err(Error::UnexpectedToken(t)) if t == "got"));
        assert!(matches!(parse("while a < b c"), Err(Error::UnexpectedTokens(_))));
        assert!(matches!(parse(""), Err(Error::MissingToken("statement"))));
    }

    #[test]
    fn line_numbers() {
        assert_eq!(parse_line_number("010"), Some("10".to_string()));
        assert_eq!(parse_line_number("0"), Some("0".to_string()));
        assert_eq!(parse_line_number("1a"), None);
        assert_eq!(parse_line_number("-1"), None);
        assert_eq!(parse_line_number("99999999999"), None);
    }
}
