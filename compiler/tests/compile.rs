use arch::Word;
use slc::block::BlockKind;
use slc::{compile, Compilation, Error, Kind};

fn code(src: &str) -> Vec<Word> {
    let compilation = compile("test.sl", src);
    for diag in &compilation.diags {
        println!("{}", diag);
    }
    assert!(compilation.is_ok(), "{} error(s)", compilation.diags.len());
    let end = compilation.memory.instruction_counter();
    compilation.memory.words()[..end].to_vec()
}

fn errors(src: &str) -> Compilation {
    let compilation = compile("test.sl", src);
    for diag in &compilation.diags {
        println!("{}", diag);
    }
    assert!(!compilation.is_ok());
    assert!(compilation.program().is_none());
    compilation
}

macro_rules! case {
    ($name:ident, $src:expr, [$($word:expr),* $(,)?]) => {
        #[test]
        fn $name() {
            assert_eq!(code($src), vec![$($word),*]);
        }
    };
}

case!(empty, "", [0x4300]);
case!(comment_only, "10 // nothing here", [0x4300]);
case!(io, "10 int x\n20 input x\n30 print x\n40 end", [0x10FF, 0x13FF, 0x4300]);
case!(noop_dump, "10 noop\n20 dump\n30 end", [0x4500, 0x4400, 0x4300]);
case!(goto_forward, "10 goto 30\n20 noop\n30 end", [0x4002, 0x4500, 0x4300]);
case!(goto_backward, "10 noop\n20 goto 10", [0x4500, 0x4000, 0x4300]);
case!(goto_padded, "10 goto 030\n20 noop\n30 end", [0x4002, 0x4500, 0x4300]);
case!(blank_lines, "\n10 int x\n\n   \n20 print x\n", [0x13FF, 0x4300]);

// b*2 into 251, a+t into 250, then r = 250
case!(
    let_precedence,
    "10 int a b r\n20 let r = a + b * 2\n30 end",
    [0x20FE, 0x33FC, 0x21FB, 0x20FF, 0x30FB, 0x21FA, 0x20FA, 0x21FD, 0x4300]
);
case!(let_single, "10 int a\n20 let a = 7\n30 end", [0x20FE, 0x21FF, 0x4300]);

case!(
    ifg_lt,
    "10 int a b\n20 ifg a < b goto 40\n30 noop\n40 end",
    [0x20FF, 0x31FE, 0x4104, 0x4500, 0x4300]
);
case!(
    ifg_gt,
    "10 int a b\n20 ifg a > b goto 40\n30 noop\n40 end",
    [0x20FE, 0x31FF, 0x4104, 0x4500, 0x4300]
);
case!(
    ifg_le,
    "10 int a b\n20 ifg a <= b goto 40\n30 noop\n40 end",
    [0x20FF, 0x31FE, 0x4105, 0x4205, 0x4500, 0x4300]
);
case!(
    ifg_ge,
    "10 int a b\n20 ifg a >= b goto 40\n30 noop\n40 end",
    [0x20FE, 0x31FF, 0x4105, 0x4205, 0x4500, 0x4300]
);
case!(
    ifg_eq,
    "10 int a b\n20 if a == b goto 40\n30 noop\n40 end",
    [0x20FF, 0x31FE, 0x4204, 0x4500, 0x4300]
);
// BRANCHZERO to line 30, BRANCH to line 40
case!(
    ifg_ne,
    "10 int a\n20 ifg a != 0 goto 40\n30 print a\n40 end",
    [0x20FF, 0x31FE, 0x4204, 0x4005, 0x13FF, 0x4300]
);

case!(
    if_else,
    "10 int a b\n20 if a < b\n30 print a\n40 else\n50 print b\n60 endif\n70 end",
    [0x20FF, 0x31FE, 0x4104, 0x4006, 0x13FF, 0x4007, 0x13FE, 0x4300]
);
case!(
    if_ge,
    "10 int a b\n20 if a >= b\n30 print a\n40 endif\n50 end",
    [0x20FF, 0x31FE, 0x4104, 0x13FF, 0x4300]
);
case!(
    if_le,
    "10 int a b\n20 if a <= b\n30 print a\n40 endif\n50 end",
    [0x20FE, 0x31FF, 0x4104, 0x13FF, 0x4300]
);
case!(
    if_ne,
    "10 int a b\n20 if a != b\n30 print a\n40 endif\n50 end",
    [0x20FF, 0x31FE, 0x4204, 0x13FF, 0x4300]
);
case!(
    if_eq,
    "10 int a b\n20 if a == b\n30 print a\n40 endif\n50 end",
    [0x20FF, 0x31FE, 0x4204, 0x4005, 0x13FF, 0x4300]
);
case!(
    while_loop,
    "10 int i n\n20 input n\n30 while i < n\n40 let i = i + 1\n50 endwhile\n60 print i\n70 end",
    [
        0x10FE, // input n
        0x20FF, 0x31FE, 0x4105, 0x400B, // i < n
        0x20FF, 0x30FD, 0x21FC, 0x20FC, 0x21FF, // i = i + 1
        0x4001, // back to the condition
        0x13FF, 0x4300,
    ]
);

#[test]
fn constants_are_shared() {
    let compilation = compile("test.sl", "10 int a\n20 let a = 5 + 05\n30 print 5\n40 end");
    assert!(compilation.is_ok());
    let five = compilation.symbols.lookup("5", &[Kind::Constant]).unwrap();
    assert_eq!(five.location, 0xFE);
    assert_eq!(compilation.memory.get(0xFE), Ok(5));
    assert_eq!(compilation.symbols.iter().filter(|s| s.kind == Kind::Constant).count(), 1);
}

#[test]
fn output_text() {
    let compilation = compile("test.sl", "10 int a\n20 let a = 0 - 5\n30 end");
    let text = compilation.program().unwrap().to_text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 256);
    assert_eq!(lines[0], "20FE");
    assert_eq!(lines[4], "21FF");
    assert_eq!(lines[5], "4300");
    assert_eq!(lines[6], "0000");
    assert_eq!(lines[0xFE], "0000");
    assert_eq!(lines[0xFD], "0005");
}

#[test]
fn lines_after_end_are_ignored() {
    let compilation = compile("test.sl", "10 end\n20 frobnicate");
    assert!(compilation.is_ok());
    assert_eq!(compilation.memory.instruction_counter(), 1);
}

#[test]
fn variable_already_declared() {
    let compilation = errors("00 int x\n01 int x\n02 let x = 5\n");
    assert_eq!(compilation.diags.len(), 1);
    let diag = &compilation.diags[0];
    assert_eq!((diag.line, diag.col), (2, 8));
    assert!(matches!(&diag.error, Error::VariableAlreadyDeclared(v) if v == "x"));
    assert!(compilation.symbols.exists("x", Kind::Variable));
}

#[test]
fn errors_are_collected() {
    let compilation = errors("10 print q\n20 frobnicate\n30 let 5 = 3\nx0 noop\n40 end");
    let found: Vec<&Error> = compilation.diags.iter().map(|d| &d.error).collect();
    assert_eq!(found.len(), 4);
    assert!(matches!(found[0], Error::VariableNotDeclared(v) if v == "q"));
    assert!(matches!(found[1], Error::UnexpectedToken(t) if t == "frobnicate"));
    assert!(matches!(found[2], Error::NotAVariable(t) if t == "5"));
    assert!(matches!(found[3], Error::InvalidLineName(t) if t == "x0"));
    assert_eq!(compilation.diags[0].col, 10);
    assert_eq!(compilation.diags[3].line, 4);
}

#[test]
fn duplicate_line() {
    let compilation = errors("10 noop\n10 noop");
    assert!(matches!(
        &compilation.diags[0].error,
        Error::DuplicateSymbol(name, Kind::Line) if name == "10"
    ));
}

#[test]
fn unknown_line() {
    let compilation = errors("10 noop\n20 goto 99\n30 end");
    let diag = &compilation.diags[0];
    assert_eq!(diag.line, 2);
    assert!(matches!(&diag.error, Error::NotALine(t) if t == "99"));
}

#[test]
fn unclosed_block() {
    let compilation = errors("10 int a\n20 if a < 1\n30 print a\n40 end");
    assert!(matches!(
        compilation.diags[0].error,
        Error::UnclosedBlock(BlockKind::If)
    ));
    let compilation = errors("10 int a\n20 while a < 1\n30 let a = a + 1\n");
    assert!(matches!(
        compilation.diags[0].error,
        Error::UnclosedBlock(BlockKind::While)
    ));
}

#[test]
fn no_block() {
    let compilation = errors("10 endif\n20 int a\n30 while a < 1\n40 endif\n50 endwhile\n60 end");
    assert_eq!(compilation.diags.len(), 2);
    assert!(matches!(&compilation.diags[0].error, Error::NoBlock(t) if t == "endif"));
    assert!(matches!(&compilation.diags[1].error, Error::NoBlock(t) if t == "endif"));
}

#[test]
fn bad_expression() {
    let compilation = errors("10 int a\n20 let a = (a + 1\n30 let a = a $ 1\n40 let a = 70000\n50 end");
    assert!(matches!(compilation.diags[0].error, Error::InvalidExpression(_)));
    assert!(matches!(&compilation.diags[1].error, Error::UnexpectedToken(t) if t == "$"));
    assert!(matches!(&compilation.diags[2].error, Error::ConstantOutOfRange(t) if t == "70000"));
}

#[test]
fn memory_capacity() {
    let src: String = (0..300).map(|i| format!("{} noop\n", i)).collect();
    let compilation = errors(&src);
    assert_eq!(compilation.diags.len(), 1);
    let diag = &compilation.diags[0];
    assert_eq!(diag.line, 257);
    assert!(matches!(
        diag.error,
        Error::Memory(arch::Error::MemoryCapacityExceeded(256))
    ));
}

#[test]
fn fresh_state_per_compilation() {
    let first = compile("a.sl", "10 int x\n20 print x");
    let second = compile("b.sl", "10 int x\n20 print x");
    assert!(first.is_ok() && second.is_ok());
    assert_eq!(first.memory, second.memory);
    assert_eq!(second.symbols.len(), 3);
}
