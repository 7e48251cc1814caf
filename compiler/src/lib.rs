pub mod block;
pub mod compiler;
pub mod config;
pub mod error;
pub mod expr;
pub mod msg;
pub mod stmt;
pub mod symbol;

pub use compiler::{compile, Compilation, Compiler, Flow};
pub use config::Options;
pub use error::{Diag, Error};
pub use symbol::{Kind, Symbol, SymbolTable};
