use color_print::cprintln;
use indexmap::IndexMap;
use strum::{Display, EnumString};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Kind {
    Variable,
    Constant,
    Line,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::Variable, Kind::Constant, Kind::Line];
}

/// Declared type of a variable or constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum VarType {
    Int,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: Kind,
    pub location: usize,
    /// `None` for line symbols
    pub var_type: Option<VarType>,
}

/// Symbols keyed by (name, kind), kept in insertion order.
#[derive(Debug, Default)]
pub struct SymbolTable(IndexMap<(String, Kind), Symbol>);

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable(IndexMap::new())
    }

    pub fn add(
        &mut self,
        name: &str,
        kind: Kind,
        location: usize,
        var_type: Option<VarType>,
    ) -> Result<&Symbol, Error> {
        let key = (name.to_string(), kind);
        if self.0.contains_key(&key) {
            return Err(Error::DuplicateSymbol(name.to_string(), kind));
        }
        let symbol = Symbol {
            name: name.to_string(),
            kind,
            location,
            var_type,
        };
        let symbol = self.0.entry(key).or_insert(symbol);
        Ok(&*symbol)
    }

    pub fn exists(&self, name: &str, kind: Kind) -> bool {
        self.0.contains_key(&(name.to_string(), kind))
    }

    /// Try each kind in order; the first match wins.
    pub fn lookup(&self, name: &str, kinds: &[Kind]) -> Result<&Symbol, Error> {
        kinds
            .iter()
            .find_map(|kind| self.0.get(&(name.to_string(), *kind)))
            .ok_or_else(|| Error::UnknownSymbol(name.to_string(), kinds.to_vec()))
    }

    pub fn lookup_any(&self, name: &str) -> Result<&Symbol, Error> {
        self.lookup(name, &Kind::ALL)
    }

    /// The line symbol declared right after line `name`.
    pub fn next_line_after(&self, name: &str) -> Result<&Symbol, Error> {
        let idx = self
            .0
            .get_index_of(&(name.to_string(), Kind::Line))
            .ok_or_else(|| Error::UnknownSymbol(name.to_string(), vec![Kind::Line]))?;
        self.0
            .values()
            .skip(idx + 1)
            .find(|symbol| symbol.kind == Kind::Line)
            .ok_or_else(|| Error::NoLineAfter(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn print(&self) {
        println!("+----------+----------+------+------+");
        println!("| {:<8} | {:<8} | {:<4} | {:<4} |", "name", "kind", "loc", "type");
        println!("+----------+----------+------+------+");
        for symbol in self.iter() {
            let ty = symbol.var_type.map(|t| t.to_string()).unwrap_or_default();
            let kind = symbol.kind.to_string();
            match symbol.kind {
                Kind::Line => cprintln!(
                    "| <g>{:<8}</> | {:<8} | <y>0x{:02X}</> | {:<4} |",
                    symbol.name,
                    kind,
                    symbol.location,
                    ty
                ),
                Kind::Variable => cprintln!(
                    "| <c>{:<8}</> | {:<8} | <y>0x{:02X}</> | {:<4} |",
                    symbol.name,
                    kind,
                    symbol.location,
                    ty
                ),
                Kind::Constant => cprintln!(
                    "| <m>{:<8}</> | {:<8} | <y>0x{:02X}</> | {:<4} |",
                    symbol.name,
                    kind,
                    symbol.location,
                    ty
                ),
            }
        }
        println!("+----------+----------+------+------+");
    }
}
