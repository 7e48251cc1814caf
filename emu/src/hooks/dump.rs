use arch::{fmt_signed, Inst};
use color_print::cprintln;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;

use crate::error::Error;
use crate::model::State;

use super::Hook;

/// Prints registers and selected cells after given addresses execute.
///
/// ```yaml
/// 0x05:
///   registers: true
///   cells: [0xFF, 0xFE]
/// ```
#[derive(Debug, Default)]
pub struct Dump {
    file: Option<String>,
    all: bool,
    list: List,
}

#[derive(Debug, Default, Deserialize)]
struct List(HashMap<usize, Config>);

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    registers: bool,
    cells: Vec<usize>,
}

impl Dump {
    pub fn arg(file: Option<String>, all: bool) -> Result<Self, Error> {
        let list = match &file {
            Some(fname) => {
                let reader = File::open(fname).map_err(|e| Error::FileOpen(fname.clone(), e))?;
                serde_yaml::from_reader(BufReader::new(reader))
                    .map_err(|e| Error::DumpConfig(fname.clone(), e))?
            }
            None => List::default(),
        };
        Ok(Self { file, all, list })
    }

    pub fn from_yaml(text: &str, all: bool) -> Result<Self, Error> {
        let list = serde_yaml::from_str(text).map_err(|e| Error::DumpConfig("<inline>".into(), e))?;
        Ok(Self {
            file: None,
            all,
            list,
        })
    }

    fn get(&self, addr: usize) -> Option<&Config> {
        self.list.0.get(&addr)
    }

    pub fn len(&self) -> usize {
        self.list.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.0.is_empty()
    }
}

impl Hook for Dump {
    fn init(&mut self, _state: &State) {
        if self.all {
            cprintln!("<s> * Dump all</>");
        }
        if let Some(fname) = &self.file {
            cprintln!("<s> * Dump[{}]</> {:?}", self.len(), fname);
        }
    }

    fn exec(&mut self, time: u64, addr: usize, word: arch::Word, state: &State) {
        if let Some(cfg) = self.get(addr) {
            print_step(time, addr, word);
            if cfg.registers || self.all {
                print_registers(state);
            }
            print_cells(state, &cfg.cells);
        } else if self.all {
            print_step(time, addr, word);
            print_registers(state);
        }
    }
}

fn print_step(time: u64, addr: usize, word: arch::Word) {
    let inst = match Inst::from_word(word) {
        Ok(inst) => inst.to_string(),
        Err(_) => "???".to_string(),
    };
    cprintln!("<dim>[{:>6}]</> <yellow>{:02X}</> {}", time, addr, inst);
}

fn print_registers(state: &State) {
    println!(" +-----------+-----------+-----------+");
    println!(
        " | acc {} | pc     {:02X} | ir  {} |",
        fmt_signed(state.acc()),
        state.pc(),
        fmt_signed(state.ir())
    );
    println!(" +-----------+-----------+-----------+");
}

fn print_cells(state: &State, addrs: &[usize]) {
    for addr in addrs {
        println!(" | {:02X} : {}                         |", addr, fmt_signed(state.get(*addr)));
    }
    if !addrs.is_empty() {
        println!(" +-----------------------------------+");
    }
}
