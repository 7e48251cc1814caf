pub mod dump;

use arch::Word;

use crate::model::State;

/// Side channel observing the machine. Hooks never change the state.
pub trait Hook {
    fn init(&mut self, state: &State);
    /// Called after the instruction `word` at `addr` has executed.
    fn exec(&mut self, time: u64, addr: usize, word: Word, state: &State);
}
