use strum::Display;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum BlockKind {
    If,
    While,
}

/// An open `if`/`while` whose exit branch still needs a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    If {
        branch_to_end: usize,
    },
    While {
        loop_start: usize,
        branch_to_end: usize,
    },
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::If { .. } => BlockKind::If,
            Block::While { .. } => BlockKind::While,
        }
    }

    pub fn branch_to_end(&self) -> usize {
        match self {
            Block::If { branch_to_end } | Block::While { branch_to_end, .. } => *branch_to_end,
        }
    }
}

#[derive(Debug, Default)]
pub struct BlockStack(Vec<Block>);

impl BlockStack {
    pub fn new() -> Self {
        BlockStack(Vec::new())
    }

    pub fn push(&mut self, block: Block) {
        self.0.push(block);
    }

    /// Pop the innermost block. `closer` names the statement asking for it.
    pub fn pop(&mut self, closer: &str) -> Result<Block, Error> {
        self.0.pop().ok_or_else(|| Error::NoBlock(closer.to_string()))
    }

    /// Pop the innermost block only if it has the given kind.
    pub fn pop_kind(&mut self, kind: BlockKind, closer: &str) -> Result<Block, Error> {
        match self.0.last() {
            Some(block) if block.kind() == kind => self.pop(closer),
            _ => Err(Error::NoBlock(closer.to_string())),
        }
    }

    pub fn innermost(&self) -> Option<&Block> {
        self.0.last()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}
