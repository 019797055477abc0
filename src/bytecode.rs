//! Bytecode representation

use std::fmt;
use tracing::{debug, info};

use crate::{jump_table::JumpTable, lexer::Lexer, token::Op};

/// Loaded program
#[derive(Debug, Clone)]
pub struct Bytecode {
    /// Instructions in source order
    pub instructions: Vec<Instruction>,
    /// Bracket pairs of `instructions`
    pub jump_table: JumpTable,
    /// Number of source bytes that were not instructions
    pub discarded: usize,
}

/// Supported instructions of the bytecode
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Instruction {
    /// Move the data pointer one cell right
    Right,
    /// Move the data pointer one cell left
    Left,
    /// Add to the current cell, wrapping
    Incr(u8),
    /// Subtract from the current cell, wrapping
    Decr(u8),
    /// Write the current cell to output
    Output,
    /// Read one byte of input into the current cell
    Input,
    /// Jump past the matching `]` if the current cell is zero
    LoopOpen,
    /// Jump back to the matching `[` if the current cell is not zero
    LoopClose,
}

impl From<Op> for Instruction {
    fn from(op: Op) -> Self {
        match op {
            Op::Right => Instruction::Right,
            Op::Left => Instruction::Left,
            Op::Incr => Instruction::Incr(1),
            Op::Decr => Instruction::Decr(1),
            Op::Output => Instruction::Output,
            Op::Input => Instruction::Input,
            Op::LoopOpen => Instruction::LoopOpen,
            Op::LoopClose => Instruction::LoopClose,
        }
    }
}

impl Instruction {
    pub fn op(self) -> Op {
        match self {
            Instruction::Right => Op::Right,
            Instruction::Left => Op::Left,
            Instruction::Incr(_) => Op::Incr,
            Instruction::Decr(_) => Op::Decr,
            Instruction::Output => Op::Output,
            Instruction::Input => Op::Input,
            Instruction::LoopOpen => Op::LoopOpen,
            Instruction::LoopClose => Op::LoopClose,
        }
    }
}

/// Prints the source text the instruction stands for; a folded `Incr(3)` prints `+++`.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = match *self {
            Instruction::Incr(n) | Instruction::Decr(n) => n as usize,
            _ => 1,
        };
        let symbol = self.op().symbol();
        for _ in 0..count {
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

impl Bytecode {
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Whether any instruction reads input
    pub fn reads_input(&self) -> bool {
        self.instructions.contains(&Instruction::Input)
    }
}

/// Parser to generate bytecode from source bytes
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    fold: bool,
}

impl<'a> Parser<'a> {
    /// * `program` raw source, comments included
    pub fn new(program: &'a [u8]) -> Self {
        Parser {
            lexer: Lexer::new(program),
            fold: false,
        }
    }

    /// Collapse runs of `+` and `-` before resolving jumps.
    pub fn fold(mut self, fold: bool) -> Self {
        self.fold = fold;
        self
    }

    /// Parse the program and generate a `Bytecode`
    pub fn parse(mut self) -> anyhow::Result<Bytecode> {
        let instructions: Vec<Instruction> = self.lexer.by_ref().map(Instruction::from).collect();
        let discarded = self.lexer.discarded();

        // Brackets are checked before folding so that error positions match the filtered source.
        let mut jump_table = JumpTable::resolve(&instructions)?;

        let instructions = if self.fold {
            let folded = fold_runs(&instructions);
            debug!(
                before = instructions.len(),
                after = folded.len(),
                "folded increment/decrement runs"
            );
            jump_table = JumpTable::resolve(&folded)?;
            folded
        } else {
            instructions
        };

        info!(
            instructions = instructions.len(),
            discarded,
            loops = jump_table.pairs(),
            "program loaded"
        );

        Ok(Bytecode {
            instructions,
            jump_table,
            discarded,
        })
    }
}

/// Merge consecutive `Incr` (or `Decr`) into one. A run longer than 255 is split
/// so that every folded instruction still prints back as its source text.
fn fold_runs(instructions: &[Instruction]) -> Vec<Instruction> {
    let mut folded: Vec<Instruction> = Vec::with_capacity(instructions.len());

    for &instruction in instructions {
        match (folded.last_mut(), instruction) {
            (Some(Instruction::Incr(total)), Instruction::Incr(n))
            | (Some(Instruction::Decr(total)), Instruction::Decr(n))
                if total.checked_add(n).is_some() =>
            {
                *total += n;
            }
            _ => folded.push(instruction),
        }
    }

    folded
}
