//! Loop bracket matching

use crate::{bytecode::Instruction, error::LoadError};

/// Pairs every `[` with its `]` and back.
///
/// Indexed by instruction position. Positions that are not brackets map to
/// themselves, a bracket never does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpTable {
    targets: Vec<usize>,
}

impl JumpTable {
    /// Scan `instructions` once, left to right, matching brackets with a stack.
    pub fn resolve(instructions: &[Instruction]) -> anyhow::Result<Self> {
        let mut targets: Vec<usize> = (0..instructions.len()).collect();
        let mut pending = Vec::new();

        for (position, instruction) in instructions.iter().enumerate() {
            match instruction {
                Instruction::LoopOpen => pending.push(position),
                Instruction::LoopClose => {
                    let open = pending
                        .pop()
                        .ok_or(LoadError::UnmatchedClose { position })?;
                    targets[open] = position;
                    targets[position] = open;
                }
                _ => {}
            }
        }

        // Report the earliest open bracket that never got closed
        if let Some(&position) = pending.first() {
            return Err(LoadError::UnmatchedOpen { position }.into());
        }

        Ok(JumpTable { targets })
    }

    /// Structural partner of the bracket at `position`, `None` for anything else.
    pub fn partner(&self, position: usize) -> Option<usize> {
        match self.targets.get(position) {
            Some(&target) if target != position => Some(target),
            _ => None,
        }
    }

    /// Jump target for the bracket at `position`. Only meaningful on brackets.
    #[inline]
    pub(crate) fn target(&self, position: usize) -> usize {
        self.targets[position]
    }

    /// Number of matched loop pairs
    pub fn pairs(&self) -> usize {
        self.targets
            .iter()
            .enumerate()
            .filter(|&(position, &target)| target > position)
            .count()
    }
}
