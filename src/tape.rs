//! Memory tape that grows in both directions

use crate::error::ExecError;

/// Byte cells addressed by a signed pointer.
///
/// Stored as two halves split at address 0: `right[i]` holds address `i` and
/// `left[i]` holds address `-i - 1`. A half only grows when an address past
/// its end is actually touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    right: Vec<u8>,
    left: Vec<u8>,
    limit: Option<usize>,
}

impl Default for Tape {
    fn default() -> Self {
        Tape::new(None)
    }
}

impl Tape {
    /// `limit` caps the total number of cells both halves may hold. Cell 0 is
    /// always allocated, so the smallest useful limit is 1.
    pub fn new(limit: Option<usize>) -> Self {
        Tape {
            right: vec![0],
            left: Vec::new(),
            limit,
        }
    }

    /// Make sure `addr` is backed by a cell, zero-filling up to it.
    pub fn grow_to(&mut self, addr: isize) -> Result<(), ExecError> {
        let (half, index) = self.slot(addr);
        if index < half.len() {
            return Ok(());
        }

        let needed = index + 1 - half.len();
        if let Some(limit) = self.limit {
            if self.len() + needed > limit {
                return Err(ExecError::OutOfMemory {
                    address: addr,
                    limit,
                });
            }
        }

        let (half, _) = self.slot_mut(addr);
        half.resize(index + 1, 0);
        Ok(())
    }

    /// Value at `addr`. Addresses never touched read as 0 without allocating.
    pub fn read(&self, addr: isize) -> u8 {
        let (half, index) = self.slot(addr);
        half.get(index).copied().unwrap_or(0)
    }

    pub fn write(&mut self, addr: isize, value: u8) -> Result<(), ExecError> {
        *self.cell_mut(addr)? = value;
        Ok(())
    }

    /// Mutable access to the cell at `addr`, growing first if needed.
    #[inline]
    pub fn cell_mut(&mut self, addr: isize) -> Result<&mut u8, ExecError> {
        self.grow_to(addr)?;
        let (half, index) = self.slot_mut(addr);
        Ok(&mut half[index])
    }

    /// Cells currently allocated across both halves
    pub fn len(&self) -> usize {
        self.right.len() + self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lowest and highest allocated addresses
    pub fn extent(&self) -> (isize, isize) {
        (-(self.left.len() as isize), self.right.len() as isize - 1)
    }

    /// Every allocated cell, lowest address first
    pub fn cells(&self) -> Vec<u8> {
        self.left
            .iter()
            .rev()
            .chain(self.right.iter())
            .copied()
            .collect()
    }

    /// `(address, value)` for each address within `radius` of `center`.
    pub fn window(&self, center: isize, radius: usize) -> Vec<(isize, u8)> {
        let radius = radius as isize;
        (center - radius..=center + radius)
            .map(|addr| (addr, self.read(addr)))
            .collect()
    }

    fn slot(&self, addr: isize) -> (&Vec<u8>, usize) {
        if addr >= 0 {
            (&self.right, addr as usize)
        } else {
            (&self.left, (-(addr + 1)) as usize)
        }
    }

    fn slot_mut(&mut self, addr: isize) -> (&mut Vec<u8>, usize) {
        if addr >= 0 {
            (&mut self.right, addr as usize)
        } else {
            (&mut self.left, (-(addr + 1)) as usize)
        }
    }
}
