// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! The machine's addressable store: a contiguous growable array of signed
//! 64-bit cells, addressed from 0, with every address past the current
//! extent reading as zero.

use std::fmt;
use std::ops::Index;

use crate::Fault;

/// Backing store for a machine's memory image.
///
/// Reads past the current extent see zero without reallocating; writes past
/// it grow the store (zero-filling the gap) before storing. Growth is
/// monotonic and never disturbs previously written cells, so it is not
/// observable through the values any address holds.
#[derive(Clone, Default)]
pub(crate) struct Memory {
    cells: Vec<i64>,
}

static ZERO: i64 = 0;

impl Memory {
    fn offset(address: i64) -> Result<usize, Fault> {
        usize::try_from(address).map_err(|_| Fault::InvalidAddress(address))
    }

    /// The value at `address`, or zero past the current extent
    pub(crate) fn read(&self, address: i64) -> Result<i64, Fault> {
        Ok(self.cells.get(Self::offset(address)?).copied().unwrap_or(0))
    }

    /// Store `value` at `address`, growing the backing store if needed
    pub(crate) fn write(&mut self, address: i64, value: i64) -> Result<(), Fault> {
        let offset = Self::offset(address)?;
        if offset >= self.cells.len() {
            self.cells.resize(offset + 1, 0);
        }
        self.cells[offset] = value;
        Ok(())
    }

    /// Current backing extent, in cells
    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    // the cells with trailing zeroes stripped; two memories that differ only
    // in how far they have grown hold the same program state
    fn occupied(&self) -> &[i64] {
        let end = self
            .cells
            .iter()
            .rposition(|&cell| cell != 0)
            .map_or(0, |i| i + 1);
        &self.cells[..end]
    }
}

impl PartialEq for Memory {
    fn eq(&self, other: &Self) -> bool {
        self.occupied() == other.occupied()
    }
}

impl FromIterator<i64> for Memory {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl Index<i64> for Memory {
    type Output = i64;

    /// Infallible peek; panics on negative addresses
    fn index(&self, address: i64) -> &i64 {
        match usize::try_from(address) {
            Ok(offset) => self.cells.get(offset).unwrap_or(&ZERO),
            Err(_) => panic!("negative memory address {address}"),
        }
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "Memory[{} cells] ", self.cells.len())?;
        fmt.debug_list().entries(self.occupied()).finish()
    }
}
