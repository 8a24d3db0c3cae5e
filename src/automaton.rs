//! Bit-parallel cellular automaton engine.
//!
//! One generation replaces every row of the [`Grid`] in place. The previous
//! generation is kept in a scratch copy so a row that has already been
//! overwritten is never read back as a neighbour.

use std::marker::PhantomData;

use crate::grid::{Grid, COLS, ROWS};
use crate::rule::Rule;

/// Population count of every 3-bit neighbourhood window.
const POPCOUNT3: [u32; 8] = [0, 1, 1, 2, 1, 2, 2, 3];

/// CRC-32 polynomial of the STM32 CRC unit.
const CRC32_POLY: u32 = 0x04C1_1DB7;

/// Word-wise CRC-32 accumulator (MSB first, no reflection, no final XOR).
#[derive(Clone, Copy, Debug)]
pub struct Crc32 {
    value: u32,
}

impl Crc32 {
    pub const fn new() -> Self {
        Self { value: 0xFFFF_FFFF }
    }

    /// Feed one 32-bit word.
    pub fn write(&mut self, word: u32) {
        let mut crc = self.value ^ word;
        for _ in 0..32 {
            crc = if crc & 0x8000_0000 != 0 {
                (crc << 1) ^ CRC32_POLY
            } else {
                crc << 1
            };
        }
        self.value = crc;
    }

    pub fn finish(&self) -> u32 {
        self.value
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Checksum of a whole grid, rows fed in order 0..ROWS.
pub fn checksum(grid: &Grid) -> u32 {
    let mut crc = Crc32::new();
    for &row in grid.rows() {
        crc.write(row);
    }
    crc.finish()
}

/// Compute the next value of `row` given the rows directly above and below.
///
/// For each column the 3-bit windows (columns `i-1, i, i+1`, wrapping inside
/// the word) of all three rows are looked up in [`POPCOUNT3`] and summed, so
/// `total` counts the centre cell as well.
#[inline]
pub fn next_row<R: Rule>(above: u32, row: u32, below: u32) -> u32 {
    let mut next = 0;
    for col in 0..COLS as u32 {
        // bit 0 = column col-1, bit 1 = col, bit 2 = col+1
        let shift = (col + COLS as u32 - 1) % COLS as u32;
        let total = POPCOUNT3[(above.rotate_right(shift) & 0x7) as usize]
            + POPCOUNT3[(row.rotate_right(shift) & 0x7) as usize]
            + POPCOUNT3[(below.rotate_right(shift) & 0x7) as usize];
        next |= R::next_state(total, (row >> col) & 1) << col;
    }
    next
}

/// Generation stepper for one rule, owning the scratch row set.
#[derive(Clone, Debug)]
pub struct Automaton<R> {
    scratch: [u32; ROWS],
    rule: PhantomData<R>,
}

impl<R: Rule> Automaton<R> {
    pub fn new() -> Self {
        Self {
            scratch: [0; ROWS],
            rule: PhantomData,
        }
    }

    /// Advance `grid` by one generation and return the checksum of the new
    /// contents.
    pub fn evolve(&mut self, grid: &mut Grid) -> u32 {
        self.scratch = *grid.rows();
        let mut crc = Crc32::new();
        for (i, out) in grid.rows_mut().iter_mut().enumerate() {
            let above = self.scratch[(i + ROWS - 1) % ROWS];
            let below = self.scratch[(i + 1) % ROWS];
            *out = next_row::<R>(above, self.scratch[i], below);
            crc.write(*out);
        }
        crc.finish()
    }
}

impl<R: Rule> Default for Automaton<R> {
    fn default() -> Self {
        Self::new()
    }
}
