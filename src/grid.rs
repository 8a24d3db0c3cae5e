use std::fmt;

/// Number of rows on the panel.
pub const ROWS: usize = 24;

/// Number of columns on the panel, one per bit of a row word.
pub const COLS: usize = 32;

/// Bit-packed toroidal cell grid.
///
/// Each row is a `u32` where bit `i` holds the cell in column `i`. Both axes
/// wrap: column 31 touches column 0 and row 23 touches row 0. The grid is the
/// simulation state and the framebuffer at the same time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: [u32; ROWS],
}

impl Grid {
    /// Create an empty grid.
    pub const fn new() -> Self {
        Self { rows: [0; ROWS] }
    }

    /// Create a grid from raw row words.
    pub const fn from_rows(rows: [u32; ROWS]) -> Self {
        Self { rows }
    }

    /// Create a grid from an iterator of live `(row, col)` positions.
    /// Positions outside the panel wrap around.
    pub fn from_cells(cells: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut grid = Self::new();
        for (row, col) in cells {
            grid.set(row, col, true);
        }
        grid
    }

    /// Parse a grid from a multi-line string where `#` or `O` = alive.
    /// The pattern is anchored at (offset_row, offset_col) and wraps at the edges.
    pub fn from_pattern(pattern: &str, offset_row: usize, offset_col: usize) -> Self {
        let cells = pattern.lines().enumerate().flat_map(|(r, line)| {
            line.chars().enumerate().filter_map(move |(c, ch)| {
                matches!(ch, '#' | 'O').then_some((r + offset_row, c + offset_col))
            })
        });
        Self::from_cells(cells)
    }

    pub fn rows(&self) -> &[u32; ROWS] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [u32; ROWS] {
        &mut self.rows
    }

    /// Row word at `row`, wrapping.
    pub fn row(&self, row: usize) -> u32 {
        self.rows[row % ROWS]
    }

    /// OR `bits` into a row without clearing anything already alive.
    pub fn merge_row(&mut self, row: usize, bits: u32) {
        self.rows[row % ROWS] |= bits;
    }

    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        (self.row(row) >> (col % COLS)) & 1 == 1
    }

    pub fn set(&mut self, row: usize, col: usize, alive: bool) {
        let mask = 1u32 << (col % COLS);
        let word = &mut self.rows[row % ROWS];
        if alive {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    pub fn toggle(&mut self, row: usize, col: usize) {
        self.rows[row % ROWS] ^= 1u32 << (col % COLS);
    }

    /// Number of live cells.
    pub fn population(&self) -> u32 {
        self.rows.iter().map(|row| row.count_ones()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|&row| row == 0)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, &row) in self.rows.iter().enumerate() {
            for c in 0..COLS {
                let ch = if (row >> c) & 1 == 1 { '█' } else { '·' };
                write!(f, "{ch}")?;
            }
            if r + 1 < ROWS {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// ─── Classic patterns ────────────────────────────────────────────

pub mod patterns {
    /// Block: the smallest still life.
    pub const BLOCK: &str = "\
OO
OO";

    /// Blinker: a period-2 oscillator.
    pub const BLINKER: &str = "OOO";

    /// Glider: a small spaceship that moves diagonally and wraps forever on a torus.
    pub const GLIDER: &str = "\
.O.
..O
OOO";

    /// R-pentomino: a tiny pattern with chaotic long-lived evolution.
    pub const R_PENTOMINO: &str = "\
.OO
OO.
.O.";

    /// Toad: a period-2 oscillator spanning two rows.
    pub const TOAD: &str = "\
.OOO
OOO.";
}

// ─── Tests ───────────────────────────────────────────────────────
