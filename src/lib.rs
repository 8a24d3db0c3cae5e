//! Game of Life on a 24×32 LED panel.
//!
//! The grid is bit-packed, one `u32` per row, and wraps in both directions.
//! A colony loses one unit of energy per generation and all of it as soon as
//! it stops changing (still life or period-2 oscillator); the energy drives
//! the panel brightness. A trigger restores energy and scatters new cells
//! drawn from a WELL512 generator, which is seeded once at start-up from
//! hardware timing jitter.
//!
//! # Example
//!
//! ```
//! use lattice_panel::{grid::patterns, Colony, Grid, Simulation, Well512};
//!
//! let mut grid = Grid::from_pattern(patterns::BLOCK, 10, 10);
//! let mut colony = Colony::life(Well512::from_seed([7; 16]), 100);
//! colony.update(&mut grid);
//! colony.update(&mut grid);
//! assert_eq!(colony.energy(), 0); // a block never changes
//!
//! colony.trigger(&mut grid);
//! assert_eq!(colony.energy(), 100);
//! ```

pub mod automaton;
pub mod config;
pub mod entropy;
pub mod error;
pub mod grid;
pub mod hal;
pub mod lifecycle;
pub mod panel;
pub mod rule;
pub mod sim;
pub mod well512;

pub use config::{Config, Fade, SeedingMode, MAX_ENERGY};
pub use error::{Error, Result};
pub use grid::{Grid, COLS, ROWS};
pub use panel::Panel;
pub use rule::{HighLife, Life, Rule, RuleVariant};
pub use sim::{Colony, Simulation};
pub use well512::Well512;
