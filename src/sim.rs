//! Simulation handle: one rule variant behind the trigger/update interface.

use crate::automaton::Automaton;
use crate::grid::Grid;
use crate::lifecycle::{seed_band, Lifecycle};
use crate::rule::{HighLife, Life, Rule, RuleVariant};
use crate::well512::Well512;

/// A running automaton with its lifecycle state.
///
/// The grid is not owned: it is the framebuffer as well, so it is lent to
/// whichever side (simulation or display) is acting on it.
pub trait Simulation {
    /// Restore full energy and sprinkle new live cells into the seed band.
    fn trigger(&mut self, grid: &mut Grid);

    /// Advance one generation and update energy from the stagnation test.
    fn update(&mut self, grid: &mut Grid);

    /// Remaining energy; zero once the colony is stagnant or exhausted.
    fn energy(&self) -> u32;

    fn rule(&self) -> RuleVariant;
}

/// Automaton for rule `R`, its lifecycle and the generator feeding triggers.
#[derive(Clone, Debug)]
pub struct Colony<R> {
    automaton: Automaton<R>,
    lifecycle: Lifecycle,
    rng: Well512,
    variant: RuleVariant,
}

impl<R: Rule> Colony<R> {
    fn with_variant(variant: RuleVariant, rng: Well512, max_energy: u32) -> Self {
        Self {
            automaton: Automaton::new(),
            lifecycle: Lifecycle::new(max_energy),
            rng,
            variant,
        }
    }
}

impl Colony<Life> {
    pub fn life(rng: Well512, max_energy: u32) -> Self {
        Self::with_variant(RuleVariant::Life, rng, max_energy)
    }
}

impl Colony<HighLife> {
    pub fn high_life(rng: Well512, max_energy: u32) -> Self {
        Self::with_variant(RuleVariant::HighLife, rng, max_energy)
    }
}

impl<R: Rule> Simulation for Colony<R> {
    fn trigger(&mut self, grid: &mut Grid) {
        self.lifecycle.recharge();
        seed_band(grid, &mut self.rng);
        log::debug!("{}: triggered, population {}", R::NAME, grid.population());
    }

    fn update(&mut self, grid: &mut Grid) {
        let checksum = self.automaton.evolve(grid);
        log::trace!("{}: checksum {checksum:08x}", R::NAME);
        let had_energy = self.lifecycle.energy() > 0;
        if self.lifecycle.observe(checksum) && had_energy {
            log::debug!("{}: colony stagnant, population {}", R::NAME, grid.population());
        }
    }

    fn energy(&self) -> u32 {
        self.lifecycle.energy()
    }

    fn rule(&self) -> RuleVariant {
        self.variant
    }
}

/// Build the simulation for `variant`. The generator must already be seeded.
pub fn build(variant: RuleVariant, rng: Well512, max_energy: u32) -> Box<dyn Simulation> {
    log::info!("starting {variant} with energy {max_energy}");
    match variant {
        RuleVariant::Life => Box::new(Colony::life(rng, max_energy)),
        RuleVariant::HighLife => Box::new(Colony::high_life(rng, max_energy)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_ENERGY;
    use crate::grid::{patterns, ROWS};
    use crate::lifecycle::{SEED_BAND_MASK, SEED_BAND_ROWS, SEED_BAND_START};

    fn rng() -> Well512 {
        Well512::from_seed(std::array::from_fn(|i| 0x1234_5678u32.rotate_left(i as u32) ^ i as u32))
    }

    #[test]
    fn still_life_stagnates_on_the_next_update() {
        let mut grid = Grid::from_pattern(patterns::BLOCK, 4, 4);
        let mut colony = Colony::life(rng(), MAX_ENERGY);
        colony.update(&mut grid);
        assert_eq!(colony.energy(), MAX_ENERGY - 1);
        colony.update(&mut grid);
        assert_eq!(colony.energy(), 0);
    }

    #[test]
    fn single_cell_stagnates_once_dead() {
        let mut grid = Grid::from_cells([(12, 12)]);
        let mut colony = Colony::life(rng(), MAX_ENERGY);
        colony.update(&mut grid);
        assert!(grid.is_empty());
        colony.update(&mut grid);
        assert_eq!(colony.energy(), 0);
    }

    #[test]
    fn blinker_detected_as_period_two() {
        let mut grid = Grid::from_pattern(patterns::BLINKER, 12, 12);
        let mut colony = Colony::life(rng(), MAX_ENERGY);
        for expected in [MAX_ENERGY - 1, MAX_ENERGY - 2, MAX_ENERGY - 3] {
            colony.update(&mut grid);
            assert_eq!(colony.energy(), expected);
        }
        // The window now holds both phases; the next repeat closes the cycle.
        colony.update(&mut grid);
        assert_eq!(colony.energy(), 0);
    }

    #[test]
    fn glider_keeps_draining_one_per_update() {
        let mut grid = Grid::from_pattern(patterns::GLIDER, 0, 0);
        let mut colony = Colony::life(rng(), 20);
        for expected in (0..20).rev() {
            colony.update(&mut grid);
            assert_eq!(colony.energy(), expected);
        }
        colony.update(&mut grid);
        assert_eq!(colony.energy(), 0);
    }

    #[test]
    fn trigger_recharges_and_only_touches_the_band() {
        let mut grid = Grid::from_pattern(patterns::BLOCK, 0, 20);
        let before = grid;
        let mut colony = Colony::life(rng(), MAX_ENERGY);
        colony.update(&mut grid);
        colony.update(&mut grid);
        assert_eq!(colony.energy(), 0);

        colony.trigger(&mut grid);
        assert_eq!(colony.energy(), MAX_ENERGY);
        for row in 0..ROWS {
            let added = grid.row(row) & !before.row(row);
            if (SEED_BAND_START..SEED_BAND_START + SEED_BAND_ROWS).contains(&row) {
                assert_eq!(added & !SEED_BAND_MASK, 0);
            } else {
                assert_eq!(grid.row(row), before.row(row));
            }
        }
    }

    #[test]
    fn trigger_at_full_energy_stays_at_max() {
        let mut grid = Grid::new();
        let mut colony = Colony::high_life(rng(), 77);
        colony.trigger(&mut grid);
        assert_eq!(colony.energy(), 77);
    }

    #[test]
    fn build_selects_variant() {
        for variant in [RuleVariant::Life, RuleVariant::HighLife] {
            assert_eq!(build(variant, rng(), 10).rule(), variant);
        }
    }

    #[test]
    fn variants_diverge_on_six_neighbours() {
        // Two horizontal triples with an empty row between them give the
        // middle row cells with six neighbours.
        let start = Grid::from_pattern("OOO\n...\nOOO", 10, 10);
        let mut life_grid = start;
        let mut high_grid = start;
        build(RuleVariant::Life, rng(), 10).update(&mut life_grid);
        build(RuleVariant::HighLife, rng(), 10).update(&mut high_grid);
        assert!(!life_grid.is_alive(11, 11));
        assert!(high_grid.is_alive(11, 11));
    }
}
