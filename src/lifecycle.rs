//! Colony liveness: energy counter, stagnation detection and reseeding.

use rand_core::RngCore;

use crate::grid::Grid;

/// First row of the band that receives new cells on a trigger.
pub const SEED_BAND_START: usize = 8;

/// Number of rows in the seed band, four per random word.
pub const SEED_BAND_ROWS: usize = 8;

/// Columns 2..=9 of a seed band row.
pub const SEED_BAND_MASK: u32 = 0x0000_03FC;

/// Energy counter plus the last three generation checksums.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lifecycle {
    energy: u32,
    max_energy: u32,
    /// Most recent first.
    history: [u32; 3],
}

impl Lifecycle {
    pub fn new(max_energy: u32) -> Self {
        Self {
            energy: max_energy,
            max_energy,
            history: [0; 3],
        }
    }

    pub fn energy(&self) -> u32 {
        self.energy
    }

    pub fn history(&self) -> &[u32; 3] {
        &self.history
    }

    /// Whether `checksum` repeats the last generation, or closes a period-2
    /// cycle over the last three.
    pub fn is_stagnant(&self, checksum: u32) -> bool {
        let [last, before, oldest] = self.history;
        checksum == last || (checksum == before && last == oldest)
    }

    /// Record the checksum of a new generation and update energy.
    /// Returns `true` when the colony was found stagnant.
    pub fn observe(&mut self, checksum: u32) -> bool {
        let stagnant = self.is_stagnant(checksum);
        self.energy = if stagnant {
            0
        } else {
            self.energy.saturating_sub(1)
        };
        self.history = [checksum, self.history[0], self.history[1]];
        stagnant
    }

    /// Restore full energy.
    pub fn recharge(&mut self) {
        self.energy = self.max_energy;
    }
}

/// OR two random words worth of cells into the seed band.
///
/// Byte `k` of the first word lands in row `SEED_BAND_START + k`, byte `k` of
/// the second in row `SEED_BAND_START + 4 + k`, each shifted into columns
/// 2..=9. Cells outside the band are never touched.
pub fn seed_band<R: RngCore + ?Sized>(grid: &mut Grid, rng: &mut R) {
    for half in 0..SEED_BAND_ROWS / 4 {
        let word = rng.next_u32();
        for k in 0..4 {
            let bits = (word >> (8 * k)) << 2;
            grid.merge_row(SEED_BAND_START + 4 * half + k, bits & SEED_BAND_MASK);
        }
    }
}
