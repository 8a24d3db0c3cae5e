//! Seed harvesting from a noisy timing source.
//!
//! The raw bit is the parity of the difference between two consecutive
//! samples. [`VonNeumann`] removes bias from that stream by looking at pairs
//! of raw bits: `01` yields `1`, `10` yields `0`, and equal pairs are thrown
//! away. [`RawJitter`] passes raw bits straight through.

use crate::config::SeedingMode;
use crate::grid::Grid;
use crate::hal::EntropySource;
use crate::well512::{Well512, STATE_WORDS};

/// A stream of random bits.
pub trait BitExtractor {
    fn next_bit(&mut self) -> bool;

    /// Raw sample most recently read from the source.
    fn last_sample(&self) -> u32;

    /// Raw samples consumed so far, not counting the initial reference sample.
    fn samples_consumed(&self) -> u64;
}

/// Difference-parity bits over consecutive samples.
#[derive(Debug)]
struct ParityBits<S> {
    source: S,
    prev: u32,
    consumed: u64,
}

impl<S: EntropySource> ParityBits<S> {
    fn new(mut source: S) -> Self {
        let prev = source.sample();
        Self {
            source,
            prev,
            consumed: 0,
        }
    }

    fn next(&mut self) -> u32 {
        let sample = self.source.sample();
        let bit = sample.wrapping_sub(self.prev) & 1;
        self.prev = sample;
        self.consumed += 1;
        bit
    }
}

/// Von Neumann debiasing extractor.
#[derive(Debug)]
pub struct VonNeumann<S> {
    bits: ParityBits<S>,
    rejected: u64,
}

impl<S: EntropySource> VonNeumann<S> {
    /// Takes one reference sample from `source` immediately.
    pub fn new(source: S) -> Self {
        Self {
            bits: ParityBits::new(source),
            rejected: 0,
        }
    }

    /// Pairs discarded because both bits were equal.
    pub fn rejected_pairs(&self) -> u64 {
        self.rejected
    }
}

impl<S: EntropySource> BitExtractor for VonNeumann<S> {
    fn next_bit(&mut self) -> bool {
        loop {
            match (self.bits.next(), self.bits.next()) {
                (0, 1) => return true,
                (1, 0) => return false,
                _ => self.rejected += 1,
            }
        }
    }

    fn last_sample(&self) -> u32 {
        self.bits.prev
    }

    fn samples_consumed(&self) -> u64 {
        self.bits.consumed
    }
}

/// Legacy extractor: raw difference parity, one sample per bit.
///
/// Any bias in the source carries straight into the seed.
#[derive(Debug)]
pub struct RawJitter<S> {
    bits: ParityBits<S>,
}

impl<S: EntropySource> RawJitter<S> {
    pub fn new(source: S) -> Self {
        Self {
            bits: ParityBits::new(source),
        }
    }
}

impl<S: EntropySource> BitExtractor for RawJitter<S> {
    fn next_bit(&mut self) -> bool {
        self.bits.next() == 1
    }

    fn last_sample(&self) -> u32 {
        self.bits.prev
    }

    fn samples_consumed(&self) -> u64 {
        self.bits.consumed
    }
}

/// Seeding progress after each accepted bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedProgress {
    /// Seed word being filled, `0..16`.
    pub word: usize,
    /// Bit just accepted within that word, `0..32`, most significant first.
    pub bit: usize,
    /// Bits of the current word accepted so far, right-aligned.
    pub partial: u32,
    /// Most recent raw sample.
    pub sample: u32,
}

impl SeedProgress {
    /// Draw the progress frame: the raw sample scrolls through rows 0..8 and
    /// the word being built sits in row `8 + word`.
    pub fn paint(&self, grid: &mut Grid) {
        let rows = grid.rows_mut();
        rows[self.bit & 0x7] = self.sample;
        rows[8 + self.word] = self.partial;
    }

    /// Seed bits harvested so far, including this one.
    pub fn bits_done(&self) -> usize {
        self.word * 32 + self.bit + 1
    }
}

/// Collect a 16-word seed, calling `progress` after every accepted bit.
///
/// Blocks until all 512 bits are accepted; a source that never changes value
/// makes this wait forever.
pub fn harvest_seed<E, F>(extractor: &mut E, mut progress: F) -> [u32; STATE_WORDS]
where
    E: BitExtractor + ?Sized,
    F: FnMut(&SeedProgress),
{
    let mut seed = [0u32; STATE_WORDS];
    for (word, slot) in seed.iter_mut().enumerate() {
        let mut value = 0u32;
        for bit in 0..32 {
            value = (value << 1) | extractor.next_bit() as u32;
            progress(&SeedProgress {
                word,
                bit,
                partial: value,
                sample: extractor.last_sample(),
            });
        }
        *slot = value;
    }
    log::info!(
        "seed harvested from {} samples",
        extractor.samples_consumed()
    );
    seed
}

/// Seed a WELL512 generator from `source` using `mode`.
pub fn seed_rng<S, F>(source: S, mode: SeedingMode, progress: F) -> Well512
where
    S: EntropySource,
    F: FnMut(&SeedProgress),
{
    let seed = match mode {
        SeedingMode::Debiased => harvest_seed(&mut VonNeumann::new(source), progress),
        SeedingMode::Raw => {
            log::warn!("seeding from raw jitter, bias is not removed");
            harvest_seed(&mut RawJitter::new(source), progress)
        }
    };
    Well512::from_seed(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed list of samples, then repeats the last one.
    struct Scripted {
        samples: Vec<u32>,
        pos: usize,
    }

    impl Scripted {
        /// Build samples whose consecutive differences have the given parities.
        fn from_parities(parities: &[u32]) -> Self {
            let mut samples = vec![100];
            for &p in parities {
                let last = samples[samples.len() - 1];
                samples.push(last + 2 + p);
            }
            Self { samples, pos: 0 }
        }
    }

    impl EntropySource for Scripted {
        fn sample(&mut self) -> u32 {
            let value = self.samples[self.pos.min(self.samples.len() - 1)];
            self.pos += 1;
            value
        }
    }

    /// Timer that advances by an odd step with probability 1/`odds`.
    struct Biased {
        value: u32,
        rng: Well512,
        odds: u32,
    }

    impl EntropySource for Biased {
        fn sample(&mut self) -> u32 {
            let step = if self.rng.next_word() % self.odds == 0 { 1 } else { 2 };
            self.value = self.value.wrapping_add(step);
            self.value
        }
    }

    fn biased(odds: u32) -> Biased {
        Biased {
            value: 0,
            rng: Well512::from_seed(std::array::from_fn(|i| 0xA5A5_0000 | i as u32 * 7919)),
            odds,
        }
    }

    #[test]
    fn pairs_map_to_bits_and_ties_are_rejected() {
        let mut extractor = VonNeumann::new(Scripted::from_parities(&[
            0, 0, // rejected
            0, 1, // 1
            1, 1, // rejected
            1, 0, // 0
        ]));
        assert!(extractor.next_bit());
        assert!(!extractor.next_bit());
        assert_eq!(extractor.rejected_pairs(), 2);
        assert_eq!(extractor.samples_consumed(), 8);
    }

    #[test]
    fn raw_jitter_uses_one_sample_per_bit() {
        let mut extractor = RawJitter::new(Scripted::from_parities(&[1, 0, 0, 1]));
        let bits: Vec<bool> = (0..4).map(|_| extractor.next_bit()).collect();
        assert_eq!(bits, [true, false, false, true]);
        assert_eq!(extractor.samples_consumed(), 4);
    }

    #[test]
    fn difference_parity_survives_timer_wraparound() {
        let mut source = Scripted::from_parities(&[]);
        source.samples = vec![u32::MAX, 0, 2];
        let mut extractor = RawJitter::new(source);
        assert!(extractor.next_bit());
        assert!(!extractor.next_bit());
    }

    #[test]
    fn biased_source_is_balanced_after_extraction() {
        let mut extractor = VonNeumann::new(biased(10));
        let total = 20_000;
        let ones = (0..total).filter(|_| extractor.next_bit()).count();
        let ratio = ones as f64 / total as f64;
        assert!((ratio - 0.5).abs() < 0.02, "ratio {ratio}");
        // 2 * 0.1 * 0.9 = 18% of pairs are accepted.
        let per_bit = extractor.samples_consumed() as f64 / total as f64;
        assert!(per_bit > 2.0, "samples per bit {per_bit}");
    }

    #[test]
    fn raw_jitter_keeps_the_bias() {
        let mut extractor = RawJitter::new(biased(10));
        let total = 20_000;
        let ones = (0..total).filter(|_| extractor.next_bit()).count();
        assert!((ones as f64 / total as f64) < 0.2);
    }

    #[test]
    fn seed_words_are_assembled_msb_first() {
        // Alternating raw bits 1,0,1,0,... give 0xAAAA_AAAA words.
        let parities: Vec<u32> = (0..512).map(|i| (i + 1) % 2).collect();
        let mut extractor = RawJitter::new(Scripted::from_parities(&parities));
        let mut calls = 0;
        let seed = harvest_seed(&mut extractor, |progress| {
            assert_eq!(progress.bits_done(), calls + 1);
            calls += 1;
        });
        assert_eq!(calls, 512);
        assert!(seed.iter().all(|&word| word == 0xAAAA_AAAA));
    }

    #[test]
    fn progress_frame_shows_sample_and_partial_word() {
        let progress = SeedProgress {
            word: 3,
            bit: 10,
            partial: 0b101,
            sample: 0xDEAD_BEEF,
        };
        let mut grid = Grid::new();
        progress.paint(&mut grid);
        assert_eq!(grid.row(2), 0xDEAD_BEEF);
        assert_eq!(grid.row(11), 0b101);
        assert_eq!(grid.population(), 24 + 2);
    }

    #[test]
    fn seeding_modes_produce_usable_generators() {
        let mut debiased = seed_rng(biased(3), SeedingMode::Debiased, |_| {});
        let mut raw = seed_rng(biased(3), SeedingMode::Raw, |_| {});
        assert_ne!(debiased.next_word(), raw.next_word());
        assert!(debiased.state().iter().any(|&word| word != 0));
    }
}
