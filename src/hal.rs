//! Hardware collaborator interfaces, plus `std` implementations of the
//! timing-based ones.

use std::thread;
use std::time::{Duration, Instant};

use crate::grid::Grid;

/// Periodic tick counter.
pub trait TickSource {
    /// Suspend until the next tick boundary and return the counter value
    /// observed there. The counter only ever increases (wrapping).
    fn wait_tick(&mut self) -> u32;
}

/// Paints the grid onto the physical panel.
pub trait Display {
    fn render(&mut self, grid: &Grid);
}

/// Panel dimming.
pub trait Backlight {
    /// Apply a brightness level in `0..=fade.max`.
    fn set_brightness(&mut self, level: u8);
}

/// External stimulus sampled once per tick.
pub trait TriggerLine {
    fn is_asserted(&mut self) -> bool;
}

/// Noisy timing source used only while seeding.
pub trait EntropySource {
    /// Wait for a tick boundary and return the raw timer value read there.
    fn sample(&mut self) -> u32;
}

impl<L: TriggerLine + ?Sized> TriggerLine for Box<L> {
    fn is_asserted(&mut self) -> bool {
        (**self).is_asserted()
    }
}

/// Trigger line that is never asserted.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTrigger;

impl TriggerLine for NoTrigger {
    fn is_asserted(&mut self) -> bool {
        false
    }
}

/// Asserts once on the first sample, then follows the wrapped line. Gives an
/// empty panel its first colony.
#[derive(Debug)]
pub struct Kickstart<L> {
    line: L,
    fired: bool,
}

impl<L: TriggerLine> Kickstart<L> {
    pub fn new(line: L) -> Self {
        Self { line, fired: false }
    }
}

impl<L: TriggerLine> TriggerLine for Kickstart<L> {
    fn is_asserted(&mut self) -> bool {
        // The wrapped line is sampled on every call, the first one included.
        let asserted = self.line.is_asserted();
        if !self.fired {
            self.fired = true;
            return true;
        }
        asserted
    }
}

/// Fixed-period tick source driven by the monotonic clock.
///
/// The counter starts at 0. If the caller falls behind, the missed ticks are
/// counted and `wait_tick` returns without sleeping.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    started: Instant,
    count: u32,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            started: Instant::now(),
            count: 0,
        }
    }

    fn elapsed_ticks(&self) -> u32 {
        let period = self.period.as_nanos().max(1);
        (self.started.elapsed().as_nanos() / period) as u32
    }
}

impl TickSource for Ticker {
    fn wait_tick(&mut self) -> u32 {
        let now = self.elapsed_ticks();
        if now > self.count {
            self.count = now;
        } else {
            let next = self.period * (self.count + 1);
            if let Some(remaining) = next.checked_sub(self.started.elapsed()) {
                thread::sleep(remaining);
            }
            self.count += 1;
        }
        self.count
    }
}

/// Entropy from scheduler wake-up jitter: sleeps for a short nap and reads
/// the low bits of the monotonic clock in nanoseconds.
#[derive(Debug)]
pub struct ClockJitter {
    origin: Instant,
    nap: Duration,
}

impl ClockJitter {
    pub fn new(nap: Duration) -> Self {
        Self {
            origin: Instant::now(),
            nap,
        }
    }
}

impl Default for ClockJitter {
    fn default() -> Self {
        Self::new(Duration::from_micros(50))
    }
}

impl EntropySource for ClockJitter {
    fn sample(&mut self) -> u32 {
        thread::sleep(self.nap);
        self.origin.elapsed().as_nanos() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_counts_up_and_waits() {
        let mut ticker = Ticker::new(Duration::from_millis(2));
        let start = Instant::now();
        let first = ticker.wait_tick();
        let second = ticker.wait_tick();
        assert!(first >= 1);
        assert!(second > first);
        assert!(start.elapsed() >= Duration::from_millis(2));
    }

    #[test]
    fn ticker_catches_up_after_a_stall() {
        let mut ticker = Ticker::new(Duration::from_millis(1));
        thread::sleep(Duration::from_millis(10));
        assert!(ticker.wait_tick() >= 10);
    }

    #[test]
    fn kickstart_fires_first_then_follows_line() {
        let mut line = Kickstart::new(NoTrigger);
        assert!(line.is_asserted());
        assert!(!line.is_asserted());
        assert!(!line.is_asserted());
    }

    #[test]
    fn boxed_lines_forward() {
        let mut line: Box<dyn TriggerLine> = Box::new(Kickstart::new(NoTrigger));
        assert!(line.is_asserted());
        assert!(!line.is_asserted());
    }

    #[test]
    fn clock_jitter_moves_forward() {
        let mut source = ClockJitter::default();
        let a = source.sample();
        let b = source.sample();
        assert_ne!(a, b);
    }
}
