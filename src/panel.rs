//! Tick-driven control loop tying the simulation to the panel hardware.

use crate::config::{Config, Fade};
use crate::entropy::seed_rng;
use crate::grid::Grid;
use crate::hal::{Backlight, Display, EntropySource, TickSource, TriggerLine};
use crate::sim::{self, Simulation};
use crate::well512::Well512;

/// The running panel: grid, simulation and the hardware around them.
pub struct Panel<T, D, B, L> {
    grid: Grid,
    sim: Box<dyn Simulation>,
    ticks: T,
    display: D,
    backlight: B,
    trigger: L,
    fade: Fade,
    level: u8,
    auto_reseed: bool,
    last_tick: u32,
    generations: u64,
}

impl<T, D, B, L> Panel<T, D, B, L>
where
    T: TickSource,
    D: Display,
    B: Backlight,
    L: TriggerLine,
{
    /// Seed the generator from `entropy`, showing progress on `display`,
    /// then build the panel around `grid`.
    pub fn boot<S: EntropySource>(
        config: &Config,
        entropy: S,
        grid: Grid,
        ticks: T,
        mut display: D,
        backlight: B,
        trigger: L,
    ) -> Self {
        let mut frame = Grid::new();
        let rng = seed_rng(entropy, config.seeding, |progress| {
            progress.paint(&mut frame);
            display.render(&frame);
        });
        Self::new(config, rng, grid, ticks, display, backlight, trigger)
    }

    /// Build the panel with an already seeded generator. The backlight is set
    /// to full brightness.
    pub fn new(
        config: &Config,
        rng: Well512,
        grid: Grid,
        ticks: T,
        display: D,
        mut backlight: B,
        trigger: L,
    ) -> Self {
        backlight.set_brightness(config.fade.max);
        Self {
            grid,
            sim: sim::build(config.rule, rng, config.max_energy),
            ticks,
            display,
            backlight,
            trigger,
            fade: config.fade,
            level: config.fade.max,
            auto_reseed: config.auto_reseed,
            last_tick: 0,
            generations: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn energy(&self) -> u32 {
        self.sim.energy()
    }

    pub fn brightness(&self) -> u8 {
        self.level
    }

    /// Generations evolved since start-up.
    pub fn generations(&self) -> u64 {
        self.generations
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Wait for the next tick and run one step if the counter moved.
    /// Returns `true` when a generation was evolved.
    pub fn poll(&mut self) -> bool {
        let tick = self.ticks.wait_tick();
        if tick == self.last_tick {
            return false;
        }
        self.last_tick = tick;
        self.step();
        true
    }

    pub fn run(&mut self) -> ! {
        loop {
            self.poll();
        }
    }

    fn step(&mut self) {
        self.display.render(&self.grid);

        let level = self.fade.step(self.level, self.sim.energy() > 0);
        if level != self.level {
            self.backlight.set_brightness(level);
            self.level = level;
        }

        let faded_out = self.sim.energy() == 0 && self.level == 0;
        if self.trigger.is_asserted() {
            self.sim.trigger(&mut self.grid);
        } else if self.auto_reseed && faded_out {
            log::info!("colony faded out after {} generations, reseeding", self.generations);
            self.sim.trigger(&mut self.grid);
        }

        self.sim.update(&mut self.grid);
        self.generations += 1;
    }
}
