use std::cell::Cell;
use std::fmt::Write as _;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use lattice_panel::grid::patterns;
use lattice_panel::hal::{Backlight, ClockJitter, Display, Kickstart, Ticker, TriggerLine};
use lattice_panel::{Config, Fade, Grid, Panel, RuleVariant, SeedingMode, COLS, MAX_ENERGY, ROWS};

const DEFAULT_FPS: u64 = 25;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StartPattern {
    /// Empty panel, seeded by an immediate trigger.
    Random,
    Glider,
    Blinker,
    Block,
    Rpent,
    Toad,
}

#[derive(Parser, Debug)]
#[command(name = "life", about = "Lattice panel Game of Life in the terminal")]
struct Args {
    /// Automaton rule: `life` (B3/S23) or `highlife` (B36/S23).
    #[arg(long, default_value_t = RuleVariant::Life)]
    rule: RuleVariant,

    /// Seed extraction: `debiased` or `raw`.
    #[arg(long, default_value_t = SeedingMode::Debiased)]
    seeding: SeedingMode,

    /// Ticks per second.
    #[arg(long, default_value_t = DEFAULT_FPS)]
    fps: u64,

    /// Stop after this many generations (0 runs forever).
    #[arg(long, default_value_t = 0)]
    generations: u64,

    /// Assert the trigger line every N ticks (0 never).
    #[arg(long, default_value_t = 0)]
    trigger_every: u32,

    /// Reseed by itself once the colony has stagnated and faded out.
    #[arg(long)]
    auto_reseed: bool,

    /// Energy restored by a trigger.
    #[arg(long, default_value_t = MAX_ENERGY)]
    max_energy: u32,

    #[arg(long, value_enum, default_value_t = StartPattern::Random)]
    pattern: StartPattern,
}

/// Terminal stand-in for the LED panel; live cells are drawn in a grey
/// level following the backlight.
struct Terminal {
    out: io::Stdout,
    level: Rc<Cell<u8>>,
    max: u8,
}

impl Display for Terminal {
    fn render(&mut self, grid: &Grid) {
        let frame = render(grid, self.level.get(), self.max);
        let mut out = self.out.lock();
        if let Err(e) = out.write_all(frame.as_bytes()).and_then(|_| out.flush()) {
            log::error!("terminal write failed: {e}");
        }
    }
}

struct TerminalBacklight(Rc<Cell<u8>>);

impl Backlight for TerminalBacklight {
    fn set_brightness(&mut self, level: u8) {
        self.0.set(level);
    }
}

/// Fires every `every` ticks, never when `every` is 0.
struct Periodic {
    every: u32,
    ticks: u32,
}

impl TriggerLine for Periodic {
    fn is_asserted(&mut self) -> bool {
        self.ticks += 1;
        self.every > 0 && self.ticks % self.every == 0
    }
}

fn render(grid: &Grid, level: u8, max: u8) -> String {
    let mut buf = String::with_capacity(ROWS * (COLS * 4 + 1) + 64);
    let grey = 40 + u32::from(level) * 215 / u32::from(max.max(1));

    // Move cursor home + clear screen
    buf.push_str("\x1b[H\x1b[J");
    let _ = writeln!(
        buf,
        " Population: {}  Brightness: {level}/{max}\n",
        grid.population()
    );
    let _ = write!(buf, "\x1b[38;2;{grey};{grey};{grey}m");
    for row in grid.rows() {
        buf.push(' ');
        for col in 0..COLS {
            buf.push(if (row >> col) & 1 == 1 { '█' } else { ' ' });
        }
        buf.push('\n');
    }
    buf.push_str("\x1b[0m\n Press Ctrl+C to quit.\n");
    buf
}

fn start_grid(pattern: StartPattern) -> Grid {
    let (text, row, col) = match pattern {
        StartPattern::Random => return Grid::new(),
        StartPattern::Glider => (patterns::GLIDER, 2, 2),
        StartPattern::Blinker => (patterns::BLINKER, ROWS / 2, COLS / 2 - 1),
        StartPattern::Block => (patterns::BLOCK, ROWS / 2 - 1, COLS / 2 - 1),
        StartPattern::Rpent => (patterns::R_PENTOMINO, ROWS / 2 - 1, COLS / 2 - 1),
        StartPattern::Toad => (patterns::TOAD, ROWS / 2 - 1, COLS / 2 - 2),
    };
    Grid::from_pattern(text, row, col)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = Config {
        rule: args.rule,
        max_energy: args.max_energy,
        fade: Fade::default(),
        seeding: args.seeding,
        auto_reseed: args.auto_reseed,
    };
    config.validate().context("invalid configuration")?;
    anyhow::ensure!(args.fps > 0, "--fps must be at least 1");

    let level = Rc::new(Cell::new(config.fade.max));
    let display = Terminal {
        out: io::stdout(),
        level: Rc::clone(&level),
        max: config.fade.max,
    };
    let periodic = Periodic {
        every: args.trigger_every,
        ticks: 0,
    };
    let trigger: Box<dyn TriggerLine> = match args.pattern {
        StartPattern::Random => Box::new(Kickstart::new(periodic)),
        _ => Box::new(periodic),
    };

    // Hide cursor
    print!("\x1b[?25l");
    let mut panel = Panel::boot(
        &config,
        ClockJitter::default(),
        start_grid(args.pattern),
        Ticker::new(Duration::from_millis(1000 / args.fps)),
        display,
        TerminalBacklight(level),
        trigger,
    );

    while args.generations == 0 || panel.generations() < args.generations {
        panel.poll();
    }
    print!("\x1b[?25h");
    io::stdout().flush().context("flushing stdout")?;

    log::info!(
        "stopped after {} generations, energy {}",
        panel.generations(),
        panel.energy()
    );
    Ok(())
}
