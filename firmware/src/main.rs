use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle, MonoTextStyleBuilder},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::Text,
};
use esp_idf_svc::hal::gpio::{Gpio9, Input, PinDriver, Pull};
use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use lattice_panel::hal::{Backlight, Display, EntropySource, Kickstart, Ticker, TriggerLine};
use lattice_panel::{Config, Grid, Panel, COLS};
use smart_leds::hsv::{hsv2rgb, Hsv};
use smart_leds::SmartLedsWrite;
use ssd1306::{mode::BufferedGraphicsMode, prelude::*, I2CDisplayInterface, Ssd1306};
use std::thread;
use std::time::Duration;
use ws2812_esp32_rmt_driver::Ws2812Esp32Rmt;

/// Simulation tick.
const TICK: Duration = Duration::from_millis(40);

/// Pixels per cell edge on the OLED.
const CELL: i32 = 2;

/// Top-left corner of the 64×48 grid area, centred horizontally.
const GRID_ORIGIN: Point = Point::new(32, 0);

/// Status LED hue (green).
const LED_HUE: u8 = 85;

/// Highest LED value at full panel brightness.
const LED_MAX_VAL: u32 = 64;

/// SSD1306 128x64 OLED used as the panel.
struct Oled<DI> {
    display: Ssd1306<DI, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>,
    text_style: MonoTextStyle<'static, BinaryColor>,
}

impl<DI: WriteOnlyDataCommand> Oled<DI> {
    fn draw(&mut self, grid: &Grid) -> anyhow::Result<()> {
        self.display.clear_buffer();

        let live = PrimitiveStyle::with_fill(BinaryColor::On);
        for (row, word) in grid.rows().iter().enumerate() {
            for col in (0..COLS).filter(|&col| (word >> col) & 1 == 1) {
                let corner = GRID_ORIGIN + Point::new(col as i32 * CELL, row as i32 * CELL);
                Rectangle::new(corner, Size::new_equal(CELL as u32))
                    .into_styled(live)
                    .draw(&mut self.display)
                    .map_err(|e| anyhow::anyhow!("Draw: {:?}", e))?;
            }
        }

        let status = format!("pop {}", grid.population());
        Text::new(&status, Point::new(0, 60), self.text_style)
            .draw(&mut self.display)
            .map_err(|e| anyhow::anyhow!("Draw: {:?}", e))?;

        self.display
            .flush()
            .map_err(|e| anyhow::anyhow!("Flush: {:?}", e))
    }
}

impl<DI: WriteOnlyDataCommand> Display for Oled<DI> {
    fn render(&mut self, grid: &Grid) {
        if let Err(e) = self.draw(grid) {
            log::error!("OLED render failed: {}", e);
        }
    }
}

/// On-board WS2812, glowing with the panel brightness.
struct StatusLed {
    led: Ws2812Esp32Rmt<'static>,
    max: u8,
}

impl Backlight for StatusLed {
    fn set_brightness(&mut self, level: u8) {
        let val = u32::from(level) * LED_MAX_VAL / u32::from(self.max.max(1));
        let color = hsv2rgb(Hsv {
            hue: LED_HUE,
            sat: 255,
            val: val as u8,
        });
        if let Err(e) = self.led.write([color].iter().copied()) {
            log::error!("LED write failed: {:?}", e);
        }
    }
}

/// BOOT button, active low.
struct BootButton {
    pin: PinDriver<'static, Gpio9, Input>,
}

impl TriggerLine for BootButton {
    fn is_asserted(&mut self) -> bool {
        self.pin.is_low()
    }
}

/// Wake-up jitter of the FreeRTOS scheduler measured on the microsecond
/// `esp_timer` clock.
struct TimerJitter;

impl EntropySource for TimerJitter {
    fn sample(&mut self) -> u32 {
        thread::sleep(Duration::from_millis(1));
        // SAFETY: esp_timer is started by ESP-IDF before app_main.
        let micros = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
        micros as u32
    }
}

fn main() -> anyhow::Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    let config = Config::from_overrides(
        option_env!("LATTICE_RULE"),
        option_env!("LATTICE_SEEDING"),
        option_env!("LATTICE_AUTO_RESEED"),
    )?;
    log::info!(
        "Lattice panel: rule {}, {} seeding, auto reseed {}",
        config.rule,
        config.seeding,
        config.auto_reseed
    );

    let peripherals = Peripherals::take()?;

    // Status LED on GPIO8, RMT channel 0
    let ws2812 = Ws2812Esp32Rmt::new(peripherals.rmt.channel0, peripherals.pins.gpio8)?;
    let status_led = StatusLed {
        led: ws2812,
        max: config.fade.max,
    };
    log::info!("Status LED ready");

    // Panel: SSD1306 over I2C, SDA GPIO6, SCL GPIO7
    let i2c_config = I2cConfig::new().baudrate(400_000.into());
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio6,
        peripherals.pins.gpio7,
        &i2c_config,
    )?;

    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    display
        .init()
        .map_err(|e| anyhow::anyhow!("Display init: {:?}", e))?;
    display.clear_buffer();

    let text_style = MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build();
    let oled = Oled {
        display,
        text_style,
    };
    log::info!("OLED panel ready");

    // BOOT button as the trigger line
    let mut pin = PinDriver::input(peripherals.pins.gpio9)?;
    pin.set_pull(Pull::Up)?;
    let trigger = Kickstart::new(BootButton { pin });

    log::info!("Harvesting seed from timer jitter...");
    let mut panel = Panel::boot(
        &config,
        TimerJitter,
        Grid::new(),
        Ticker::new(TICK),
        oled,
        status_led,
        trigger,
    );
    log::info!("Seeded, running at {} ms per generation", TICK.as_millis());

    panel.run()
}
