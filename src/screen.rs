use std::time::SystemTime;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_hal::spi::MODE_3;
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::*;
use esp_idf_hal::spi::{Dma, SpiDeviceDriver, SpiDriver, SpiDriverConfig, SPI2};
use esp_idf_hal::units::FromValueType;
use mipidsi::interface::SpiInterface;
use world_clock::threads::debug_dump_stack_info;
use world_clock::timings::RenderTimings;
use world_clock_graphics::{face::DEFAULT_SIZE, Interface};

// Frames drop to a poll when nothing changed, so this only bounds latency.
const FRAME_DELAY_MS: u32 = 20;

pub struct ScreenBuilder {
    pub spi: SPI2,
    pub rst: Gpio4,
    pub dc: Gpio2,
    pub sclk: Gpio18,
    pub sda: Gpio23,
}

impl ScreenBuilder {
    pub fn build(self) -> anyhow::Result<Screen> {
        let Self {
            spi,
            rst,
            dc,
            sclk,
            sda,
        } = self;
        // ST7789 wiring, SPI2:
        // * GPIO18 SCL(K), GPIO23 SDA
        // * GPIO4 RES, GPIO2 DC
        // * CS tied low, BLK not connected
        let rst = PinDriver::output(rst)?;
        let dc = PinDriver::output(dc)?;

        // the ST7789 only works in MODE_3
        let config = esp_idf_hal::spi::config::Config::new()
            .baudrate(60.MHz().into()) // Absolute max before the display won't be driven anymore
            .data_mode(MODE_3)
            .write_only(true);
        let driver_config = SpiDriverConfig::new().dma(Dma::Channel1(1024 * 32));

        let device = SpiDeviceDriver::new_single(
            spi,
            sclk,
            sda,
            None::<Gpio12>,
            None::<Gpio5>,
            &driver_config,
            &config,
        )?;

        Ok(Screen { device, dc, rst })
    }
}

pub struct Screen {
    device: SpiDeviceDriver<'static, SpiDriver<'static>>,
    dc: PinDriver<'static, Gpio2, Output>,
    rst: PinDriver<'static, Gpio4, Output>,
}

pub fn render_loop(mut interface: Interface, screen: Screen) -> anyhow::Result<()> {
    debug_dump_stack_info();

    let Screen { device, dc, rst } = screen;

    log::info!("Creating screen buffer");
    let mut buffer = [0_u8; 2048];
    let di = SpiInterface::new(device, dc, &mut buffer);

    log::info!("Initializing mipidsi display");
    let mut display = mipidsi::Builder::new(mipidsi::models::ST7789, di)
        .reset_pin(rst)
        .display_size(DEFAULT_SIZE.width as u16, DEFAULT_SIZE.height as u16)
        .invert_colors(mipidsi::options::ColorInversion::Inverted)
        .init(&mut Ets)
        .map_err(|e| anyhow::anyhow!("Display init failed: {e:?}"))?;

    display
        .clear(Rgb565::BLACK)
        .map_err(|e| anyhow::anyhow!("Display clear failed: {e:?}"))?;

    let mut timings = RenderTimings::new(100);
    log::info!("Starting render loop");
    loop {
        let before = SystemTime::now();
        let drawn = interface
            .render(&mut display)
            .map_err(|e| anyhow::anyhow!("Render failed: {e:?}"))?;

        if drawn {
            let elapsed_ms = before.elapsed().unwrap_or_default().as_millis();
            if let Some(summary) = timings.record(elapsed_ms) {
                log::info!("{summary}");
            }
        }

        FreeRtos::delay_ms(FRAME_DELAY_MS);
    }
}
