#[cfg(target_os = "espidf")]
mod rotary_encoder;
#[cfg(target_os = "espidf")]
mod screen;
#[cfg(target_os = "espidf")]
mod wifi_control;

use std::sync::Arc;

use world_clock::{config::ClockConfig, ticker};
use world_clock_graphics::{ClockState, SystemTickSource};

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use esp_idf_hal::peripherals::Peripherals;
    use world_clock::threads::WorkerThread;
    use world_clock_graphics::Interface;

    // It is necessary to call this function once. Otherwise some patches to the runtime
    // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
    esp_idf_svc::sys::link_patches();

    // Bind the log crate to the ESP Logging facilities
    esp_idf_svc::log::EspLogger::initialize_default();

    let config = ClockConfig::from_build_env();
    log::info!(
        "Starting world clock in {} ({} zones on the dial)",
        config.timezone.name(),
        config.zones.len()
    );

    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    let state = Arc::new(ClockState::with_timezone(config.timezone));

    ticker::spawn_tick_thread(state.clone(), SystemTickSource)?;
    wifi_control::spawn_wifi_control_thread(state.clone(), peripherals.modem)?;

    let pcnt = peripherals.pcnt0;
    let (clk, dt) = (pins.gpio32, pins.gpio33);
    let encoder_state = state.clone();
    let zones = config.zones;
    WorkerThread::new("rotary_encoder")
        .with_stack_size(6)
        .spawn(move || {
            if let Err(e) = rotary_encoder::rotary_encoder_thread(pcnt, clk, dt, encoder_state, zones) {
                log::error!("Rotary encoder thread failed: {:?}", e);
            }
        })?;

    let screen = screen::ScreenBuilder {
        spi: peripherals.spi2,
        rst: pins.gpio4,
        dc: pins.gpio2,
        sclk: pins.gpio18,
        sda: pins.gpio23,
    }
    .build()?;

    screen::render_loop(Interface::new(state), screen)
}

/// Headless runner for development machines: same configuration and tick
/// thread, the face is reported on stdout instead of a display.
#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    use world_clock_graphics::tick::delay_until_next_second;
    use world_clock_graphics::TickSource;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = ClockConfig::from_env();
    if let Some(zone) = std::env::args().nth(1) {
        config = config.with_timezone(&zone)?;
    }
    log::info!("Starting world clock in {}", config.timezone.name());

    let state = Arc::new(ClockState::with_timezone(config.timezone));
    ticker::spawn_tick_thread(state.clone(), SystemTickSource)?;

    let source = SystemTickSource;
    let mut last_revision = None;
    loop {
        let revision = state.revision();
        if last_revision != Some(revision) {
            if let Some(time) = state.snapshot() {
                let angles = time.hand_angles();
                println!(
                    "{time}  hour {:6.1}°  minute {:6.1}°  second {:6.1}°",
                    angles.hour.to_degrees(),
                    angles.minute.to_degrees(),
                    angles.second.to_degrees()
                );
            }
            last_revision = Some(revision);
        }
        std::thread::sleep(delay_until_next_second(source.now()) / 2);
    }
}
