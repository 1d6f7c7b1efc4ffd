use std::{path::PathBuf, sync::Arc};

use chrono::{DateTime, Utc};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay};
use world_clock_graphics::{face::DEFAULT_SIZE, tick::FixedTickSource, ClockState, Interface, TickSource};

// Usage: snapshot <timezone> [rfc3339 instant] [output.png]
fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let zone = args.next().unwrap_or_else(|| "UTC".to_string());
    let instant: DateTime<Utc> = match args.next() {
        Some(text) => DateTime::parse_from_rfc3339(&text)?.with_timezone(&Utc),
        None => Utc::now(),
    };
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("clock.png"));

    let state = Arc::new(ClockState::unconfigured());
    state.set_timezone(&zone)?;
    let time = state.tick(FixedTickSource(instant).now())?;

    let mut display = SimulatorDisplay::<Rgb565>::new(DEFAULT_SIZE);
    Interface::new(state).render(&mut display).unwrap();

    let output_settings = OutputSettingsBuilder::new().scale(1).build();
    display
        .to_rgb_output_image(&output_settings)
        .save_png(&output)?;

    println!("{zone} {time} -> {}", output.display());
    Ok(())
}
