use std::sync::Arc;

use embedded_graphics::{draw_target::DrawTarget, pixelcolor::Rgb565, prelude::RgbColor};
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};
use world_clock_graphics::{
    face::DEFAULT_SIZE, tick::delay_until_next_second, ClockState, Interface, SystemTickSource,
    TickSource,
};

fn main() -> anyhow::Result<()> {
    let zone = std::env::args().nth(1).unwrap_or_else(|| "UTC".to_string());

    let state = Arc::new(ClockState::unconfigured());
    state.set_timezone(&zone)?;

    let mut display = SimulatorDisplay::<Rgb565>::new(DEFAULT_SIZE);
    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let mut window = Window::new(&format!("World clock - {zone}"), &output_settings);
    display.clear(Rgb565::BLACK).unwrap();
    window.update(&display);

    let source = SystemTickSource;
    let mut interface = Interface::new(state.clone());

    loop {
        state.tick(source.now())?;
        if interface.render(&mut display).unwrap() {
            window.update(&display);
        }

        if window.events().any(|e| e == SimulatorEvent::Quit) {
            return Ok(());
        }
        // stay responsive to Quit while waiting for the next second
        let delay = delay_until_next_second(source.now()).min(std::time::Duration::from_millis(100));
        std::thread::sleep(delay);
    }
}
