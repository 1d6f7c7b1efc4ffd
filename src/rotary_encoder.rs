use std::{sync::Arc, time::SystemTime};

use esp_idf_hal::{delay::Delay, gpio::InputPin, pcnt::Pcnt, peripheral::Peripheral};
use world_clock::config::ZoneCarousel;
use world_clock_graphics::ClockState;

// Quadrature counts per mechanical detent.
const COUNTS_PER_STEP: i32 = 4;

/// Turning the knob steps the displayed zone through `zones`.
pub fn rotary_encoder_thread<PCNT: Pcnt>(
    pcnt: impl Peripheral<P = PCNT>,
    clk: impl Peripheral<P = impl InputPin>,
    dt: impl Peripheral<P = impl InputPin>,
    state: Arc<ClockState>,
    mut zones: ZoneCarousel,
) -> anyhow::Result<()> {
    let encoder = encoder::Encoder::new(pcnt, clk, dt)?;
    const TARGET_HZ: u32 = 30;
    const TARGET_PERIOD_US: u32 = 1_000_000 / TARGET_HZ;
    let delay = Delay::new(TARGET_PERIOD_US / 10);
    let mut last_value = encoder.get_value()?;
    loop {
        let start = SystemTime::now();

        match encoder.get_value() {
            Ok(value) => {
                let steps = (value - last_value) / COUNTS_PER_STEP;
                if steps != 0 {
                    last_value += steps * COUNTS_PER_STEP;
                    let tz = zones.rotate(steps);
                    if let Err(e) = state.set_timezone(tz.name()) {
                        log::error!("Carousel zone rejected: {e}");
                    }
                }
            }
            Err(e) => {
                log::error!("Error: {:?}", e);
                delay.delay_ms(1000);
            }
        }
        let elapsed_micros = start.elapsed().unwrap_or_default().as_micros();
        delay.delay_us(TARGET_PERIOD_US.saturating_sub(elapsed_micros as u32));
    }
}

// Adapted from the esp-idf-hal PCNT rotary encoder example:
// https://github.com/esp-rs/esp-idf-hal/blob/518a6419a5d4f3577c972f67b01ac97e1085e434/examples/pcnt_rotary_encoder.rs#L55
mod encoder {
    use std::cmp::min;
    use std::sync::atomic::AtomicI32;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use esp_idf_hal::gpio::AnyInputPin;
    use esp_idf_hal::gpio::InputPin;
    use esp_idf_hal::pcnt::*;
    use esp_idf_hal::peripheral::Peripheral;
    use esp_idf_hal::sys::EspError;

    const LOW_LIMIT: i16 = -100;
    const HIGH_LIMIT: i16 = 100;

    pub struct Encoder<'d> {
        unit: PcntDriver<'d>,
        approx_value: Arc<AtomicI32>,
    }

    impl<'d> Encoder<'d> {
        pub fn new<PCNT: Pcnt>(
            pcnt: impl Peripheral<P = PCNT> + 'd,
            pin_a: impl Peripheral<P = impl InputPin> + 'd,
            pin_b: impl Peripheral<P = impl InputPin> + 'd,
        ) -> Result<Self, EspError> {
            let mut unit = PcntDriver::new(
                pcnt,
                Some(pin_a),
                Some(pin_b),
                Option::<AnyInputPin>::None,
                Option::<AnyInputPin>::None,
            )?;
            unit.channel_config(
                PcntChannel::Channel0,
                PinIndex::Pin0,
                PinIndex::Pin1,
                &PcntChannelConfig {
                    lctrl_mode: PcntControlMode::Reverse,
                    hctrl_mode: PcntControlMode::Keep,
                    pos_mode: PcntCountMode::Decrement,
                    neg_mode: PcntCountMode::Increment,
                    counter_h_lim: HIGH_LIMIT,
                    counter_l_lim: LOW_LIMIT,
                },
            )?;
            unit.channel_config(
                PcntChannel::Channel1,
                PinIndex::Pin1,
                PinIndex::Pin0,
                &PcntChannelConfig {
                    lctrl_mode: PcntControlMode::Reverse,
                    hctrl_mode: PcntControlMode::Keep,
                    pos_mode: PcntCountMode::Increment,
                    neg_mode: PcntCountMode::Decrement,
                    counter_h_lim: HIGH_LIMIT,
                    counter_l_lim: LOW_LIMIT,
                },
            )?;

            unit.set_filter_value(min(10 * 80, 1023))?;
            unit.filter_enable()?;

            // the counter wraps at the limits, the interrupt folds each wrap
            // into approx_value
            let approx_value = Arc::new(AtomicI32::new(0));
            unsafe {
                let approx_value = approx_value.clone();
                unit.subscribe(move |status| {
                    let status = PcntEventType::from_repr_truncated(status);
                    if status.contains(PcntEvent::HighLimit) {
                        approx_value.fetch_add(HIGH_LIMIT as i32, Ordering::SeqCst);
                    }
                    if status.contains(PcntEvent::LowLimit) {
                        approx_value.fetch_add(LOW_LIMIT as i32, Ordering::SeqCst);
                    }
                })?;
            }
            unit.event_enable(PcntEvent::HighLimit)?;
            unit.event_enable(PcntEvent::LowLimit)?;
            unit.counter_pause()?;
            unit.counter_clear()?;
            unit.counter_resume()?;

            Ok(Self { unit, approx_value })
        }

        pub fn get_value(&self) -> Result<i32, EspError> {
            let value =
                self.approx_value.load(Ordering::Relaxed) + self.unit.get_counter_value()? as i32;
            Ok(value)
        }
    }
}
