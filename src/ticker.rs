use std::{sync::Arc, thread::JoinHandle};

use world_clock_graphics::{
    tick::delay_until_next_second, ClockError, ClockState, TickSource, WallTime,
};

use crate::threads::WorkerThread;

const STACK_SIZE_KB: usize = 8;

/// Ticks a [`ClockState`] and logs only when the outcome changes kind, so a
/// missing timezone is reported once rather than every second.
#[derive(Debug, Default)]
pub struct TickReporter {
    last_error: Option<ClockError>,
    ticks: u64,
}

impl TickReporter {
    pub fn tick(&mut self, state: &ClockState, source: &dyn TickSource) -> Result<WallTime, ClockError> {
        match state.tick(source.now()) {
            Ok(time) => {
                if self.last_error.take().is_some() {
                    log::info!("Clock recovered at {time}");
                } else if self.ticks == 0 {
                    log::info!("First tick from {}: {time}", source.name());
                }
                self.ticks += 1;
                Ok(time)
            }
            Err(e) => {
                if self.last_error.as_ref() != Some(&e) {
                    log::warn!("Tick failed: {e}");
                    self.last_error = Some(e.clone());
                }
                Err(e)
            }
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn last_error(&self) -> Option<&ClockError> {
        self.last_error.as_ref()
    }
}

/// Ticks `state` once per second, aligned to second boundaries.
pub fn spawn_tick_thread<S>(state: Arc<ClockState>, source: S) -> std::io::Result<JoinHandle<()>>
where
    S: TickSource + 'static,
{
    WorkerThread::new("clock_tick")
        .with_stack_size(STACK_SIZE_KB)
        .spawn(move || {
            let mut reporter = TickReporter::default();
            loop {
                let _ = reporter.tick(&state, &source);
                std::thread::sleep(delay_until_next_second(source.now()));
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use world_clock_graphics::tick::FixedTickSource;

    fn source() -> FixedTickSource {
        FixedTickSource(Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 45).unwrap())
    }

    #[test]
    fn remembers_failure_until_recovery() {
        let state = ClockState::unconfigured();
        let mut reporter = TickReporter::default();

        assert!(reporter.tick(&state, &source()).is_err());
        assert!(reporter.tick(&state, &source()).is_err());
        assert_eq!(reporter.last_error(), Some(&ClockError::NoTimezoneConfigured));
        assert_eq!(reporter.ticks(), 0);

        state.set_timezone("UTC").unwrap();
        let time = reporter.tick(&state, &source()).unwrap();
        assert_eq!(time.to_string(), "12:30:45");
        assert_eq!(reporter.last_error(), None);
        assert_eq!(reporter.ticks(), 1);
    }

    #[test]
    fn thread_publishes_time() {
        let state = Arc::new(ClockState::with_timezone(chrono_tz::Tz::UTC));
        spawn_tick_thread(state.clone(), source()).unwrap();

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
        while state.snapshot().is_none() && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert_eq!(state.snapshot().map(|t| t.to_string()).as_deref(), Some("12:30:45"));
    }
}
