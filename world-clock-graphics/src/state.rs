use std::sync::{
    atomic::{AtomicU32, Ordering},
    Mutex, MutexGuard, PoisonError,
};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::ClockResult;
use crate::model::ClockFaceModel;
use crate::wall_time::WallTime;

struct Sampled {
    model: ClockFaceModel,
    at: Option<DateTime<Utc>>,
}

/// Clock state shared between the tick thread and the render thread.
///
/// The tick side owns the model behind a mutex. Every completed tick is
/// published as a single packed word, so readers never see an hour from one
/// instant next to a second from another.
pub struct ClockState {
    inner: Mutex<Sampled>,
    published: AtomicU32,
    revision: AtomicU32,
}

impl ClockState {
    pub fn new(model: ClockFaceModel) -> Self {
        let published = model.time().map(|t| t.pack()).unwrap_or(0);
        Self {
            inner: Mutex::new(Sampled { model, at: None }),
            published: AtomicU32::new(published),
            revision: AtomicU32::new(0),
        }
    }

    pub fn with_timezone(timezone: Tz) -> Self {
        Self::new(ClockFaceModel::with_timezone(timezone))
    }

    pub fn unconfigured() -> Self {
        Self::new(ClockFaceModel::unconfigured())
    }

    fn inner(&self) -> MutexGuard<'_, Sampled> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) {
        self.revision.fetch_add(1, Ordering::Release);
    }

    // Caller holds the lock, so the word always matches the model's zone.
    fn publish(&self, time: Option<WallTime>) -> bool {
        let packed = time.map(|t| t.pack()).unwrap_or(0);
        self.published.swap(packed, Ordering::AcqRel) != packed
    }

    /// Returns the zone that was replaced, if any. The last sampled instant
    /// is resampled in the new zone right away.
    pub fn set_timezone(&self, timezone: &str) -> ClockResult<Option<Tz>> {
        let mut inner = self.inner();
        let previous = inner.model.timezone();
        let tz = inner.model.set_timezone(timezone)?;
        if previous == Some(tz) {
            return Ok(previous);
        }
        let sampled_at = inner.at;
        let time = match sampled_at {
            Some(at) => Some(inner.model.tick(at)?),
            None => None,
        };
        self.publish(time);
        drop(inner);

        log::info!(
            "Timezone changed: {} -> {}",
            previous.map(|tz| tz.name()).unwrap_or("none"),
            tz.name()
        );
        self.bump();
        Ok(previous)
    }

    pub fn timezone(&self) -> Option<Tz> {
        self.inner().model.timezone()
    }

    pub fn tick(&self, now: DateTime<Utc>) -> ClockResult<WallTime> {
        let mut inner = self.inner();
        let time = inner.model.tick(now)?;
        inner.at = Some(now);
        let changed = self.publish(Some(time));
        drop(inner);
        if changed {
            self.bump();
        }
        Ok(time)
    }

    /// The most recently published time, without taking the model lock.
    pub fn snapshot(&self) -> Option<WallTime> {
        WallTime::unpack(self.published.load(Ordering::Acquire))
    }

    /// Zone and the time published for it, read together.
    pub fn view(&self) -> (Option<Tz>, Option<WallTime>) {
        let inner = self.inner();
        (inner.model.timezone(), self.snapshot())
    }

    /// Changes whenever the published time or the timezone changes.
    pub fn revision(&self) -> u32 {
        self.revision.load(Ordering::Acquire)
    }
}

impl Default for ClockState {
    fn default() -> Self {
        Self::unconfigured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClockError;
    use chrono::TimeZone;

    #[test]
    fn publishes_after_tick() {
        let state = ClockState::with_timezone(Tz::UTC);
        assert_eq!(state.snapshot(), None);
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 45).unwrap();
        let time = state.tick(now).unwrap();
        assert_eq!(state.snapshot(), Some(time));
    }

    #[test]
    fn revision_moves_only_on_change() {
        let state = ClockState::with_timezone(Tz::UTC);
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 45).unwrap();
        state.tick(now).unwrap();
        let rev = state.revision();
        state.tick(now).unwrap();
        assert_eq!(state.revision(), rev);

        state.set_timezone("UTC").unwrap();
        assert_eq!(state.revision(), rev);

        assert_eq!(state.set_timezone("Asia/Tokyo").unwrap(), Some(Tz::UTC));
        assert_ne!(state.revision(), rev);
    }

    #[test]
    fn unconfigured_tick_fails_and_publishes_nothing() {
        let state = ClockState::unconfigured();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(state.tick(now), Err(ClockError::NoTimezoneConfigured));
        assert_eq!(state.snapshot(), None);
        assert_eq!(state.revision(), 0);
    }

    #[test]
    fn invalid_timezone_leaves_state_alone() {
        let state = ClockState::with_timezone(Tz::Europe__Stockholm);
        assert!(state.set_timezone("Mars/Olympus_Mons").is_err());
        assert_eq!(state.timezone(), Some(Tz::Europe__Stockholm));
        assert_eq!(state.revision(), 0);
    }

    #[test]
    fn timezone_change_resamples_last_instant() {
        let state = ClockState::with_timezone(Tz::UTC);
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 15).unwrap();
        state.tick(now).unwrap();

        state.set_timezone("Asia/Tokyo").unwrap();
        let (zone, time) = state.view();
        assert_eq!(zone, Some(Tz::Asia__Tokyo));
        assert_eq!(time.map(|t| t.to_string()).as_deref(), Some("09:00:15"));
        assert_eq!(state.snapshot(), time);
    }

    #[test]
    fn timezone_before_first_tick_publishes_nothing() {
        let state = ClockState::unconfigured();
        state.set_timezone("Asia/Tokyo").unwrap();
        assert_eq!(state.view(), (Some(Tz::Asia__Tokyo), None));
        assert_eq!(state.revision(), 1);
    }
}
