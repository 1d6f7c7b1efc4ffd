//! Where "now" comes from.

use std::time::Duration;

use chrono::{DateTime, Utc};

pub trait TickSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn name(&self) -> &str {
        "TickSource"
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTickSource;

impl TickSource for SystemTickSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn name(&self) -> &str {
        "SystemTickSource"
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedTickSource(pub DateTime<Utc>);

impl TickSource for FixedTickSource {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }

    fn name(&self) -> &str {
        "FixedTickSource"
    }
}

/// Time left until the next whole second after `now`.
///
/// Sleeping for this long before each tick keeps a 1 Hz loop aligned to
/// second boundaries instead of drifting by the loop's own run time.
pub fn delay_until_next_second(now: DateTime<Utc>) -> Duration {
    let nanos = now.timestamp_subsec_nanos().min(999_999_999);
    Duration::from_nanos(1_000_000_000 - nanos as u64)
}
