use chrono_tz::Tz;
use world_clock_graphics::{parse_timezone, ClockError};

pub const DEFAULT_TIMEZONE: Tz = Tz::UTC;

/// Zones the rotary encoder steps through, starting at the configured one.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneCarousel {
    zones: Vec<Tz>,
    index: usize,
}

impl ZoneCarousel {
    /// `initial` is always part of the carousel and is selected first.
    /// Duplicates are dropped.
    pub fn new(initial: Tz, others: impl IntoIterator<Item = Tz>) -> Self {
        let mut zones = vec![initial];
        for tz in others {
            if !zones.contains(&tz) {
                zones.push(tz);
            }
        }
        Self { zones, index: 0 }
    }

    pub fn current(&self) -> Tz {
        self.zones[self.index]
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Moves `steps` zones forward (or back when negative), wrapping around.
    pub fn rotate(&mut self, steps: i32) -> Tz {
        let len = self.zones.len() as i64;
        self.index = (self.index as i64 + steps as i64).rem_euclid(len) as usize;
        self.current()
    }
}

/// Splits a comma separated zone list. Unknown zones are returned as errors
/// next to the zones that did parse.
pub fn parse_zone_list(list: &str) -> (Vec<Tz>, Vec<ClockError>) {
    let mut zones = Vec::new();
    let mut errors = Vec::new();
    for name in list.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        match parse_timezone(name) {
            Ok(tz) => zones.push(tz),
            Err(e) => errors.push(e),
        }
    }
    (zones, errors)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClockConfig {
    pub timezone: Tz,
    pub zones: ZoneCarousel,
}

impl ClockConfig {
    /// Builds the configuration from optional raw values. Bad entries are
    /// logged and skipped; a bad initial zone falls back to UTC.
    pub fn resolve(timezone: Option<&str>, zones: Option<&str>) -> Self {
        let timezone = match timezone.map(parse_timezone) {
            Some(Ok(tz)) => tz,
            Some(Err(e)) => {
                log::warn!("{e}, falling back to {}", DEFAULT_TIMEZONE.name());
                DEFAULT_TIMEZONE
            }
            None => DEFAULT_TIMEZONE,
        };

        let (others, errors) = parse_zone_list(zones.unwrap_or_default());
        for e in errors {
            log::warn!("Skipping carousel zone: {e}");
        }

        Self {
            timezone,
            zones: ZoneCarousel::new(timezone, others),
        }
    }

    /// Values baked in at build time from `.env`.
    pub fn from_build_env() -> Self {
        Self::resolve(option_env!("CLOCK_TIMEZONE"), option_env!("CLOCK_ZONES"))
    }

    /// Runtime environment first, then the build time values.
    pub fn from_env() -> Self {
        let timezone = std::env::var("CLOCK_TIMEZONE").ok();
        let zones = std::env::var("CLOCK_ZONES").ok();
        Self::resolve(
            timezone.as_deref().or(option_env!("CLOCK_TIMEZONE")),
            zones.as_deref().or(option_env!("CLOCK_ZONES")),
        )
    }

    /// Replaces the initial zone, keeping it at the front of the carousel.
    pub fn with_timezone(self, timezone: &str) -> Result<Self, ClockError> {
        let tz = parse_timezone(timezone)?;
        let mut rest = self.zones.zones;
        rest.retain(|zone| *zone != tz);
        Ok(Self {
            timezone: tz,
            zones: ZoneCarousel::new(tz, rest),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_utc() {
        let config = ClockConfig::resolve(None, None);
        assert_eq!(config.timezone, Tz::UTC);
        assert_eq!(config.zones.len(), 1);
    }

    #[test]
    fn invalid_initial_zone_falls_back() {
        let config = ClockConfig::resolve(Some("Not/AZone"), Some("Asia/Tokyo"));
        assert_eq!(config.timezone, Tz::UTC);
        assert_eq!(config.zones.len(), 2);
    }

    #[test]
    fn zone_list_keeps_good_entries() {
        let (zones, errors) = parse_zone_list("Europe/Stockholm, Nowhere/Land,,America/New_York");
        assert_eq!(zones, vec![Tz::Europe__Stockholm, Tz::America__New_York]);
        assert_eq!(errors, vec![ClockError::InvalidTimezone("Nowhere/Land".into())]);
    }

    #[test]
    fn carousel_wraps_both_ways() {
        let mut zones = ZoneCarousel::new(
            Tz::UTC,
            [Tz::Asia__Tokyo, Tz::UTC, Tz::Europe__London],
        );
        assert_eq!(zones.len(), 3);
        assert_eq!(zones.rotate(1), Tz::Asia__Tokyo);
        assert_eq!(zones.rotate(2), Tz::UTC);
        assert_eq!(zones.rotate(-1), Tz::Europe__London);
        assert_eq!(zones.rotate(-7), Tz::Asia__Tokyo);
    }

    #[test]
    fn override_moves_zone_to_front() {
        let config = ClockConfig::resolve(Some("UTC"), Some("Asia/Tokyo,Europe/London"))
            .with_timezone("Europe/London")
            .unwrap();
        assert_eq!(config.timezone, Tz::Europe__London);
        assert_eq!(config.zones.current(), Tz::Europe__London);
        assert_eq!(config.zones.len(), 3);
    }
}
