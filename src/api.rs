//! Request handling for the HTTP control endpoints, independent of the
//! server that carries it.

use std::time::SystemTime;

use serde_derive::{Deserialize, Serialize};
use world_clock_graphics::ClockState;

// Max payload length for POST requests
pub const MAX_LEN: usize = 128;

#[derive(Debug, Serialize, PartialEq)]
pub struct HandAnglesStatus {
    pub hour: f32,
    pub minute: f32,
    pub second: f32,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ClockStatus {
    pub timezone: Option<String>,
    pub time: Option<String>,
    pub angles: Option<HandAnglesStatus>,
    pub uptime_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct TimezoneCommand {
    pub timezone: String,
}

/// Status code and body to send back.
#[derive(Debug, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    fn ok(body: String) -> Self {
        Self { status: 200, body }
    }

    fn bad_request(body: String) -> Self {
        Self { status: 400, body }
    }

    pub fn too_large() -> Self {
        Self {
            status: 413,
            body: "Request too big".to_string(),
        }
    }
}

pub fn clock_status(state: &ClockState, start_time: &SystemTime) -> ClockStatus {
    let uptime = SystemTime::now()
        .duration_since(*start_time)
        .unwrap_or_default()
        .as_secs();
    let (timezone, time) = state.view();

    ClockStatus {
        timezone: timezone.map(|tz| tz.name().to_string()),
        time: time.map(|t| t.to_string()),
        angles: time.map(|t| {
            let angles = t.hand_angles();
            HandAnglesStatus {
                hour: angles.hour,
                minute: angles.minute,
                second: angles.second,
            }
        }),
        uptime_secs: uptime,
    }
}

fn status_reply(state: &ClockState, start_time: &SystemTime) -> Reply {
    match serde_json::to_string(&clock_status(state, start_time)) {
        Ok(json) => Reply::ok(json),
        Err(e) => Reply {
            status: 500,
            body: e.to_string(),
        },
    }
}

/// `GET /`
pub fn get_status(state: &ClockState, start_time: &SystemTime) -> Reply {
    status_reply(state, start_time)
}

/// `POST /timezone` with `{"timezone": "Europe/Stockholm"}`.
pub fn post_timezone(state: &ClockState, start_time: &SystemTime, body: &[u8]) -> Reply {
    if body.len() > MAX_LEN {
        return Reply::too_large();
    }
    let command = match serde_json::from_slice::<TimezoneCommand>(body) {
        Ok(command) => command,
        Err(e) => return Reply::bad_request(format!("Invalid JSON: {}", e)),
    };
    if let Err(e) = state.set_timezone(&command.timezone) {
        log::warn!("Rejected timezone request: {e}");
        return Reply::bad_request(e.to_string());
    }
    status_reply(state, start_time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use chrono_tz::Tz;

    #[test]
    fn status_before_first_tick() {
        let state = ClockState::with_timezone(Tz::Europe__Stockholm);
        let status = clock_status(&state, &SystemTime::now());
        assert_eq!(status.timezone.as_deref(), Some("Europe/Stockholm"));
        assert_eq!(status.time, None);
        assert_eq!(status.angles, None);
    }

    #[test]
    fn status_reports_time_and_angles() {
        let state = ClockState::with_timezone(Tz::UTC);
        state
            .tick(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 15).unwrap())
            .unwrap();
        let reply = get_status(&state, &SystemTime::now());
        assert_eq!(reply.status, 200);
        let json: serde_json::Value = serde_json::from_str(&reply.body).unwrap();
        assert_eq!(json["time"], "00:00:15");
        assert_eq!(json["timezone"], "UTC");
        assert!(json["angles"]["second"].as_f64().unwrap().abs() < 1e-6);
    }

    #[test]
    fn changes_timezone() {
        let state = ClockState::with_timezone(Tz::UTC);
        let reply = post_timezone(&state, &SystemTime::now(), br#"{"timezone":"Asia/Tokyo"}"#);
        assert_eq!(reply.status, 200);
        assert_eq!(state.timezone(), Some(Tz::Asia__Tokyo));
    }

    #[test]
    fn timezone_reply_shows_time_in_new_zone() {
        let state = ClockState::with_timezone(Tz::UTC);
        state
            .tick(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 15).unwrap())
            .unwrap();
        let reply = post_timezone(&state, &SystemTime::now(), br#"{"timezone":"Asia/Tokyo"}"#);
        assert_eq!(reply.status, 200);
        let json: serde_json::Value = serde_json::from_str(&reply.body).unwrap();
        assert_eq!(json["timezone"], "Asia/Tokyo");
        assert_eq!(json["time"], "09:00:15");
        // 09:00 puts the hour hand on the 9, left of center
        let hour = json["angles"]["hour"].as_f64().unwrap();
        assert!((hour.cos() + 1.0).abs() < 1e-4);
    }

    #[test]
    fn rejects_bad_requests() {
        let state = ClockState::with_timezone(Tz::UTC);
        let start = SystemTime::now();

        let reply = post_timezone(&state, &start, br#"{"timezone":"Not/AZone"}"#);
        assert_eq!(reply.status, 400);
        assert_eq!(reply.body, "Invalid timezone: Not/AZone");

        assert_eq!(post_timezone(&state, &start, b"timezone=UTC").status, 400);
        assert_eq!(
            post_timezone(&state, &start, &[b' '; MAX_LEN + 1]),
            Reply::too_large()
        );
        assert_eq!(state.timezone(), Some(Tz::UTC));
    }
}
