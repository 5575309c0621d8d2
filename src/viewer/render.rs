//! Formatting helpers and the plain-text rendering of a view state.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};

use super::state::ViewState;
use crate::config::{
    SECONDS_PER_HOUR, SECONDS_PER_MINUTE, TIMESTAMP_FORMAT, ZONED_TIMESTAMP_FORMAT,
};
use crate::health::HealthStatus;

/// Loading placeholder text
pub const LOADING_TEXT: &str = "Loading...";

/// Formats uptime as `"{hours}h {minutes}m"`, discarding leftover seconds.
///
/// Negative and non-finite values render as `"0h 0m"`.
pub fn format_uptime(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = total / SECONDS_PER_HOUR;
    let minutes = (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    format!("{}h {}m", hours, minutes)
}

/// Formats a timestamp in the given time zone.
pub fn format_timestamp_in<Tz>(timestamp: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp
        .with_timezone(tz)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

/// Formats a timestamp in the local time zone of this process.
pub fn format_local_timestamp(timestamp: &DateTime<Utc>) -> String {
    format_timestamp_in(timestamp, &Local)
}

/// Like [`format_timestamp_in`], with the zone offset appended.
pub fn format_zoned_timestamp_in<Tz>(timestamp: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp
        .with_timezone(tz)
        .format(ZONED_TIMESTAMP_FORMAT)
        .to_string()
}

/// Local time of this process with its offset, for readers in other zones.
pub fn format_local_zoned_timestamp(timestamp: &DateTime<Utc>) -> String {
    format_zoned_timestamp_in(timestamp, &Local)
}

/// Visual tone of a status value. Only the literal `"healthy"` is healthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Healthy,
    Other,
}

impl StatusTone {
    pub fn of(status: &HealthStatus) -> Self {
        if status.is_healthy() {
            StatusTone::Healthy
        } else {
            StatusTone::Other
        }
    }

    /// CSS class used by the page template
    pub fn css_class(self) -> &'static str {
        match self {
            StatusTone::Healthy => "status-healthy",
            StatusTone::Other => "status-other",
        }
    }

    /// Marker used by the terminal rendering
    pub fn marker(self) -> &'static str {
        match self {
            StatusTone::Healthy => "[ok]",
            StatusTone::Other => "[!!]",
        }
    }
}

/// Renders a view state as terminal text, timestamps in `tz`.
pub fn render_text_in<Tz>(state: &ViewState, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match state {
        ViewState::Loading => format!("{}\n", LOADING_TEXT),
        ViewState::Error(message) => format!("{}\n", message),
        ViewState::Loaded(snapshot) => {
            let tone = StatusTone::of(&snapshot.status);
            format!(
                "Deployment Status\n\
                 \x20 Status:       {} {}\n\
                 \x20 Environment:  {}\n\
                 \x20 Version:      {}\n\
                 \x20 Uptime:       {}\n\
                 \x20 Last Updated: {}\n",
                tone.marker(),
                snapshot.status,
                snapshot.environment,
                snapshot.version,
                format_uptime(snapshot.uptime),
                format_timestamp_in(&snapshot.timestamp, tz),
            )
        }
    }
}

/// Renders a view state as terminal text in local time.
pub fn render_text(state: &ViewState) -> String {
    render_text_in(state, &Local)
}
