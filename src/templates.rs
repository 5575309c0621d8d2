use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tera::Tera;

use crate::error::AppError;
use crate::health::HealthStatus;
use crate::viewer::{format_local_zoned_timestamp, format_uptime, StatusTone};

/// Initialize the Tera template engine from a glob such as `templates/**/*`
pub fn init_templates(glob: &str) -> Result<Tera, AppError> {
    let mut tera = Tera::new(glob)?;

    // Add custom filters
    tera.register_filter("uptime", uptime_filter);
    tera.register_filter("localtime", localtime_filter);
    tera.register_filter("status_class", status_class_filter);

    Ok(tera)
}

/// Format a number of seconds as "Xh Ym"
fn uptime_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let seconds = value
        .as_f64()
        .ok_or_else(|| tera::Error::msg("uptime filter expects a number"))?;
    Ok(tera::Value::String(format_uptime(seconds)))
}

/// Render an RFC 3339 timestamp in the server's local time, offset included
fn localtime_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let date_str = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("localtime filter expects a string"))?;

    match DateTime::parse_from_rfc3339(date_str) {
        Ok(date) => Ok(tera::Value::String(format_local_zoned_timestamp(
            &date.with_timezone(&Utc),
        ))),
        // If parsing fails, return the original string
        Err(_) => Ok(tera::Value::String(date_str.to_string())),
    }
}

/// CSS class for a status string
fn status_class_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let status = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("status_class filter expects a string"))?;
    let tone = StatusTone::of(&HealthStatus::from(status.to_string()));
    Ok(tera::Value::String(tone.css_class().to_string()))
}
