//! Compact text format for replay event log lines
//!
//! Format: `T:NNNNN|CODE|data...`
//! - T:NNNNN = timestamp in milliseconds (5 digits, wraps at 99999)
//! - CODE = 2-char event type code
//! - data = pipe-separated values specific to event type
//!
//! Examples:
//! ```text
//! T:01200|RS
//! T:02140|GA
//! T:02180|GF
//! T:02180|RE|49|0.98
//! T:02180|PS|49|3|0.50
//! T:02180|CA|0
//! T:06100|CA|1
//! T:14020|PF
//! ```

use super::types::ReplayEvent;

/// Serialize a ReplayEvent to compact text format
pub fn serialize_event(time_ms: u32, event: &ReplayEvent) -> String {
    let ts = format!("T:{:05}", time_ms % 100000);
    let code = event.type_code();

    let data = match event {
        ReplayEvent::RecordingStopped { samples, duration } => {
            Some(format!("{}|{:.2}", samples, duration))
        }
        ReplayEvent::PlaybackStarted {
            samples,
            cameras,
            speed,
        } => Some(format!("{}|{}|{:.2}", samples, cameras, speed)),
        ReplayEvent::CameraActivated { index } => Some(index.to_string()),
        ReplayEvent::RecordingStarted
        | ReplayEvent::GateArmed
        | ReplayEvent::GateFired
        | ReplayEvent::PlaybackFinished
        | ReplayEvent::PlaybackSkipped => None,
    };

    match data {
        Some(data) => format!("{}|{}|{}", ts, code, data),
        None => format!("{}|{}", ts, code),
    }
}

/// Parse a compact log line back into (time_ms, event)
pub fn parse_event(line: &str) -> Option<(u32, ReplayEvent)> {
    let parts: Vec<&str> = line.trim().split('|').collect();
    if parts.len() < 2 {
        return None;
    }

    let ts_str = parts[0].strip_prefix("T:")?;
    let time_ms: u32 = ts_str.parse().ok()?;

    let code = parts[1];
    let data = &parts[2..];

    let event = match code {
        "RS" => ReplayEvent::RecordingStarted,
        "RE" if data.len() >= 2 => ReplayEvent::RecordingStopped {
            samples: data[0].parse().ok()?,
            duration: data[1].parse().ok()?,
        },
        "GA" => ReplayEvent::GateArmed,
        "GF" => ReplayEvent::GateFired,
        "PS" if data.len() >= 3 => ReplayEvent::PlaybackStarted {
            samples: data[0].parse().ok()?,
            cameras: data[1].parse().ok()?,
            speed: data[2].parse().ok()?,
        },
        "CA" if !data.is_empty() => ReplayEvent::CameraActivated {
            index: data[0].parse().ok()?,
        },
        "PF" => ReplayEvent::PlaybackFinished,
        "PK" => ReplayEvent::PlaybackSkipped,
        _ => return None,
    };

    Some((time_ms, event))
}
