use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Collects anti-cheat telemetry during the live-writing phase: wall-clock
/// bounds plus a paste-event counter. No judgment is made here; the raw
/// values are forwarded for human review.
#[derive(Debug, Clone)]
pub struct ProctorSession {
    started_at: DateTime<Utc>,
    paste_count: u32,
}

impl ProctorSession {
    /// Open a session at phase entry, stamping the start time.
    pub fn start() -> Self {
        Self::started_at(Utc::now())
    }

    pub(crate) fn started_at(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            paste_count: 0,
        }
    }

    /// Record one paste event in the editor.
    pub fn record_paste(&mut self) {
        self.paste_count = self.paste_count.saturating_add(1);
    }

    pub fn paste_count(&self) -> u32 {
        self.paste_count
    }

    /// Freeze the session at submission time. Consumes the collector so no
    /// further events can be recorded.
    pub fn submit(self) -> TelemetrySnapshot {
        self.submit_at(Utc::now())
    }

    pub(crate) fn submit_at(self, submitted_at: DateTime<Utc>) -> TelemetrySnapshot {
        TelemetrySnapshot {
            started_at: self.started_at,
            submitted_at,
            paste_count: self.paste_count,
        }
    }
}

/// Immutable telemetry captured at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySnapshot {
    pub started_at: DateTime<Utc>,
    pub submitted_at: DateTime<Utc>,
    pub paste_count: u32,
}

impl TelemetrySnapshot {
    /// Elapsed writing time in seconds, fractional, floored at zero in case
    /// of clock skew between the two stamps.
    pub fn elapsed_seconds(&self) -> f64 {
        let millis = (self.submitted_at - self.started_at).num_milliseconds();
        (millis.max(0) as f64) / 1000.0
    }
}
