use chrono::{DateTime, FixedOffset, Utc};
use thiserror::Error;

use crate::i18n::Language;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("timestamp out of range: {0}ms")]
    InvalidTimestamp(i64),

    #[error("utc offset out of range: {0} minutes")]
    InvalidOffset(i32),
}

/// One wall-clock reading as reported by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSample {
    at: DateTime<FixedOffset>,
}

impl ClockSample {
    pub fn new(timestamp_ms: i64, utc_offset_minutes: i32) -> Result<Self, ClockError> {
        let offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(ClockError::InvalidOffset(utc_offset_minutes))?;
        let utc = DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
            .ok_or(ClockError::InvalidTimestamp(timestamp_ms))?;
        Ok(Self {
            at: utc.with_timezone(&offset),
        })
    }

    #[must_use]
    pub fn timestamp_ms(&self) -> i64 {
        self.at.timestamp_millis()
    }

    /// `10/19/2026` in English, `19.10.2026` in Russian.
    #[must_use]
    pub fn date_label(&self, language: Language) -> String {
        let pattern = match language {
            Language::En => "%-m/%-d/%Y",
            Language::Ru => "%d.%m.%Y",
        };
        self.at.format(pattern).to_string()
    }

    /// `3:04:05 PM` in English, `15:04:05` in Russian.
    #[must_use]
    pub fn time_label(&self, language: Language) -> String {
        let pattern = match language {
            Language::En => "%-I:%M:%S %p",
            Language::Ru => "%H:%M:%S",
        };
        self.at.format(pattern).to_string()
    }
}

/// Display clock for the dashboard cards.
///
/// Runs only while the dashboard is on screen; samples delivered after it
/// stops are dropped so a late timer cannot touch torn-down state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clock {
    running: bool,
    latest: Option<ClockSample>,
}

impl Clock {
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stops the clock and forgets the last sample, so the next start shows
    /// nothing until a fresh tick arrives.
    pub fn stop(&mut self) {
        self.running = false;
        self.latest = None;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn latest(&self) -> Option<&ClockSample> {
        self.latest.as_ref()
    }

    /// Returns whether the sample was taken.
    pub fn accept(&mut self, sample: ClockSample) -> bool {
        if !self.running {
            return false;
        }
        self.latest = Some(sample);
        true
    }
}
