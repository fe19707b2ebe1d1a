//! Click parameters and their validation.
//!
//! A [`ClickConfig`] is built once per run (CLI) or once per "Start" action
//! (form) and must pass [`ClickConfig::validate`] before the click loop runs.

use crate::error::{ClickerError, Result};
use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// `MOUSEEVENTF_LEFTDOWN`
pub const LEFT_DOWN: u32 = 0x0002;
/// `MOUSEEVENTF_LEFTUP`
pub const LEFT_UP: u32 = 0x0004;
/// `MOUSEEVENTF_RIGHTDOWN`
pub const RIGHT_DOWN: u32 = 0x0008;
/// `MOUSEEVENTF_RIGHTUP`
pub const RIGHT_UP: u32 = 0x0010;

/// Longest accepted interval or start delay: one week.
pub const MAX_PAUSE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Mouse button to click with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
}

impl MouseButton {
    /// Platform event codes for pressing and releasing this button.
    pub fn event_flags(self) -> (u32, u32) {
        match self {
            MouseButton::Left => (LEFT_DOWN, LEFT_UP),
            MouseButton::Right => (RIGHT_DOWN, RIGHT_UP),
        }
    }

    /// The other button.
    pub fn toggled(self) -> Self {
        match self {
            MouseButton::Left => MouseButton::Right,
            MouseButton::Right => MouseButton::Left,
        }
    }

    /// Lowercase name, as accepted on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
        }
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MouseButton {
    type Err = ClickerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(MouseButton::Left),
            "right" => Ok(MouseButton::Right),
            other => Err(ClickerError::invalid_config(
                "button",
                format!("'{}' is not one of left, right", other),
            )),
        }
    }
}

/// Parameters of one click run.
///
/// Fields stay signed and unchecked so that bad input reaches
/// [`validate`](ClickConfig::validate) instead of being wrapped on the way in.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickConfig {
    /// Pause between clicks, in whole milliseconds.
    pub interval_ms: i64,
    /// Number of clicks; 0 clicks until stopped.
    pub count: i64,
    pub button: MouseButton,
    /// Pause before the first click, in seconds.
    pub delay_secs: f64,
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            count: 0,
            button: MouseButton::Left,
            delay_secs: 0.0,
        }
    }
}

impl ClickConfig {
    /// Build a config from command-line units.
    ///
    /// The interval is rounded to whole milliseconds, so anything below half
    /// a millisecond ends up as 0 and fails validation.
    pub fn from_seconds(interval_secs: f64, count: i64, button: MouseButton, delay_secs: f64) -> Self {
        Self {
            interval_ms: (interval_secs * 1000.0).round() as i64,
            count,
            button,
            delay_secs,
        }
    }

    /// Check every field, in the order interval, delay, count, and report
    /// the first one that is out of range.
    ///
    /// Interval and delay are capped at [`MAX_PAUSE`].
    pub fn validate(&self) -> Result<()> {
        if self.interval_ms <= 0 {
            return Err(ClickerError::invalid_config(
                "interval",
                "must be greater than 0",
            ));
        }

        if self.interval() > MAX_PAUSE {
            return Err(ClickerError::invalid_config(
                "interval",
                format!("out of range (at most {} ms)", MAX_PAUSE.as_millis()),
            ));
        }

        self.delay()?;

        if self.count < 0 {
            return Err(ClickerError::invalid_config("count", "must not be negative"));
        }

        Ok(())
    }

    /// Interval as a duration. Non-positive intervals map to zero.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(u64::try_from(self.interval_ms).unwrap_or(0))
    }

    /// Start delay as a duration, or the `delay` error when it is negative,
    /// not finite or longer than [`MAX_PAUSE`].
    pub fn delay(&self) -> Result<Duration> {
        if !self.delay_secs.is_finite() {
            return Err(ClickerError::invalid_config("delay", "must be a finite number"));
        }

        if self.delay_secs < 0.0 {
            return Err(ClickerError::invalid_config("delay", "must not be negative"));
        }

        match Duration::try_from_secs_f64(self.delay_secs) {
            Ok(delay) if delay <= MAX_PAUSE => Ok(delay),
            _ => Err(ClickerError::invalid_config(
                "delay",
                format!("out of range (at most {} s)", MAX_PAUSE.as_secs()),
            )),
        }
    }

    /// Click limit, or `None` when the loop runs until cancelled.
    pub fn limit(&self) -> Option<u64> {
        match u64::try_from(self.count) {
            Ok(0) | Err(_) => None,
            Ok(n) => Some(n),
        }
    }
}
