// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Log levels and the lock-free level gate.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

use crate::Error;

/// The severity of a log message.
///
/// Levels are ordered from the least to the most severe:
///
/// `Debug < Trace < Info < Warning < Error < Critical < Off`
///
/// `Off` is a sentinel: a sink whose level is `Off` accepts nothing, and no message is ever
/// emitted at `Off`.
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LogLevel {
    /// Designates lower priority information.
    Debug = 0,
    /// Designates very low priority, often extremely verbose, information.
    Trace = 1,
    /// Designates useful information.
    Info = 2,
    /// Designates hazardous situations.
    #[cfg_attr(feature = "serde", serde(alias = "warn"))]
    Warning = 3,
    /// Designates very serious errors.
    Error = 4,
    /// Designates critical errors.
    #[cfg_attr(feature = "serde", serde(alias = "crit"))]
    Critical = 5,
    /// Disables everything.
    Off = 6,
}

impl LogLevel {
    /// Return the tag of the level, as written into log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRIT",
            LogLevel::Off => "OFF",
        }
    }

    fn from_u8(value: u8) -> LogLevel {
        match value {
            0 => LogLevel::Debug,
            1 => LogLevel::Trace,
            2 => LogLevel::Info,
            3 => LogLevel::Warning,
            4 => LogLevel::Error,
            5 => LogLevel::Critical,
            _ => LogLevel::Off,
        }
    }
}

impl fmt::Debug for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<LogLevel, Self::Err> {
        for (name, level) in [
            ("debug", LogLevel::Debug),
            ("trace", LogLevel::Trace),
            ("info", LogLevel::Info),
            ("warning", LogLevel::Warning),
            ("warn", LogLevel::Warning),
            ("error", LogLevel::Error),
            ("critical", LogLevel::Critical),
            ("crit", LogLevel::Critical),
            ("off", LogLevel::Off),
        ] {
            if s.eq_ignore_ascii_case(name) {
                return Ok(level);
            }
        }

        Err(Error::new(format!("malformed level: {s:?}")))
    }
}

/// A [`LogLevel`] that can be shared between threads and read without locking.
///
/// The dispatcher keeps the minimum level over all registered sinks here, so that producers can
/// reject messages no sink would accept before touching the queue.
#[derive(Debug)]
pub(crate) struct AtomicLevel(AtomicU8);

impl AtomicLevel {
    pub(crate) const fn new(level: LogLevel) -> Self {
        AtomicLevel(AtomicU8::new(level as u8))
    }

    pub(crate) fn load(&self) -> LogLevel {
        LogLevel::from_u8(self.0.load(Ordering::Relaxed))
    }

    pub(crate) fn store(&self, level: LogLevel) {
        self.0.store(level as u8, Ordering::Relaxed);
    }

    /// Whether a message at `level` passes the gate.
    pub(crate) fn enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::Off && level >= self.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Trace);
        assert!(LogLevel::Trace < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Critical);
        assert!(LogLevel::Critical < LogLevel::Off);
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!("Warning".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!("crit".parse::<LogLevel>().unwrap(), LogLevel::Critical);
        assert_eq!("off".parse::<LogLevel>().unwrap(), LogLevel::Off);

        let err = "verbose".parse::<LogLevel>().unwrap_err();
        assert_eq!(err.to_string(), r#"malformed level: "verbose""#);
    }

    #[test]
    fn test_level_padding() {
        assert_eq!(format!("[{:<6}]", LogLevel::Info), "[INFO  ]");
        assert_eq!(format!("[{:<6}]", LogLevel::Error), "[ERROR ]");
    }

    #[test]
    fn test_atomic_level_gate() {
        let gate = AtomicLevel::new(LogLevel::Off);
        assert!(!gate.enabled(LogLevel::Critical));

        gate.store(LogLevel::Info);
        assert_eq!(gate.load(), LogLevel::Info);
        assert!(!gate.enabled(LogLevel::Debug));
        assert!(!gate.enabled(LogLevel::Trace));
        assert!(gate.enabled(LogLevel::Info));
        assert!(gate.enabled(LogLevel::Critical));
        assert!(!gate.enabled(LogLevel::Off));
    }
}
