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

use std::fmt;
use std::sync::Arc;

use crate::LogLevel;
use crate::LogMessage;
use crate::dispatcher::Shared;

/// A cheap, cloneable producer handle of a [`Dispatcher`](crate::Dispatcher).
///
/// Loggers only queue messages. They keep the queue and the sinks alive, but not the worker:
/// once the dispatcher is dropped, messages queue up until the last logger is gone.
#[derive(Debug, Clone)]
pub struct Logger {
    shared: Arc<Shared>,
}

impl Logger {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Whether a message at `level` would be queued.
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.shared.enabled(level)
    }

    /// Format and queue a message if its level passes the gate.
    pub fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if self.shared.enabled(level) {
            self.shared.enqueue(LogMessage::new(level, args.to_string()));
        }
    }

    /// Queue a message at [`LogLevel::Debug`].
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Debug, args);
    }

    /// Queue a message at [`LogLevel::Trace`].
    pub fn trace(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Trace, args);
    }

    /// Queue a message at [`LogLevel::Info`].
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Info, args);
    }

    /// Queue a message at [`LogLevel::Warning`].
    pub fn warning(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Warning, args);
    }

    /// Queue a message at [`LogLevel::Error`].
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Error, args);
    }

    /// Queue a message at [`LogLevel::Critical`].
    pub fn critical(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Critical, args);
    }
}

/// Queue a message on a [`Logger`] or [`Dispatcher`](crate::Dispatcher) at the given level.
///
/// The level is checked before the format arguments are evaluated, so a filtered-out call costs
/// one atomic load.
///
/// # Examples
///
/// ```
/// use ringlog::Dispatcher;
/// use ringlog::LogLevel;
///
/// let dispatcher = Dispatcher::default();
/// ringlog::log!(dispatcher, LogLevel::Warning, "disk usage at {}%", 93);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level: $crate::LogLevel = $level;
        if logger.enabled(level) {
            logger.log(level, format_args!($($arg)+));
        }
    }};
}

/// Queue a message at [`LogLevel::Debug`](crate::LogLevel::Debug). See [`log!`](crate::log).
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Queue a message at [`LogLevel::Trace`](crate::LogLevel::Trace). See [`log!`](crate::log).
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Queue a message at [`LogLevel::Info`](crate::LogLevel::Info). See [`log!`](crate::log).
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Queue a message at [`LogLevel::Warning`](crate::LogLevel::Warning). See [`log!`](crate::log).
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Queue a message at [`LogLevel::Error`](crate::LogLevel::Error). See [`log!`](crate::log).
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Queue a message at [`LogLevel::Critical`](crate::LogLevel::Critical). See [`log!`](crate::log).
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}
