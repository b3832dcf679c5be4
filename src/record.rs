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

//! Log messages.

use jiff::Timestamp;

use crate::LogLevel;

/// A formatted log message.
///
/// The timestamp is observed when the message is created on the producer thread, so that the
/// order of timestamps reflects emission order rather than processing order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogMessage {
    level: LogLevel,
    text: String,
    timestamp: Timestamp,
}

impl LogMessage {
    /// Create a new message observed now.
    pub fn new(level: LogLevel, text: impl Into<String>) -> Self {
        Self::with_timestamp(level, text, Timestamp::now())
    }

    /// Create a new message with an explicit timestamp.
    pub fn with_timestamp(level: LogLevel, text: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            level,
            text: text.into(),
            timestamp,
        }
    }

    /// The severity of the message.
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// The formatted message text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The observed time.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}
