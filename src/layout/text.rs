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

use std::fmt::Write;

#[cfg(feature = "colored")]
use colored::Color;
#[cfg(feature = "colored")]
use colored::Colorize;
use jiff::tz::TimeZone;

use crate::LogLevel;
use crate::LogMessage;

/// A layout that formats a log message as one line of text.
///
/// Output format:
///
/// ```text
/// [2024.08.11 22:44:57.172][ERROR ] Hello error!
/// [2024.08.11 22:44:57.172][WARN  ] Hello warn!
/// [2024.08.11 22:44:57.172][INFO  ] Hello info!
/// ```
///
/// Each formatted line ends with `\n`. The timestamp is rendered in the configured timezone,
/// defaulting to the system timezone.
///
/// With the `colored` feature, level tags are colored unless [`no_color`](TextLayout::no_color)
/// is set. File sinks always use an uncolored layout.
///
/// # Examples
///
/// ```
/// use jiff::tz::TimeZone;
/// use ringlog::layout::TextLayout;
///
/// let layout = TextLayout::default().no_color().timezone(TimeZone::UTC);
/// ```
#[derive(Debug, Clone)]
pub struct TextLayout {
    no_color: bool,
    timezone: TimeZone,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            no_color: false,
            timezone: TimeZone::system(),
        }
    }
}

impl TextLayout {
    /// Disable colored output.
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    /// Set the timezone for timestamps.
    ///
    /// Defaults to the system timezone if not set.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.timezone = tz;
        self
    }

    /// Format a message into a line, including the trailing newline.
    pub fn format(&self, message: &LogMessage) -> String {
        let zoned = message.timestamp().to_zoned(self.timezone.clone());
        let mut line = String::with_capacity(message.text().len() + 40);

        // SAFETY: write to a string always succeeds
        write!(
            &mut line,
            "[{}.{:03}][{}] {}",
            zoned.strftime("%Y.%m.%d %H:%M:%S"),
            zoned.millisecond(),
            self.format_level(message.level()),
            message.text()
        )
        .unwrap();
        line.push('\n');
        line
    }

    fn format_level(&self, level: LogLevel) -> String {
        let tag = format!("{level:<6}");
        if self.no_color {
            tag
        } else {
            colorize_level(tag, level)
        }
    }
}

#[cfg(feature = "colored")]
fn colorize_level(tag: String, level: LogLevel) -> String {
    let color = match level {
        LogLevel::Critical => Color::BrightRed,
        LogLevel::Error => Color::Red,
        LogLevel::Warning => Color::Yellow,
        LogLevel::Info => Color::Green,
        LogLevel::Debug => Color::Blue,
        LogLevel::Trace => Color::Magenta,
        LogLevel::Off => return tag,
    };
    tag.color(color).to_string()
}

#[cfg(not(feature = "colored"))]
fn colorize_level(tag: String, _: LogLevel) -> String {
    tag
}
