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

use std::io::Write;

use crate::Error;
use crate::LogLevel;
use crate::LogMessage;
use crate::layout::TextLayout;
use crate::sink::Sink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// A sink that prints log messages to stdout or stderr, synchronously.
///
/// # Examples
///
/// ```
/// use ringlog::LogLevel;
/// use ringlog::sink::ConsoleSink;
///
/// let sink = ConsoleSink::stdout(LogLevel::Info).no_color();
/// ```
#[derive(Debug)]
pub struct ConsoleSink {
    level: LogLevel,
    stream: Stream,
    layout: TextLayout,
}

impl ConsoleSink {
    /// Create a sink printing to stdout.
    pub fn stdout(level: LogLevel) -> Self {
        Self::new(level, Stream::Stdout)
    }

    /// Create a sink printing to stderr.
    pub fn stderr(level: LogLevel) -> Self {
        Self::new(level, Stream::Stderr)
    }

    fn new(level: LogLevel, stream: Stream) -> Self {
        Self {
            level,
            stream,
            layout: TextLayout::default(),
        }
    }

    /// Set the layout used to format lines.
    pub fn with_layout(mut self, layout: TextLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Disable colored level tags.
    pub fn no_color(mut self) -> Self {
        self.layout = self.layout.no_color();
        self
    }
}

impl Sink for ConsoleSink {
    fn level(&self) -> LogLevel {
        self.level
    }

    fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    fn record(&mut self, message: &LogMessage) -> Result<(), Error> {
        if message.level() < self.level {
            return Ok(());
        }

        let line = self.layout.format(message);
        match self.stream {
            Stream::Stdout => std::io::stdout().write_all(line.as_bytes()),
            Stream::Stderr => std::io::stderr().write_all(line.as_bytes()),
        }
        .map_err(Error::from_io_error)
    }

    fn flush(&mut self) -> Result<(), Error> {
        match self.stream {
            Stream::Stdout => std::io::stdout().flush(),
            Stream::Stderr => std::io::stderr().flush(),
        }
        .map_err(Error::from_io_error)
    }
}
