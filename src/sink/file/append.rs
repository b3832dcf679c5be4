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

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use jiff::tz::TimeZone;

use crate::Error;
use crate::LogLevel;
use crate::LogMessage;
use crate::layout::TextLayout;
use crate::sink::Sink;
use crate::sink::file::clock::Clock;
use crate::sink::file::ring::IndexRing;
use crate::sink::file::rolling::FileNamePattern;
use crate::sink::file::rolling::RotationStore;
use crate::sink::file::rolling::StoreConfig;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;
const DEFAULT_MAX_LOG_FILES: usize = 10;
const DEFAULT_MAX_FILE_INDEX: usize = 9999;
// discovery may stat every index once
const MAX_FILE_INDEX_LIMIT: usize = 999_999;
const DEFAULT_RETRY_PERIOD: Duration = Duration::from_secs(30);
const DEFAULT_MAX_BUFFERED_BYTES: usize = 100 * 1024 * 1024;

/// A builder to configure and create a [`FileSink`].
#[derive(Debug)]
pub struct FileSinkBuilder {
    pattern: String,
    level: LogLevel,
    max_file_size: usize,
    max_log_files: usize,
    max_file_index: usize,
    retry_period: Duration,
    max_buffered_bytes: usize,
    layout: TextLayout,
    trap: Box<dyn Trap>,
    clock: Clock,
}

impl FileSinkBuilder {
    /// Create a new file sink builder.
    ///
    /// The pattern must contain exactly one `{}` placeholder, which is replaced with the file
    /// index. A zero-padded width may be given as in `{:04}`.
    pub fn new(file_name_pattern: impl Into<String>) -> Self {
        Self {
            pattern: file_name_pattern.into(),
            level: LogLevel::Info,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_log_files: DEFAULT_MAX_LOG_FILES,
            max_file_index: DEFAULT_MAX_FILE_INDEX,
            retry_period: DEFAULT_RETRY_PERIOD,
            max_buffered_bytes: DEFAULT_MAX_BUFFERED_BYTES,
            layout: TextLayout::default().no_color(),
            trap: Box::new(DefaultTrap::default()),
            clock: Clock::DefaultClock,
        }
    }

    /// Build the [`FileSink`].
    ///
    /// # Errors
    ///
    /// Return an error if either:
    ///
    /// * The file name pattern does not contain exactly one index placeholder.
    /// * The maximum file index is less than 2 or greater than 999999.
    /// * The number of retained files exceeds half of the index space.
    pub fn build(self) -> Result<FileSink, Error> {
        let FileSinkBuilder {
            pattern,
            level,
            max_file_size,
            max_log_files,
            max_file_index,
            retry_period,
            max_buffered_bytes,
            layout,
            trap,
            clock,
        } = self;

        let pattern = FileNamePattern::parse(&pattern)?;

        if max_file_index < 2 {
            return Err(Error::new("max file index must be at least 2")
                .with_context("max_file_index", max_file_index));
        }
        if max_file_index > MAX_FILE_INDEX_LIMIT {
            return Err(Error::new("max file index must be at most 999999")
                .with_context("max_file_index", max_file_index));
        }

        let ring = IndexRing::new(max_file_index);
        if max_log_files > ring.midpoint() {
            return Err(
                Error::new("max log files exceeds the retention bound of the index space")
                    .with_context("max_log_files", max_log_files)
                    .with_context("bound", ring.midpoint()),
            );
        }

        let config = StoreConfig {
            pattern,
            ring,
            max_file_size,
            max_files: max_log_files,
            retry_period,
            max_buffered_bytes,
        };
        let metrics = FileSinkMetrics::default();
        let store = RotationStore::new(config, metrics.clone(), clock, trap);
        Ok(FileSink {
            level,
            layout,
            store,
            metrics,
        })
    }

    /// Set the minimum level the sink accepts.
    ///
    /// Default to [`LogLevel::Info`].
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the size in bytes after which the sink rotates to the next file.
    ///
    /// A line is never split across files, so a file may exceed the bound by one line when that
    /// line is the first in its file.
    ///
    /// Default to 10 MiB.
    pub fn rollover_size(mut self, n: NonZeroUsize) -> Self {
        self.max_file_size = n.get();
        self
    }

    /// Set the maximum number of log files to keep.
    ///
    /// Default to 10.
    pub fn max_log_files(mut self, n: NonZeroUsize) -> Self {
        self.max_log_files = n.get();
        self
    }

    /// Set the last index of the file index space. Indices wrap back to 1 after it.
    ///
    /// Must be within `2..=999999`. Default to 9999.
    pub fn max_file_index(mut self, n: usize) -> Self {
        self.max_file_index = n;
        self
    }

    /// Set the minimum time between attempts to open an unavailable log file.
    ///
    /// Default to 30 seconds.
    pub fn retry_period(mut self, period: Duration) -> Self {
        self.retry_period = period;
        self
    }

    /// Set the maximum bytes buffered in memory while waiting to be written.
    ///
    /// Once exceeded, the oldest buffered lines are dropped and counted in
    /// [`FileSinkMetrics::dropped_messages`].
    ///
    /// Default to 100 MiB.
    pub fn max_buffered_bytes(mut self, n: NonZeroUsize) -> Self {
        self.max_buffered_bytes = n.get();
        self
    }

    /// Set the timezone for timestamps.
    ///
    /// Default to the system timezone.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.layout = self.layout.timezone(tz);
        self
    }

    /// Set the trap for handling filesystem errors, which are never returned to the caller.
    ///
    /// Default to [`DefaultTrap`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ringlog::sink::FileSinkBuilder;
    /// use ringlog::trap::NoopTrap;
    ///
    /// let builder = FileSinkBuilder::new("logs/app.{}.log");
    /// builder.trap(NoopTrap::default());
    /// ```
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    #[cfg(test)]
    pub(crate) fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

/// Counters describing the write-behind buffer of a [`FileSink`].
///
/// The handle is cheap to clone and keeps reporting after the sink has been moved into a
/// dispatcher.
#[derive(Debug, Clone, Default)]
pub struct FileSinkMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    dropped_messages: AtomicU64,
    buffered_bytes: AtomicUsize,
}

impl FileSinkMetrics {
    /// The number of buffered lines dropped because the buffer exceeded its byte budget.
    pub fn dropped_messages(&self) -> u64 {
        self.inner.dropped_messages.load(Ordering::Relaxed)
    }

    /// The number of bytes buffered in memory and not yet written.
    pub fn buffered_bytes(&self) -> usize {
        self.inner.buffered_bytes.load(Ordering::Relaxed)
    }

    pub(crate) fn add_dropped_messages(&self, n: u64) {
        self.inner.dropped_messages.fetch_add(n, Ordering::Relaxed);
    }

    pub(crate) fn set_buffered_bytes(&self, n: usize) {
        self.inner.buffered_bytes.store(n, Ordering::Relaxed);
    }
}

/// A sink that writes messages to a bounded ring of numbered files.
///
/// See the [module documentation](crate::sink::file) for the rotation behavior.
#[derive(Debug)]
pub struct FileSink {
    level: LogLevel,
    layout: TextLayout,
    store: RotationStore,
    metrics: FileSinkMetrics,
}

impl FileSink {
    /// Create a builder for a sink writing to files named by `file_name_pattern`.
    pub fn builder(file_name_pattern: impl Into<String>) -> FileSinkBuilder {
        FileSinkBuilder::new(file_name_pattern)
    }

    /// Return a handle to the buffer counters of this sink.
    pub fn metrics(&self) -> FileSinkMetrics {
        self.metrics.clone()
    }
}

impl Sink for FileSink {
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
        self.store.record(line);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.store.flush();
        Ok(())
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        self.store.close();
    }
}
