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

//! Plain configuration values for dispatchers and file sinks.
//!
//! With the `serde` feature, these can be deserialized from any serde format. Missing fields take
//! their defaults.
//!
//! ```
//! # #[cfg(feature = "serde")]
//! # {
//! use ringlog::config::FileSinkConfig;
//!
//! let config: FileSinkConfig = serde_json::from_str(
//!     r#"{ "file_name_pattern": "logs/app.{}.log", "level": "warn", "max_log_files": 3 }"#,
//! )
//! .unwrap();
//! let sink = config.into_builder().unwrap().build().unwrap();
//! # }
//! ```

use std::num::NonZeroUsize;
use std::time::Duration;

use crate::Error;
use crate::LogLevel;
use crate::dispatcher::DispatcherBuilder;
use crate::sink::FileSinkBuilder;

/// Configuration of a [`FileSink`](crate::sink::FileSink).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FileSinkConfig {
    /// The minimum level the sink accepts.
    pub level: LogLevel,
    /// The file name template, with one `{}` placeholder for the file index.
    pub file_name_pattern: String,
    /// The size in bytes after which the sink rotates to the next file.
    pub max_file_size: usize,
    /// The number of files to keep.
    pub max_log_files: usize,
}

impl Default for FileSinkConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file_name_pattern: "logs/app.{}.log".to_string(),
            max_file_size: 10 * 1024 * 1024,
            max_log_files: 10,
        }
    }
}

impl FileSinkConfig {
    /// Convert into a builder, which may be further adjusted before building.
    ///
    /// # Errors
    ///
    /// Return an error if a size or count is zero.
    pub fn into_builder(self) -> Result<FileSinkBuilder, Error> {
        let FileSinkConfig {
            level,
            file_name_pattern,
            max_file_size,
            max_log_files,
        } = self;

        let max_file_size = NonZeroUsize::new(max_file_size)
            .ok_or_else(|| Error::new("max file size must be positive"))?;
        let max_log_files = NonZeroUsize::new(max_log_files)
            .ok_or_else(|| Error::new("max log files must be positive"))?;

        Ok(FileSinkBuilder::new(file_name_pattern)
            .level(level)
            .rollover_size(max_file_size)
            .max_log_files(max_log_files))
    }
}

/// Configuration of a [`Dispatcher`](crate::Dispatcher).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DispatcherConfig {
    /// How often the worker drains the queue, in milliseconds.
    pub flush_interval_ms: u64,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            flush_interval_ms: 500,
        }
    }
}

impl DispatcherConfig {
    /// Convert into a builder, which may be further adjusted before building.
    pub fn into_builder(self) -> DispatcherBuilder {
        DispatcherBuilder::default().flush_interval(Duration::from_millis(self.flush_interval_ms))
    }
}
