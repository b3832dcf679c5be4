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

//! A sink that persists messages into a bounded ring of numbered files.
//!
//! Files are named by substituting an index into a pattern such as `logs/app.{}.log`. When the
//! current file would exceed the size bound, the sink rotates to the next index and deletes the
//! file that falls out of the retention window. Indices wrap around after the last one.
//!
//! Recording never touches the filesystem. Lines are buffered in memory and written when the sink
//! is flushed. If the target cannot be opened, buffered lines are kept (up to a byte budget) and
//! opening is retried after a fixed period.
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroUsize;
//!
//! use ringlog::Dispatcher;
//! use ringlog::LogLevel;
//! use ringlog::sink::FileSink;
//!
//! # let dir = tempfile::tempdir().unwrap();
//! # let pattern = format!("{}/app.{{}}.log", dir.path().display());
//! let sink = FileSink::builder(pattern)
//!     .level(LogLevel::Info)
//!     .rollover_size(NonZeroUsize::new(1024 * 1024).unwrap())
//!     .max_log_files(NonZeroUsize::new(5).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::builder().build();
//! dispatcher.add_sink(sink);
//! dispatcher.initialize();
//! dispatcher.info(format_args!("This line will be written to {}.", "app.1.log"));
//! ```

pub use self::append::FileSink;
pub use self::append::FileSinkBuilder;
pub use self::append::FileSinkMetrics;

mod append;
mod clock;
mod ring;
mod rolling;
